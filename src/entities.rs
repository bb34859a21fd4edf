/// Entity model: player, enemies, power-ups and the rectangles they collide with.
///
/// Everything here is plain data plus the geometry each entity derives from
/// its own fields.  Behaviour that needs randomness or other entities lives in
/// `ai`, `combat`, `powerups` and `level`.

use serde::{Deserialize, Serialize};

use crate::config::PlayerConfig;
use crate::input::MoveVector;

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in field units, anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Standard overlap test.  Rectangles that merely touch along an edge do
    /// not intersect, and neither does anything with a zero-sized side.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.w <= 0.0 || self.h <= 0.0 || other.w <= 0.0 || other.h <= 0.0 {
            return false;
        }
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Shrinks a body rectangle into the tighter region that can take (and deal)
/// damage.  Offsets are measured from the left edge of a left-facing sprite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HitboxInset {
    pub offset_x: f32,
    pub offset_y: f32,
    pub shrink_w: f32,
    pub shrink_h: f32,
}

impl HitboxInset {
    pub const NONE: HitboxInset = HitboxInset {
        offset_x: 0.0,
        offset_y: 0.0,
        shrink_w: 0.0,
        shrink_h: 0.0,
    };

    pub fn new(offset_x: f32, offset_y: f32, shrink_w: f32, shrink_h: f32) -> Self {
        HitboxInset { offset_x, offset_y, shrink_w, shrink_h }
    }

    /// Apply the inset to `body`.  When the owner faces right the horizontal
    /// offset is mirrored so the box follows the flipped sprite.  Sides never
    /// shrink below one unit.
    pub fn apply(&self, body: Rect, facing: Facing) -> Rect {
        let w = (body.w - self.shrink_w).max(1.0);
        let h = (body.h - self.shrink_h).max(1.0);
        let x = match facing {
            Facing::Left => body.x + self.offset_x,
            Facing::Right => body.right() - self.offset_x - w,
        };
        Rect::new(x, body.y + self.offset_y, w, h)
    }
}

/// Placement of the player's weapon box relative to the body, for a
/// right-facing player.  Mirrored when facing left.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackBox {
    pub offset_x: f32,
    pub offset_y: f32,
    pub w: f32,
    pub h: f32,
}

/// The play field.  Positions are clamped to `[0, width - w] × [0, height - h]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    /// Clamp a top-left position so a `w × h` box stays on the field.
    pub fn clamp(&self, x: f32, y: f32, w: f32, h: f32) -> (f32, f32) {
        (
            x.min(self.width - w).max(0.0),
            y.min(self.height - h).max(0.0),
        )
    }

    /// Clamp `y` into the band `[top, height - h]` used while a level is live.
    /// The bottom edge wins when the band is narrower than the box.
    pub fn clamp_to_band(&self, y: f32, h: f32, top: f32) -> f32 {
        y.max(top).min(self.height - h).max(0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AttackState {
    Idle,
    /// A swing is in progress; `elapsed` counts seconds since it started.
    Swinging { elapsed: f32 },
}

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub health: f32,
    pub max_health: f32,
    pub facing: Facing,
    pub base_speed: f32,
    /// Current speed; differs from `base_speed` while a buff is running.
    pub speed: f32,
    pub base_damage: f32,
    /// Damage dealt per hit; differs from `base_damage` while a buff is running.
    pub attack_damage: f32,
    pub attack: AttackState,
    pub attack_duration: f32,
    pub hurt_inset: HitboxInset,
    pub attack_box: AttackBox,
}

impl Player {
    pub fn new(cfg: &PlayerConfig) -> Self {
        Player {
            x: cfg.start_x,
            y: cfg.start_y,
            w: cfg.width,
            h: cfg.height,
            health: cfg.max_health,
            max_health: cfg.max_health,
            facing: Facing::Right,
            base_speed: cfg.speed,
            speed: cfg.speed,
            base_damage: cfg.base_damage,
            attack_damage: cfg.base_damage,
            attack: AttackState::Idle,
            attack_duration: cfg.attack_duration,
            hurt_inset: cfg.hurt_inset,
            attack_box: cfg.attack_box,
        }
    }

    pub fn body(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// The region enemies must touch to hurt the player.  The player's inset
    /// is symmetric, so it is never mirrored.
    pub fn hurt_rect(&self) -> Rect {
        self.hurt_inset.apply(self.body(), Facing::Left)
    }

    /// Where the weapon reaches for the current facing, attacking or not.
    pub fn reach_rect(&self) -> Rect {
        let b = self.attack_box;
        let x = match self.facing {
            Facing::Right => self.x + b.offset_x,
            Facing::Left => self.x + self.w - b.offset_x - b.w,
        };
        Rect::new(x, self.y + b.offset_y, b.w, b.h)
    }

    /// The weapon box, present only while a swing is in progress.
    pub fn attack_rect(&self) -> Option<Rect> {
        self.is_attacking().then(|| self.reach_rect())
    }

    pub fn is_attacking(&self) -> bool {
        matches!(self.attack, AttackState::Swinging { .. })
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Move by one frame of input and clamp to the field.  Diagonal input is
    /// scaled down so it is no faster than a straight line.
    pub fn step(&mut self, dt: f32, movement: MoveVector, field: &Field) {
        if movement.dx > MoveVector::FACING_THRESHOLD {
            self.facing = Facing::Right;
        } else if movement.dx < -MoveVector::FACING_THRESHOLD {
            self.facing = Facing::Left;
        }

        let mv = movement.normalized();
        let (x, y) = field.clamp(
            self.x + mv.dx * self.speed * dt,
            self.y + mv.dy * self.speed * dt,
            self.w,
            self.h,
        );
        self.x = x;
        self.y = y;
    }
}

// ── Enemies ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyRole {
    Common,
    Boss,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub name: String,
    pub role: EnemyRole,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub facing: Facing,
    pub inset: HitboxInset,
}

impl Enemy {
    pub fn body(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Where this enemy takes hits and deals contact damage.
    pub fn vulnerable_rect(&self) -> Rect {
        self.inset.apply(self.body(), self.facing)
    }

    /// Subtract `amount` from health, flooring at zero.  There is no armour
    /// and no invulnerability window.
    pub fn take_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount).max(0.0);
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Remaining health as a fraction of `max_hp`, in `[0, 1]`.
    pub fn health_ratio(&self) -> f32 {
        if self.max_hp <= 0.0 {
            return 0.0;
        }
        (self.hp / self.max_hp).clamp(0.0, 1.0)
    }

    /// Turn toward a target at horizontal position `target_x`.
    pub fn face_towards(&mut self, target_x: f32) {
        self.facing = if target_x > self.x {
            Facing::Right
        } else {
            Facing::Left
        };
    }
}

// ── Power-ups ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Restores a fixed amount of health, capped at the player's maximum.
    Heal,
    /// Temporarily boosts speed and attack damage.
    Buff,
}

impl PowerUpKind {
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Heal => "TERERE",
            PowerUpKind::Buff => "CARRULIM",
        }
    }
}

#[derive(Clone, Debug)]
pub struct PowerUp {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub kind: PowerUpKind,
    pub active: bool,
    /// Vertical bob, presentation only.  Pickup ignores it.
    pub float_offset: f32,
    float_speed: f32,
}

impl PowerUp {
    pub fn new(x: f32, y: f32, w: f32, h: f32, kind: PowerUpKind) -> Self {
        PowerUp {
            x,
            y,
            w,
            h,
            kind,
            active: true,
            float_offset: 0.0,
            float_speed: 2.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Advance the idle bob.
    pub fn animate(&mut self, dt: f32) {
        self.float_offset += self.float_speed * 15.0 * dt;
        if self.float_offset.abs() > 5.0 {
            self.float_speed = -self.float_speed;
        }
    }
}
