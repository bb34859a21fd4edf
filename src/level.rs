/// One level: intro countdown, a wave of common enemies, then the boss.
///
/// Phase flow is `Intro → Active → Victory | Defeat`.  The last two are
/// terminal: nothing moves, fights or heals once either is reached.

use crossterm::style::Color;
use rand::Rng;

use crate::ai::EnemyBehavior;
use crate::combat::{self, HitReport};
use crate::config::{EnemySpec, LevelConfig, Placement};
use crate::display::{self, Canvas};
use crate::entities::{AttackState, Enemy, EnemyRole, Facing, Field, PowerUpKind};
use crate::input::{InputEvent, MoveVector};
use crate::powerups::PowerUpEngine;
use crate::screens::{Screen, ScreenId, Transition};
use crate::session::GameSession;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelPhase {
    Intro,
    Active,
    Victory,
    Defeat,
}

impl LevelPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LevelPhase::Victory | LevelPhase::Defeat)
    }
}

/// A common enemy and its movement state.
struct Hostile {
    enemy: Enemy,
    behavior: EnemyBehavior,
}

pub struct LevelSession {
    index: usize,
    level_count: usize,
    config: LevelConfig,
    phase: LevelPhase,
    countdown: f32,
    text_alpha: f32,
    hostiles: Vec<Hostile>,
    boss: Enemy,
    boss_behavior: EnemyBehavior,
    boss_active: bool,
    powerups: PowerUpEngine,
    victory_timer: f32,
    /// Set once the clear bonus has been paid out.
    cleared: bool,
}

fn spawn_enemy(spec: &EnemySpec, role: EnemyRole, x: f32, y: f32, field: &Field) -> Enemy {
    let (x, y) = field.clamp(x, y, spec.width, spec.height);
    Enemy {
        name: spec.name.clone(),
        role,
        x,
        y,
        w: spec.width,
        h: spec.height,
        hp: spec.hp,
        max_hp: spec.hp,
        speed: spec.speed,
        facing: Facing::Left,
        inset: spec.inset,
    }
}

fn wave_position(placement: &Placement, i: u32, rng: &mut impl Rng) -> (f32, f32) {
    match placement {
        Placement::Row { x0, step, y, y_jitter } => {
            let jitter = rng.gen_range(-*y_jitter..=*y_jitter) as f32;
            (x0 + i as f32 * step, y + jitter)
        }
        Placement::Scatter { area } => (
            rng.gen_range(area.x_min..=area.x_max) as f32,
            rng.gen_range(area.y_min..=area.y_max) as f32,
        ),
    }
}

impl LevelSession {
    /// Build level `index` from the session's config, or `None` if there is
    /// no such level.
    pub fn new(index: usize, session: &mut GameSession) -> Option<Self> {
        let config = session.config.level(index)?.clone();
        let field = session.config.field;
        let rng = &mut session.rng;

        let hostiles = (0..config.wave.count)
            .map(|i| {
                let (x, y) = wave_position(&config.wave.placement, i, rng);
                Hostile {
                    enemy: spawn_enemy(&config.wave.enemy, EnemyRole::Common, x, y, &field),
                    behavior: EnemyBehavior::new(rng),
                }
            })
            .collect();
        let boss = spawn_enemy(
            &config.boss.enemy,
            EnemyRole::Boss,
            config.boss.x,
            config.boss.y,
            &field,
        );
        let boss_behavior = EnemyBehavior::new(rng);

        tracing::info!(level = index + 1, title = %config.title, "level loaded");
        Some(LevelSession {
            index,
            level_count: session.config.levels.len(),
            countdown: session.config.intro.countdown,
            text_alpha: 0.0,
            phase: LevelPhase::Intro,
            hostiles,
            boss,
            boss_behavior,
            boss_active: false,
            powerups: PowerUpEngine::new(session.config.powerups.clone()),
            victory_timer: 0.0,
            cleared: false,
            config,
        })
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn countdown(&self) -> f32 {
        self.countdown
    }

    pub fn text_alpha(&self) -> f32 {
        self.text_alpha
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.level_count
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.hostiles.iter().map(|h| &h.enemy)
    }

    /// Direct access for setting up scenarios.  Edits bypass the field and
    /// band clamps until the next live frame re-applies them.
    pub fn enemies_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.hostiles.iter_mut().map(|h| &mut h.enemy)
    }

    pub fn enemy_count(&self) -> usize {
        self.hostiles.len()
    }

    pub fn boss(&self) -> &Enemy {
        &self.boss
    }

    /// Same caveat as `enemies_mut`.
    pub fn boss_mut(&mut self) -> &mut Enemy {
        &mut self.boss
    }

    pub fn boss_active(&self) -> bool {
        self.boss_active
    }

    pub fn powerups(&self) -> &PowerUpEngine {
        &self.powerups
    }

    /// For forcing pickups and buffs in scenarios.  The engine keeps its own
    /// buff snapshot, so `leave` still reverts whatever is applied here.
    pub fn powerups_mut(&mut self) -> &mut PowerUpEngine {
        &mut self.powerups
    }

    /// Swing at whatever is in reach.  `None` if a swing is already open or
    /// the level is not live.
    pub fn attack(&mut self, session: &mut GameSession) -> Option<HitReport> {
        if self.phase != LevelPhase::Active {
            return None;
        }
        let swing = combat::begin_attack(&mut session.player)?;
        let boss = if self.boss_active { Some(&mut self.boss) } else { None };
        let targets = self.hostiles.iter_mut().map(|h| &mut h.enemy).chain(boss);
        let report = combat::resolve_attack(
            swing,
            session.player.attack_damage,
            self.config.hit_score,
            targets,
        );
        session.add_score(report.score);
        if report.hits > 0 {
            tracing::debug!(hits = report.hits, kills = report.kills, "swing landed");
        }
        Some(report)
    }

    fn next_screen(&self) -> ScreenId {
        if self.is_last() {
            ScreenId::Finale
        } else {
            ScreenId::Level(self.index + 1)
        }
    }

    /// Undo anything the level applied to the shared player.  An open swing
    /// is dropped so the next screen starts idle.
    fn leave(&mut self, session: &mut GameSession) {
        self.powerups.revert_buff(&mut session.player);
        session.player.attack = AttackState::Idle;
    }

    fn advance(&mut self, session: &mut GameSession) -> Transition {
        self.leave(session);
        if !self.cleared {
            self.cleared = true;
            session.add_score(self.config.clear_bonus);
        }
        Transition::Push(self.next_screen())
    }

    /// One live frame.  Order matters: movement, power-ups, enemies and
    /// their contact damage, boss activation, boss, then the end checks.
    fn step(&mut self, dt: f32, movement: MoveVector, session: &mut GameSession) {
        let field = session.config.field;

        session.player.step(dt, movement, &field);
        session.player.y =
            field.clamp_to_band(session.player.y, session.player.h, self.config.player_band_top);

        self.powerups.update(dt, &mut session.player, &mut session.rng);

        let target = (session.player.x, session.player.y);
        for hostile in self.hostiles.iter_mut().filter(|h| h.enemy.is_alive()) {
            let enemy = &mut hostile.enemy;
            hostile
                .behavior
                .update(dt, enemy, target, &session.config.ai, &field, &mut session.rng);
            enemy.y = field.clamp_to_band(enemy.y, enemy.h, self.config.enemy_band_top);
            enemy.face_towards(target.0);
            combat::apply_contact(&mut session.player, enemy, self.config.enemy_contact_dps, dt);
        }

        let before = self.hostiles.len();
        self.hostiles.retain(|h| h.enemy.is_alive());
        if self.hostiles.len() < before {
            tracing::debug!(removed = before - self.hostiles.len(), left = self.hostiles.len(), "enemies down");
        }

        if self.hostiles.is_empty() && !self.boss_active {
            self.boss_active = true;
            tracing::info!(boss = %self.boss.name, "boss activated");
        }

        if self.boss_active && self.boss.is_alive() {
            self.boss_behavior.update(
                dt,
                &mut self.boss,
                target,
                &session.config.ai,
                &field,
                &mut session.rng,
            );
            self.boss.y = field.clamp_to_band(self.boss.y, self.boss.h, self.config.enemy_band_top);
            self.boss.face_towards(target.0);
            combat::apply_contact(&mut session.player, &self.boss, self.config.boss_contact_dps, dt);
        }

        if session.player.is_dead() {
            self.phase = LevelPhase::Defeat;
            tracing::info!(level = self.index + 1, score = session.score(), "defeat");
        } else if self.boss_active && !self.boss.is_alive() {
            self.phase = LevelPhase::Victory;
            self.victory_timer = 0.0;
            tracing::info!(level = self.index + 1, score = session.score(), "victory");
        }
    }
}

impl Screen for LevelSession {
    fn id(&self) -> ScreenId {
        ScreenId::Level(self.index)
    }

    fn handle_input(&mut self, event: &InputEvent, session: &mut GameSession) -> Transition {
        match event {
            InputEvent::Back => {
                self.leave(session);
                return Transition::Pop;
            }
            InputEvent::DebugAdvance => {
                if session.config.allow_debug_advance && !self.is_last() {
                    self.leave(session);
                    return Transition::Push(ScreenId::Level(self.index + 1));
                }
                return Transition::None;
            }
            _ => {}
        }

        match (self.phase, event) {
            (LevelPhase::Active, InputEvent::Attack) => {
                self.attack(session);
                Transition::None
            }
            (LevelPhase::Victory, InputEvent::Confirm) => self.advance(session),
            _ => Transition::None,
        }
    }

    fn update(&mut self, dt: f32, movement: MoveVector, session: &mut GameSession) -> Transition {
        // Swings close in every phase, Victory included.
        combat::advance_swing(&mut session.player, dt);

        match self.phase {
            LevelPhase::Intro => {
                self.countdown -= dt;
                self.text_alpha = (self.text_alpha + dt * session.config.intro.fade_rate).min(255.0);
                if self.countdown <= 0.0 {
                    self.phase = LevelPhase::Active;
                    tracing::info!(level = self.index + 1, "level started");
                }
                Transition::None
            }
            LevelPhase::Active => {
                self.step(dt, movement, session);
                Transition::None
            }
            LevelPhase::Victory => match self.config.victory_auto_advance {
                Some(delay) if !self.cleared => {
                    self.victory_timer += dt;
                    if self.victory_timer >= delay {
                        self.advance(session)
                    } else {
                        Transition::None
                    }
                }
                _ => Transition::None,
            },
            LevelPhase::Defeat => Transition::None,
        }
    }

    fn draw(&self, session: &GameSession, canvas: &mut Canvas) {
        canvas.clear();

        for enemy in self.enemies() {
            canvas.fill_rect(enemy.body(), 'm', Color::Green);
            let (col, row) = canvas.to_cell(enemy.x, enemy.y);
            canvas.health_bar(col, row - 1, 6, enemy.health_ratio(), Color::Red);
        }

        if self.boss_active && self.boss.is_alive() {
            canvas.fill_rect(self.boss.body(), 'B', Color::Red);
            display::draw_boss_bar(canvas, &self.boss.name, self.boss.health_ratio());
        }

        for powerup in self.powerups.powerups() {
            let (glyph, color) = match powerup.kind {
                PowerUpKind::Heal => ('+', Color::Green),
                PowerUpKind::Buff => ('*', Color::Yellow),
            };
            let mut rect = powerup.rect();
            rect.y += powerup.float_offset;
            canvas.fill_rect(rect, glyph, color);
            let (col, row) = canvas.to_cell(rect.x, rect.bottom());
            canvas.put_str(col, row, powerup.kind.label(), Color::DarkGrey);
        }

        let player = &session.player;
        canvas.fill_rect(player.body(), '@', Color::White);
        if let Some(swing) = player.attack_rect() {
            canvas.fill_rect(swing, '/', Color::Cyan);
        }

        display::draw_hud(canvas, session.nickname(), session.score(), player.health, player.max_health);
        if let Some(buff) = self.powerups.buff() {
            display::draw_buff_panel(canvas, buff.remaining, self.powerups.buff_fraction());
        }

        match self.phase {
            LevelPhase::Intro => {
                let mut lines = vec![self.config.title.clone(), String::new()];
                lines.extend(self.config.story.iter().cloned());
                display::draw_story(canvas, &lines, self.text_alpha, 12.0);
                if self.text_alpha >= 240.0 {
                    let seconds = self.countdown.max(0.0) as u32 + 1;
                    let row = canvas.rows() as i32 - 3;
                    canvas.put_centered(row, &format!("STARTS IN {}", seconds), Color::Yellow);
                }
            }
            LevelPhase::Active => {}
            LevelPhase::Victory => {
                let mid = canvas.rows() as i32 / 2;
                canvas.put_centered(mid, "VICTORY!", Color::Yellow);
                canvas.put_centered(mid + 2, "ENTER to continue", Color::White);
            }
            LevelPhase::Defeat => {
                let mid = canvas.rows() as i32 / 2;
                canvas.put_centered(mid, "DEFEAT", Color::Red);
                canvas.put_centered(mid + 2, "ESC to go back", Color::White);
            }
        }
    }
}
