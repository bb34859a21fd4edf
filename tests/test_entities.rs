use myth_brawler::config::PlayerConfig;
use myth_brawler::entities::*;
use myth_brawler::input::MoveVector;

const FIELD: Field = Field { width: 1200.0, height: 720.0 };

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn make_enemy(x: f32, y: f32, hp: f32) -> Enemy {
    Enemy {
        name: "Monai".to_string(),
        role: EnemyRole::Common,
        x,
        y,
        w: 150.0,
        h: 150.0,
        hp,
        max_hp: hp,
        speed: 70.0,
        facing: Facing::Left,
        inset: HitboxInset::new(30.0, 25.0, 40.0, 40.0),
    }
}

// ── Rect ──────────────────────────────────────────────────────────────────────

#[test]
fn overlapping_rects_intersect() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(5.0, 5.0, 10.0, 10.0);
    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
}

#[test]
fn touching_edges_do_not_intersect() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(10.0, 0.0, 10.0, 10.0);
    assert!(!a.intersects(&b));
}

#[test]
fn zero_sized_rect_never_intersects() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(5.0, 5.0, 0.0, 4.0);
    assert!(!a.intersects(&b));
    assert!(!b.intersects(&a));
}

#[test]
fn contained_rect_intersects() {
    let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
    let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
    assert!(outer.intersects(&inner));
}

// ── Hitbox inset ──────────────────────────────────────────────────────────────

#[test]
fn inset_left_facing_offsets_from_left_edge() {
    let body = Rect::new(100.0, 100.0, 150.0, 150.0);
    let r = HitboxInset::new(30.0, 25.0, 40.0, 40.0).apply(body, Facing::Left);
    assert_eq!(r, Rect::new(130.0, 125.0, 110.0, 110.0));
}

#[test]
fn inset_right_facing_is_mirrored() {
    let body = Rect::new(100.0, 100.0, 150.0, 150.0);
    let r = HitboxInset::new(30.0, 25.0, 40.0, 40.0).apply(body, Facing::Right);
    assert_eq!(r, Rect::new(110.0, 125.0, 110.0, 110.0));
}

#[test]
fn inset_never_collapses_below_one_unit() {
    let body = Rect::new(0.0, 0.0, 20.0, 20.0);
    let r = HitboxInset::new(0.0, 0.0, 50.0, 50.0).apply(body, Facing::Left);
    assert_eq!(r.w, 1.0);
    assert_eq!(r.h, 1.0);
}

#[test]
fn no_inset_is_the_body() {
    let body = Rect::new(3.0, 4.0, 36.0, 36.0);
    assert_eq!(HitboxInset::NONE.apply(body, Facing::Right), body);
}

// ── Field ─────────────────────────────────────────────────────────────────────

#[test]
fn field_clamp_keeps_box_on_field() {
    assert_eq!(FIELD.clamp(-10.0, -5.0, 50.0, 50.0), (0.0, 0.0));
    assert_eq!(FIELD.clamp(1190.0, 700.0, 50.0, 50.0), (1150.0, 670.0));
    assert_eq!(FIELD.clamp(300.0, 200.0, 50.0, 50.0), (300.0, 200.0));
}

#[test]
fn band_clamp_raises_to_top_and_caps_at_bottom() {
    assert_eq!(FIELD.clamp_to_band(100.0, 210.0, 250.0), 250.0);
    assert_eq!(FIELD.clamp_to_band(600.0, 210.0, 250.0), 510.0);
    assert_eq!(FIELD.clamp_to_band(400.0, 210.0, 250.0), 400.0);
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn new_player_from_defaults() {
    let p = Player::new(&PlayerConfig::default());
    assert_eq!((p.x, p.y, p.w, p.h), (100.0, 300.0, 180.0, 210.0));
    assert_eq!(p.health, 100.0);
    assert_eq!(p.facing, Facing::Right);
    assert_eq!(p.attack_damage, p.base_damage);
    assert_eq!(p.speed, p.base_speed);
    assert!(!p.is_attacking());
}

#[test]
fn hurt_rect_is_inset_body() {
    let p = Player::new(&PlayerConfig::default());
    assert_eq!(p.hurt_rect(), Rect::new(170.0, 340.0, 40.0, 130.0));
}

#[test]
fn reach_rect_follows_facing() {
    let mut p = Player::new(&PlayerConfig::default());
    assert_eq!(p.reach_rect(), Rect::new(220.0, 380.0, 50.0, 50.0));
    p.facing = Facing::Left;
    assert_eq!(p.reach_rect(), Rect::new(110.0, 380.0, 50.0, 50.0));
}

#[test]
fn attack_rect_only_while_swinging() {
    let mut p = Player::new(&PlayerConfig::default());
    assert!(p.attack_rect().is_none());
    p.attack = AttackState::Swinging { elapsed: 0.0 };
    assert_eq!(p.attack_rect(), Some(p.reach_rect()));
}

#[test]
fn player_damage_floors_at_zero() {
    let mut p = Player::new(&PlayerConfig::default());
    p.take_damage(30.0);
    assert_eq!(p.health, 70.0);
    p.take_damage(500.0);
    assert_eq!(p.health, 0.0);
    assert!(p.is_dead());
}

#[test]
fn heal_caps_at_max() {
    let mut p = Player::new(&PlayerConfig::default());
    p.health = 80.0;
    p.heal(40.0);
    assert_eq!(p.health, 100.0);
}

#[test]
fn step_moves_and_turns() {
    let mut p = Player::new(&PlayerConfig::default());
    p.step(1.0, MoveVector::new(-1.0, 0.0), &FIELD);
    assert_eq!(p.facing, Facing::Left);
    assert!(approx(p.x, 0.0));

    p.step(0.5, MoveVector::new(1.0, 0.0), &FIELD);
    assert_eq!(p.facing, Facing::Right);
    assert!(approx(p.x, 90.0));
}

#[test]
fn small_horizontal_input_does_not_turn() {
    let mut p = Player::new(&PlayerConfig::default());
    p.step(1.0, MoveVector::new(-0.1, 0.0), &FIELD);
    assert_eq!(p.facing, Facing::Right);
    assert!(approx(p.x, 82.0));
}

#[test]
fn diagonal_step_is_normalized() {
    let mut p = Player::new(&PlayerConfig::default());
    p.step(1.0, MoveVector::new(1.0, 1.0), &FIELD);
    let moved = 180.0 * 0.7071;
    assert!(approx(p.x, 100.0 + moved));
    assert!(approx(p.y, 300.0 + moved));
}

#[test]
fn step_clamps_to_field() {
    let mut p = Player::new(&PlayerConfig::default());
    p.x = 1000.0;
    p.y = 500.0;
    p.step(1.0, MoveVector::new(1.0, 1.0), &FIELD);
    assert_eq!(p.x, 1020.0);
    assert_eq!(p.y, 510.0);
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[test]
fn enemy_damage_floors_at_zero() {
    let mut e = make_enemy(0.0, 0.0, 60.0);
    e.take_damage(30.0);
    assert_eq!(e.hp, 30.0);
    assert!(e.is_alive());
    e.take_damage(45.0);
    assert_eq!(e.hp, 0.0);
    assert!(!e.is_alive());
}

#[test]
fn health_ratio_tracks_damage() {
    let mut e = make_enemy(0.0, 0.0, 80.0);
    assert_eq!(e.health_ratio(), 1.0);
    e.take_damage(20.0);
    assert!(approx(e.health_ratio(), 0.75));
}

#[test]
fn vulnerable_rect_flips_with_facing() {
    let mut e = make_enemy(100.0, 100.0, 70.0);
    assert_eq!(e.vulnerable_rect().x, 130.0);
    e.face_towards(900.0);
    assert_eq!(e.facing, Facing::Right);
    assert_eq!(e.vulnerable_rect().x, 110.0);
    e.face_towards(0.0);
    assert_eq!(e.facing, Facing::Left);
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[test]
fn powerup_rect_ignores_float() {
    let mut pu = PowerUp::new(10.0, 20.0, 50.0, 50.0, PowerUpKind::Heal);
    pu.animate(0.1);
    assert!(pu.float_offset != 0.0);
    assert_eq!(pu.rect(), Rect::new(10.0, 20.0, 50.0, 50.0));
}

#[test]
fn powerup_bob_reverses() {
    let mut pu = PowerUp::new(0.0, 0.0, 50.0, 50.0, PowerUpKind::Buff);
    let mut peak: f32 = 0.0;
    for _ in 0..200 {
        pu.animate(0.05);
        peak = peak.max(pu.float_offset.abs());
    }
    assert!(peak < 10.0);
}

#[test]
fn powerup_labels() {
    assert_eq!(PowerUpKind::Heal.label(), "TERERE");
    assert_eq!(PowerUpKind::Buff.label(), "CARRULIM");
}

// ── MoveVector ────────────────────────────────────────────────────────────────

#[test]
fn move_vector_from_held_keys() {
    assert_eq!(MoveVector::from_held(false, false, false, false), MoveVector::default());
    assert_eq!(MoveVector::from_held(true, false, false, true), MoveVector::new(1.0, -1.0));
    assert_eq!(MoveVector::from_held(false, false, true, true), MoveVector::new(0.0, 0.0));
    assert!(MoveVector::from_held(false, false, true, true).is_idle());
}

#[test]
fn move_vector_clamps_axes() {
    assert_eq!(MoveVector::new(3.0, -2.0), MoveVector::new(1.0, -1.0));
}
