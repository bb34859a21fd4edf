use myth_brawler::ai::*;
use myth_brawler::config::AiConfig;
use myth_brawler::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

const FIELD: Field = Field { width: 1200.0, height: 720.0 };

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_enemy(x: f32, y: f32) -> Enemy {
    Enemy {
        name: "Kurupi".to_string(),
        role: EnemyRole::Common,
        x,
        y,
        w: 36.0,
        h: 36.0,
        hp: 80.0,
        max_hp: 80.0,
        speed: 50.0,
        facing: Facing::Left,
        inset: HitboxInset::NONE,
    }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

// ── Chase ─────────────────────────────────────────────────────────────────────

#[test]
fn chases_along_one_axis() {
    let mut rng = seeded_rng();
    let mut ai = EnemyBehavior::new(&mut rng);
    let mut e = make_enemy(500.0, 500.0);
    let mode = ai.update(0.1, &mut e, (600.0, 500.0), &AiConfig::default(), &FIELD, &mut rng);
    assert_eq!(mode, Mode::Chase);
    assert!(approx(e.x, 504.5)); // 50 * 0.1 * 0.9
    assert_eq!(e.y, 500.0);
}

#[test]
fn chases_both_axes_independently() {
    let mut rng = seeded_rng();
    let mut ai = EnemyBehavior::new(&mut rng);
    let mut e = make_enemy(500.0, 500.0);
    ai.update(0.1, &mut e, (400.0, 600.0), &AiConfig::default(), &FIELD, &mut rng);
    assert!(approx(e.x, 495.5));
    assert!(approx(e.y, 504.5));
}

#[test]
fn holds_still_inside_deadband() {
    let mut rng = seeded_rng();
    let mut ai = EnemyBehavior::new(&mut rng);
    let mut e = make_enemy(500.0, 500.0);
    let mode = ai.update(0.1, &mut e, (501.5, 498.5), &AiConfig::default(), &FIELD, &mut rng);
    assert_eq!(mode, Mode::Chase);
    assert_eq!((e.x, e.y), (500.0, 500.0));
}

#[test]
fn chase_is_clamped_to_field() {
    let mut rng = seeded_rng();
    let mut ai = EnemyBehavior::new(&mut rng);
    let mut e = make_enemy(1163.0, 300.0);
    ai.update(1.0, &mut e, (1190.0, 300.0), &AiConfig::default(), &FIELD, &mut rng);
    assert_eq!(e.x, 1164.0);
}

// ── Patrol ────────────────────────────────────────────────────────────────────

#[test]
fn patrols_when_far_away() {
    let tuning = AiConfig::default();
    let mut rng = seeded_rng();
    let mut ai = EnemyBehavior::new(&mut rng);
    let mut e = make_enemy(1000.0, 600.0);
    let mode = ai.update(0.1, &mut e, (0.0, 0.0), &tuning, &FIELD, &mut rng);
    assert_eq!(mode, Mode::Patrol);

    assert!((-1..=1).contains(&ai.direction()));
    assert!(ai.wander_timer() >= tuning.wander_min && ai.wander_timer() < tuning.wander_max);
    let expected = 1000.0 + ai.direction() as f32 * 50.0 * 0.1 * 0.5;
    assert!(approx(e.x, expected));
    assert_eq!(e.y, 600.0);
}

#[test]
fn patrol_keeps_direction_until_timer_runs_out() {
    let tuning = AiConfig::default();
    let mut rng = seeded_rng();
    let mut ai = EnemyBehavior::new(&mut rng);
    let mut e = make_enemy(1000.0, 600.0);
    ai.update(0.1, &mut e, (0.0, 0.0), &tuning, &FIELD, &mut rng);
    let (dir, timer) = (ai.direction(), ai.wander_timer());

    ai.update(0.25, &mut e, (0.0, 0.0), &tuning, &FIELD, &mut rng);
    assert_eq!(ai.direction(), dir);
    assert!(approx(ai.wander_timer(), timer - 0.25));
}

#[test]
fn new_behavior_picks_a_side() {
    let mut rng = seeded_rng();
    for _ in 0..20 {
        let ai = EnemyBehavior::new(&mut rng);
        assert!(ai.direction() == -1 || ai.direction() == 1);
        assert_eq!(ai.wander_timer(), 0.0);
    }
}

#[test]
fn same_seed_same_path() {
    let run = || {
        let mut rng = seeded_rng();
        let mut ai = EnemyBehavior::new(&mut rng);
        let mut e = make_enemy(1000.0, 600.0);
        for _ in 0..300 {
            ai.update(1.0 / 60.0, &mut e, (0.0, 0.0), &AiConfig::default(), &FIELD, &mut rng);
        }
        (e.x, e.y)
    };
    assert_eq!(run(), run());
}
