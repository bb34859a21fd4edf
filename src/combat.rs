/// Combat resolution: opening a swing, timing it out, and applying its hits.

use crate::entities::{AttackState, Enemy, Player, Rect};

/// Outcome of one resolved swing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HitReport {
    /// Targets the swing connected with.
    pub hits: u32,
    pub damage_dealt: f32,
    pub score: u32,
    /// Targets brought to zero health by this swing.
    pub kills: u32,
}

/// Open a swing if none is in progress and return its attack rectangle.
/// Returns `None` mid-swing so one swing resolves at most once.
pub fn begin_attack(player: &mut Player) -> Option<Rect> {
    if player.is_attacking() {
        return None;
    }
    player.attack = AttackState::Swinging { elapsed: 0.0 };
    Some(player.reach_rect())
}

/// Advance the swing timer and close the swing once it reaches the
/// player's attack duration.
pub fn advance_swing(player: &mut Player, dt: f32) {
    if let AttackState::Swinging { elapsed } = player.attack {
        let elapsed = elapsed + dt;
        player.attack = if elapsed >= player.attack_duration {
            AttackState::Idle
        } else {
            AttackState::Swinging { elapsed }
        };
    }
}

/// Damage every living target whose vulnerable rectangle overlaps `swing`.
/// Each hit is worth `reward` points; there is no hit cap and no falloff.
pub fn resolve_attack<'a>(
    swing: Rect,
    damage: f32,
    reward: u32,
    targets: impl IntoIterator<Item = &'a mut Enemy>,
) -> HitReport {
    let mut report = HitReport::default();
    for target in targets {
        if !target.is_alive() || !swing.intersects(&target.vulnerable_rect()) {
            continue;
        }
        target.take_damage(damage);
        report.hits += 1;
        report.damage_dealt += damage;
        report.score = report.score.saturating_add(reward);
        if !target.is_alive() {
            report.kills += 1;
        }
    }
    report
}

/// Health drained from `player` for one frame of touching `enemy`, at
/// `dps` health per second.  Returns whether contact happened.
pub fn apply_contact(player: &mut Player, enemy: &Enemy, dps: f32, dt: f32) -> bool {
    if enemy.vulnerable_rect().intersects(&player.hurt_rect()) {
        player.take_damage(dps * dt);
        true
    } else {
        false
    }
}
