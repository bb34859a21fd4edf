/// Power-up spawning, pickup, and the timed buff they grant.

use rand::Rng;

use crate::config::PowerUpConfig;
use crate::entities::{Player, PowerUp, PowerUpKind};

/// A running buff.  `saved_speed` is the player's speed from just before
/// the buff was applied; it is restored on expiry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuffState {
    pub remaining: f32,
    saved_speed: f32,
}

pub struct PowerUpEngine {
    tuning: PowerUpConfig,
    powerups: Vec<PowerUp>,
    spawn_timer: f32,
    buff: Option<BuffState>,
}

impl PowerUpEngine {
    pub fn new(tuning: PowerUpConfig) -> Self {
        let spawn_timer = tuning.spawn_interval;
        PowerUpEngine {
            tuning,
            powerups: Vec::new(),
            spawn_timer,
            buff: None,
        }
    }

    pub fn powerups(&self) -> &[PowerUp] {
        &self.powerups
    }

    pub fn spawn_countdown(&self) -> f32 {
        self.spawn_timer
    }

    pub fn buff(&self) -> Option<&BuffState> {
        self.buff.as_ref()
    }

    pub fn is_buff_active(&self) -> bool {
        self.buff.is_some()
    }

    /// Fraction of the buff still to run, for the HUD.
    pub fn buff_fraction(&self) -> f32 {
        self.buff
            .map(|b| (b.remaining / self.tuning.buff_duration).clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }

    /// One frame: spawn on schedule, collect anything the player touches,
    /// drop collected items, then run the buff clock.
    pub fn update(&mut self, dt: f32, player: &mut Player, rng: &mut impl Rng) {
        self.spawn_timer -= dt;
        if self.spawn_timer <= 0.0 {
            self.spawn(rng);
            self.spawn_timer = self.tuning.spawn_interval;
        }

        let body = player.body();
        let mut collected = Vec::new();
        for powerup in &mut self.powerups {
            powerup.animate(dt);
            if powerup.active && powerup.rect().intersects(&body) {
                powerup.active = false;
                collected.push(powerup.kind);
            }
        }
        self.powerups.retain(|p| p.active);
        for kind in collected {
            self.apply(kind, player);
        }

        let expired = match self.buff.as_mut() {
            Some(buff) => {
                buff.remaining -= dt;
                buff.remaining <= 0.0
            }
            None => false,
        };
        if expired {
            self.revert_buff(player);
            tracing::info!("buff expired");
        }
    }

    /// Place one power-up of a random kind somewhere in the spawn area.
    pub fn spawn(&mut self, rng: &mut impl Rng) -> &PowerUp {
        let kind = if rng.gen_bool(0.5) {
            PowerUpKind::Heal
        } else {
            PowerUpKind::Buff
        };
        let area = self.tuning.spawn_area;
        let x = rng.gen_range(area.x_min..=area.x_max) as f32;
        let y = rng.gen_range(area.y_min..=area.y_max) as f32;
        tracing::info!(kind = kind.label(), x, y, "power-up spawned");
        self.powerups
            .push(PowerUp::new(x, y, self.tuning.width, self.tuning.height, kind));
        &self.powerups[self.powerups.len() - 1]
    }

    /// Apply a collected power-up's effect to `player`.
    pub fn apply(&mut self, kind: PowerUpKind, player: &mut Player) {
        match kind {
            PowerUpKind::Heal => {
                let before = player.health;
                player.heal(self.tuning.heal_amount);
                tracing::info!(healed = player.health - before, "heal collected");
            }
            PowerUpKind::Buff => match self.buff.as_mut() {
                Some(buff) => {
                    buff.remaining = self.tuning.buff_duration;
                    tracing::info!("buff refreshed");
                }
                None => {
                    self.buff = Some(BuffState {
                        remaining: self.tuning.buff_duration,
                        saved_speed: player.speed,
                    });
                    player.speed *= self.tuning.buff_speed_multiplier;
                    player.attack_damage = self.tuning.buff_damage;
                    tracing::info!(
                        duration = self.tuning.buff_duration,
                        "buff started"
                    );
                }
            },
        }
    }

    /// End any running buff now, restoring the player's pre-buff stats.
    pub fn revert_buff(&mut self, player: &mut Player) {
        if let Some(buff) = self.buff.take() {
            player.speed = buff.saved_speed;
            player.attack_damage = player.base_damage;
        }
    }
}
