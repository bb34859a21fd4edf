/// Enemy movement: chase inside the aggro radius, wander outside it.

use rand::Rng;

use crate::config::AiConfig;
use crate::entities::{Enemy, Field};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Chase,
    Patrol,
}

/// Per-enemy wander state.  The `Enemy` itself stays plain data.
#[derive(Clone, Debug)]
pub struct EnemyBehavior {
    /// Horizontal patrol direction: -1, 0 or +1.
    dir: i32,
    /// Seconds until a new patrol direction is picked.
    wander_timer: f32,
}

impl EnemyBehavior {
    pub fn new(rng: &mut impl Rng) -> Self {
        let dir = if rng.gen_bool(0.5) { -1 } else { 1 };
        EnemyBehavior { dir, wander_timer: 0.0 }
    }

    pub fn direction(&self) -> i32 {
        self.dir
    }

    pub fn wander_timer(&self) -> f32 {
        self.wander_timer
    }

    /// Move `enemy` for one frame toward or around the player at `target`
    /// (the player's top-left corner), then clamp it to the field.
    pub fn update(
        &mut self,
        dt: f32,
        enemy: &mut Enemy,
        target: (f32, f32),
        tuning: &AiConfig,
        field: &Field,
        rng: &mut impl Rng,
    ) -> Mode {
        let dist_x = target.0 - enemy.x;
        let dist_y = target.1 - enemy.y;
        let dist = (dist_x * dist_x + dist_y * dist_y).sqrt();

        let mode = if dist < tuning.aggro_radius {
            // Each axis closes independently, so diagonal chase is faster
            // than straight chase.
            let step = enemy.speed * dt * tuning.chase_factor;
            if dist_x > tuning.deadband {
                enemy.x += step;
            } else if dist_x < -tuning.deadband {
                enemy.x -= step;
            }
            if dist_y > tuning.deadband {
                enemy.y += step;
            } else if dist_y < -tuning.deadband {
                enemy.y -= step;
            }
            Mode::Chase
        } else {
            self.wander_timer -= dt;
            if self.wander_timer <= 0.0 {
                self.dir = rng.gen_range(-1..=1);
                self.wander_timer = rng.gen_range(tuning.wander_min..tuning.wander_max);
            }
            enemy.x += self.dir as f32 * enemy.speed * dt * tuning.patrol_factor;
            Mode::Patrol
        };

        let (x, y) = field.clamp(enemy.x, enemy.y, enemy.w, enemy.h);
        enemy.x = x;
        enemy.y = y;
        mode
    }
}
