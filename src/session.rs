/// Process-wide game session, passed explicitly to every screen.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameConfig;
use crate::entities::Player;

/// Shown when the player confirms an empty name.
pub const DEFAULT_NICKNAME: &str = "NO NAME";

pub const MAX_NICKNAME_CHARS: usize = 16;

pub struct GameSession {
    pub config: GameConfig,
    /// Persists across levels; replaced only by `begin` and `restart`.
    pub player: Player,
    score: u32,
    nickname: String,
    /// Every random decision in the simulation draws from here.
    pub rng: StdRng,
}

impl GameSession {
    /// `seed` makes a run reproducible; `None` seeds from entropy.
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let player = Player::new(&config.player);
        GameSession {
            config,
            player,
            score: 0,
            nickname: DEFAULT_NICKNAME.to_string(),
            rng,
        }
    }

    /// Start a run under `name`: fresh player, zero score.
    pub fn begin(&mut self, name: &str) {
        let trimmed: String = name.trim().chars().take(MAX_NICKNAME_CHARS).collect();
        self.nickname = if trimmed.is_empty() {
            DEFAULT_NICKNAME.to_string()
        } else {
            trimmed
        };
        self.player = Player::new(&self.config.player);
        self.score = 0;
        tracing::info!(nickname = %self.nickname, "new run started");
    }

    /// Throw away progress but keep the chosen name.
    pub fn restart(&mut self) {
        self.player = Player::new(&self.config.player);
        self.score = 0;
        tracing::info!("session restarted");
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}
