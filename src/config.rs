/// Tuning tables.
///
/// `GameConfig::default()` carries the stock game; a RON file can override
/// any part of it (missing fields fall back to the defaults).

use std::fmt;
use std::fs;
use std::path::Path;

use ron::Options;
use serde::{Deserialize, Serialize};

use crate::entities::{AttackBox, Field, HitboxInset};

// ── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ConfigError {
    Io { file: String, message: String },
    Parse { file: String, message: String },
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { file, message } => write!(f, "failed to read {}: {}", file, message),
            ConfigError::Parse { file, message } => {
                write!(f, "failed to parse {}: {}", file, message)
            }
            ConfigError::Invalid(message) => write!(f, "invalid config: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

// ── Sections ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub start_x: f32,
    pub start_y: f32,
    pub width: f32,
    pub height: f32,
    pub max_health: f32,
    pub speed: f32,
    pub base_damage: f32,
    /// Seconds a single swing stays open.
    pub attack_duration: f32,
    pub hurt_inset: HitboxInset,
    pub attack_box: AttackBox,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            start_x: 100.0,
            start_y: 300.0,
            width: 180.0,
            height: 210.0,
            max_health: 100.0,
            speed: 180.0,
            base_damage: 30.0,
            attack_duration: 0.2,
            hurt_inset: HitboxInset::new(70.0, 40.0, 140.0, 80.0),
            attack_box: AttackBox { offset_x: 120.0, offset_y: 80.0, w: 50.0, h: 50.0 },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Closer than this, an enemy chases; further away it patrols.
    pub aggro_radius: f32,
    /// Axis separation below which a chasing enemy holds still on that axis.
    pub deadband: f32,
    pub chase_factor: f32,
    pub patrol_factor: f32,
    pub wander_min: f32,
    pub wander_max: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            aggro_radius: 500.0,
            deadband: 2.0,
            chase_factor: 0.9,
            patrol_factor: 0.5,
            wander_min: 1.0,
            wander_max: 3.0,
        }
    }
}

/// Integer spawn rectangle, bounds inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnArea {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub width: f32,
    pub height: f32,
    /// Seconds between spawns.  The countdown restarts at this value after
    /// every spawn, overshoot discarded.
    pub spawn_interval: f32,
    pub spawn_area: SpawnArea,
    pub heal_amount: f32,
    pub buff_speed_multiplier: f32,
    pub buff_damage: f32,
    pub buff_duration: f32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        PowerUpConfig {
            width: 50.0,
            height: 50.0,
            spawn_interval: 10.0,
            spawn_area: SpawnArea { x_min: 50, x_max: 1120, y_min: 50, y_max: 540 },
            heal_amount: 40.0,
            buff_speed_multiplier: 1.5,
            buff_damage: 50.0,
            buff_duration: 5.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    /// Seconds before a level goes live.
    pub countdown: f32,
    /// Text alpha gained per second during a level intro (caps at 255).
    pub fade_rate: f32,
}

impl Default for IntroConfig {
    fn default() -> Self {
        IntroConfig { countdown: 10.0, fade_rate: 80.0 }
    }
}

// ── Levels ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub name: String,
    pub hp: f32,
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub inset: HitboxInset,
}

/// How a level's common enemies are laid out at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Placement {
    /// A horizontal row starting at `x0`, `step` apart, each at `y` plus a
    /// random offset in `[-y_jitter, y_jitter]`.
    Row { x0: f32, step: f32, y: f32, y_jitter: i32 },
    /// Uniformly scattered over an area.
    Scatter { area: SpawnArea },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    pub enemy: EnemySpec,
    pub count: u32,
    pub placement: Placement,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BossConfig {
    pub enemy: EnemySpec,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub title: String,
    #[serde(default)]
    pub story: Vec<String>,
    pub wave: WaveConfig,
    pub boss: BossConfig,
    /// Health per second drained while a common enemy touches the player.
    pub enemy_contact_dps: f32,
    /// Health per second drained while the boss touches the player.
    pub boss_contact_dps: f32,
    /// Score for every target a swing connects with.
    pub hit_score: u32,
    /// Score awarded when the player moves on after winning.
    #[serde(default)]
    pub clear_bonus: u32,
    /// Highest point (smallest y) the player may reach while the level runs.
    pub player_band_top: f32,
    /// Highest point enemies and the boss may reach while the level runs.
    pub enemy_band_top: f32,
    /// Move on by itself this many seconds after victory.
    #[serde(default)]
    pub victory_auto_advance: Option<f32>,
}

fn story(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

fn enemy(name: &str, hp: f32, speed: f32, size: (f32, f32), inset: HitboxInset) -> EnemySpec {
    EnemySpec {
        name: name.to_string(),
        hp,
        speed,
        width: size.0,
        height: size.1,
        inset,
    }
}

/// The four stock levels.
pub fn default_levels() -> Vec<LevelConfig> {
    vec![
        LevelConfig {
            title: "LEVEL 1".to_string(),
            story: story(&[
                "In the wetlands by the river lies the realm of Mboi Tu'i,",
                "the parrot-serpent who watches over frogs and water flowers.",
                "",
                "From the deep caves rises the dreaded Teju Jagua,",
                "the dog-headed lizard with eyes of fire.",
                "",
                "Show respect or pay the price.",
            ]),
            wave: WaveConfig {
                enemy: enemy("Mboi Tu'i", 60.0, 50.0, (36.0, 36.0), HitboxInset::NONE),
                count: 5,
                placement: Placement::Row { x0: 600.0, step: 60.0, y: 360.0, y_jitter: 100 },
            },
            boss: BossConfig {
                enemy: enemy("Teju Jagua", 300.0, 60.0, (80.0, 80.0), HitboxInset::NONE),
                x: 1060.0,
                y: 320.0,
            },
            enemy_contact_dps: 10.0,
            boss_contact_dps: 15.0,
            hit_score: 12,
            clear_bonus: 150,
            player_band_top: 250.0,
            enemy_band_top: 230.0,
            victory_auto_advance: None,
        },
        LevelConfig {
            title: "LEVEL 2".to_string(),
            story: story(&[
                "Deep in the forest the Monai slither between the roots,",
                "thieves of everything that shines.",
                "",
                "Their master Ao Ao, the ram-headed beast,",
                "devours those who wander into his hills.",
            ]),
            wave: WaveConfig {
                enemy: enemy(
                    "Monai",
                    70.0,
                    70.0,
                    (150.0, 150.0),
                    HitboxInset::new(30.0, 25.0, 40.0, 40.0),
                ),
                count: 5,
                placement: Placement::Scatter {
                    area: SpawnArea { x_min: 120, x_max: 980, y_min: 150, y_max: 570 },
                },
            },
            boss: BossConfig {
                enemy: enemy(
                    "Ao Ao",
                    350.0,
                    80.0,
                    (220.0, 220.0),
                    HitboxInset::new(80.0, 20.0, 150.0, 30.0),
                ),
                x: 1040.0,
                y: 300.0,
            },
            enemy_contact_dps: 12.0,
            boss_contact_dps: 20.0,
            hit_score: 15,
            clear_bonus: 150,
            player_band_top: 260.0,
            enemy_band_top: 250.0,
            victory_auto_advance: None,
        },
        LevelConfig {
            title: "LEVEL 3".to_string(),
            story: story(&[
                "The Kurupi roam the fields at dusk,",
                "and the Jasy Jatere lures the careless into the siesta heat.",
                "",
                "Keep your machete close.",
            ]),
            wave: WaveConfig {
                enemy: enemy(
                    "Kurupi",
                    80.0,
                    80.0,
                    (110.0, 110.0),
                    HitboxInset::new(20.0, 18.0, 70.0, 20.0),
                ),
                count: 4,
                placement: Placement::Scatter {
                    area: SpawnArea { x_min: 150, x_max: 1050, y_min: 150, y_max: 570 },
                },
            },
            boss: BossConfig {
                enemy: enemy("Jasy Jatere", 480.0, 95.0, (220.0, 220.0), HitboxInset::NONE),
                x: 1060.0,
                y: 320.0,
            },
            enemy_contact_dps: 10.0,
            boss_contact_dps: 18.0,
            hit_score: 20,
            clear_bonus: 200,
            player_band_top: 250.0,
            enemy_band_top: 230.0,
            victory_auto_advance: None,
        },
        LevelConfig {
            title: "LEVEL 4".to_string(),
            story: story(&[
                "Cursed shadows gather around the last hut in the woods.",
                "",
                "At full moon the Luison walks among them,",
                "seventh son, lord of the dead.",
                "",
                "End the cycle.",
            ]),
            wave: WaveConfig {
                enemy: enemy(
                    "Cursed Shadow",
                    90.0,
                    95.0,
                    (110.0, 110.0),
                    HitboxInset::new(22.0, 18.0, 40.0, 45.0),
                ),
                count: 5,
                placement: Placement::Scatter {
                    area: SpawnArea { x_min: 200, x_max: 1000, y_min: 180, y_max: 540 },
                },
            },
            boss: BossConfig {
                enemy: enemy(
                    "Luison",
                    100.0,
                    110.0,
                    (230.0, 230.0),
                    HitboxInset::new(60.0, 60.0, 90.0, 90.0),
                ),
                x: 1060.0,
                y: 320.0,
            },
            enemy_contact_dps: 12.0,
            boss_contact_dps: 25.0,
            hit_score: 25,
            clear_bonus: 0,
            player_band_top: 250.0,
            enemy_band_top: 230.0,
            victory_auto_advance: Some(5.0),
        },
    ]
}

// ── Top level ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub field: Field,
    pub player: PlayerConfig,
    pub ai: AiConfig,
    pub powerups: PowerUpConfig,
    pub intro: IntroConfig,
    pub levels: Vec<LevelConfig>,
    pub allow_debug_advance: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            field: Field { width: 1200.0, height: 720.0 },
            player: PlayerConfig::default(),
            ai: AiConfig::default(),
            powerups: PowerUpConfig::default(),
            intro: IntroConfig::default(),
            levels: default_levels(),
            allow_debug_advance: false,
        }
    }
}

fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

impl GameConfig {
    /// Read and validate a RON config file.
    pub fn load(path: &Path) -> Result<GameConfig, ConfigError> {
        let file = path.display().to_string();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            file: file.clone(),
            message: e.to_string(),
        })?;
        let config = GameConfig::from_ron(&contents).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse { file, message },
            other => other,
        })?;
        tracing::info!(levels = config.levels.len(), "loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_ron(source: &str) -> Result<GameConfig, ConfigError> {
        let config: GameConfig = ron_options().from_str(source).map_err(|e| ConfigError::Parse {
            file: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn level(&self, index: usize) -> Option<&LevelConfig> {
        self.levels.get(index)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        self.check_finite()?;

        if self.field.width <= 0.0 || self.field.height <= 0.0 {
            return invalid("field must have a positive size".to_string());
        }
        if self.levels.is_empty() {
            return invalid("at least one level is required".to_string());
        }

        let p = &self.player;
        if p.width <= 0.0 || p.height <= 0.0 {
            return invalid("player must have a positive size".to_string());
        }
        if p.width > self.field.width || p.height > self.field.height {
            return invalid("player does not fit on the field".to_string());
        }
        if p.max_health <= 0.0 || p.attack_duration <= 0.0 {
            return invalid("player max_health and attack_duration must be positive".to_string());
        }

        let pu = &self.powerups;
        if pu.spawn_interval <= 0.0 || pu.buff_duration <= 0.0 {
            return invalid("power-up timers must be positive".to_string());
        }
        check_area(&pu.spawn_area, "power-up spawn area")?;

        if self.ai.wander_min <= 0.0 || self.ai.wander_max <= self.ai.wander_min {
            return invalid("wander range must be positive and non-empty".to_string());
        }
        if self.intro.countdown < 0.0 {
            return invalid("intro countdown must not be negative".to_string());
        }

        for (i, level) in self.levels.iter().enumerate() {
            let n = i + 1;
            for spec in [&level.wave.enemy, &level.boss.enemy] {
                if spec.width <= 0.0 || spec.height <= 0.0 || spec.hp <= 0.0 {
                    return invalid(format!("level {}: {} needs positive size and hp", n, spec.name));
                }
            }
            if let Placement::Scatter { area } = &level.wave.placement {
                check_area(area, &format!("level {} enemy spawn area", n))?;
            }
            if let Placement::Row { y_jitter, .. } = level.wave.placement {
                if y_jitter < 0 {
                    return invalid(format!("level {}: y_jitter must not be negative", n));
                }
            }
        }
        Ok(())
    }
}

impl GameConfig {
    /// NaN or infinite tuning would poison every comparison below and
    /// panic later inside `gen_range`.
    fn check_finite(&self) -> Result<(), ConfigError> {
        let p = &self.player;
        let ai = &self.ai;
        let pu = &self.powerups;
        finite("field", &[self.field.width, self.field.height])?;
        finite(
            "player",
            &[
                p.start_x,
                p.start_y,
                p.width,
                p.height,
                p.max_health,
                p.speed,
                p.base_damage,
                p.attack_duration,
                p.attack_box.offset_x,
                p.attack_box.offset_y,
                p.attack_box.w,
                p.attack_box.h,
            ],
        )?;
        finite("player hurt inset", &inset_values(&p.hurt_inset))?;
        finite(
            "ai",
            &[
                ai.aggro_radius,
                ai.deadband,
                ai.chase_factor,
                ai.patrol_factor,
                ai.wander_min,
                ai.wander_max,
            ],
        )?;
        finite(
            "powerups",
            &[
                pu.width,
                pu.height,
                pu.spawn_interval,
                pu.heal_amount,
                pu.buff_speed_multiplier,
                pu.buff_damage,
                pu.buff_duration,
            ],
        )?;
        finite("intro", &[self.intro.countdown, self.intro.fade_rate])?;

        for (i, level) in self.levels.iter().enumerate() {
            let what = format!("level {}", i + 1);
            for spec in [&level.wave.enemy, &level.boss.enemy] {
                finite(&what, &[spec.hp, spec.speed, spec.width, spec.height])?;
                finite(&what, &inset_values(&spec.inset))?;
            }
            finite(
                &what,
                &[
                    level.boss.x,
                    level.boss.y,
                    level.enemy_contact_dps,
                    level.boss_contact_dps,
                    level.player_band_top,
                    level.enemy_band_top,
                    level.victory_auto_advance.unwrap_or(0.0),
                ],
            )?;
            if let Placement::Row { x0, step, y, .. } = level.wave.placement {
                finite(&what, &[x0, step, y])?;
            }
        }
        Ok(())
    }
}

fn inset_values(inset: &HitboxInset) -> [f32; 4] {
    [inset.offset_x, inset.offset_y, inset.shrink_w, inset.shrink_h]
}

fn finite(what: &str, values: &[f32]) -> Result<(), ConfigError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{}: values must be finite numbers", what)))
    }
}

fn check_area(area: &SpawnArea, what: &str) -> Result<(), ConfigError> {
    if area.x_min > area.x_max || area.y_min > area.y_max {
        return Err(ConfigError::Invalid(format!("{} is empty", what)));
    }
    Ok(())
}
