//! Per-level tuning
//!
//! Every number the engine needs for one level lives in [`LevelConfig`].
//! Defaults come from [`crate::consts`]; [`LevelConfig::for_level`] scales
//! difficulty, and JSON overrides can be layered on top.

use std::{error::Error, fmt};

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Reasons a configuration is rejected
#[derive(Debug)]
pub enum ConfigError {
    /// JSON could not be parsed
    Parse(serde_json::Error),
    /// Grid must be at least 3x3 so it has an interior
    GridTooSmall { width: u32, height: u32 },
    /// Win threshold outside (0, 100]
    RevealPercent(f32),
    /// A duration or rate that must be positive was not
    NonPositive(&'static str),
    /// Spawn chance outside [0, 1]
    SpawnChance(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "invalid level config JSON: {err}"),
            ConfigError::GridTooSmall { width, height } => {
                write!(f, "grid {width}x{height} is too small (minimum 3x3)")
            }
            ConfigError::RevealPercent(p) => {
                write!(f, "min_reveal_percent {p} must be in (0, 100]")
            }
            ConfigError::NonPositive(field) => write!(f, "{field} must be positive"),
            ConfigError::SpawnChance(c) => write!(f, "item_spawn_chance {c} must be in [0, 1]"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// Configuration for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    // === Grid ===
    pub grid_width: u32,
    pub grid_height: u32,
    /// Level is complete once this share of tiles is revealed
    pub min_reveal_percent: f32,

    // === Player ===
    pub lives: u8,
    pub move_interval_ms: f64,
    pub invulnerability_ms: f64,

    // === Adversaries ===
    pub adversary_count: u32,
    /// Tiles per second
    pub adversary_speed: f32,
    pub contact_radius: f32,

    // === Combo ===
    pub combo_timeout_ms: f64,
    pub idle_timeout_ms: f64,

    // === Pickups ===
    pub item_lifetime_ms: f64,
    /// Per-tick probability
    pub item_spawn_chance: f64,
    pub max_items: usize,
    pub item_collect_radius: f32,
    pub item_bonus: u64,

    // === Intro ===
    pub intro_ready_ms: f64,
    pub intro_go_ms: f64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            min_reveal_percent: MIN_REVEAL_PERCENT,

            lives: START_LIVES,
            move_interval_ms: MOVE_INTERVAL_MS,
            invulnerability_ms: INVULNERABILITY_MS,

            adversary_count: ADVERSARY_COUNT,
            adversary_speed: ADVERSARY_SPEED,
            contact_radius: CONTACT_RADIUS,

            combo_timeout_ms: COMBO_TIMEOUT_MS,
            idle_timeout_ms: IDLE_TIMEOUT_MS,

            item_lifetime_ms: ITEM_LIFETIME_MS,
            item_spawn_chance: ITEM_SPAWN_CHANCE,
            max_items: MAX_ITEMS,
            item_collect_radius: ITEM_COLLECT_RADIUS,
            item_bonus: ITEM_BONUS,

            intro_ready_ms: INTRO_READY_MS,
            intro_go_ms: INTRO_GO_MS,
        }
    }
}

impl LevelConfig {
    /// Difficulty for a 1-based level number.
    ///
    /// One extra adversary every two levels (max 8), +8% speed per level
    /// (max double), win threshold creeping from 75% to 85%.
    pub fn for_level(level: u32) -> Self {
        Self::default().scaled(level)
    }

    /// Apply the per-level difficulty curve on top of this base config
    pub fn scaled(&self, level: u32) -> Self {
        let n = level.max(1) - 1;
        Self {
            adversary_count: (self.adversary_count + n / 2).min(8),
            adversary_speed: self.adversary_speed * (1.0 + 0.08 * n as f32).min(2.0),
            min_reveal_percent: (self.min_reveal_percent + n as f32).min(85.0_f32.max(self.min_reveal_percent)),
            ..self.clone()
        }
    }

    /// Parse overrides from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width < 3 || self.grid_height < 3 {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if !(self.min_reveal_percent > 0.0 && self.min_reveal_percent <= 100.0) {
            return Err(ConfigError::RevealPercent(self.min_reveal_percent));
        }
        if self.lives == 0 {
            return Err(ConfigError::NonPositive("lives"));
        }
        let positive = [
            ("move_interval_ms", self.move_interval_ms),
            ("combo_timeout_ms", self.combo_timeout_ms),
            ("idle_timeout_ms", self.idle_timeout_ms),
            ("item_lifetime_ms", self.item_lifetime_ms),
            ("contact_radius", self.contact_radius as f64),
            ("item_collect_radius", self.item_collect_radius as f64),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive(field));
            }
        }
        if !(0.0..=1.0).contains(&self.item_spawn_chance) {
            return Err(ConfigError::SpawnChance(self.item_spawn_chance));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = LevelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid_width, 60);
        assert_eq!(config.grid_height, 45);
        assert_eq!(config.lives, 3);
    }

    #[test]
    fn test_difficulty_scales() {
        let l1 = LevelConfig::for_level(1);
        let l5 = LevelConfig::for_level(5);
        assert_eq!(l1, LevelConfig::default());
        assert_eq!(l5.adversary_count, 3);
        assert!(l5.adversary_speed > l1.adversary_speed);
        assert!(l5.min_reveal_percent > l1.min_reveal_percent);

        let l99 = LevelConfig::for_level(99);
        assert_eq!(l99.adversary_count, 8);
        assert_eq!(l99.min_reveal_percent, 85.0);
        assert!(l99.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = LevelConfig::from_json(r#"{ "adversary_count": 4, "min_reveal_percent": 60.0 }"#)
            .expect("valid overrides");
        assert_eq!(config.adversary_count, 4);
        assert_eq!(config.min_reveal_percent, 60.0);
        assert_eq!(config.grid_width, GRID_WIDTH);
    }

    #[test]
    fn test_json_round_trip() {
        let config = LevelConfig::for_level(3);
        let json = config.to_json().expect("serializes");
        assert_eq!(LevelConfig::from_json(&json).expect("parses"), config);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            LevelConfig::from_json(r#"{ "grid_width": 2 }"#),
            Err(ConfigError::GridTooSmall { .. })
        ));
        assert!(matches!(
            LevelConfig::from_json(r#"{ "min_reveal_percent": 120.0 }"#),
            Err(ConfigError::RevealPercent(_))
        ));
        assert!(matches!(
            LevelConfig::from_json(r#"{ "item_spawn_chance": 2.0 }"#),
            Err(ConfigError::SpawnChance(_))
        ));
        assert!(matches!(
            LevelConfig::from_json(r#"{ "move_interval_ms": 0 }"#),
            Err(ConfigError::NonPositive("move_interval_ms"))
        ));
        let err = LevelConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid level config JSON"));
    }
}
