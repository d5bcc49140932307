//! JSON configuration parsing for headless mode

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::combat::{BattleMode, Difficulty, DifficultyOverrides};

/// How the headless player behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Autopilot {
    /// Track the boss along x and keep the fire key held
    #[default]
    Aggressive,
    /// Stand still and never fire
    Passive,
}

/// Headless battle configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessBattleConfig {
    /// "boss" or "training" (default: "boss")
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Cadence overrides applied on top of the tuning's difficulty
    #[serde(default)]
    pub difficulty: DifficultyOverrides,
    /// Player behavior (default: aggressive)
    #[serde(default)]
    pub autopilot: Autopilot,
    /// Custom output path for the battle report (optional)
    #[serde(default)]
    pub output_path: Option<String>,
    /// Maximum battle duration in seconds (default: 120)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Seed for boss repositioning; reproducible runs when set
    #[serde(default)]
    pub random_seed: Option<u64>,
}

fn default_mode() -> String {
    BattleMode::Boss.name().to_string()
}

fn default_max_duration() -> f32 {
    120.0
}

impl Default for HeadlessBattleConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            difficulty: DifficultyOverrides::default(),
            autopilot: Autopilot::default(),
            output_path: None,
            max_duration_secs: default_max_duration(),
            random_seed: None,
        }
    }
}

impl HeadlessBattleConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, String> {
        let config: HeadlessBattleConfig =
            serde_json::from_str(contents).map_err(|e| format!("Failed to parse JSON: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.battle_mode()?;
        self.resolve_difficulty(&Difficulty::default())?;
        // A NaN limit would never trip the timeout
        if !self.max_duration_secs.is_finite() || self.max_duration_secs <= 0.0 {
            return Err(format!(
                "max_duration_secs must be a positive number of seconds, got {}",
                self.max_duration_secs
            ));
        }
        Ok(())
    }

    pub fn battle_mode(&self) -> Result<BattleMode, String> {
        self.mode.parse().map_err(|e: crate::combat::BattleError| e.to_string())
    }

    /// Apply this config's overrides to `base` and check the result
    pub fn resolve_difficulty(&self, base: &Difficulty) -> Result<Difficulty, String> {
        let difficulty = base.with_overrides(&self.difficulty);
        difficulty.validate().map_err(|e| e.to_string())?;
        Ok(difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = HeadlessBattleConfig::from_json("{}").unwrap();
        assert_eq!(config.battle_mode(), Ok(BattleMode::Boss));
        assert_eq!(config.autopilot, Autopilot::Aggressive);
        assert_eq!(config.max_duration_secs, 120.0);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let err = HeadlessBattleConfig::from_json(r#"{ "mode": "raid" }"#).unwrap_err();
        assert!(err.contains("raid"), "{}", err);
    }

    #[test]
    fn test_zero_boss_interval_rejected() {
        let json = r#"{ "difficulty": { "boss_move_interval_ms": 0 } }"#;
        assert!(HeadlessBattleConfig::from_json(json).is_err());
    }

    #[test]
    fn test_max_duration_must_be_finite_and_positive() {
        for bad in [f32::NAN, f32::INFINITY, 0.0, -5.0] {
            let config = HeadlessBattleConfig {
                max_duration_secs: bad,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{} accepted", bad);
        }
        let config = HeadlessBattleConfig {
            max_duration_secs: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_apply_to_base() {
        let json = r#"{ "mode": "training", "autopilot": "passive", "difficulty": { "player_fire_cooldown_ms": 100 } }"#;
        let config = HeadlessBattleConfig::from_json(json).unwrap();
        let difficulty = config.resolve_difficulty(&Difficulty::default()).unwrap();
        assert_eq!(difficulty.player_fire_cooldown_ms, 100);
        assert_eq!(config.autopilot, Autopilot::Passive);
    }
}
