//! Battle tuning and difficulty
//!
//! `BattleTuning` is the arena layout and body numbers, loaded with the game
//! settings. `Difficulty` holds the three cadences the Upgrade Store adjusts;
//! a session reads it once at `start` and never writes it.

use std::time::Duration;

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use super::combatant::MovementBounds;
use super::constants::*;
use super::error::BattleError;
use super::projectiles::ProjectileLane;

/// Cadence parameters of one session (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Difficulty {
    pub player_fire_cooldown_ms: u64,
    pub boss_fire_interval_ms: u64,
    pub boss_move_interval_ms: u64,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            player_fire_cooldown_ms: DEFAULT_PLAYER_FIRE_COOLDOWN_MS,
            boss_fire_interval_ms: DEFAULT_BOSS_FIRE_INTERVAL_MS,
            boss_move_interval_ms: DEFAULT_BOSS_MOVE_INTERVAL_MS,
        }
    }
}

impl Difficulty {
    /// Boss timers need a non-zero period. A zero player cooldown just
    /// disables the gate.
    pub fn validate(&self) -> Result<(), BattleError> {
        if self.boss_fire_interval_ms == 0 {
            return Err(BattleError::InvalidDifficulty(
                "boss_fire_interval_ms must be positive".to_string(),
            ));
        }
        if self.boss_move_interval_ms == 0 {
            return Err(BattleError::InvalidDifficulty(
                "boss_move_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Copy with any overridden fields replaced
    pub fn with_overrides(&self, overrides: &DifficultyOverrides) -> Self {
        Self {
            player_fire_cooldown_ms: overrides
                .player_fire_cooldown_ms
                .unwrap_or(self.player_fire_cooldown_ms),
            boss_fire_interval_ms: overrides
                .boss_fire_interval_ms
                .unwrap_or(self.boss_fire_interval_ms),
            boss_move_interval_ms: overrides
                .boss_move_interval_ms
                .unwrap_or(self.boss_move_interval_ms),
        }
    }

    pub fn player_fire_cooldown(&self) -> Duration {
        Duration::from_millis(self.player_fire_cooldown_ms)
    }

    pub fn boss_fire_interval(&self) -> Duration {
        Duration::from_millis(self.boss_fire_interval_ms)
    }

    pub fn boss_move_interval(&self) -> Duration {
        Duration::from_millis(self.boss_move_interval_ms)
    }
}

/// Per-start difficulty overrides; `None` keeps the store's value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyOverrides {
    pub player_fire_cooldown_ms: Option<u64>,
    pub boss_fire_interval_ms: Option<u64>,
    pub boss_move_interval_ms: Option<u64>,
}

/// Arena layout and combatant numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleTuning {
    pub player_max_health: i32,
    pub boss_max_health: i32,
    /// Player movement per step
    pub player_speed: f32,
    pub jump_velocity: f32,
    pub player_spawn: [f32; 3],
    pub boss_spawn: [f32; 3],
    /// `[x_min, x_max, z_min, z_max]`
    pub player_bounds: [f32; 4],
    pub boss_bounds: [f32; 4],
    pub player_lane: ProjectileLane,
    pub boss_lane: ProjectileLane,
    pub hit_half_extent: f32,
    pub reposition_tween_ms: u64,
    /// Starting cadences before any upgrades
    pub difficulty: Difficulty,
}

impl Default for BattleTuning {
    fn default() -> Self {
        Self {
            player_max_health: PLAYER_MAX_HEALTH,
            boss_max_health: BOSS_MAX_HEALTH,
            player_speed: PLAYER_SPEED,
            jump_velocity: JUMP_VELOCITY,
            player_spawn: PLAYER_SPAWN,
            boss_spawn: BOSS_SPAWN,
            player_bounds: PLAYER_BOUNDS,
            boss_bounds: BOSS_BOUNDS,
            player_lane: ProjectileLane {
                step: PLAYER_PROJECTILE_STEP,
                exit_z: PLAYER_PROJECTILE_EXIT_Z,
            },
            boss_lane: ProjectileLane {
                step: BOSS_PROJECTILE_STEP,
                exit_z: BOSS_PROJECTILE_EXIT_Z,
            },
            hit_half_extent: HIT_HALF_EXTENT,
            reposition_tween_ms: REPOSITION_TWEEN_MS,
            difficulty: Difficulty::default(),
        }
    }
}

impl BattleTuning {
    pub fn player_spawn(&self) -> Vec3 {
        Vec3::from_array(self.player_spawn)
    }

    pub fn boss_spawn(&self) -> Vec3 {
        Vec3::from_array(self.boss_spawn)
    }

    pub fn player_bounds(&self) -> MovementBounds {
        MovementBounds::from_array(self.player_bounds)
    }

    pub fn boss_bounds(&self) -> MovementBounds {
        MovementBounds::from_array(self.boss_bounds)
    }

    pub fn reposition_tween(&self) -> Duration {
        Duration::from_millis(self.reposition_tween_ms)
    }

    /// Sanity checks for values loaded from disk
    pub fn validate(&self) -> Result<(), String> {
        if self.player_max_health <= 0 || self.boss_max_health <= 0 {
            return Err("max health must be positive".to_string());
        }
        let bounds = [("player_bounds", self.player_bounds), ("boss_bounds", self.boss_bounds)];
        for (name, b) in bounds {
            if b[0] > b[1] || b[2] > b[3] {
                return Err(format!("{} has min greater than max", name));
            }
        }
        if !self.hit_half_extent.is_finite() || self.hit_half_extent <= 0.0 {
            return Err("hit_half_extent must be positive".to_string());
        }
        let lanes = [
            ("player_lane", self.player_lane, self.player_bounds),
            ("boss_lane", self.boss_lane, self.boss_bounds),
        ];
        for (name, lane, b) in lanes {
            validate_lane(name, &lane, b[2], b[3])?;
        }
        self.difficulty.validate().map_err(|e| e.to_string())
    }
}

/// A lane must move along z and put its exit plane beyond every z its owner
/// can fire from, in the direction of travel
fn validate_lane(name: &str, lane: &ProjectileLane, z_min: f32, z_max: f32) -> Result<(), String> {
    let step_z = lane.step[2];
    if !lane.step.iter().all(|v| v.is_finite()) || !lane.exit_z.is_finite() {
        return Err(format!("{} must use finite numbers", name));
    }
    if step_z == 0.0 {
        return Err(format!("{} step must move along z", name));
    }
    let ahead = if step_z > 0.0 {
        lane.exit_z > z_max
    } else {
        lane.exit_z < z_min
    };
    if !ahead {
        return Err(format!(
            "{} exit_z {} is not ahead of spawn z range [{}, {}]",
            name, lane.exit_z, z_min, z_max
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let base = Difficulty::default();
        let overrides = DifficultyOverrides {
            boss_fire_interval_ms: Some(250),
            ..Default::default()
        };
        let d = base.with_overrides(&overrides);
        assert_eq!(d.boss_fire_interval_ms, 250);
        assert_eq!(d.player_fire_cooldown_ms, base.player_fire_cooldown_ms);
        assert_eq!(d.boss_move_interval_ms, base.boss_move_interval_ms);
    }

    #[test]
    fn test_zero_boss_interval_rejected() {
        let d = Difficulty {
            boss_move_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(d.validate(), Err(BattleError::InvalidDifficulty(_))));

        let no_cooldown = Difficulty {
            player_fire_cooldown_ms: 0,
            ..Default::default()
        };
        assert!(no_cooldown.validate().is_ok());
    }

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(BattleTuning::default().validate().is_ok());
    }

    #[test]
    fn test_lane_without_z_travel_rejected() {
        let tuning = BattleTuning {
            boss_lane: ProjectileLane {
                step: [0.0, 0.0, 0.0],
                exit_z: 12.0,
            },
            ..Default::default()
        };
        let err = tuning.validate().unwrap_err();
        assert!(err.contains("boss_lane"), "{}", err);
    }

    #[test]
    fn test_lane_exit_behind_spawn_rejected() {
        // Player shots travel toward -z but the exit plane sits behind the player
        let tuning = BattleTuning {
            player_lane: ProjectileLane {
                step: [0.0, 0.0, -0.5],
                exit_z: 12.0,
            },
            ..Default::default()
        };
        assert!(tuning.validate().is_err());

        // Exit inside the player's z range would retire some shots at once
        let tuning = BattleTuning {
            player_lane: ProjectileLane {
                step: [0.0, 0.0, -0.5],
                exit_z: 6.0,
            },
            ..Default::default()
        };
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_partial_difficulty_json_uses_defaults() {
        let d: Difficulty = serde_json::from_str(r#"{ "boss_fire_interval_ms": 1500 }"#).unwrap();
        assert_eq!(d.boss_fire_interval_ms, 1500);
        assert_eq!(d.boss_move_interval_ms, DEFAULT_BOSS_MOVE_INTERVAL_MS);
    }
}
