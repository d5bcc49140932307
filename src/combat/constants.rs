//! Battle Constants
//!
//! Centralized location for the numbers that shape the duel.
//! Most of these are only defaults: `BattleTuning` and `Difficulty` carry the
//! values a session actually uses, so they can be overridden from `settings.ron`
//! or a headless config.

use std::time::Duration;

// ============================================================================
// Simulation Step
// ============================================================================

/// Fixed simulation step. Per-tick movement and projectile vectors are
/// expressed in world units per step of this length.
pub const SIM_TICK: Duration = Duration::from_nanos(16_666_667);

// ============================================================================
// Health & Damage
// ============================================================================

/// Health the player starts each session with.
pub const PLAYER_MAX_HEALTH: i32 = 20;

/// Health the boss starts each session with.
pub const BOSS_MAX_HEALTH: i32 = 30;

/// Damage applied per projectile hit. Fixed, independent of upgrades.
pub const HIT_DAMAGE: i32 = 1;

/// Half-extent of the square hit box tested on the x and z axes.
pub const HIT_HALF_EXTENT: f32 = 1.0;

// ============================================================================
// Player Movement
// ============================================================================

/// Player movement per step along one axis.
pub const PLAYER_SPEED: f32 = 0.1;

/// Resting height of the player above the arena floor.
pub const PLAYER_GROUND_HEIGHT: f32 = 0.5;

/// Upward velocity given by a jump, per step.
pub const JUMP_VELOCITY: f32 = 0.2;

/// Downward acceleration applied to an airborne player, per step.
pub const GRAVITY: f32 = 0.01;

// ============================================================================
// Arena Layout
// ============================================================================

/// Player spawn point (x, y, z).
pub const PLAYER_SPAWN: [f32; 3] = [0.0, PLAYER_GROUND_HEIGHT, 8.0];

/// Boss spawn point (x, y, z).
pub const BOSS_SPAWN: [f32; 3] = [0.0, 1.0, -12.0];

/// Player movement bounds: (x_min, x_max, z_min, z_max).
pub const PLAYER_BOUNDS: [f32; 4] = [-6.0, 6.0, 4.0, 10.0];

/// Boss movement bounds. The boss only moves along x, so z is pinned.
pub const BOSS_BOUNDS: [f32; 4] = [-6.0, 6.0, -12.0, -12.0];

/// Player projectiles travel toward the boss (negative z).
pub const PLAYER_PROJECTILE_STEP: [f32; 3] = [0.0, 0.0, -0.5];

/// Player projectiles past this z have missed the boss.
pub const PLAYER_PROJECTILE_EXIT_Z: f32 = -14.0;

/// Boss projectiles travel toward the player (positive z).
pub const BOSS_PROJECTILE_STEP: [f32; 3] = [0.0, 0.0, 0.25];

/// Boss projectiles past this z have missed the player.
pub const BOSS_PROJECTILE_EXIT_Z: f32 = 12.0;

// ============================================================================
// Default Difficulty (milliseconds)
// ============================================================================

/// Minimum time between two player shots.
pub const DEFAULT_PLAYER_FIRE_COOLDOWN_MS: u64 = 500;

/// Cadence of the boss fire timer.
pub const DEFAULT_BOSS_FIRE_INTERVAL_MS: u64 = 1000;

/// Cadence of the boss reposition timer.
pub const DEFAULT_BOSS_MOVE_INTERVAL_MS: u64 = 2000;

/// Duration of the boss slide toward a new x target.
pub const REPOSITION_TWEEN_MS: u64 = 1000;
