//! Combat system
//!
//! The simulation core of a duel, with no rendering or windowing:
//! - Combatant movement, clamping and jumps
//! - Projectile pool with the player fire cooldown gate
//! - Collision and damage resolution
//! - AI Director driving boss fire and repositioning from timers
//! - `BattleSession`, the state machine that owns all of the above
//! - Battle logging
//!
//! Bevy systems in `states::play_battle` feed input into a `BattleSession`
//! resource and read its events and snapshots back out.

pub mod clock;
pub mod collision;
pub mod combatant;
pub mod constants;
pub mod director;
pub mod error;
pub mod events;
pub mod input;
pub mod log;
pub mod projectiles;
pub mod rng;
pub mod session;
pub mod tuning;

pub use combatant::{Combatant, MovementBounds, Side};
pub use error::BattleError;
pub use events::{BattleEvent, BattleOutcome, FrameSnapshot};
pub use input::BattleAction;
pub use session::{BattleMode, BattleSession, BattleState, BattleStats};
pub use tuning::{BattleTuning, Difficulty, DifficultyOverrides};
