//! DuelArena - Boss Duel Prototype
//!
//! One player against a timer-driven boss on a fixed arena. Beat the boss to
//! earn upgrade points, spend them in the hub, go again.
//!
//! This library exposes the battle core and the Bevy glue for testing and
//! reuse.

pub mod cli;
pub mod combat;
pub mod headless;
pub mod keybindings;
pub mod settings;
pub mod states;
pub mod upgrades;

// Re-export commonly used types
pub use combat::log::{BattleLog, BattleLogEventType};
pub use combat::{BattleError, BattleMode, BattleSession, BattleState, Difficulty};
pub use headless::HeadlessBattleConfig;
pub use upgrades::{UpgradeError, UpgradeKind, UpgradeStore};
