//! Error types for battle operations

use thiserror::Error;

use super::clock::TimerHandle;

/// Errors raised by the battle core.
///
/// None of these are fatal. `CooldownActive` and `DoubleCancel` are expected
/// during normal play and are swallowed by their callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("player fire is on cooldown for another {remaining_ms}ms")]
    CooldownActive { remaining_ms: u64 },

    #[error("unknown battle mode '{0}' (expected 'boss' or 'training')")]
    InvalidMode(String),

    #[error("a battle session is already running")]
    AlreadyRunning,

    #[error("invalid difficulty: {0}")]
    InvalidDifficulty(String),

    #[error("timer {0} is not armed (already cancelled or expired)")]
    DoubleCancel(TimerHandle),
}
