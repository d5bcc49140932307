//! Timer service
//!
//! Cancellable repeating and one-shot timers, advanced by the session clock.
//! Timers carry a `TimerKind` instead of a callback; whoever advances the
//! service dispatches on the kinds that fired.
//!
//! # Lifecycle
//!
//! 1. `schedule_repeating` / `schedule_once` → timer armed, handle returned
//! 2. `advance` ticks every armed timer and reports each completion
//! 3. One-shot timers disarm themselves after firing; repeating timers stay
//!    armed until `cancel`

use std::fmt;
use std::time::Duration;

use bevy::time::{Timer, TimerMode};
use smallvec::SmallVec;

use super::error::BattleError;

/// Opaque handle to an armed timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a timer means when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// AI Director: spawn one boss projectile
    BossFire,
    /// AI Director: pick a new x target for the boss
    BossReposition,
    /// Reopen the player's fire gate
    PlayerCooldown,
}

/// A timer completion reported by `TimerService::advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub handle: TimerHandle,
    pub kind: TimerKind,
    /// True when the timer disarmed itself by firing
    pub expired: bool,
}

struct ArmedTimer {
    handle: TimerHandle,
    kind: TimerKind,
    timer: Timer,
}

/// Owns every armed timer and the clock that drives them
#[derive(Default)]
pub struct TimerService {
    armed: Vec<ArmedTimer>,
    next_handle: u64,
    elapsed: Duration,
}

impl TimerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a timer that fires every `period` until cancelled
    pub fn schedule_repeating(&mut self, period: Duration, kind: TimerKind) -> TimerHandle {
        self.arm(Timer::new(period, TimerMode::Repeating), kind)
    }

    /// Arm a timer that fires once after `delay`
    pub fn schedule_once(&mut self, delay: Duration, kind: TimerKind) -> TimerHandle {
        self.arm(Timer::new(delay, TimerMode::Once), kind)
    }

    fn arm(&mut self, timer: Timer, kind: TimerKind) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.armed.push(ArmedTimer {
            handle,
            kind,
            timer,
        });
        handle
    }

    /// Disarm a timer.
    ///
    /// Cancelling a handle that is no longer armed returns `DoubleCancel` and
    /// leaves the service untouched.
    pub fn cancel(&mut self, handle: TimerHandle) -> Result<(), BattleError> {
        let Some(index) = self.armed.iter().position(|t| t.handle == handle) else {
            return Err(BattleError::DoubleCancel(handle));
        };
        self.armed.remove(index);
        Ok(())
    }

    /// Advance the clock and collect every completion in registration order.
    /// A repeating timer whose period fits several times into `dt` is reported
    /// once per completion.
    pub fn advance(&mut self, dt: Duration) -> SmallVec<[FiredTimer; 4]> {
        self.elapsed += dt;
        let mut fired = SmallVec::new();

        for armed in self.armed.iter_mut() {
            armed.timer.tick(dt);
            let expired = armed.timer.mode() == TimerMode::Once && armed.timer.just_finished();
            for _ in 0..armed.timer.times_finished_this_tick() {
                fired.push(FiredTimer {
                    handle: armed.handle,
                    kind: armed.kind,
                    expired,
                });
            }
        }

        self.armed
            .retain(|t| !(t.timer.mode() == TimerMode::Once && t.timer.finished()));
        fired
    }

    pub fn is_armed(&self, handle: TimerHandle) -> bool {
        self.armed.iter().any(|t| t.handle == handle)
    }

    /// Number of timers still armed
    pub fn armed_count(&self) -> usize {
        self.armed.len()
    }

    /// Number of armed timers of a given kind
    pub fn armed_of_kind(&self, kind: TimerKind) -> usize {
        self.armed.iter().filter(|t| t.kind == kind).count()
    }

    /// Total time the service has been advanced
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
