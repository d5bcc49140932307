//! AI Director
//!
//! Timer-driven boss behavior. On activation it arms two independent
//! repeating timers:
//! - **Fire** (`boss_fire_interval_ms`): one boss projectile per tick, spawned
//!   at the boss' current position
//! - **Reposition** (`boss_move_interval_ms`): a new x target sampled
//!   uniformly from the boss' bounds, reached over a fixed tween duration
//!
//! The director never cancels its own timers. The session owns every handle
//! and cancels each exactly once when the battle stops.

use std::time::Duration;

use super::clock::{TimerHandle, TimerKind, TimerService};
use super::combatant::MovementBounds;
use super::rng::GameRng;

/// Director lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectorState {
    #[default]
    Idle,
    Active,
    Stopped,
}

/// Where the boss should slide to, and how long the slide takes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepositionOrder {
    pub target_x: f32,
    pub duration: Duration,
}

/// Drives boss fire and movement from timer ticks
#[derive(Debug, Clone, Default)]
pub struct AiDirector {
    state: DirectorState,
}

impl AiDirector {
    pub fn state(&self) -> DirectorState {
        self.state
    }

    /// Arm the director's timers and enter `Active`.
    ///
    /// Returns the handles armed so the caller can track them. With
    /// `fire_enabled` false only the reposition timer is armed.
    pub fn activate(
        &mut self,
        clock: &mut TimerService,
        fire_interval: Duration,
        move_interval: Duration,
        fire_enabled: bool,
    ) -> Vec<TimerHandle> {
        let mut armed = Vec::with_capacity(2);
        if fire_enabled {
            armed.push(clock.schedule_repeating(fire_interval, TimerKind::BossFire));
        }
        armed.push(clock.schedule_repeating(move_interval, TimerKind::BossReposition));
        self.state = DirectorState::Active;
        armed
    }

    /// Enter `Stopped`. Timer cancellation is the session's sweep.
    pub fn stop(&mut self) {
        if self.state == DirectorState::Active {
            self.state = DirectorState::Stopped;
        }
    }

    /// Back to `Idle` for the next session
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Reposition tick: pick a uniform x target inside the bounds
    pub fn plan_reposition(
        &self,
        rng: &mut GameRng,
        bounds: &MovementBounds,
        duration: Duration,
    ) -> RepositionOrder {
        RepositionOrder {
            target_x: rng.range_inclusive(bounds.x_min, bounds.x_max),
            duration,
        }
    }
}

/// Cosmetic slide of the boss along x.
///
/// The session holds at most one tween and drops it unconditionally when the
/// battle stops, so a slide never outlives its encounter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepositionTween {
    from_x: f32,
    to_x: f32,
    duration: Duration,
    elapsed: Duration,
}

impl RepositionTween {
    pub fn new(from_x: f32, order: RepositionOrder) -> Self {
        Self {
            from_x,
            to_x: order.target_x,
            duration: order.duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance and return the current x
    pub fn advance(&mut self, dt: Duration) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.current_x()
    }

    pub fn current_x(&self) -> f32 {
        if self.duration.is_zero() {
            return self.to_x;
        }
        let t = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from_x + (self.to_x - self.from_x) * t
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_arms_two_timers() {
        let mut clock = TimerService::new();
        let mut director = AiDirector::default();

        let handles = director.activate(
            &mut clock,
            Duration::from_millis(1000),
            Duration::from_millis(2000),
            true,
        );

        assert_eq!(handles.len(), 2);
        assert_eq!(director.state(), DirectorState::Active);
        assert_eq!(clock.armed_of_kind(TimerKind::BossFire), 1);
        assert_eq!(clock.armed_of_kind(TimerKind::BossReposition), 1);
        assert!(handles.iter().all(|h| clock.is_armed(*h)));
    }

    #[test]
    fn test_fire_disabled_arms_only_reposition() {
        let mut clock = TimerService::new();
        let mut director = AiDirector::default();

        let handles = director.activate(
            &mut clock,
            Duration::from_millis(1000),
            Duration::from_millis(2000),
            false,
        );

        assert_eq!(handles.len(), 1);
        assert_eq!(clock.armed_of_kind(TimerKind::BossFire), 0);
    }

    #[test]
    fn test_stop_leaves_cancellation_to_caller() {
        let mut clock = TimerService::new();
        let mut director = AiDirector::default();
        let handles =
            director.activate(&mut clock, Duration::from_secs(1), Duration::from_secs(2), true);

        director.stop();

        assert_eq!(director.state(), DirectorState::Stopped);
        assert!(clock.is_armed(handles[0]));
        // Cancellation belongs to the session
        assert_eq!(clock.armed_count(), 2);
    }

    #[test]
    fn test_reposition_targets_stay_in_bounds() {
        let director = AiDirector::default();
        let bounds = MovementBounds::new(-6.0, 6.0, -12.0, -12.0);
        let mut rng = GameRng::from_seed(3);

        for _ in 0..200 {
            let order = director.plan_reposition(&mut rng, &bounds, Duration::from_secs(1));
            assert!((-6.0..=6.0).contains(&order.target_x));
        }
    }

    #[test]
    fn test_tween_interpolates_linearly() {
        let order = RepositionOrder {
            target_x: 4.0,
            duration: Duration::from_millis(1000),
        };
        let mut tween = RepositionTween::new(0.0, order);

        assert_eq!(tween.advance(Duration::from_millis(500)), 2.0);
        assert!(!tween.is_finished());
        assert_eq!(tween.advance(Duration::from_millis(800)), 4.0);
        assert!(tween.is_finished());
    }
}
