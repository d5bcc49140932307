//! Combatants
//!
//! The player avatar and the boss share one shape: a position, an integer
//! health pool and the rectangle they may move in. Only the control policy
//! differs (player intents vs. the AI Director).

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use super::constants::{GRAVITY, HIT_DAMAGE};

/// Which side of the duel an entity fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Boss,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Boss,
            Side::Boss => Side::Player,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Boss => "Boss",
        }
    }
}

/// Legal rectangle on the arena floor (y is unconstrained)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementBounds {
    pub x_min: f32,
    pub x_max: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl MovementBounds {
    pub fn new(x_min: f32, x_max: f32, z_min: f32, z_max: f32) -> Self {
        Self {
            x_min,
            x_max,
            z_min,
            z_max,
        }
    }

    /// Build from an `[x_min, x_max, z_min, z_max]` array
    pub fn from_array(b: [f32; 4]) -> Self {
        Self::new(b[0], b[1], b[2], b[3])
    }

    /// Clamp x and z component-wise, leaving y alone
    pub fn clamp(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            position.x.clamp(self.x_min, self.x_max),
            position.y,
            position.z.clamp(self.z_min, self.z_max),
        )
    }

    pub fn contains(&self, position: Vec3) -> bool {
        (self.x_min..=self.x_max).contains(&position.x)
            && (self.z_min..=self.z_max).contains(&position.z)
    }
}

/// Floor axis a movement intent acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Z,
}

/// Sign of a movement along an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Negative,
    Positive,
}

impl Direction {
    fn sign(self) -> f32 {
        match self {
            Direction::Negative => -1.0,
            Direction::Positive => 1.0,
        }
    }
}

/// One single-axis movement request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveIntent {
    pub axis: Axis,
    pub direction: Direction,
}

impl MoveIntent {
    pub const fn new(axis: Axis, direction: Direction) -> Self {
        Self { axis, direction }
    }
}

/// A duelist: player avatar or boss
#[derive(Debug, Clone)]
pub struct Combatant {
    pub side: Side,
    pub position: Vec3,
    pub bounds: MovementBounds,
    /// Signed so simultaneous hits can overshoot internally; read through `health()`
    health: i32,
    max_health: i32,
    spawn: Vec3,
    /// Resting height; the combatant is grounded at or below this y
    ground_height: f32,
    vertical_velocity: f32,
}

impl Combatant {
    pub fn new(side: Side, spawn: Vec3, bounds: MovementBounds, max_health: i32) -> Self {
        let max_health = max_health.max(1);
        let spawn = bounds.clamp(spawn);
        Self {
            side,
            position: spawn,
            bounds,
            health: max_health,
            max_health,
            spawn,
            ground_height: spawn.y,
            vertical_velocity: 0.0,
        }
    }

    /// Health as observed from outside, never below zero
    pub fn health(&self) -> i32 {
        self.health.max(0)
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }

    /// Restore full health and return to the spawn point
    pub fn reset(&mut self) {
        self.health = self.max_health;
        self.position = self.spawn;
        self.vertical_velocity = 0.0;
    }

    /// Apply one hit. Only the collision resolver calls this.
    pub(crate) fn take_hit(&mut self) -> i32 {
        self.health -= HIT_DAMAGE;
        self.health()
    }

    pub fn is_airborne(&self) -> bool {
        self.position.y > self.ground_height || self.vertical_velocity > 0.0
    }

    /// Launch upward if standing on the ground. Returns whether a jump started.
    pub fn jump(&mut self, velocity: f32) -> bool {
        if self.is_airborne() {
            return false;
        }
        self.vertical_velocity = velocity;
        true
    }

    /// Advance the vertical motion by one step
    pub fn apply_gravity(&mut self) {
        if !self.is_airborne() {
            return;
        }
        self.position.y += self.vertical_velocity;
        self.vertical_velocity -= GRAVITY;
        if self.position.y <= self.ground_height {
            self.position.y = self.ground_height;
            self.vertical_velocity = 0.0;
        }
    }
}

/// Move a combatant one step along a single axis and clamp to its bounds.
///
/// Diagonal movement is two calls in the same step; the two displacements add
/// up without normalization. Pushing into a saturated bound leaves the
/// position where it is.
pub fn apply_movement_intent(combatant: &mut Combatant, intent: MoveIntent, speed: f32) -> Vec3 {
    let delta = intent.direction.sign() * speed;
    let mut target = combatant.position;
    match intent.axis {
        Axis::X => target.x += delta,
        Axis::Z => target.z += delta,
    }
    combatant.position = combatant.bounds.clamp(target);
    combatant.position
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Combatant {
        Combatant::new(
            Side::Player,
            Vec3::new(0.0, 0.5, 8.0),
            MovementBounds::new(-6.0, 6.0, 4.0, 10.0),
            20,
        )
    }

    #[test]
    fn test_single_axis_move() {
        let mut c = player();
        let pos = apply_movement_intent(&mut c, MoveIntent::new(Axis::X, Direction::Positive), 0.5);
        assert_eq!(pos, Vec3::new(0.5, 0.5, 8.0));
    }

    #[test]
    fn test_diagonal_is_additive() {
        let mut c = player();
        apply_movement_intent(&mut c, MoveIntent::new(Axis::X, Direction::Negative), 1.0);
        apply_movement_intent(&mut c, MoveIntent::new(Axis::Z, Direction::Negative), 1.0);
        assert_eq!(c.position.x, -1.0);
        assert_eq!(c.position.z, 7.0);
    }

    #[test]
    fn test_movement_is_clamped_for_all_directions() {
        let intents = [
            MoveIntent::new(Axis::X, Direction::Negative),
            MoveIntent::new(Axis::X, Direction::Positive),
            MoveIntent::new(Axis::Z, Direction::Negative),
            MoveIntent::new(Axis::Z, Direction::Positive),
        ];
        for intent in intents {
            let mut c = player();
            for _ in 0..200 {
                let pos = apply_movement_intent(&mut c, intent, 0.35);
                assert!(c.bounds.contains(pos), "{:?} escaped bounds at {:?}", intent, pos);
            }
        }
    }

    #[test]
    fn test_saturated_bound_is_noop() {
        let mut c = player();
        c.position.x = 6.0;
        let before = c.position;
        let right = MoveIntent::new(Axis::X, Direction::Positive);
        let after = apply_movement_intent(&mut c, right, 0.1);
        assert_eq!(before, after);
    }

    #[test]
    fn test_health_reports_clamped_value() {
        let mut c = player();
        for _ in 0..25 {
            c.take_hit();
        }
        assert_eq!(c.health(), 0);
        assert!(c.is_defeated());

        c.reset();
        assert_eq!(c.health(), 20);
        assert_eq!(c.position, Vec3::new(0.0, 0.5, 8.0));
    }

    #[test]
    fn test_jump_lands_back_on_ground() {
        let mut c = player();
        assert!(c.jump(0.2));
        assert!(!c.jump(0.2), "cannot double jump");

        let mut peak: f32 = 0.0;
        for _ in 0..100 {
            c.apply_gravity();
            peak = peak.max(c.position.y);
        }
        assert!(peak > 0.5);
        assert_eq!(c.position.y, 0.5);
        assert!(!c.is_airborne());
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Player.opponent(), Side::Boss);
        assert_eq!(Side::Boss.opponent(), Side::Player);
    }
}
