//! Player intents
//!
//! The input source delivers edge-triggered "active / inactive" signals per
//! logical action. `InputBuffer` collects them between steps and produces one
//! `IntentSet` per step, so the simulation reads input at its own cadence.

use super::combatant::{Axis, Direction, MoveIntent};

/// Logical player actions (no key codes in the core)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BattleAction {
    MoveLeft,
    MoveRight,
    MoveForward,
    MoveBack,
    Fire,
    Jump,
}

impl BattleAction {
    pub const ALL: [BattleAction; 6] = [
        BattleAction::MoveLeft,
        BattleAction::MoveRight,
        BattleAction::MoveForward,
        BattleAction::MoveBack,
        BattleAction::Fire,
        BattleAction::Jump,
    ];

    fn index(self) -> usize {
        match self {
            BattleAction::MoveLeft => 0,
            BattleAction::MoveRight => 1,
            BattleAction::MoveForward => 2,
            BattleAction::MoveBack => 3,
            BattleAction::Fire => 4,
            BattleAction::Jump => 5,
        }
    }

    /// Movement this action maps to. The player faces the boss along -z.
    pub fn move_intent(self) -> Option<MoveIntent> {
        match self {
            BattleAction::MoveLeft => Some(MoveIntent::new(Axis::X, Direction::Negative)),
            BattleAction::MoveRight => Some(MoveIntent::new(Axis::X, Direction::Positive)),
            BattleAction::MoveForward => Some(MoveIntent::new(Axis::Z, Direction::Negative)),
            BattleAction::MoveBack => Some(MoveIntent::new(Axis::Z, Direction::Positive)),
            BattleAction::Fire | BattleAction::Jump => None,
        }
    }
}

/// Actions active during one simulation step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntentSet {
    active: [bool; 6],
}

impl IntentSet {
    pub fn is_active(&self, action: BattleAction) -> bool {
        self.active[action.index()]
    }

    pub fn set(&mut self, action: BattleAction, active: bool) {
        self.active[action.index()] = active;
    }

    pub fn is_empty(&self) -> bool {
        !self.active.iter().any(|a| *a)
    }

    /// Movement intents for this step, in `BattleAction::ALL` order
    pub fn move_intents(&self) -> impl Iterator<Item = MoveIntent> + '_ {
        BattleAction::ALL
            .into_iter()
            .filter(|a| self.is_active(*a))
            .filter_map(BattleAction::move_intent)
    }
}

/// Accumulates input edges between simulation steps
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    held: IntentSet,
    /// Pressed at least once since the last snapshot
    latched: IntentSet,
}

impl InputBuffer {
    /// Record an input edge
    pub fn signal(&mut self, action: BattleAction, active: bool) {
        self.held.set(action, active);
        if active {
            self.latched.set(action, true);
        }
    }

    /// Intents for the coming step. A press released before the step still
    /// counts once.
    pub fn snapshot(&mut self) -> IntentSet {
        let mut intents = self.held;
        for action in BattleAction::ALL {
            if self.latched.is_active(action) {
                intents.set(action, true);
            }
        }
        self.latched = IntentSet::default();
        intents
    }

    pub fn clear(&mut self) {
        self.held = IntentSet::default();
        self.latched = IntentSet::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_action_persists_across_snapshots() {
        let mut input = InputBuffer::default();
        input.signal(BattleAction::MoveLeft, true);

        assert!(input.snapshot().is_active(BattleAction::MoveLeft));
        assert!(input.snapshot().is_active(BattleAction::MoveLeft));

        input.signal(BattleAction::MoveLeft, false);
        assert!(input.snapshot().is_empty());
    }

    #[test]
    fn test_tap_between_steps_counts_once() {
        let mut input = InputBuffer::default();
        input.signal(BattleAction::Fire, true);
        input.signal(BattleAction::Fire, false);

        assert!(input.snapshot().is_active(BattleAction::Fire));
        assert!(!input.snapshot().is_active(BattleAction::Fire));
    }

    #[test]
    fn test_move_intents_skip_non_movement() {
        let mut intents = IntentSet::default();
        intents.set(BattleAction::Fire, true);
        intents.set(BattleAction::MoveRight, true);
        intents.set(BattleAction::MoveForward, true);

        let moves: Vec<_> = intents.move_intents().collect();
        assert_eq!(
            moves,
            vec![
                MoveIntent::new(Axis::X, Direction::Positive),
                MoveIntent::new(Axis::Z, Direction::Negative),
            ]
        );
    }
}
