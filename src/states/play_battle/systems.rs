//! Battle Systems API
//!
//! Shared by the graphical game and the headless runner, so both drive a
//! `BattleSession` through the same frame pipeline.
//!
//! ## System Phases
//!
//! 1. **Input** - input edges (keyboard or autopilot) go into the session
//! 2. **Simulation** - the session runs as many fixed steps as the frame covers
//! 3. **Publish** - session events are forwarded as Bevy `BattleEvent`s
//!
//! ## Usage
//!
//! ```ignore
//! systems::configure_battle_system_ordering(&mut app);
//! systems::add_core_battle_systems(&mut app, in_state(GameState::Battle));
//! ```

use bevy::prelude::*;

use crate::combat::{BattleEvent, BattleSession};

/// System set labels for battle system ordering
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum BattleSystemPhase {
    Input,
    Simulation,
    Publish,
}

/// Configures the ordering between battle system phases.
///
/// Call this once during app setup before adding battle systems.
pub fn configure_battle_system_ordering(app: &mut App) {
    app.configure_sets(
        Update,
        (
            BattleSystemPhase::Input,
            BattleSystemPhase::Simulation,
            BattleSystemPhase::Publish,
        )
            .chain(),
    );
}

/// Adds the simulation and event publishing systems.
///
/// `run_condition` is `in_state(GameState::Battle)` for the game and
/// `|| true` for headless runs.
pub fn add_core_battle_systems<M>(app: &mut App, run_condition: impl Condition<M> + Clone)
where
    M: 'static,
{
    app.add_event::<BattleEvent>();

    app.add_systems(
        Update,
        advance_battle
            .in_set(BattleSystemPhase::Simulation)
            .run_if(run_condition.clone()),
    );

    app.add_systems(
        Update,
        publish_battle_events
            .in_set(BattleSystemPhase::Publish)
            .run_if(run_condition),
    );
}

/// Feed the frame's time into the session
pub fn advance_battle(time: Res<Time>, mut session: ResMut<BattleSession>) {
    session.update(time.delta());
}

/// Forward session events to the rest of the app
pub fn publish_battle_events(
    mut session: ResMut<BattleSession>,
    mut events: EventWriter<BattleEvent>,
) {
    let drained = session.drain_events();
    if !drained.is_empty() {
        events.send_batch(drained);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{BattleOutcome, Difficulty};
    use std::time::Duration;

    #[test]
    fn test_events_reach_bevy_event_queue() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(BattleSession::default());
        configure_battle_system_ordering(&mut app);
        add_core_battle_systems(&mut app, || true);

        app.world_mut()
            .resource_mut::<BattleSession>()
            .start("training", Difficulty::default())
            .unwrap();
        app.update();

        let events = app.world().resource::<Events<BattleEvent>>();
        let mut reader = events.get_cursor();
        let received: Vec<_> = reader.read(events).cloned().collect();
        assert!(received
            .iter()
            .any(|e| matches!(e, BattleEvent::Started { .. })));
        assert!(!received
            .iter()
            .any(|e| matches!(e, BattleEvent::Outcome(BattleOutcome::PlayerWon))));
        assert!(app.world().resource::<BattleSession>().match_time() < Duration::from_secs(1));
    }
}
