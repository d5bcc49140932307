//! Play Battle Scene
//!
//! The boss duel as seen by a player: keyboard input flows into the
//! `BattleSession` resource, the session's snapshot drives a cube scene and
//! its events drive an egui HUD.
//!
//! ## Flow
//! 1. `start_battle` (OnEnter): start a session with the hub's chosen mode and
//!    the Upgrade Store's difficulty, then spawn the scene
//! 2. Systems run each frame:
//!    - `read_battle_input`: keyboard edges → session intents, Escape → hub
//!    - `advance_battle` / `publish_battle_events`: see `systems`
//!    - `handle_battle_outcome`: award upgrade points, show the banner
//!    - `sync_battle_scene` and `render_battle_hud`
//!    - `update_outcome_banner`: return to the hub when the banner expires
//! 3. `leave_battle` (OnExit): abort if still running, reset, despawn

pub mod hud;
pub mod scene;
pub mod systems;

use bevy::prelude::*;

use super::{GameState, PendingBattle};
use crate::combat::rng::GameRng;
use crate::combat::{BattleOutcome, BattleSession};
use crate::keybindings::{GameAction, Keybindings};
use crate::settings::GameSettings;
use crate::upgrades::UpgradeStore;

use hud::{handle_battle_outcome, render_battle_hud, update_outcome_banner, OutcomeBanner};
use scene::{despawn_battle_scene, spawn_battle_scene, sync_battle_scene};
use systems::BattleSystemPhase;

/// Plugin for the interactive battle
pub struct BattlePlugin;

impl Plugin for BattlePlugin {
    fn build(&self, app: &mut App) {
        // Tuning comes from settings.ron when SettingsPlugin was added first
        let tuning = app
            .world()
            .get_resource::<GameSettings>()
            .map(|settings| settings.tuning.clone())
            .unwrap_or_default();
        app.insert_resource(BattleSession::new(tuning, GameRng::from_entropy()));

        systems::configure_battle_system_ordering(app);
        systems::add_core_battle_systems(app, in_state(GameState::Battle));

        app.add_systems(OnEnter(GameState::Battle), (start_battle, spawn_battle_scene).chain())
            .add_systems(OnExit(GameState::Battle), (leave_battle, despawn_battle_scene))
            .add_systems(
                Update,
                read_battle_input
                    .in_set(BattleSystemPhase::Input)
                    .run_if(in_state(GameState::Battle)),
            )
            .add_systems(
                Update,
                (
                    handle_battle_outcome,
                    sync_battle_scene,
                    render_battle_hud,
                    update_outcome_banner,
                )
                    .chain()
                    .after(BattleSystemPhase::Publish)
                    .run_if(in_state(GameState::Battle)),
            );
    }
}

/// Marker component for battle scene entities
#[derive(Component)]
pub struct BattleEntity;

fn start_battle(
    mut session: ResMut<BattleSession>,
    pending: Res<PendingBattle>,
    store: Res<UpgradeStore>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let difficulty = store.difficulty();
    if let Err(e) = session.start(pending.mode.name(), difficulty) {
        error!("Could not start battle: {}", e);
        next_state.set(GameState::Hub);
    }
}

fn leave_battle(mut session: ResMut<BattleSession>, mut commands: Commands) {
    if session.abort() {
        info!("Left battle while it was running");
    }
    if let Err(e) = session.reset() {
        warn!("Battle reset failed: {}", e);
    }
    commands.remove_resource::<OutcomeBanner>();
}

/// Keyboard edges to session intents. Escape leaves the battle.
fn read_battle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    keybindings: Res<Keybindings>,
    mut session: ResMut<BattleSession>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keybindings.action_just_pressed(GameAction::Back, &keyboard) {
        info!("Back pressed - returning to hub");
        next_state.set(GameState::Hub);
        return;
    }
    for (action, active) in keybindings.battle_edges(&keyboard) {
        session.set_intent(action, active);
    }
}

/// Banner text for an outcome
pub fn outcome_title(outcome: BattleOutcome) -> &'static str {
    match outcome {
        BattleOutcome::PlayerWon => "VICTORY",
        BattleOutcome::BossWon => "DEFEAT",
    }
}
