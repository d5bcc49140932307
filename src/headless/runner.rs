//! Headless battle execution
//!
//! Runs one battle without any graphical output. An autopilot stands in for
//! the keyboard, Bevy time advances by exactly one simulation step per
//! `App::update`, and the outcome is written as a JSON report.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::combat::constants::SIM_TICK;
use crate::combat::log::BattleLogEntry;
use crate::combat::rng::GameRng;
use crate::combat::{BattleAction, BattleSession, BattleStats, BattleTuning, Difficulty, Side};
use crate::states::play_battle::systems::{self, BattleSystemPhase};

use super::config::{Autopilot, HeadlessBattleConfig};

/// Autopilot stops steering once this close to the boss along x
const TRACKING_DEADZONE: f32 = 0.15;

/// Result of a completed headless battle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleResult {
    /// The winner, or None when the battle timed out
    pub winner: Option<Side>,
    /// Simulated battle time in seconds
    pub match_time: f32,
    pub player_health: i32,
    pub boss_health: i32,
    pub stats: BattleStats,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
}

/// What gets written to disk
#[derive(Serialize)]
struct BattleReport<'a> {
    mode: &'a str,
    difficulty: Difficulty,
    result: &'a BattleResult,
    log: &'a [BattleLogEntry],
}

/// Resource to track headless battle state
#[derive(Resource)]
pub struct HeadlessBattleState {
    pub max_duration: f32,
    pub output_path: Option<String>,
    pub autopilot: Autopilot,
    pub battle_complete: bool,
    pub result: Option<BattleResult>,
}

/// Plugin for headless battle execution
pub struct HeadlessPlugin {
    pub config: HeadlessBattleConfig,
    pub tuning: BattleTuning,
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        let rng = match self.config.random_seed {
            Some(seed) => {
                info!("Using deterministic RNG with seed: {}", seed);
                GameRng::from_seed(seed)
            }
            None => {
                info!("Using non-deterministic RNG (no seed provided)");
                GameRng::from_entropy()
            }
        };

        app.insert_resource(BattleSession::new(self.tuning.clone(), rng))
            .insert_resource(HeadlessBattleState {
                max_duration: self.config.max_duration_secs,
                output_path: self.config.output_path.clone(),
                autopilot: self.config.autopilot,
                battle_complete: false,
                result: None,
            })
            .insert_resource(HeadlessStart {
                mode: self.config.mode.clone(),
                difficulty: self
                    .config
                    .resolve_difficulty(&self.tuning.difficulty)
                    .unwrap_or(self.tuning.difficulty),
            });

        systems::configure_battle_system_ordering(app);
        systems::add_core_battle_systems(app, || true);

        app.add_systems(Startup, headless_start_battle)
            .add_systems(Update, drive_autopilot.in_set(BattleSystemPhase::Input))
            .add_systems(
                Update,
                headless_check_battle_end.after(BattleSystemPhase::Publish),
            );
    }
}

/// Mode and cadences for the Startup system
#[derive(Resource)]
struct HeadlessStart {
    mode: String,
    difficulty: Difficulty,
}

fn headless_start_battle(
    start: Res<HeadlessStart>,
    mut session: ResMut<BattleSession>,
    mut headless_state: ResMut<HeadlessBattleState>,
) {
    if let Err(e) = session.start(&start.mode, start.difficulty) {
        error!("Headless battle failed to start: {}", e);
        headless_state.battle_complete = true;
        return;
    }
    info!(
        "Headless battle setup complete: {} mode, {:?} autopilot",
        session.mode(),
        headless_state.autopilot
    );
}

/// Steer the player under the boss and hold fire (aggressive), or idle
fn drive_autopilot(headless_state: Res<HeadlessBattleState>, mut session: ResMut<BattleSession>) {
    if headless_state.autopilot == Autopilot::Passive || !session.is_running() {
        return;
    }
    let dx = session.boss().position.x - session.player().position.x;
    session.set_intent(BattleAction::MoveLeft, dx < -TRACKING_DEADZONE);
    session.set_intent(BattleAction::MoveRight, dx > TRACKING_DEADZONE);
    session.set_intent(BattleAction::Fire, true);
}

/// Check if the battle has ended (outcome or timeout)
fn headless_check_battle_end(
    mut session: ResMut<BattleSession>,
    mut headless_state: ResMut<HeadlessBattleState>,
) {
    if headless_state.battle_complete {
        return;
    }

    let winner = match session.outcome() {
        Some(outcome) => {
            info!("Battle ended! {} wins!", outcome.winner().name());
            Some(outcome.winner())
        }
        None if session.match_time().as_secs_f32() >= headless_state.max_duration => {
            info!(
                "Battle timed out after {:.1}s - no winner",
                session.match_time().as_secs_f32()
            );
            session.abort();
            None
        }
        None => return,
    };

    let result = BattleResult {
        winner,
        match_time: session.match_time().as_secs_f32(),
        player_health: session.player().health(),
        boss_health: session.boss().health(),
        stats: *session.stats(),
        random_seed: session.rng_seed(),
    };
    save_battle_report(&session, &result, headless_state.output_path.as_deref());
    headless_state.result = Some(result);
    headless_state.battle_complete = true;
}

/// Write the report to `output_path` (default `battle_report.json`)
fn save_battle_report(session: &BattleSession, result: &BattleResult, output_path: Option<&str>) {
    let path = Path::new(output_path.unwrap_or("battle_report.json"));
    let report = BattleReport {
        mode: session.mode().name(),
        difficulty: *session.difficulty(),
        result,
        log: &session.log().entries,
    };
    let written = serde_json::to_string_pretty(&report)
        .map_err(|e| e.to_string())
        .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
    match written {
        Ok(()) => println!("Battle complete. Report saved to: {}", path.display()),
        Err(e) => eprintln!("Failed to save battle report: {}", e),
    }
}

/// Build the headless app without running it
pub fn build_headless_app(config: HeadlessBattleConfig, tuning: BattleTuning) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(SIM_TICK))
        .add_plugins(HeadlessPlugin { config, tuning });
    app
}

/// Run a headless battle with the given configuration
pub fn run_headless_battle(
    config: HeadlessBattleConfig,
    tuning: BattleTuning,
) -> Result<BattleResult, String> {
    config.validate()?;

    println!("Starting headless battle simulation...");
    println!("  Mode: {}", config.mode);
    println!("  Autopilot: {:?}", config.autopilot);
    println!("  Max duration: {:.0}s", config.max_duration_secs);

    let mut app = build_headless_app(config, tuning);
    app.finish();
    app.cleanup();

    loop {
        app.update();
        let state = app.world().resource::<HeadlessBattleState>();
        if state.battle_complete {
            return state
                .result
                .clone()
                .ok_or_else(|| "Battle ended without a result".to_string());
        }
    }
}
