//! DuelArena - Boss Duel Prototype
//!
//! Graphical by default; `--headless <config.json>` runs one battle with an
//! autopilot and exits.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use duelarena::cli;
use duelarena::headless::{run_headless_battle, HeadlessBattleConfig};
use duelarena::settings::{GameSettings, SettingsPlugin};
use duelarena::states::play_battle::BattlePlugin;
use duelarena::states::{GameState, StatesPlugin};

fn main() {
    let args = cli::parse_args();

    if let Some(config_path) = args.headless {
        let mut config = match HeadlessBattleConfig::load_from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
        // CLI flags win over the JSON file
        if let Some(output) = args.output {
            config.output_path = Some(output.to_string_lossy().into_owned());
        }
        if let Some(max_duration) = args.max_duration {
            config.max_duration_secs = max_duration;
        }
        if let Some(seed) = args.seed {
            config.random_seed = Some(seed);
        }

        let tuning = GameSettings::load().tuning;
        match run_headless_battle(config, tuning) {
            Ok(result) => {
                let winner = result
                    .winner
                    .map(|side| side.name())
                    .unwrap_or("nobody (timeout)");
                println!(
                    "Winner: {} after {:.1}s (player {} / boss {})",
                    winner, result.match_time, result.player_health, result.boss_health
                );
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "DuelArena".to_string(),
                resolution: (1280.0, 720.0).into(),
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        // SettingsPlugin first: BattlePlugin reads the tuning it loads
        .add_plugins((EguiPlugin, SettingsPlugin, StatesPlugin, BattlePlugin))
        .init_state::<GameState>()
        .run();
}
