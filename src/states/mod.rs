//! Game state management
//!
//! Two screens: the hub (upgrades and mode selection) and the battle.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

pub mod play_battle;

use crate::combat::BattleMode;
use crate::keybindings::{GameAction, Keybindings};
use crate::upgrades::{UpgradeKind, UpgradeStore, MAX_UPGRADE_LEVEL};

/// The core game states representing the main screens of the game.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Hub - buy upgrades, pick a battle
    #[default]
    Hub,
    /// Active battle
    Battle,
}

/// Mode the hub will start on the next transition to `Battle`
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PendingBattle {
    pub mode: BattleMode,
}

/// Plugin for managing game states and the hub screen
pub struct StatesPlugin;

impl Plugin for StatesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingBattle>()
            .init_resource::<UpgradeStore>()
            .add_systems(Update, hub_ui.run_if(in_state(GameState::Hub)))
            .add_systems(OnEnter(GameState::Hub), setup_hub)
            .add_systems(OnExit(GameState::Hub), cleanup_hub);
    }
}

/// Marker component for hub entities
#[derive(Component)]
pub struct HubEntity;

fn setup_hub(mut commands: Commands) {
    info!("Entering Hub state");
    // egui needs a camera to draw into
    commands.spawn((Camera2d, HubEntity));
}

fn cleanup_hub(mut commands: Commands, query: Query<Entity, With<HubEntity>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

fn menu_button(ui: &mut egui::Ui, text: &str) -> bool {
    ui.add_sized(
        egui::vec2(280.0, 60.0),
        egui::Button::new(
            egui::RichText::new(text)
                .size(28.0)
                .color(egui::Color32::from_rgb(230, 217, 191)),
        ),
    )
    .clicked()
}

fn hub_ui(
    mut contexts: EguiContexts,
    mut store: ResMut<UpgradeStore>,
    mut pending: ResMut<PendingBattle>,
    keyboard: Res<ButtonInput<KeyCode>>,
    keybindings: Res<Keybindings>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit_events: EventWriter<AppExit>,
) {
    if keybindings.action_just_pressed(GameAction::Confirm, &keyboard) {
        info!("Confirm pressed - starting {} battle", pending.mode);
        next_state.set(GameState::Battle);
        return;
    }

    let Some(ctx) = contexts.try_ctx_mut() else { return; };

    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(egui::Color32::from_rgb(20, 20, 30)))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(80.0);
                ui.heading(
                    egui::RichText::new("DUEL ARENA")
                        .size(72.0)
                        .color(egui::Color32::from_rgb(230, 204, 153)),
                );
                ui.add_space(10.0);
                ui.label(
                    egui::RichText::new(format!("Upgrade points: {}", store.points()))
                        .size(24.0)
                        .color(egui::Color32::from_rgb(153, 140, 128)),
                );
                ui.add_space(30.0);

                for kind in UpgradeKind::ALL {
                    let level = store.level(kind);
                    let label = match store.next_level(kind) {
                        Some(next) => format!(
                            "{} {}/{}  (cost {})",
                            kind.name(),
                            level,
                            MAX_UPGRADE_LEVEL,
                            kind.cost(next)
                        ),
                        None => format!("{} MAX", kind.name()),
                    };
                    ui.horizontal(|ui| {
                        ui.add_space((ui.available_width() / 2.0 - 240.0).max(0.0));
                        if ui
                            .add_enabled(store.can_afford(kind), egui::Button::new(label))
                            .on_hover_text(kind.description())
                            .clicked()
                        {
                            if let Err(e) = store.purchase(kind) {
                                warn!("Upgrade purchase failed: {}", e);
                            }
                        }
                    });
                }

                let difficulty = store.difficulty();
                ui.add_space(10.0);
                ui.label(
                    egui::RichText::new(format!(
                        "Fire cooldown {}ms · boss fires every {}ms · boss moves every {}ms",
                        difficulty.player_fire_cooldown_ms,
                        difficulty.boss_fire_interval_ms,
                        difficulty.boss_move_interval_ms
                    ))
                    .size(14.0)
                    .color(egui::Color32::from_rgb(153, 140, 128)),
                );

                ui.add_space(40.0);
                if menu_button(ui, "BOSS ROUND") {
                    pending.mode = BattleMode::Boss;
                    info!("Boss round selected - transitioning to Battle");
                    next_state.set(GameState::Battle);
                }
                ui.add_space(10.0);
                if menu_button(ui, "TRAINING") {
                    pending.mode = BattleMode::Training;
                    info!("Training selected - transitioning to Battle");
                    next_state.set(GameState::Battle);
                }
                ui.add_space(10.0);
                if menu_button(ui, "EXIT") {
                    info!("Exit button pressed - quitting application");
                    exit_events.send(AppExit::Success);
                }

                ui.add_space(30.0);
                ui.label(
                    egui::RichText::new(format!(
                        "Move {} / {} / {} / {}   Fire {}   Jump {}   Leave {}",
                        keybindings.binding_display(GameAction::MoveForward),
                        keybindings.binding_display(GameAction::MoveLeft),
                        keybindings.binding_display(GameAction::MoveBack),
                        keybindings.binding_display(GameAction::MoveRight),
                        keybindings.binding_display(GameAction::Fire),
                        keybindings.binding_display(GameAction::Jump),
                        keybindings.binding_display(GameAction::Back),
                    ))
                    .size(14.0)
                    .color(egui::Color32::from_rgb(102, 102, 102)),
                );
            });
        });
}
