//! Battle HUD
//!
//! Health bars, recent battle log lines and the outcome banner. The HUD only
//! reads the session; the single write path out of it is the Upgrade Store
//! point awarded on a win.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use super::outcome_title;
use crate::combat::log::BattleLog;
use crate::combat::{BattleEvent, BattleOutcome, BattleSession};
use crate::states::GameState;
use crate::upgrades::UpgradeStore;

/// Seconds the outcome banner stays up before returning to the hub
const BANNER_SECONDS: f32 = 3.0;

/// Log lines shown under the health bars
const RECENT_LOG_LINES: usize = 6;

/// Shown once a session reaches an outcome
#[derive(Resource, Debug)]
pub struct OutcomeBanner {
    pub outcome: BattleOutcome,
    pub timer: Timer,
}

impl OutcomeBanner {
    pub fn new(outcome: BattleOutcome) -> Self {
        Self {
            outcome,
            timer: Timer::from_seconds(BANNER_SECONDS, TimerMode::Once),
        }
    }
}

/// Award the upgrade point and raise the banner
pub fn handle_battle_outcome(
    mut events: EventReader<BattleEvent>,
    mut store: ResMut<UpgradeStore>,
    mut commands: Commands,
) {
    for event in events.read() {
        if let BattleEvent::Outcome(outcome) = event {
            if *outcome == BattleOutcome::PlayerWon {
                store.award_win();
            }
            commands.insert_resource(OutcomeBanner::new(*outcome));
        }
    }
}

pub fn update_outcome_banner(
    time: Res<Time>,
    banner: Option<ResMut<OutcomeBanner>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let Some(mut banner) = banner else {
        return;
    };
    if banner.timer.tick(time.delta()).just_finished() {
        info!("Outcome banner finished - returning to hub");
        next_state.set(GameState::Hub);
    }
}

fn health_color(fraction: f32) -> egui::Color32 {
    if fraction > 0.5 {
        egui::Color32::from_rgb(0, 200, 0)
    } else if fraction > 0.25 {
        egui::Color32::from_rgb(255, 200, 0)
    } else {
        egui::Color32::from_rgb(200, 0, 0)
    }
}

fn health_bar(ui: &mut egui::Ui, label: &str, health: i32, max_health: i32) {
    let fraction = health as f32 / max_health.max(1) as f32;
    ui.vertical(|ui| {
        ui.label(
            egui::RichText::new(format!("{}  {}/{}", label, health, max_health))
                .size(18.0)
                .color(egui::Color32::from_rgb(230, 217, 191)),
        );
        ui.add(
            egui::ProgressBar::new(fraction)
                .desired_width(260.0)
                .fill(health_color(fraction)),
        );
    });
}

pub fn render_battle_hud(
    mut contexts: EguiContexts,
    session: Res<BattleSession>,
    banner: Option<Res<OutcomeBanner>>,
) {
    // Use try_ctx_mut to gracefully handle window close
    let Some(ctx) = contexts.try_ctx_mut() else { return; };

    egui::TopBottomPanel::top("battle_health")
        .frame(egui::Frame::none().fill(egui::Color32::from_rgba_unmultiplied(20, 20, 30, 200)))
        .show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.add_space(16.0);
                let player = session.player();
                health_bar(ui, "PLAYER", player.health(), player.max_health());
                ui.add_space(40.0);
                let boss = session.boss();
                health_bar(ui, "BOSS", boss.health(), boss.max_health());
                ui.add_space(40.0);
                ui.label(
                    egui::RichText::new(format!(
                        "{}  {:.1}s",
                        session.mode().name().to_uppercase(),
                        session.match_time().as_secs_f32()
                    ))
                    .size(16.0)
                    .color(egui::Color32::from_rgb(153, 140, 128)),
                );
            });
            ui.add_space(8.0);
        });

    egui::Area::new(egui::Id::new("battle_log"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(16.0, -16.0))
        .show(ctx, |ui| {
            for entry in session.log().recent(RECENT_LOG_LINES) {
                ui.label(
                    egui::RichText::new(BattleLog::format_entry(entry))
                        .monospace()
                        .size(13.0)
                        .color(egui::Color32::from_rgb(200, 200, 200)),
                );
            }
        });

    let Some(banner) = banner else {
        return;
    };
    let color = match banner.outcome {
        BattleOutcome::PlayerWon => egui::Color32::from_rgb(100, 220, 120),
        BattleOutcome::BossWon => egui::Color32::from_rgb(255, 100, 100),
    };
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("outcome_banner"),
    ));
    let center = ctx.screen_rect().center();
    painter.text(
        egui::pos2(center.x, center.y - 40.0),
        egui::Align2::CENTER_CENTER,
        outcome_title(banner.outcome),
        egui::FontId::proportional(96.0),
        color,
    );
    painter.text(
        egui::pos2(center.x, center.y + 40.0),
        egui::Align2::CENTER_CENTER,
        format!("Back to the hub in {:.0}s", banner.timer.remaining_secs().ceil()),
        egui::FontId::proportional(22.0),
        egui::Color32::from_rgb(200, 200, 200),
    );
}
