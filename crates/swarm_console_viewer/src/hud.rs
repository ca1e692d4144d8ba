use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use swarm_console::projection::Tint;
use swarm_console::view::{budget_gauge, status_tint, Connectivity};
use swarm_console::SystemStatus;

use super::projection_scene::{AgentMarker, BuildingMarker};
use super::state_poll::ViewerState;

pub(super) const HUD_PANEL_WIDTH: f32 = 260.0;

fn color_of(tint: Tint) -> egui::Color32 {
    egui::Color32::from_rgb(
        (tint.r.clamp(0.0, 1.0) * 255.0).round() as u8,
        (tint.g.clamp(0.0, 1.0) * 255.0).round() as u8,
        (tint.b.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

pub(super) fn render_hud(
    mut contexts: EguiContexts,
    state: Res<ViewerState>,
    buildings: Query<&BuildingMarker>,
    agents: Query<&AgentMarker>,
) {
    let Ok(context) = contexts.ctx_mut() else {
        return;
    };

    if state
        .system_state()
        .is_some_and(|system| system.status == SystemStatus::Halted)
    {
        egui::TopBottomPanel::top("swarm-viewer-halted").show(context, |ui| {
            ui.vertical_centered(|ui| {
                ui.colored_label(
                    color_of(status_tint(&SystemStatus::Halted)),
                    egui::RichText::new("SYSTEM HALTED").heading().strong(),
                );
            });
        });
    }

    egui::SidePanel::left("swarm-viewer-hud")
        .resizable(false)
        .exact_width(HUD_PANEL_WIDTH)
        .show(context, |ui| {
            ui.heading("Swarm Map");
            ui.label(format!("link: {}", state.connectivity().label()));

            let Some(system) = state.system_state() else {
                ui.label("waiting for first poll");
                return;
            };

            ui.horizontal(|ui| {
                ui.label("status:");
                ui.colored_label(
                    color_of(status_tint(&system.status)),
                    egui::RichText::new(system.status.as_str()).strong(),
                );
            });
            let gauge = budget_gauge(&system.budget);
            ui.add(egui::ProgressBar::new(gauge.fraction).text(gauge.label));

            ui.separator();
            let mut territories: Vec<&str> = buildings
                .iter()
                .map(|building| building.territory_id.as_str())
                .collect();
            territories.sort_unstable();
            ui.label(format!(
                "{} territories, {} agents on map",
                territories.len(),
                agents.iter().count()
            ));
            for territory_id in territories {
                let mut members: Vec<&str> = agents
                    .iter()
                    .filter(|agent| agent.territory_id == territory_id)
                    .map(|agent| agent.agent_id.as_str())
                    .collect();
                members.sort_unstable();
                ui.small(format!("{territory_id}: {}", members.join(", ")));
            }
        });
}

#[derive(Resource, Default)]
pub(super) struct HeadlessStatus {
    last_connectivity: Option<Connectivity>,
    last_status: Option<SystemStatus>,
}

pub(super) fn headless_report(mut status: ResMut<HeadlessStatus>, state: Res<ViewerState>) {
    let connectivity = state.connectivity();
    if status.last_connectivity != Some(connectivity) {
        eprintln!("viewer link: {}", connectivity.label());
        status.last_connectivity = Some(connectivity);
    }

    let current = state.system_state().map(|system| system.status.clone());
    if current.is_some() && status.last_status != current {
        if let Some(system) = state.system_state() {
            eprintln!(
                "viewer status: {} ({} agents, {} territories)",
                system.status,
                system.party.len(),
                system.territories.len()
            );
        }
        status.last_status = current;
    }
}
