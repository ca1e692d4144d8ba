use std::time::{Duration, Instant};

use eframe::egui;
use swarm_console::view::Connectivity;
use swarm_console::{Dispatch, LiveSync};
use tracing::info;

use crate::graph_canvas::GraphCanvas;
use crate::panels::{self, MissionForm};
use crate::theme;

const REPAINT_INTERVAL: Duration = Duration::from_millis(250);
const SIDE_PANEL_WIDTH: f32 = 260.0;

pub struct DashboardApp {
    sync: LiveSync,
    graph: GraphCanvas,
    mission: MissionForm,
    seen_state_revision: u64,
}

impl DashboardApp {
    pub fn new(sync: LiveSync) -> Self {
        Self {
            sync,
            graph: GraphCanvas::default(),
            mission: MissionForm::default(),
            seen_state_revision: 0,
        }
    }

    fn pump(&mut self) {
        let now = Instant::now();
        self.sync.tick(now);
        self.sync.drain();
        self.sync.expire_notices(now);

        if self.sync.state_revision() != self.seen_state_revision {
            self.seen_state_revision = self.sync.state_revision();
            if let Some(state) = self.sync.system_state() {
                self.mission.retain_known(&state.party, &state.territories);
            }
        }
    }

    fn halt(&mut self) {
        if self.sync.request_halt() == Dispatch::Sent {
            info!("operator pressed the kill switch");
            self.graph.clear_selection();
        }
    }

    fn assign_mission(&mut self) {
        if let Ok(Dispatch::Sent) = self.sync.request_mission(self.mission.draft()) {
            self.mission.task.clear();
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.pump();

        let halted = panels::interdiction_active(self.sync.system_state());
        let connectivity = Connectivity::from_cache(self.sync.cache());

        egui::TopBottomPanel::top("status-bar").show(ctx, |ui| {
            panels::status_bar(ui, self.sync.system_state(), connectivity);
        });

        let mut halt_pressed = false;
        let mut assign_pressed = false;

        egui::SidePanel::left("party-panel")
            .default_width(SIDE_PANEL_WIDTH)
            .show(ctx, |ui| {
                ui.add_enabled_ui(!halted, |ui| {
                    halt_pressed = panels::kill_switch(ui, !halted);
                    ui.separator();
                    egui::ScrollArea::vertical()
                        .id_salt("party-scroll")
                        .show(ui, |ui| {
                            let party = self
                                .sync
                                .system_state()
                                .map(|state| state.party.as_slice())
                                .unwrap_or_default();
                            panels::party_roster(ui, party);
                        });
                });
            });

        egui::SidePanel::right("detail-panel")
            .default_width(SIDE_PANEL_WIDTH)
            .show(ctx, |ui| {
                ui.add_enabled_ui(!halted, |ui| {
                    let detail = self.graph.selected_detail();
                    panels::node_detail(ui, detail.as_ref());
                    ui.separator();
                    if let Some(state) = self.sync.system_state() {
                        assign_pressed = panels::mission_form(
                            ui,
                            &mut self.mission,
                            &state.party,
                            &state.territories,
                        );
                        ui.separator();
                        panels::guardrail_log(ui, &state.guardrail_log);
                    }
                });
            });

        egui::TopBottomPanel::bottom("task-panel")
            .resizable(true)
            .default_height(200.0)
            .show(ctx, |ui| {
                ui.add_enabled_ui(!halted, |ui| {
                    let quests = self
                        .sync
                        .system_state()
                        .map(|state| state.quests.as_slice())
                        .unwrap_or_default();
                    panels::task_board_panel(ui, quests);
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(theme::CANVAS_FILL))
            .show(ctx, |ui| {
                let revision = self.sync.graph_revision();
                self.graph
                    .show(ui, self.sync.graph(), revision, !halted);
            });

        if halt_pressed {
            self.halt();
        }
        if assign_pressed && !halted {
            self.assign_mission();
        }

        let notices: Vec<_> = self.sync.notices().collect();
        panels::toasts(ctx, &notices);

        if panels::interdiction_active(self.sync.system_state()) {
            panels::interdiction_overlay(ctx);
        }

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}
