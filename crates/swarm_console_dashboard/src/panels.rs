use eframe::egui::{self, RichText};
use swarm_console::view::{
    budget_gauge, severity_tint, status_tint, success_rate_label, task_board, vital_fraction,
    Connectivity,
};
use swarm_console::{Agent, GuardrailEntry, NodeDetail, Notice, Quest, SystemState, Territory};

use crate::theme;

const ROSTER_BAR_WIDTH: f32 = 140.0;
const TASK_CARD_WIDTH: f32 = 150.0;

pub fn status_bar(ui: &mut egui::Ui, state: Option<&SystemState>, connectivity: Connectivity) {
    ui.horizontal(|ui| {
        ui.heading("Swarm Console");
        ui.separator();
        match state {
            Some(state) => {
                ui.label("status:");
                ui.colored_label(
                    theme::color_of(status_tint(&state.status)),
                    RichText::new(state.status.as_str()).strong(),
                );
                ui.separator();
                let gauge = budget_gauge(&state.budget);
                let mut bar = egui::ProgressBar::new(gauge.fraction)
                    .desired_width(180.0)
                    .text(gauge.label);
                if gauge.over_budget {
                    bar = bar.fill(theme::notice_color(swarm_console::NoticeLevel::Error));
                }
                ui.label("budget:");
                ui.add(bar);
            }
            None => {
                ui.colored_label(theme::MUTED_TEXT, "waiting for first poll");
            }
        }
        ui.separator();
        let color = match connectivity {
            Connectivity::Live => theme::NODE_ACTIVE_RING,
            Connectivity::Fallback => theme::notice_color(swarm_console::NoticeLevel::Warning),
            Connectivity::Connecting => theme::MUTED_TEXT,
        };
        ui.colored_label(color, connectivity.label());
    });
}

pub fn party_roster(ui: &mut egui::Ui, party: &[Agent]) {
    ui.heading("Party");
    if party.is_empty() {
        ui.colored_label(theme::MUTED_TEXT, "no agents reported");
        return;
    }
    for agent in party {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.strong(display_name(agent));
                ui.colored_label(
                    theme::MUTED_TEXT,
                    format!("Lv{} {}", agent.level, agent.class.role().label()),
                );
            });
            ui.add(
                egui::ProgressBar::new(vital_fraction(agent.vitals.hp))
                    .desired_width(ROSTER_BAR_WIDTH)
                    .text(format!("HP {:.0}", agent.vitals.hp)),
            );
            ui.add(
                egui::ProgressBar::new(vital_fraction(agent.vitals.mana))
                    .desired_width(ROSTER_BAR_WIDTH)
                    .text(format!("MP {:.0}", agent.vitals.mana)),
            );
            ui.label(format!(
                "success {}",
                success_rate_label(agent.vitals.success_rate)
            ));
            let action = if agent.current_action.trim().is_empty() {
                "Idle"
            } else {
                agent.current_action.as_str()
            };
            ui.colored_label(theme::MUTED_TEXT, action);
        });
    }
}

fn display_name(agent: &Agent) -> &str {
    if agent.name.trim().is_empty() {
        agent.id.as_str()
    } else {
        agent.name.as_str()
    }
}

pub fn task_board_panel(ui: &mut egui::Ui, quests: &[Quest]) {
    ui.heading("Tasks");
    egui::ScrollArea::horizontal()
        .id_salt("task-board")
        .show(ui, |ui| {
            ui.horizontal_top(|ui| {
                for (column, cards) in task_board(quests) {
                    ui.vertical(|ui| {
                        ui.set_width(TASK_CARD_WIDTH);
                        ui.strong(format!("{} ({})", column.title(), cards.len()));
                        for quest in cards {
                            egui::Frame::group(ui.style()).show(ui, |ui| {
                                ui.set_width(TASK_CARD_WIDTH - 12.0);
                                ui.label(&quest.title);
                                ui.colored_label(theme::MUTED_TEXT, &quest.id);
                            });
                        }
                    });
                }
            });
        });
}

pub fn guardrail_log(ui: &mut egui::Ui, entries: &[GuardrailEntry]) {
    ui.heading("Guardrails");
    if entries.is_empty() {
        ui.colored_label(theme::MUTED_TEXT, "nothing blocked");
        return;
    }
    egui::ScrollArea::vertical()
        .id_salt("guardrail-log")
        .max_height(180.0)
        .show(ui, |ui| {
            for entry in entries {
                ui.horizontal_wrapped(|ui| {
                    ui.colored_label(
                        theme::color_of(severity_tint(&entry.severity)),
                        RichText::new(entry.severity.as_str()).strong(),
                    );
                    ui.colored_label(theme::MUTED_TEXT, &entry.timestamp);
                    ui.monospace(&entry.blocked_command);
                });
                if !entry.reason.is_empty() {
                    ui.label(&entry.reason);
                }
                ui.separator();
            }
        });
}

pub fn node_detail(ui: &mut egui::Ui, detail: Option<&NodeDetail>) {
    ui.heading("Node");
    let Some(detail) = detail else {
        ui.colored_label(theme::MUTED_TEXT, "select a node in the graph");
        return;
    };
    ui.strong(&detail.label);
    ui.label(format!("id: {}", detail.id));
    ui.label(format!("type: {}", detail.kind));
    if detail.active {
        ui.colored_label(theme::NODE_ACTIVE_RING, "active");
    }
    if detail.triples.is_empty() {
        return;
    }
    ui.separator();
    egui::Grid::new("node-triples")
        .striped(true)
        .num_columns(3)
        .show(ui, |ui| {
            for triple in &detail.triples {
                ui.label(&triple.subject);
                ui.colored_label(theme::MUTED_TEXT, &triple.predicate);
                ui.label(&triple.object);
                ui.end_row();
            }
        });
}

/// Operator input for the mission form; kept across frames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissionForm {
    pub agent_id: String,
    pub territory_id: String,
    pub task: String,
}

impl MissionForm {
    pub fn draft(&self) -> swarm_console::MissionDraft {
        swarm_console::MissionDraft::new(
            self.agent_id.clone(),
            self.territory_id.clone(),
            self.task.clone(),
        )
    }

    /// Drops selections that no longer exist after a state replacement.
    pub fn retain_known(&mut self, party: &[Agent], territories: &[Territory]) {
        if !party.iter().any(|agent| agent.id == self.agent_id) {
            self.agent_id.clear();
        }
        if !territories
            .iter()
            .any(|territory| territory.id == self.territory_id)
        {
            self.territory_id.clear();
        }
    }
}

/// Returns true when the operator pressed "Assign".
pub fn mission_form(
    ui: &mut egui::Ui,
    form: &mut MissionForm,
    party: &[Agent],
    territories: &[Territory],
) -> bool {
    ui.heading("Assign mission");
    egui::Grid::new("mission-form")
        .num_columns(2)
        .show(ui, |ui| {
            ui.label("agent");
            let selected = party
                .iter()
                .find(|agent| agent.id == form.agent_id)
                .map(display_name)
                .unwrap_or("choose");
            egui::ComboBox::from_id_salt("mission-agent")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for agent in party {
                        ui.selectable_value(
                            &mut form.agent_id,
                            agent.id.clone(),
                            display_name(agent),
                        );
                    }
                });
            ui.end_row();

            ui.label("territory");
            let selected = territories
                .iter()
                .find(|territory| territory.id == form.territory_id)
                .map(|territory| territory.name.as_str())
                .unwrap_or("choose");
            egui::ComboBox::from_id_salt("mission-territory")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for territory in territories {
                        ui.selectable_value(
                            &mut form.territory_id,
                            territory.id.clone(),
                            &territory.name,
                        );
                    }
                });
            ui.end_row();

            ui.label("task");
            ui.text_edit_singleline(&mut form.task);
            ui.end_row();
        });
    ui.button("Assign").clicked()
}

/// Returns true when the kill switch was pressed while it was armed.
pub fn kill_switch(ui: &mut egui::Ui, armed: bool) -> bool {
    let button = egui::Button::new(
        RichText::new("HALT ALL AGENTS")
            .strong()
            .color(egui::Color32::WHITE),
    )
    .fill(theme::INTERDICTION_TEXT);
    ui.add_enabled(armed, button).clicked()
}

pub fn toasts(ctx: &egui::Context, notices: &[&Notice]) {
    if notices.is_empty() {
        return;
    }
    egui::Area::new(egui::Id::new("swarm-console-toasts"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -12.0))
        .order(egui::Order::Tooltip)
        .show(ctx, |ui| {
            for notice in notices {
                egui::Frame::NONE
                    .fill(theme::PANEL_FILL)
                    .stroke(egui::Stroke::new(1.0, theme::notice_color(notice.level)))
                    .inner_margin(egui::Margin::same(8))
                    .show(ui, |ui| {
                        ui.colored_label(theme::notice_color(notice.level), &notice.message);
                    });
                ui.add_space(4.0);
            }
        });
}

/// Full-screen layer that swallows pointer input while the system is halted.
pub fn interdiction_overlay(ctx: &egui::Context) {
    let screen = ctx.screen_rect();
    egui::Area::new(egui::Id::new("swarm-console-interdiction"))
        .order(egui::Order::Foreground)
        .fixed_pos(screen.min)
        .show(ctx, |ui| {
            let (rect, _blocked) = ui.allocate_exact_size(screen.size(), egui::Sense::click_and_drag());
            ui.painter().rect_filled(rect, 0.0, theme::INTERDICTION_FILL);
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "SYSTEM HALTED",
                egui::FontId::proportional(48.0),
                theme::INTERDICTION_TEXT,
            );
            ui.painter().text(
                rect.center() + egui::vec2(0.0, 44.0),
                egui::Align2::CENTER_CENTER,
                "All agent activity is interdicted. Waiting for the backend to resume.",
                egui::FontId::proportional(16.0),
                egui::Color32::WHITE,
            );
        });
}

/// HALTED takes precedence over every interactive surface.
pub fn interdiction_active(state: Option<&SystemState>) -> bool {
    state.is_some_and(SystemState::is_halted)
}
