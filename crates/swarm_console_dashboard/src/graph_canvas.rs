use eframe::egui::{self, Align2, FontId, Pos2, Sense, Stroke};
use swarm_console::graph::{GraphPoint, NODE_RADIUS};
use swarm_console::{GraphData, GraphScene, NodeDetail, ViewportSize};

use crate::theme;

const LABEL_FONT_SIZE: f32 = 12.0;
const EDGE_LABEL_FONT_SIZE: f32 = 10.0;
const SCROLL_ZOOM_STEP: f32 = 24.0;

/// Knowledge-graph view. The scene is rebuilt whenever the cached graph
/// revision moves, using the canvas size of the frame that notices it.
#[derive(Default)]
pub struct GraphCanvas {
    scene: GraphScene,
    rendered_revision: Option<u64>,
    viewport: Option<ViewportSize>,
    scroll_accumulator: f32,
}

impl GraphCanvas {
    pub fn selected_detail(&self) -> Option<NodeDetail> {
        self.scene.selected_detail()
    }

    pub fn clear_selection(&mut self) {
        self.scene.clear_selection();
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        graph: Option<&GraphData>,
        revision: u64,
        interactive: bool,
    ) {
        ui.horizontal(|ui| {
            if ui.add_enabled(interactive, egui::Button::new("+")).clicked() {
                self.scene.zoom_in();
            }
            if ui.add_enabled(interactive, egui::Button::new("-")).clicked() {
                self.scene.zoom_out();
            }
            if ui.add_enabled(interactive, egui::Button::new("Fit")).clicked() {
                if let Some(viewport) = self.viewport {
                    self.scene.fit(viewport);
                }
            }
            ui.separator();
            ui.label(format!("zoom {:.2}x", self.scene.camera().zoom()));
            if self.scene.dropped_edges() > 0 {
                ui.colored_label(
                    theme::MUTED_TEXT,
                    format!("{} dangling edge(s) hidden", self.scene.dropped_edges()),
                );
            }
        });

        let (response, painter) =
            ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;
        let viewport = ViewportSize::new(rect.width(), rect.height());
        self.viewport = Some(viewport);

        if let Some(graph) = graph {
            if self.rendered_revision != Some(revision) {
                self.scene.render(graph, viewport);
                self.rendered_revision = Some(revision);
            }
        }

        if interactive {
            self.handle_input(ui, &response, viewport);
        }

        painter.rect_filled(rect, 0.0, theme::CANVAS_FILL);
        let to_screen = |point: GraphPoint| {
            let local = self.scene.camera().world_to_screen(point, viewport);
            Pos2::new(rect.min.x + local.x, rect.min.y + local.y)
        };
        let zoom = self.scene.camera().zoom();

        let nodes = self.scene.nodes();
        for edge in self.scene.edges() {
            let from = to_screen(nodes[edge.source].position);
            let to = to_screen(nodes[edge.target].position);
            painter.line_segment([from, to], Stroke::new(1.5, theme::EDGE_STROKE));
            if let Some(label) = &edge.label {
                painter.text(
                    Pos2::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0),
                    Align2::CENTER_CENTER,
                    label,
                    FontId::proportional(EDGE_LABEL_FONT_SIZE),
                    theme::MUTED_TEXT,
                );
            }
        }

        let radius = NODE_RADIUS * zoom;
        for node in nodes {
            let center = to_screen(node.position);
            let emphasis = self.scene.emphasis(&node.id);
            let fill = if emphasis.selected {
                theme::NODE_SELECTED_FILL
            } else {
                theme::NODE_FILL
            };
            let ring = if emphasis.active {
                Stroke::new(3.0, theme::NODE_ACTIVE_RING)
            } else {
                Stroke::new(1.0, theme::NODE_IDLE_RING)
            };
            painter.circle(center, radius, fill, ring);
            painter.text(
                Pos2::new(center.x, center.y + radius + 4.0),
                Align2::CENTER_TOP,
                &node.label,
                FontId::proportional(LABEL_FONT_SIZE),
                egui::Color32::WHITE,
            );
        }
    }

    fn handle_input(&mut self, ui: &egui::Ui, response: &egui::Response, viewport: ViewportSize) {
        let rect = response.rect;
        if response.clicked() {
            if let Some(pointer) = response.interact_pointer_pos() {
                let local = GraphPoint::new(pointer.x - rect.min.x, pointer.y - rect.min.y);
                self.scene.tap(local, viewport);
            }
        }

        if response.dragged() {
            let delta = response.drag_delta();
            self.scene
                .camera_mut()
                .pan(GraphPoint::new(delta.x, delta.y));
        }

        if response.hovered() {
            self.scroll_accumulator += ui.input(|input| input.smooth_scroll_delta.y);
            while self.scroll_accumulator >= SCROLL_ZOOM_STEP {
                self.scene.zoom_in();
                self.scroll_accumulator -= SCROLL_ZOOM_STEP;
            }
            while self.scroll_accumulator <= -SCROLL_ZOOM_STEP {
                self.scene.zoom_out();
                self.scroll_accumulator += SCROLL_ZOOM_STEP;
            }
        }
    }
}
