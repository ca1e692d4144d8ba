use eframe::egui::Color32;
use swarm_console::projection::Tint;
use swarm_console::NoticeLevel;

pub const PANEL_FILL: Color32 = Color32::from_rgb(24, 26, 31);
pub const CANVAS_FILL: Color32 = Color32::from_rgb(17, 19, 23);
pub const EDGE_STROKE: Color32 = Color32::from_rgb(96, 104, 120);
pub const NODE_FILL: Color32 = Color32::from_rgb(58, 74, 102);
pub const NODE_SELECTED_FILL: Color32 = Color32::from_rgb(238, 190, 72);
pub const NODE_ACTIVE_RING: Color32 = Color32::from_rgb(90, 220, 140);
pub const NODE_IDLE_RING: Color32 = Color32::from_rgb(80, 86, 98);
pub const MUTED_TEXT: Color32 = Color32::from_rgb(150, 156, 168);
pub const INTERDICTION_FILL: Color32 = Color32::from_rgba_premultiplied(60, 0, 0, 225);
pub const INTERDICTION_TEXT: Color32 = Color32::from_rgb(255, 96, 96);

pub fn color_of(tint: Tint) -> Color32 {
    Color32::from_rgb(channel(tint.r), channel(tint.g), channel(tint.b))
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub fn notice_color(level: NoticeLevel) -> Color32 {
    match level {
        NoticeLevel::Info => Color32::from_rgb(120, 180, 240),
        NoticeLevel::Warning => Color32::from_rgb(240, 190, 70),
        NoticeLevel::Error => Color32::from_rgb(240, 90, 90),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tint_channels_are_clamped_and_rounded() {
        assert_eq!(color_of(Tint::rgb(1.0, 0.5, 0.0)), Color32::from_rgb(255, 128, 0));
        assert_eq!(color_of(Tint::rgb(2.0, -1.0, 0.2)), Color32::from_rgb(255, 0, 51));
    }
}
