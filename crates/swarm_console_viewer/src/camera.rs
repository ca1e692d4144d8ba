use bevy::ecs::message::MessageReader;
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use super::hud::HUD_PANEL_WIDTH;

const ORBIT_ROTATE_SENSITIVITY: f32 = 0.005;
const ORBIT_PAN_SENSITIVITY: f32 = 0.002;
const ORBIT_ZOOM_SENSITIVITY: f32 = 0.1;
const ORBIT_MIN_RADIUS: f32 = 4.0;
const ORBIT_MAX_RADIUS: f32 = 120.0;
const ORBIT_PITCH_LIMIT: f32 = 1.54;

#[derive(Component)]
pub(super) struct ViewerCamera;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub(super) struct OrbitCamera {
    pub focus: Vec3,
    pub radius: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl OrbitCamera {
    pub(super) fn from_transform(transform: &Transform, focus: Vec3) -> Self {
        let offset = transform.translation - focus;
        let radius = offset.length().max(0.1);
        let yaw = offset.x.atan2(offset.z);
        let pitch = offset.y.atan2((offset.x * offset.x + offset.z * offset.z).sqrt());
        Self {
            focus,
            radius,
            yaw,
            pitch,
        }
    }

    pub(super) fn apply_to_transform(&self, transform: &mut Transform) {
        let rotation = Quat::from_axis_angle(Vec3::Y, self.yaw)
            * Quat::from_axis_angle(Vec3::X, -self.pitch);
        let offset = rotation * Vec3::new(0.0, 0.0, self.radius);
        transform.translation = self.focus + offset;
        transform.look_at(self.focus, Vec3::Y);
    }

    fn rotate(&mut self, delta: Vec2) {
        self.yaw -= delta.x * ORBIT_ROTATE_SENSITIVITY;
        self.pitch = (self.pitch + delta.y * ORBIT_ROTATE_SENSITIVITY)
            .clamp(-ORBIT_PITCH_LIMIT, ORBIT_PITCH_LIMIT);
    }

    fn pan(&mut self, delta: Vec2) {
        let rotation = Quat::from_axis_angle(Vec3::Y, self.yaw);
        let right = rotation * Vec3::X;
        let forward = rotation * Vec3::Z;
        let pan_scale = self.radius * ORBIT_PAN_SENSITIVITY;
        self.focus += (-delta.x * pan_scale) * right + (-delta.y * pan_scale) * forward;
    }

    fn zoom(&mut self, scroll: f32) {
        self.radius = (self.radius * (1.0 - scroll * ORBIT_ZOOM_SENSITIVITY))
            .clamp(ORBIT_MIN_RADIUS, ORBIT_MAX_RADIUS);
    }
}

#[derive(Resource, Default)]
pub(super) struct OrbitDragState {
    last_cursor: Option<Vec2>,
}

pub(super) fn orbit_camera_controls(
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mut egui_contexts: EguiContexts,
    mut drag_state: ResMut<OrbitDragState>,
    mut query: Query<(&mut OrbitCamera, &mut Transform), With<ViewerCamera>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let cursor = window.cursor_position();
    let pointer_over_ui = egui_contexts
        .ctx_mut()
        .ok()
        .map(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area())
        .unwrap_or(false);
    let cursor_on_map = !pointer_over_ui
        && cursor.is_some_and(|cursor| cursor_in_map_view(cursor, HUD_PANEL_WIDTH));

    let shift = keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight);
    let rotating = buttons.pressed(MouseButton::Left) && !shift;
    let panning = buttons.pressed(MouseButton::Right)
        || buttons.pressed(MouseButton::Middle)
        || (buttons.pressed(MouseButton::Left) && shift);
    let dragging = cursor_on_map && (rotating || panning);

    let delta = match (dragging, cursor) {
        (true, Some(cursor)) => {
            let delta = drag_state
                .last_cursor
                .map(|last| cursor - last)
                .unwrap_or(Vec2::ZERO);
            drag_state.last_cursor = Some(cursor);
            delta
        }
        _ => {
            drag_state.last_cursor = None;
            Vec2::ZERO
        }
    };

    let scroll: f32 = mouse_wheel
        .read()
        .filter(|_| cursor_on_map)
        .map(|event| wheel_lines(event.unit, event.y))
        .sum();

    let Ok((mut orbit, mut transform)) = query.single_mut() else {
        return;
    };
    if apply_orbit_input(&mut orbit, delta, scroll, rotating, panning) {
        orbit.apply_to_transform(&mut transform);
    }
}

/// The HUD is docked on the left; the map is everything to its right.
fn cursor_in_map_view(cursor: Vec2, hud_width_px: f32) -> bool {
    cursor.x >= hud_width_px
}

fn wheel_lines(unit: MouseScrollUnit, y: f32) -> f32 {
    match unit {
        MouseScrollUnit::Line => y,
        MouseScrollUnit::Pixel => y / MouseScrollUnit::SCROLL_UNIT_CONVERSION_FACTOR,
    }
}

/// Rotation wins over pan when both are requested. Returns whether the orbit moved.
fn apply_orbit_input(
    orbit: &mut OrbitCamera,
    delta: Vec2,
    scroll: f32,
    rotating: bool,
    panning: bool,
) -> bool {
    let mut changed = false;
    if delta != Vec2::ZERO {
        if rotating {
            orbit.rotate(delta);
            changed = true;
        } else if panning {
            orbit.pan(delta);
            changed = true;
        }
    }
    if scroll != 0.0 {
        orbit.zoom(scroll);
        changed = true;
    }
    changed
}
