use std::sync::Arc;

use bevy::prelude::*;
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};
use swarm_console::OfflineTransport;

mod camera;
mod hud;
mod projection_scene;
mod state_poll;
mod viewer_config;

use camera::{orbit_camera_controls, OrbitCamera, OrbitDragState, ViewerCamera};
use hud::{headless_report, render_hud, HeadlessStatus};
use projection_scene::{setup_projection_assets, update_projection, ProjectionScene};
use state_poll::{poll_game_state, StatePoller, ViewerState};
use viewer_config::{resolve_viewer_config, SwarmViewerConfig};

fn main() {
    let config = resolve_viewer_config();
    let poller = match StatePoller::from_config(&config.console) {
        Ok(poller) => poller,
        Err(err) => {
            eprintln!("warning: http client unavailable ({err}); polling offline samples");
            StatePoller::new(
                Arc::new(OfflineTransport),
                config.console.poll_interval(),
            )
        }
    };

    if config.headless {
        run_headless(config, poller);
    } else {
        run_ui(config, poller);
    }
}

fn run_ui(config: SwarmViewerConfig, poller: StatePoller) {
    App::new()
        .insert_resource(config)
        .insert_resource(poller)
        .insert_resource(ViewerState::default())
        .insert_resource(ProjectionScene::default())
        .init_resource::<OrbitDragState>()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Swarm Console Map".to_string(),
                resolution: (1200, 800).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_systems(Startup, (setup_projection_assets, setup_3d_scene))
        .add_systems(
            Update,
            (
                poll_game_state,
                update_projection.after(poll_game_state),
                orbit_camera_controls,
            ),
        )
        .add_systems(EguiPrimaryContextPass, render_hud)
        .run();
}

fn run_headless(config: SwarmViewerConfig, poller: StatePoller) {
    App::new()
        .insert_resource(config)
        .insert_resource(poller)
        .insert_resource(ViewerState::default())
        .insert_resource(HeadlessStatus::default())
        .add_plugins(MinimalPlugins)
        .add_systems(Update, (poll_game_state, headless_report).chain())
        .run();
}

fn setup_3d_scene(mut commands: Commands) {
    let focus = Vec3::ZERO;
    let transform = Transform::from_xyz(-14.0, 18.0, 16.0).looking_at(focus, Vec3::Y);
    let orbit = OrbitCamera::from_transform(&transform, focus);
    commands.spawn((Camera3d::default(), transform, ViewerCamera, orbit));

    commands.spawn((
        PointLight {
            intensity: 6_000_000.0,
            range: 80.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(8.0, 20.0, 8.0),
    ));
}
