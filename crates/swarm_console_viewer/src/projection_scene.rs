use std::collections::HashMap;
use std::f32::consts::FRAC_PI_6;

use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;
use swarm_console::projection::{
    role_tint, AgentActivity, PlacedAgent, PlacedBuilding, TerritoryPalette, Tint,
};
use swarm_console::{project_with, AgentRole, EntityKey, SpatialProjection};

use super::state_poll::ViewerState;
use super::viewer_config::SwarmViewerConfig;

const TILE_HEIGHT: f32 = 0.12;
const TILE_INSET: f32 = 0.94;
const BUILDING_SIZE: f32 = 0.9;
const BUILDING_HEIGHT: f32 = 1.1;
const AGENT_RADIUS: f32 = 0.28;
const AGENT_HOVER: f32 = 0.35;
const LABEL_FONT_SIZE: f32 = 18.0;
const LABEL_SCALE: f32 = 0.02;
const BUILDING_LABEL_OFFSET: f32 = 0.9;
const AGENT_LABEL_OFFSET: f32 = 0.55;

#[derive(Component, Clone, Copy, Debug)]
pub(super) struct HexTileMarker;

#[derive(Component, Clone, Debug)]
pub(super) struct BuildingMarker {
    pub territory_id: String,
}

#[derive(Component, Clone, Debug)]
pub(super) struct AgentMarker {
    pub agent_id: String,
    pub territory_id: String,
}

#[derive(Clone, Debug, Default)]
pub(super) struct PaletteMaterials {
    territories: HashMap<TerritoryPalette, Handle<StandardMaterial>>,
    agents: HashMap<(AgentRole, AgentActivity), Handle<StandardMaterial>>,
}

impl PaletteMaterials {
    pub(super) fn territory_handle(&self, palette: TerritoryPalette) -> Handle<StandardMaterial> {
        self.territories
            .get(&palette)
            .cloned()
            .unwrap_or_else(Handle::default)
    }

    pub(super) fn agent_handle(
        &self,
        role: AgentRole,
        activity: AgentActivity,
    ) -> Handle<StandardMaterial> {
        self.agents
            .get(&(role, activity))
            .cloned()
            .unwrap_or_else(Handle::default)
    }
}

#[derive(Resource, Clone)]
pub(super) struct ProjectionAssets {
    pub tile_mesh: Handle<Mesh>,
    pub building_mesh: Handle<Mesh>,
    pub agent_mesh: Handle<Mesh>,
    pub tile_material: Handle<StandardMaterial>,
    pub halted_tile_material: Handle<StandardMaterial>,
    pub palette: PaletteMaterials,
}

/// Entities spawned by the last projection pass, keyed by what they depict.
#[derive(Resource, Default)]
pub(super) struct ProjectionScene {
    rendered_revision: Option<u64>,
    entities: HashMap<EntityKey, Entity>,
    background: Vec<Entity>,
}

impl ProjectionScene {
    pub(super) fn entity(&self, key: &EntityKey) -> Option<Entity> {
        self.entities.get(key).copied()
    }

    pub(super) fn entity_count(&self) -> usize {
        self.entities.len() + self.background.len()
    }

    fn despawn_all(&mut self, commands: &mut Commands) {
        for entity in self.entities.values().chain(self.background.iter()) {
            commands.entity(*entity).despawn();
        }
        self.entities.clear();
        self.background.clear();
    }
}

pub(super) fn build_palette_materials(materials: &mut Assets<StandardMaterial>) -> PaletteMaterials {
    let mut palette = PaletteMaterials::default();
    for territory in TerritoryPalette::ALL {
        palette
            .territories
            .insert(territory, materials.add(tinted_material(territory.tint(), 0.7)));
    }
    for role in AgentRole::ALL {
        let tint = role_tint(role);
        palette.agents.insert(
            (role, AgentActivity::Active),
            materials.add(tinted_material(tint, 0.4)),
        );
        palette.agents.insert(
            (role, AgentActivity::Idle),
            materials.add(tinted_material(tint.muted(), 0.9)),
        );
    }
    palette
}

fn tinted_material(tint: Tint, roughness: f32) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgb(tint.r, tint.g, tint.b),
        perceptual_roughness: roughness,
        ..default()
    }
}

pub(super) fn setup_projection_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<SwarmViewerConfig>,
) {
    let size = config.hex_size;
    let tile_mesh = meshes.add(
        Cylinder::new(size * TILE_INSET, TILE_HEIGHT)
            .mesh()
            .resolution(6),
    );
    let building_mesh = meshes.add(Cuboid::new(
        size * BUILDING_SIZE,
        size * BUILDING_HEIGHT,
        size * BUILDING_SIZE,
    ));
    let agent_mesh = meshes.add(Sphere::new(size * AGENT_RADIUS));
    let tile_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.16, 0.18, 0.22),
        perceptual_roughness: 0.95,
        ..default()
    });
    let halted_tile_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.32, 0.08, 0.08),
        perceptual_roughness: 0.95,
        ..default()
    });

    commands.insert_resource(ProjectionAssets {
        tile_mesh,
        building_mesh,
        agent_mesh,
        tile_material,
        halted_tile_material,
        palette: build_palette_materials(&mut materials),
    });
}

/// Tears down every entity from the previous pass and respawns the whole
/// projection whenever a new poll result has landed.
pub(super) fn update_projection(
    mut commands: Commands,
    config: Res<SwarmViewerConfig>,
    assets: Option<Res<ProjectionAssets>>,
    state: Res<ViewerState>,
    mut scene: ResMut<ProjectionScene>,
) {
    let Some(assets) = assets else {
        return;
    };
    if scene.rendered_revision == Some(state.revision) {
        return;
    }
    let Some(system) = state.system_state() else {
        return;
    };

    scene.rendered_revision = Some(state.revision);
    scene.despawn_all(&mut commands);

    let projection = project_with(system, &config.projection());
    spawn_projection(&mut commands, &assets, &config, &projection, &mut scene);
    debug!(
        "projection pass {}: {} buildings, {} agents",
        state.revision,
        projection.buildings.len(),
        projection.agents.len()
    );
}

fn spawn_projection(
    commands: &mut Commands,
    assets: &ProjectionAssets,
    config: &SwarmViewerConfig,
    projection: &SpatialProjection,
    scene: &mut ProjectionScene,
) {
    let tile_material = if projection.halted {
        &assets.halted_tile_material
    } else {
        &assets.tile_material
    };
    for cell in &projection.background {
        let position = cell.to_world(projection.hex_size);
        let entity = commands
            .spawn((
                Mesh3d(assets.tile_mesh.clone()),
                MeshMaterial3d(tile_material.clone()),
                // Cylinder corners start on +X; the axial layout is pointy-top.
                Transform::from_xyz(position.x, 0.0, position.z)
                    .with_rotation(Quat::from_rotation_y(FRAC_PI_6)),
                Name::new(format!("hex:{}:{}", cell.q, cell.r)),
                HexTileMarker,
            ))
            .id();
        scene.background.push(entity);
    }

    for building in &projection.buildings {
        let entity = spawn_building(commands, assets, config, building, projection.hex_size);
        scene.entities.insert(building.key.clone(), entity);
    }
    for agent in &projection.agents {
        let entity = spawn_agent(commands, assets, config, agent, projection.hex_size);
        scene.entities.insert(agent.key.clone(), entity);
    }
}

fn spawn_building(
    commands: &mut Commands,
    assets: &ProjectionAssets,
    config: &SwarmViewerConfig,
    building: &PlacedBuilding,
    hex_size: f32,
) -> Entity {
    let height = hex_size * BUILDING_HEIGHT;
    let entity = commands
        .spawn((
            Mesh3d(assets.building_mesh.clone()),
            MeshMaterial3d(assets.palette.territory_handle(building.palette)),
            Transform::from_xyz(
                building.position.x,
                TILE_HEIGHT / 2.0 + height / 2.0,
                building.position.z,
            ),
            Name::new(format!("territory:{}", building.territory_id)),
            BuildingMarker {
                territory_id: building.territory_id.clone(),
            },
        ))
        .id();

    if config.show_labels {
        let text = building.name.clone();
        let name = format!("label:territory:{}", building.territory_id);
        commands.entity(entity).with_children(|parent| {
            spawn_label(parent, text, height / 2.0 + BUILDING_LABEL_OFFSET, name);
        });
    }
    entity
}

fn spawn_agent(
    commands: &mut Commands,
    assets: &ProjectionAssets,
    config: &SwarmViewerConfig,
    agent: &PlacedAgent,
    hex_size: f32,
) -> Entity {
    let entity = commands
        .spawn((
            Mesh3d(assets.agent_mesh.clone()),
            MeshMaterial3d(assets.palette.agent_handle(agent.role, agent.activity)),
            Transform::from_xyz(
                agent.position.x,
                TILE_HEIGHT / 2.0 + hex_size * (AGENT_RADIUS + AGENT_HOVER),
                agent.position.z,
            ),
            Name::new(format!("agent:{}:{}", agent.territory_id, agent.agent_id)),
            AgentMarker {
                agent_id: agent.agent_id.clone(),
                territory_id: agent.territory_id.clone(),
            },
        ))
        .id();

    if config.show_labels {
        let text = agent.label.clone();
        let name = format!("label:agent:{}", agent.agent_id);
        commands.entity(entity).with_children(|parent| {
            spawn_label(parent, text, AGENT_LABEL_OFFSET, name);
        });
    }
    entity
}

fn spawn_label(parent: &mut ChildSpawnerCommands, text: String, offset_y: f32, name: String) {
    parent.spawn((
        Text2d::new(text),
        TextFont {
            font_size: LABEL_FONT_SIZE,
            ..default()
        },
        Transform::from_translation(Vec3::new(0.0, offset_y, 0.0))
            .with_scale(Vec3::splat(LABEL_SCALE)),
        TextColor(Color::srgb(0.92, 0.92, 0.92)),
        Name::new(name),
    ));
}
