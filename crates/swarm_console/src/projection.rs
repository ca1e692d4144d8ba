//! Places territories and their agents on the hex grid.
//!
//! `project` is pure: the same state always yields the same placements. Anchors
//! and seats come from fixed tables cycled by index, so overflow overlaps
//! instead of failing.

use std::collections::{BTreeMap, HashMap};

use crate::hex::{
    hex_field, ring_offset, territory_anchor, HexCell, WorldPosition, BACKGROUND_RADIUS,
    DEFAULT_HEX_SIZE,
};
use crate::model::{Agent, AgentClass, AgentRole, SystemState};

/// Actions that mean the agent is not doing anything.
pub const IDLE_PHRASES: [&str; 4] = ["idle", "standby", "waiting", "none"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKey {
    Territory(String),
    Agent {
        territory_id: String,
        agent_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Tint {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Blends toward grey and darkens.
    pub fn muted(self) -> Self {
        let grey = (self.r + self.g + self.b) / 3.0;
        let blend = |channel: f32| (channel * 0.35 + grey * 0.65) * 0.6;
        Self::rgb(blend(self.r), blend(self.g), blend(self.b))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerritoryPalette {
    Motherland,
    Core,
    Frontend,
    Security,
    Neutral,
}

/// Keywords checked in order; the first palette with a hit wins.
const PALETTE_KEYWORDS: [(TerritoryPalette, &[&str]); 4] = [
    (TerritoryPalette::Security, &["security", "guardrail", "citadel"]),
    (TerritoryPalette::Frontend, &["frontend", "visualizer", "dashboard"]),
    (TerritoryPalette::Core, &["core", "synapse", "engine"]),
    (TerritoryPalette::Motherland, &["motherland", "swarm"]),
];

impl TerritoryPalette {
    pub const ALL: [TerritoryPalette; 5] = [
        TerritoryPalette::Motherland,
        TerritoryPalette::Core,
        TerritoryPalette::Frontend,
        TerritoryPalette::Security,
        TerritoryPalette::Neutral,
    ];

    /// Lookup by territory display name or repository id. Case, spacing and
    /// punctuation are ignored, so "The Front-End Republic" and
    /// "agent-swarm-visualizer" both land on `Frontend`. Anything else is neutral.
    pub fn for_name(name: &str) -> Self {
        let compact: String = name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        PALETTE_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| compact.contains(keyword)))
            .map(|(palette, _)| *palette)
            .unwrap_or(TerritoryPalette::Neutral)
    }

    pub fn tint(self) -> Tint {
        match self {
            TerritoryPalette::Motherland => Tint::rgb(0.25, 0.45, 0.9),
            TerritoryPalette::Core => Tint::rgb(0.85, 0.25, 0.25),
            TerritoryPalette::Frontend => Tint::rgb(0.3, 0.75, 0.35),
            TerritoryPalette::Security => Tint::rgb(0.95, 0.8, 0.2),
            TerritoryPalette::Neutral => Tint::rgb(0.55, 0.55, 0.6),
        }
    }
}

pub fn role_tint(role: AgentRole) -> Tint {
    match role {
        AgentRole::Coder => Tint::rgb(0.95, 0.45, 0.2),
        AgentRole::Architect => Tint::rgb(0.35, 0.55, 1.0),
        AgentRole::ProductManager => Tint::rgb(0.95, 0.8, 0.25),
        AgentRole::Reviewer => Tint::rgb(0.4, 0.9, 0.55),
        AgentRole::Analyst => Tint::rgb(0.7, 0.45, 0.95),
        AgentRole::Security => Tint::rgb(0.9, 0.9, 0.95),
        AgentRole::Unassigned => Tint::rgb(0.7, 0.7, 0.7),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentActivity {
    Active,
    Idle,
}

pub fn is_idle_action(action: &str) -> bool {
    let action = action.trim();
    action.is_empty()
        || IDLE_PHRASES
            .iter()
            .any(|phrase| action.eq_ignore_ascii_case(phrase))
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBuilding {
    pub key: EntityKey,
    pub territory_id: String,
    pub name: String,
    pub cell: HexCell,
    pub position: WorldPosition,
    pub palette: TerritoryPalette,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedAgent {
    pub key: EntityKey,
    pub agent_id: String,
    pub territory_id: String,
    pub label: String,
    pub class: AgentClass,
    pub role: AgentRole,
    pub activity: AgentActivity,
    pub cell: HexCell,
    pub position: WorldPosition,
}

impl PlacedAgent {
    /// Role color, muted while idle.
    pub fn tint(&self) -> Tint {
        let tint = role_tint(self.role);
        match self.activity {
            AgentActivity::Active => tint,
            AgentActivity::Idle => tint.muted(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionConfig {
    pub hex_size: f32,
    pub background_radius: i32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            hex_size: DEFAULT_HEX_SIZE,
            background_radius: BACKGROUND_RADIUS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpatialProjection {
    pub hex_size: f32,
    pub background: Vec<HexCell>,
    pub buildings: Vec<PlacedBuilding>,
    pub agents: Vec<PlacedAgent>,
    pub halted: bool,
}

impl SpatialProjection {
    /// Entity to cell mapping; the identity of a projection pass.
    pub fn assignments(&self) -> BTreeMap<EntityKey, HexCell> {
        self.buildings
            .iter()
            .map(|building| (building.key.clone(), building.cell))
            .chain(self.agents.iter().map(|agent| (agent.key.clone(), agent.cell)))
            .collect()
    }

    pub fn entity_count(&self) -> usize {
        self.buildings.len() + self.agents.len()
    }
}

pub fn project(state: &SystemState) -> SpatialProjection {
    project_with(state, &ProjectionConfig::default())
}

pub fn project_with(state: &SystemState, config: &ProjectionConfig) -> SpatialProjection {
    let agents_by_id: HashMap<&str, &Agent> = state
        .party
        .iter()
        .map(|agent| (agent.id.as_str(), agent))
        .collect();

    let mut buildings = Vec::with_capacity(state.territories.len());
    let mut agents = Vec::new();
    for (territory_index, territory) in state.territories.iter().enumerate() {
        let anchor = territory_anchor(territory_index);
        let name = if territory.name.trim().is_empty() {
            territory.id.clone()
        } else {
            territory.name.clone()
        };
        buildings.push(PlacedBuilding {
            key: EntityKey::Territory(territory.id.clone()),
            territory_id: territory.id.clone(),
            palette: TerritoryPalette::for_name(&name),
            name,
            cell: anchor,
            position: anchor.to_world(config.hex_size),
        });

        for (seat, agent_id) in territory.members.iter().enumerate() {
            let placeholder;
            let agent = match agents_by_id.get(agent_id.as_str()) {
                Some(agent) => *agent,
                None => {
                    placeholder = Agent::placeholder(agent_id);
                    &placeholder
                }
            };
            let cell = anchor.offset(ring_offset(seat));
            let activity = if is_idle_action(&agent.current_action) {
                AgentActivity::Idle
            } else {
                AgentActivity::Active
            };
            let action = match activity {
                AgentActivity::Idle if agent.current_action.trim().is_empty() => "Idle",
                _ => agent.current_action.trim(),
            };
            agents.push(PlacedAgent {
                key: EntityKey::Agent {
                    territory_id: territory.id.clone(),
                    agent_id: agent_id.clone(),
                },
                agent_id: agent_id.clone(),
                territory_id: territory.id.clone(),
                label: format!("{agent_id}\n{action}"),
                class: agent.class.clone(),
                role: agent.class.role(),
                activity,
                cell,
                position: cell.to_world(config.hex_size),
            });
        }
    }

    SpatialProjection {
        hex_size: config.hex_size,
        background: hex_field(config.background_radius),
        buildings,
        agents,
        halted: state.is_halted(),
    }
}
