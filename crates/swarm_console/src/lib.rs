pub mod client;
pub mod config;
pub mod dispatcher;
pub mod fetcher;
pub mod graph;
pub mod hex;
pub mod model;
pub mod projection;
pub mod sample;
pub mod sync;
pub mod view;

#[cfg(test)]
mod test_support;

pub use client::{
    transport_from_config, ConsoleTransport, HttpTransport, OfflineTransport, TransportError,
};
pub use config::{ConfigError, ConsoleConfig};
pub use dispatcher::{
    Command, CommandDispatcher, CommandError, CommandOutcome, HaltOutcome, MissionAck,
    MissionDraft, HALT_PATH, MISSION_ASSIGN_PATH,
};
pub use fetcher::{
    FetchError, FetchResult, Fetched, Polled, ResourceKey, Snapshot, StateCache, StateFetcher,
    GAME_STATE_PATH, GRAPH_NODES_PATH,
};
pub use graph::{GraphScene, NodeDetail, NodeEmphasis, ViewportSize};
pub use hex::{hex_field, HexCell, WorldPosition};
pub use model::{
    Agent, AgentClass, AgentRole, Budget, GraphData, GraphEdge, GraphNode, GuardrailEntry, Quest,
    SemanticTriple, Severity, SystemState, SystemStatus, Territory, Vitals,
};
pub use projection::{project, project_with, EntityKey, ProjectionConfig, SpatialProjection};
pub use sync::{Dispatch, LiveSync, Notice, NoticeLevel};
