//! Polled read side: fetch, decode, and cache with fallback.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::{ConsoleTransport, TransportError};
use crate::model::{GraphData, SystemState, SystemStatus};
use crate::sample::{sample_graph_data, sample_system_state};

pub const GAME_STATE_PATH: &str = "/api/v1/game-state";
pub const GRAPH_NODES_PATH: &str = "/api/v1/graph-nodes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    GameState,
    GraphNodes,
}

impl ResourceKey {
    pub const ALL: [ResourceKey; 2] = [ResourceKey::GameState, ResourceKey::GraphNodes];

    pub fn path(self) -> &'static str {
        match self {
            ResourceKey::GameState => GAME_STATE_PATH,
            ResourceKey::GraphNodes => GRAPH_NODES_PATH,
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKey::GameState => f.write_str("game-state"),
            ResourceKey::GraphNodes => f.write_str("graph-nodes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    Transport(TransportError),
    Decode { message: String },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(err) => write!(f, "{err}"),
            FetchError::Decode { message } => write!(f, "decode response failed: {message}"),
        }
    }
}

impl Error for FetchError {}

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        FetchError::Transport(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    GameState(SystemState),
    GraphNodes(GraphData),
}

/// Outcome of one poll of one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    pub key: ResourceKey,
    pub outcome: Result<Fetched, FetchError>,
}

#[derive(Clone)]
pub struct StateFetcher {
    transport: Arc<dyn ConsoleTransport>,
}

impl StateFetcher {
    pub fn new(transport: Arc<dyn ConsoleTransport>) -> Self {
        Self { transport }
    }

    pub fn fetch(&self, key: ResourceKey) -> FetchResult {
        let outcome = match key {
            ResourceKey::GameState => self.fetch_json(key).map(Fetched::GameState),
            ResourceKey::GraphNodes => self.fetch_json(key).map(Fetched::GraphNodes),
        };
        FetchResult { key, outcome }
    }

    pub fn fetch_state(&self) -> Result<SystemState, FetchError> {
        self.fetch_json(ResourceKey::GameState)
    }

    fn fetch_json<T: DeserializeOwned>(&self, key: ResourceKey) -> Result<T, FetchError> {
        let body = self.transport.get(key.path())?;
        serde_json::from_str(&body).map_err(|err| FetchError::Decode {
            message: err.to_string(),
        })
    }
}

/// Last-known-good value of one resource plus the built-in fallback.
#[derive(Debug, Clone)]
pub struct ResourceCache<T> {
    last_good: Option<T>,
    fallback: T,
    live: bool,
    resolved: bool,
    last_error: Option<FetchError>,
}

impl<T> ResourceCache<T> {
    pub fn new(fallback: T) -> Self {
        Self {
            last_good: None,
            fallback,
            live: false,
            resolved: false,
            last_error: None,
        }
    }

    pub fn record_success(&mut self, value: T) {
        self.last_good = Some(value);
        self.live = true;
        self.resolved = true;
        self.last_error = None;
    }

    pub fn record_failure(&mut self, err: FetchError) {
        self.live = false;
        self.resolved = true;
        self.last_error = Some(err);
    }

    /// `None` only until the first tick resolves.
    pub fn current(&self) -> Option<&T> {
        if !self.resolved {
            return None;
        }
        Some(self.last_good.as_ref().unwrap_or(&self.fallback))
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn is_sample(&self) -> bool {
        self.resolved && self.last_good.is_none()
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.last_good.iter_mut().chain(std::iter::once(&mut self.fallback))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Snapshot<'a> {
    GameState(&'a SystemState),
    GraphNodes(&'a GraphData),
}

/// Freshest known value of a resource plus whether it came from the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polled<'a> {
    pub data: Snapshot<'a>,
    pub is_live: bool,
}

/// Single-writer cache of both polled resources.
#[derive(Debug, Clone)]
pub struct StateCache {
    game_state: ResourceCache<SystemState>,
    graph: ResourceCache<GraphData>,
}

impl Default for StateCache {
    fn default() -> Self {
        Self::new(sample_system_state(), sample_graph_data())
    }
}

impl StateCache {
    pub fn new(state_fallback: SystemState, graph_fallback: GraphData) -> Self {
        Self {
            game_state: ResourceCache::new(state_fallback),
            graph: ResourceCache::new(graph_fallback),
        }
    }

    /// Records one poll outcome; returns the resource's new liveness.
    pub fn apply(&mut self, result: FetchResult) -> bool {
        let key = result.key;
        match result.outcome {
            Ok(Fetched::GameState(state)) => self.game_state.record_success(state),
            Ok(Fetched::GraphNodes(graph)) => self.graph.record_success(graph),
            Err(err) => {
                warn!("poll {key} failed, serving fallback: {err}");
                match key {
                    ResourceKey::GameState => self.game_state.record_failure(err),
                    ResourceKey::GraphNodes => self.graph.record_failure(err),
                }
            }
        }
        let live = self.is_resource_live(key);
        debug!("poll {key} resolved live={live}");
        live
    }

    pub fn poll(&self, key: ResourceKey) -> Option<Polled<'_>> {
        match key {
            ResourceKey::GameState => self.game_state.current().map(|state| Polled {
                data: Snapshot::GameState(state),
                is_live: self.game_state.is_live(),
            }),
            ResourceKey::GraphNodes => self.graph.current().map(|graph| Polled {
                data: Snapshot::GraphNodes(graph),
                is_live: self.graph.is_live(),
            }),
        }
    }

    pub fn system_state(&self) -> Option<&SystemState> {
        self.game_state.current()
    }

    pub fn graph(&self) -> Option<&GraphData> {
        self.graph.current()
    }

    pub fn last_error(&self, key: ResourceKey) -> Option<&FetchError> {
        match key {
            ResourceKey::GameState => self.game_state.last_error(),
            ResourceKey::GraphNodes => self.graph.last_error(),
        }
    }

    pub fn is_resource_live(&self, key: ResourceKey) -> bool {
        match key {
            ResourceKey::GameState => self.game_state.is_live(),
            ResourceKey::GraphNodes => self.graph.is_live(),
        }
    }

    /// Connectivity shown to the operator: both streams' latest tick succeeded.
    pub fn is_live(&self) -> bool {
        self.game_state.is_live() && self.graph.is_live()
    }

    pub fn is_resolved(&self) -> bool {
        self.game_state.is_resolved() && self.graph.is_resolved()
    }

    pub fn is_sample(&self, key: ResourceKey) -> bool {
        match key {
            ResourceKey::GameState => self.game_state.is_sample(),
            ResourceKey::GraphNodes => self.graph.is_sample(),
        }
    }

    pub fn is_halted(&self) -> bool {
        self.system_state().is_some_and(SystemState::is_halted)
    }

    /// Overrides the cached status, whatever the backend last reported.
    /// Also resolves the state resource so the override is visible before the first tick.
    pub fn set_status(&mut self, status: SystemStatus) {
        for state in self.game_state.values_mut() {
            state.status = status.clone();
        }
        self.game_state.resolved = true;
    }

    pub fn mark_halted(&mut self) {
        self.set_status(SystemStatus::Halted);
    }
}

#[cfg(test)]
mod tests;
