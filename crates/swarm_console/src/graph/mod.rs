//! Interactive knowledge-graph surface.
//!
//! A [`GraphScene`] is rebuilt from scratch on every render pass. It owns node
//! positions, the camera, and the single selected node; drawing is left to
//! the host UI, which asks for positions and per-node emphasis.

pub mod camera;
pub mod layout;

use std::collections::HashMap;

use tracing::warn;

use crate::model::{GraphData, SemanticTriple};

pub use camera::{
    GraphBounds, GraphCamera, ViewportSize, FIT_PADDING, MAX_ZOOM, MIN_ZOOM, ZOOM_IN_FACTOR,
    ZOOM_OUT_FACTOR,
};
pub use layout::{force_directed, GraphPoint, LayoutConfig};

/// World-space node radius used for hit testing and bounds.
pub const NODE_RADIUS: f32 = 18.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: String,
    pub label: String,
    pub kind: String,
    pub active: bool,
    pub triples: Vec<SemanticTriple>,
    pub position: GraphPoint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneEdge {
    pub id: String,
    pub source: usize,
    pub target: usize,
    pub label: Option<String>,
}

/// What the side panel shows for the selected node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDetail {
    pub id: String,
    pub label: String,
    pub kind: String,
    pub active: bool,
    pub triples: Vec<SemanticTriple>,
}

impl From<&SceneNode> for NodeDetail {
    fn from(node: &SceneNode) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            kind: node.kind.clone(),
            active: node.active,
            triples: node.triples.clone(),
        }
    }
}

/// Two independent visual treatments; a node can carry both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeEmphasis {
    pub active: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GraphScene {
    nodes: Vec<SceneNode>,
    edges: Vec<SceneEdge>,
    index: HashMap<String, usize>,
    selected: Option<String>,
    camera: GraphCamera,
    layout: LayoutConfig,
    dropped_edges: usize,
}

impl GraphScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: LayoutConfig) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    /// Rebuilds from `data` and fits the camera to the result.
    pub fn render(&mut self, data: &GraphData, viewport: ViewportSize) {
        self.rebuild(data);
        self.fit(viewport);
    }

    /// Discards every node and edge and lays the graph out again. Edges that
    /// point at unknown nodes are dropped. Selection is kept only while the
    /// selected id still exists.
    pub fn rebuild(&mut self, data: &GraphData) {
        self.nodes.clear();
        self.edges.clear();
        self.index.clear();
        self.dropped_edges = 0;

        for node in data.nodes() {
            if self.index.contains_key(&node.id) {
                warn!("graph node {} repeated, keeping first", node.id);
                continue;
            }
            self.index.insert(node.id.clone(), self.nodes.len());
            self.nodes.push(SceneNode {
                id: node.id.clone(),
                label: if node.label.is_empty() {
                    node.id.clone()
                } else {
                    node.label.clone()
                },
                kind: node.kind.clone(),
                active: node.active,
                triples: node.triples.clone(),
                position: GraphPoint::ZERO,
            });
        }

        for edge in data.edges() {
            let endpoints = (self.index.get(&edge.source), self.index.get(&edge.target));
            let (Some(&source), Some(&target)) = endpoints else {
                self.dropped_edges += 1;
                continue;
            };
            self.edges.push(SceneEdge {
                id: edge.id.clone(),
                source,
                target,
                label: edge.label.clone(),
            });
        }
        if self.dropped_edges > 0 {
            warn!(
                "dropped {} graph edges with unknown endpoints",
                self.dropped_edges
            );
        }

        let pairs: Vec<(usize, usize)> = self
            .edges
            .iter()
            .map(|edge| (edge.source, edge.target))
            .collect();
        let positions = force_directed(self.nodes.len(), &pairs, &self.layout);
        for (node, position) in self.nodes.iter_mut().zip(positions) {
            node.position = position;
        }

        if let Some(selected) = &self.selected {
            if !self.index.contains_key(selected) {
                self.selected = None;
            }
        }
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[SceneEdge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&SceneNode> {
        self.index.get(id).map(|&index| &self.nodes[index])
    }

    pub fn dropped_edges(&self) -> usize {
        self.dropped_edges
    }

    pub fn camera(&self) -> &GraphCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut GraphCamera {
        &mut self.camera
    }

    pub fn zoom_in(&mut self) {
        self.camera.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_out();
    }

    pub fn fit(&mut self, viewport: ViewportSize) {
        self.camera.fit(self.bounds(), viewport);
    }

    pub fn bounds(&self) -> Option<GraphBounds> {
        GraphBounds::around(self.nodes.iter().map(|node| node.position), NODE_RADIUS)
    }

    /// Selects `id`; an unknown id clears the selection.
    pub fn select_node(&mut self, id: &str) -> Option<NodeDetail> {
        match self.node(id) {
            Some(node) => {
                let detail = NodeDetail::from(node);
                self.selected = Some(node.id.clone());
                Some(detail)
            }
            None => {
                self.selected = None;
                None
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_detail(&self) -> Option<NodeDetail> {
        self.selected
            .as_deref()
            .and_then(|id| self.node(id))
            .map(NodeDetail::from)
    }

    /// Topmost node under `screen`, drawn last wins.
    pub fn node_at(&self, screen: GraphPoint, viewport: ViewportSize) -> Option<&SceneNode> {
        let world = self.camera.screen_to_world(screen, viewport);
        self.nodes
            .iter()
            .rev()
            .find(|node| node.position.distance(world) <= NODE_RADIUS)
    }

    /// A tap on a node selects it; a tap on empty canvas clears the selection.
    pub fn tap(&mut self, screen: GraphPoint, viewport: ViewportSize) -> Option<NodeDetail> {
        let hit = self.node_at(screen, viewport).map(|node| node.id.clone());
        match hit {
            Some(id) => self.select_node(&id),
            None => {
                self.clear_selection();
                None
            }
        }
    }

    pub fn emphasis(&self, id: &str) -> NodeEmphasis {
        NodeEmphasis {
            active: self.node(id).is_some_and(|node| node.active),
            selected: self.selected.as_deref() == Some(id),
        }
    }
}
