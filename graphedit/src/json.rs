//! Persistence record: the plain `{ nodes, edges }` structure used for
//! save/load. Edges reference nodes by label.

use crate::error::{Error, Result};
use crate::geometry::limits;
use crate::model::{Edge, ElementId, Node, DEFAULT_NODE_RADIUS, DEFAULT_WEIGHT};
use crate::{ElementDefaults, Graph};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn default_radius() -> f32 {
    DEFAULT_NODE_RADIUS
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_radius")]
    pub r: f32,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub src: String,
    pub dst: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub directed: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphRecord {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

impl GraphRecord {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Checks caps, bounds and label uniqueness, then builds the entities.
    /// Node identities equal their labels; edges get `e1`, `e2`, ...
    /// Edges repeating an existing connection are skipped.
    pub(crate) fn build(&self, defaults: &ElementDefaults) -> Result<(Vec<Node>, Vec<Edge>)> {
        if self.nodes.len() > limits::MAX_NODES {
            return Err(Error::CapsExceeded { what: "nodes", limit: limits::MAX_NODES });
        }
        if self.edges.len() > limits::MAX_EDGES {
            return Err(Error::CapsExceeded { what: "edges", limit: limits::MAX_EDGES });
        }
        let mut labels: HashSet<&str> = HashSet::with_capacity(self.nodes.len());
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for n in &self.nodes {
            if !limits::in_coord_bounds(n.x) || !limits::in_coord_bounds(n.y) {
                return Err(Error::OutOfBounds { what: format!("node {:?} coordinate", n.label) });
            }
            if !limits::in_radius_bounds(n.r) {
                return Err(Error::OutOfBounds { what: format!("node {:?} radius", n.label) });
            }
            let label = n.label.trim();
            if label.is_empty() || label.len() > limits::MAX_LABEL_LEN {
                return Err(Error::InvalidStructure(format!("invalid node label {:?}", n.label)));
            }
            if !labels.insert(label) {
                return Err(Error::DuplicateLabel { label: label.to_string() });
            }
            nodes.push(Node::new(label, n.x, n.y).with_radius(n.r).with_label(label));
        }

        let mut edges: Vec<Edge> = Vec::with_capacity(self.edges.len());
        for e in &self.edges {
            let (src, dst) = (e.src.trim(), e.dst.trim());
            for end in [src, dst] {
                if !labels.contains(end) {
                    return Err(Error::MissingNode { id: ElementId::new(end) });
                }
            }
            if src == dst {
                return Err(Error::InvalidStructure(format!("edge {src}-{dst} is a self loop")));
            }
            if !e.weight.is_finite() {
                return Err(Error::OutOfBounds { what: format!("edge {src}-{dst} weight") });
            }
            let (s, d) = (ElementId::new(src), ElementId::new(dst));
            if edges.iter().any(|x| x.connects(&s, &d) || (!e.directed && x.connects(&d, &s))) {
                tracing::debug!(src, dst, "duplicate edge in record skipped");
                continue;
            }
            let mut edge = Edge::new(format!("e{}", edges.len() + 1), s, d)
                .with_weight(e.weight)
                .with_directed(e.directed);
            edge.stroke_width = defaults.edge_width;
            edges.push(edge);
        }
        Ok((nodes, edges))
    }
}

impl Graph {
    /// Exports nodes and edges; edge endpoints are written as node labels.
    pub fn to_record(&self) -> Result<GraphRecord> {
        let nodes = self
            .nodes
            .iter()
            .map(|n| NodeRecord { x: n.x, y: n.y, r: n.r, label: n.display_label().to_string() })
            .collect();
        let mut edges = Vec::with_capacity(self.edges.len());
        for e in &self.edges {
            let src = self.node(&e.src).ok_or_else(|| Error::missing_node(&e.src))?;
            let dst = self.node(&e.dst).ok_or_else(|| Error::missing_node(&e.dst))?;
            edges.push(EdgeRecord {
                src: src.display_label().to_string(),
                dst: dst.display_label().to_string(),
                weight: e.weight,
                directed: e.directed,
            });
        }
        Ok(GraphRecord { nodes, edges })
    }

    pub fn to_json_string(&self) -> Result<String> {
        self.to_record()?.to_json_string()
    }

    /// Replaces the whole graph with `record`. The record is validated first;
    /// on error the graph is left untouched. A successful load is undoable.
    pub fn load_record(&mut self, record: &GraphRecord) -> Result<()> {
        let (nodes, edges) = record.build(&self.defaults)?;
        self.replace_entities(nodes, edges);
        tracing::info!(nodes = self.nodes.len(), edges = self.edges.len(), "graph loaded");
        Ok(())
    }

    pub fn load_json_str(&mut self, s: &str) -> Result<()> {
        let record = GraphRecord::from_json_str(s)?;
        self.load_record(&record)
    }

    /// Memento, then wholesale replacement with a cleared selection.
    pub(crate) fn replace_entities(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        self.record_memento();
        let was_enabled = self.listeners.enabled();
        self.listeners.set_enabled(false);
        self.nodes = nodes;
        self.edges = edges;
        self.selected.clear();
        self.selection_box = None;
        self.next_node_seq = 1;
        self.next_edge_seq = self.edges.len() as u64 + 1;
        self.listeners.set_enabled(was_enabled);
        self.notify_graph();
        self.notify_selection();
    }
}
