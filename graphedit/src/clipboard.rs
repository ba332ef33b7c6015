//! Copy/paste of the selected subgraph.

use crate::error::{Error, Result};
use crate::geometry::limits;
use crate::json::{EdgeRecord, GraphRecord, NodeRecord};
use crate::model::{ElementId, ElementRef, Node, Vec2};
use crate::Graph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A persistence record plus the pointer position at copy time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipboardRecord {
    #[serde(flatten)]
    pub graph: GraphRecord,
    pub pointer: Vec2,
}

impl ClipboardRecord {
    pub fn is_empty(&self) -> bool {
        self.graph.nodes.is_empty()
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Graph {
    /// Selected nodes, plus the edges whose endpoints are both selected.
    pub fn copy_selection(&self, pointer: Vec2) -> ClipboardRecord {
        let picked: Vec<&Node> = self.nodes.iter().filter(|n| self.is_selected(&ElementRef::Node(n.id.clone()))).collect();
        let label_of: HashMap<&ElementId, &str> = picked.iter().map(|n| (&n.id, n.display_label())).collect();
        let nodes = picked
            .iter()
            .map(|n| NodeRecord { x: n.x, y: n.y, r: n.r, label: n.display_label().to_string() })
            .collect();
        let edges = self
            .edges
            .iter()
            .filter_map(|e| {
                let src = label_of.get(&e.src)?;
                let dst = label_of.get(&e.dst)?;
                Some(EdgeRecord { src: src.to_string(), dst: dst.to_string(), weight: e.weight, directed: e.directed })
            })
            .collect();
        ClipboardRecord { graph: GraphRecord { nodes, edges }, pointer }
    }

    fn free_label(&self, label: &str, pending: &HashMap<String, ElementId>) -> String {
        let taken = |l: &str| self.label_taken(l, None) || pending.values().any(|id| id.as_str() == l);
        if !taken(label) {
            return label.to_string();
        }
        (1..)
            .map(|k| format!("{label}_{k}"))
            .find(|l| !taken(l))
            .unwrap_or_else(|| label.to_string())
    }

    /// Inserts the clipboard contents shifted by `pointer - clip.pointer`.
    /// Colliding labels get a `_k` suffix; edges whose endpoints cannot be
    /// mapped are dropped. The pasted elements become the selection.
    pub fn paste(&mut self, clip: &ClipboardRecord, pointer: Vec2) -> Result<Vec<ElementRef>> {
        if clip.is_empty() {
            return Ok(Vec::new());
        }
        if self.nodes.len() + clip.graph.nodes.len() > limits::MAX_NODES {
            return Err(Error::CapsExceeded { what: "nodes", limit: limits::MAX_NODES });
        }
        let (dx, dy) = (pointer.x - clip.pointer.x, pointer.y - clip.pointer.y);
        let mut mapped: HashMap<String, ElementId> = HashMap::new();
        let mut fresh: Vec<Node> = Vec::with_capacity(clip.graph.nodes.len());
        for n in &clip.graph.nodes {
            let (x, y) = (n.x + dx, n.y + dy);
            if !limits::in_coord_bounds(x) || !limits::in_coord_bounds(y) {
                return Err(Error::OutOfBounds { what: format!("pasted node {:?}", n.label) });
            }
            if !limits::in_radius_bounds(n.r) {
                return Err(Error::OutOfBounds { what: format!("pasted node {:?} radius", n.label) });
            }
            if n.label.trim().is_empty() || mapped.contains_key(&n.label) {
                tracing::warn!(label = %n.label, "clipboard node skipped");
                continue;
            }
            let label = self.free_label(n.label.trim(), &mapped);
            let id = ElementId::new(label.as_str());
            mapped.insert(n.label.clone(), id.clone());
            fresh.push(Node::new(id, x, y).with_radius(n.r).with_label(label));
        }

        self.record_memento();
        let mut pasted: Vec<ElementRef> = Vec::with_capacity(fresh.len() + clip.graph.edges.len());
        for node in fresh {
            if let Some(id) = self.insert_node(node) {
                pasted.push(ElementRef::Node(id));
            }
        }
        for e in &clip.graph.edges {
            let (Some(src), Some(dst)) = (mapped.get(&e.src), mapped.get(&e.dst)) else {
                tracing::debug!(src = %e.src, dst = %e.dst, "clipboard edge endpoint not mapped");
                continue;
            };
            if let Some(id) = self.add_edge_with(src, dst, e.weight, e.directed) {
                pasted.push(ElementRef::Edge(id));
            }
        }
        self.set_selected(pasted.clone());
        tracing::debug!(count = pasted.len(), "pasted");
        Ok(pasted)
    }
}
