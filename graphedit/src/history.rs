//! Snapshot-based undo/redo.
//!
//! Callers record a memento *before* mutating the graph. A snapshot equal to
//! the top of the undo stack (per [`Element::same_as`]) is not pushed, and any
//! successful push clears the redo stack. Restoring replaces nodes and edges
//! wholesale and then re-links every edge to the restored nodes by identity.

use crate::model::{Edge, Element, Node};
use crate::Graph;

/// Immutable deep copy of the graph's entities.
#[derive(Clone, Debug)]
pub struct Memento {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Memento {
    pub fn capture(g: &Graph) -> Memento {
        Memento { nodes: g.nodes.clone(), edges: g.edges.clone() }
    }

    /// Same counts, same order and pairwise structural equality.
    pub fn same_as(&self, other: &Memento) -> bool {
        self.nodes.len() == other.nodes.len()
            && self.edges.len() == other.edges.len()
            && self.nodes.iter().zip(&other.nodes).all(|(a, b)| a.same_as(b))
            && self.edges.iter().zip(&other.edges).all(|(a, b)| a.same_as(b))
    }
}

#[derive(Debug)]
pub struct History {
    memento: Vec<Memento>,
    memento_redo: Vec<Memento>,
    max_depth: usize,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        History { memento: Vec::new(), memento_redo: Vec::new(), max_depth: max_depth.max(1) }
    }

    pub fn undo_depth(&self) -> usize {
        self.memento.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.memento_redo.len()
    }

    pub fn clear(&mut self) {
        self.memento.clear();
        self.memento_redo.clear();
    }

    fn push_undo(&mut self, m: Memento) {
        self.memento.push(m);
        if self.memento.len() > self.max_depth {
            let excess = self.memento.len() - self.max_depth;
            self.memento.drain(..excess);
        }
    }
}

impl Graph {
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.history.memento.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.history.memento_redo.is_empty()
    }

    /// Pushes a snapshot of the current state. Returns `false` when the
    /// snapshot equals the top of the undo stack and was discarded.
    pub fn record_memento(&mut self) -> bool {
        let snap = Memento::capture(self);
        if let Some(top) = self.history.memento.last() {
            if top.same_as(&snap) {
                tracing::debug!("memento unchanged, skipped");
                return false;
            }
        }
        self.history.push_undo(snap);
        self.history.memento_redo.clear();
        tracing::debug!(depth = self.history.memento.len(), "memento recorded");
        true
    }

    /// Drops the most recent undo snapshot, for interactions that recorded one
    /// optimistically and turned out to change nothing.
    pub fn discard_last_snapshot(&mut self) -> bool {
        self.history.memento.pop().is_some()
    }

    pub fn undo(&mut self) -> bool {
        let Some(prev) = self.history.memento.pop() else { return false };
        let current = Memento::capture(self);
        self.history.memento_redo.push(current);
        self.restore_snapshot(prev);
        tracing::debug!(undo = self.history.memento.len(), redo = self.history.memento_redo.len(), "undo");
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.memento_redo.pop() else { return false };
        let current = Memento::capture(self);
        self.history.push_undo(current);
        self.restore_snapshot(next);
        tracing::debug!(undo = self.history.memento.len(), redo = self.history.memento_redo.len(), "redo");
        true
    }

    /// Replaces nodes and edges with the snapshot's, re-links edges by node
    /// identity and rebuilds the selection from the restored flags.
    pub fn restore_snapshot(&mut self, snap: Memento) {
        let was_enabled = self.listeners.enabled();
        self.listeners.set_enabled(false);
        self.nodes = snap.nodes;
        self.edges = snap.edges;
        self.relink_edges();
        self.selection_from_flags();
        self.selection_box = None;
        self.listeners.set_enabled(was_enabled);
        self.notify_graph();
        self.notify_selection();
    }
}
