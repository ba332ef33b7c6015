pub mod model;
pub mod clipboard;
pub mod config;
pub mod edge_list;
pub mod error;
pub mod events;
pub mod history;
pub mod input;
pub mod layout;
pub mod render;
pub mod tools;
pub mod geometry {
    pub mod limits;
    pub mod math;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod adjacency;
    pub mod coloring;
    pub mod hamiltonian;
    pub mod pert;
    pub mod picking;
    pub mod shortest_path;
    pub mod spanning_tree;
    pub mod toposort;
    pub mod traversal;
}
mod json;

pub use algorithms::adjacency::AdjacencyView;
pub use clipboard::ClipboardRecord;
pub use config::{EditorConfig, LayoutConfig};
pub use error::{Error, Result};
pub use json::{EdgeRecord, GraphRecord, NodeRecord};
pub use layout::{LayoutKind, LayoutOutcome};
pub use tools::{DragState, Editor, Session, ToolKind};

use events::{GraphEvent, ListenerId, ListenerKind, Listeners};
use history::History;
use model::{Edge, Element, ElementId, ElementRef, Node, NodeLookup, Rect, Vec2};
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    pub size: f32,
    pub snap: bool,
}

/// Defaults stamped onto elements created interactively.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ElementDefaults {
    pub node_radius: f32,
    pub edge_width: f32,
    pub directed: bool,
}

/// The graph state container: entities, selection and interaction markers,
/// plus the undo/redo stacks.
#[derive(Debug)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    pub(crate) selected: Vec<ElementRef>,
    pub(crate) selection_box: Option<Rect>,
    pub(crate) tool: ToolKind,
    pub(crate) grid: GridConfig,
    pub(crate) drag: DragState,
    pub(crate) history: History,
    pub(crate) listeners: Listeners,
    pub(crate) defaults: ElementDefaults,
    next_node_seq: u64,
    next_edge_seq: u64,
}

impl Default for Graph {
    fn default() -> Self {
        Graph::new()
    }
}

impl NodeLookup for Graph {
    fn lookup_node(&self, id: &ElementId) -> Option<&Node> {
        self.node(id)
    }
}

impl Graph {
    pub fn new() -> Self {
        Graph::with_config(&EditorConfig::default())
    }

    pub fn with_config(cfg: &EditorConfig) -> Self {
        Graph {
            nodes: Vec::new(),
            edges: Vec::new(),
            selected: Vec::new(),
            selection_box: None,
            tool: ToolKind::Select,
            grid: GridConfig { size: cfg.grid_size, snap: cfg.snap_to_grid },
            drag: DragState::NotDragging,
            history: History::new(cfg.history_limit),
            listeners: Listeners::default(),
            defaults: ElementDefaults {
                node_radius: cfg.node_radius,
                edge_width: cfg.edge_width,
                directed: cfg.directed_edges,
            },
            next_node_seq: 1,
            next_edge_seq: 1,
        }
    }

    // Read access
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
    pub fn selected(&self) -> &[ElementRef] {
        &self.selected
    }
    pub fn selection_box(&self) -> Option<Rect> {
        self.selection_box
    }
    pub fn tool(&self) -> ToolKind {
        self.tool
    }
    pub fn grid(&self) -> GridConfig {
        self.grid
    }
    pub fn drag_state(&self) -> DragState {
        self.drag
    }
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: &ElementId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }
    pub fn node_mut(&mut self, id: &ElementId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }
    pub fn edge(&self, id: &ElementId) -> Option<&Edge> {
        self.edges.iter().find(|e| &e.id == id)
    }
    pub fn edge_mut(&mut self, id: &ElementId) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| &e.id == id)
    }

    /// Node whose label (or identity, for unlabeled nodes) equals `label`.
    pub fn node_by_label(&self, label: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.display_label() == label)
    }

    pub fn contains(&self, r: &ElementRef) -> bool {
        match r {
            ElementRef::Node(id) => self.node(id).is_some(),
            ElementRef::Edge(id) => self.edge(id).is_some(),
        }
    }

    fn element(&self, r: &ElementRef) -> Option<&dyn Element> {
        match r {
            ElementRef::Node(id) => self.node(id).map(|n| n as &dyn Element),
            ElementRef::Edge(id) => self.edge(id).map(|e| e as &dyn Element),
        }
    }

    fn element_mut(&mut self, r: &ElementRef) -> Option<&mut dyn Element> {
        match r {
            ElementRef::Node(id) => self.node_mut(id).map(|n| n as &mut dyn Element),
            ElementRef::Edge(id) => self.edge_mut(id).map(|e| e as &mut dyn Element),
        }
    }

    pub(crate) fn label_taken(&self, label: &str, except: Option<&ElementId>) -> bool {
        self.nodes
            .iter()
            .any(|n| Some(&n.id) != except && (n.display_label() == label || n.id.as_str() == label))
    }

    /// Fails when `label` is too long or already names another node.
    pub(crate) fn check_label(&self, label: &str, except: Option<&ElementId>) -> Result<()> {
        if label.len() > geometry::limits::MAX_LABEL_LEN {
            return Err(Error::InvalidStructure(format!("label longer than {}", geometry::limits::MAX_LABEL_LEN)));
        }
        if self.label_taken(label, except) {
            return Err(Error::DuplicateLabel { label: label.to_string() });
        }
        Ok(())
    }

    /// Checks a label for a node about to be added, without touching the graph.
    pub fn check_new_label(&self, label: &str) -> Result<()> {
        let label = label.trim();
        if label.is_empty() {
            return Err(Error::InvalidStructure(format!("invalid label {:?}", label)));
        }
        self.check_label(label, None)
    }

    fn fresh_node_id(&mut self) -> ElementId {
        loop {
            let candidate = self.next_node_seq.to_string();
            self.next_node_seq += 1;
            if !self.label_taken(&candidate, None) {
                return ElementId::new(candidate);
            }
        }
    }

    fn fresh_edge_id(&mut self) -> ElementId {
        loop {
            let candidate = ElementId::new(format!("e{}", self.next_edge_seq));
            self.next_edge_seq += 1;
            if self.edge(&candidate).is_none() {
                return candidate;
            }
        }
    }

    // Nodes

    /// Adds a node labeled with its fresh identity. Callers record a memento first.
    pub fn add_node(&mut self, x: f32, y: f32) -> ElementId {
        let id = self.fresh_node_id();
        let node = Node::new(id.clone(), x, y)
            .with_radius(self.defaults.node_radius)
            .with_label(id.as_str());
        self.nodes.push(node);
        self.notify_graph();
        id
    }

    pub fn add_node_with_label(&mut self, x: f32, y: f32, label: &str) -> Result<ElementId> {
        self.check_new_label(label)?;
        let label = label.trim();
        let id = ElementId::new(label);
        let node = Node::new(id.clone(), x, y)
            .with_radius(self.defaults.node_radius)
            .with_label(label);
        self.nodes.push(node);
        self.notify_graph();
        Ok(id)
    }

    /// Inserts a fully built node; `None` if its identity is already in use.
    pub fn insert_node(&mut self, node: Node) -> Option<ElementId> {
        if self.node(&node.id).is_some() {
            return None;
        }
        let id = node.id.clone();
        self.nodes.push(node);
        self.notify_graph();
        Some(id)
    }

    pub fn move_node(&mut self, id: &ElementId, x: f32, y: f32) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return false;
        }
        let Some(n) = self.node_mut(id) else { return false };
        let dx = x - n.x;
        let dy = y - n.y;
        if dx * dx + dy * dy > geometry::tolerance::EPS_POS * geometry::tolerance::EPS_POS {
            n.x = x;
            n.y = y;
        }
        self.notify_graph();
        true
    }

    /// Moves every selected node; edges follow their endpoints.
    pub fn move_selected(&mut self, dx: f32, dy: f32) -> usize {
        if !dx.is_finite() || !dy.is_finite() {
            return 0;
        }
        let refs: Vec<ElementRef> = self.selected.clone();
        let mut moved = 0;
        for r in &refs {
            if let Some(el) = self.element_mut(r) {
                el.move_by(dx, dy);
                if r.is_node() {
                    moved += 1;
                }
            }
        }
        if moved > 0 {
            self.notify_graph();
        }
        moved
    }

    pub fn apply_positions(&mut self, positions: &[(ElementId, Vec2)]) -> usize {
        let mut applied = 0;
        for (id, p) in positions {
            if let Some(n) = self.node_mut(id) {
                n.x = p.x;
                n.y = p.y;
                applied += 1;
            }
        }
        if applied > 0 {
            self.notify_graph();
        }
        applied
    }

    pub fn set_label(&mut self, id: &ElementId, label: Option<&str>) -> Result<()> {
        let label = label.map(str::trim).filter(|l| !l.is_empty());
        if let Some(l) = label {
            self.check_label(l, Some(id))?;
        }
        let node = self.node_mut(id).ok_or_else(|| Error::missing_node(id))?;
        node.label = label.map(str::to_string);
        self.notify_graph();
        Ok(())
    }

    pub fn set_weight(&mut self, id: &ElementId, weight: f64) -> Result<()> {
        if !weight.is_finite() {
            return Err(Error::OutOfBounds { what: "weight".into() });
        }
        let edge = self.edge_mut(id).ok_or_else(|| Error::MissingEdge { id: id.clone() })?;
        edge.weight = weight;
        self.notify_graph();
        Ok(())
    }

    // Edges

    /// True when an edge from `src` to `dst` may be created: both endpoints
    /// exist, they differ and no equivalent edge is present.
    pub fn can_add_edge(&self, src: &ElementId, dst: &ElementId, directed: bool) -> bool {
        if src == dst || self.node(src).is_none() || self.node(dst).is_none() {
            return false;
        }
        !self
            .edges
            .iter()
            .any(|e| e.connects(src, dst) || (!directed && e.connects(dst, src)))
    }

    pub fn add_edge(&mut self, src: &ElementId, dst: &ElementId) -> Option<ElementId> {
        self.add_edge_with(src, dst, model::DEFAULT_WEIGHT, self.defaults.directed)
    }

    /// Self loops, dangling endpoints and duplicates are rejected with `None`.
    pub fn add_edge_with(
        &mut self,
        src: &ElementId,
        dst: &ElementId,
        weight: f64,
        directed: bool,
    ) -> Option<ElementId> {
        if !weight.is_finite() || !self.can_add_edge(src, dst, directed) {
            return None;
        }
        let id = self.fresh_edge_id();
        let mut edge = Edge::new(id.clone(), src.clone(), dst.clone())
            .with_weight(weight)
            .with_directed(directed);
        edge.stroke_width = self.defaults.edge_width;
        self.edges.push(edge);
        self.notify_graph();
        Some(id)
    }

    // Deletion

    /// Removes an element from the container and from the selection. Deleting
    /// a node also deletes its incident edges.
    pub fn delete_element(&mut self, r: &ElementRef) -> bool {
        let removed: HashSet<ElementRef> = match r {
            ElementRef::Node(id) => {
                let Some(pos) = self.nodes.iter().position(|n| &n.id == id) else { return false };
                self.nodes.remove(pos);
                let mut gone: HashSet<ElementRef> = HashSet::from([r.clone()]);
                self.edges.retain(|e| {
                    if e.touches(id) {
                        gone.insert(ElementRef::Edge(e.id.clone()));
                        false
                    } else {
                        true
                    }
                });
                gone
            }
            ElementRef::Edge(id) => {
                let Some(pos) = self.edges.iter().position(|e| &e.id == id) else { return false };
                self.edges.remove(pos);
                HashSet::from([r.clone()])
            }
        };
        let before = self.selected.len();
        self.selected.retain(|s| !removed.contains(s));
        self.notify_graph();
        if self.selected.len() != before {
            self.notify_selection();
        }
        true
    }

    pub fn delete_selected(&mut self) -> usize {
        let refs = self.selected.clone();
        refs.iter().filter(|r| self.delete_element(r)).count()
    }

    /// Replaces the node list. Edges whose endpoints vanished are dropped and
    /// the selection is pruned.
    pub fn set_nodes(&mut self, nodes: Vec<Node>) {
        self.nodes = nodes;
        self.relink_edges();
        self.prune_selection();
        self.notify_graph();
    }

    pub fn set_edges(&mut self, edges: Vec<Edge>) {
        self.edges = edges;
        self.relink_edges();
        self.prune_selection();
        self.notify_graph();
    }

    /// Clears entities, selection and interaction markers. History is kept.
    /// The active tool belongs to the editor, see `Editor::reset`.
    pub(crate) fn reset(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.selected.clear();
        self.selection_box = None;
        self.drag = DragState::NotDragging;
        self.next_node_seq = 1;
        self.next_edge_seq = 1;
        self.notify_graph();
        self.notify_selection();
    }

    /// Re-resolves every edge endpoint against the current node list, dropping
    /// edges that no longer resolve.
    pub(crate) fn relink_edges(&mut self) {
        let ids: HashSet<&ElementId> = self.nodes.iter().map(|n| &n.id).collect();
        let before = self.edges.len();
        self.edges.retain(|e| {
            let ok = ids.contains(&e.src) && ids.contains(&e.dst) && e.src != e.dst;
            if !ok {
                tracing::warn!(edge = %e.id, src = %e.src, dst = %e.dst, "dropping edge with unresolved endpoint");
            }
            ok
        });
        if self.edges.len() != before {
            tracing::debug!(dropped = before - self.edges.len(), "relinked edges");
        }
    }

    fn prune_selection(&mut self) {
        let before = self.selected.len();
        let selected = std::mem::take(&mut self.selected);
        self.selected = selected.into_iter().filter(|r| self.contains(r)).collect();
        if self.selected.len() != before {
            self.notify_selection();
        }
    }

    // Selection

    pub fn is_selected(&self, r: &ElementRef) -> bool {
        self.selected.contains(r)
    }

    /// Adds an element to the selection. Selecting an already selected or
    /// unknown element is a no-op returning `false`.
    pub fn select(&mut self, r: &ElementRef) -> bool {
        if self.is_selected(r) {
            return false;
        }
        let Some(el) = self.element_mut(r) else { return false };
        el.set_selected(true);
        self.selected.push(r.clone());
        self.notify_selection();
        true
    }

    pub fn deselect(&mut self, r: &ElementRef) -> bool {
        let Some(pos) = self.selected.iter().position(|s| s == r) else { return false };
        self.selected.remove(pos);
        if let Some(el) = self.element_mut(r) {
            el.set_selected(false);
        }
        self.notify_selection();
        true
    }

    pub fn toggle_select(&mut self, r: &ElementRef) -> bool {
        if self.is_selected(r) {
            self.deselect(r)
        } else {
            self.select(r)
        }
    }

    /// Replaces the selection. Elements leaving the set are deselected;
    /// unknown and repeated references are dropped.
    pub fn set_selected(&mut self, refs: Vec<ElementRef>) {
        let mut next: Vec<ElementRef> = Vec::with_capacity(refs.len());
        for r in refs {
            if self.contains(&r) && !next.contains(&r) {
                next.push(r);
            }
        }
        let previous = std::mem::take(&mut self.selected);
        for r in previous.iter().filter(|r| !next.contains(r)) {
            if let Some(el) = self.element_mut(r) {
                el.set_selected(false);
            }
        }
        for r in &next {
            if let Some(el) = self.element_mut(r) {
                el.set_selected(true);
            }
        }
        self.selected = next;
        self.notify_selection();
    }

    pub fn clear_selection(&mut self) {
        if self.selected.is_empty() {
            return;
        }
        self.set_selected(Vec::new());
    }

    pub fn select_all(&mut self) {
        let all: Vec<ElementRef> = self
            .nodes
            .iter()
            .filter(|n| !n.hidden)
            .map(|n| n.element_ref())
            .chain(self.edges.iter().filter(|e| !e.hidden).map(|e| e.element_ref()))
            .collect();
        self.set_selected(all);
    }

    pub fn set_selection_box(&mut self, rect: Option<Rect>) {
        self.selection_box = rect;
    }

    /// Rebuilds `selected` from the elements' own flags, nodes first.
    pub(crate) fn selection_from_flags(&mut self) {
        self.selected = self
            .nodes
            .iter()
            .filter(|n| n.selected)
            .map(|n| n.element_ref())
            .chain(self.edges.iter().filter(|e| e.selected).map(|e| e.element_ref()))
            .collect();
    }

    // Listeners

    pub fn subscribe(&mut self, kind: ListenerKind, f: impl FnMut(&GraphEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(kind, Box::new(f))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Globally suppresses (or restores) listener delivery for bulk edits.
    pub fn set_listeners_enabled(&mut self, enabled: bool) {
        self.listeners.set_enabled(enabled);
    }

    pub fn listeners_enabled(&self) -> bool {
        self.listeners.enabled()
    }

    pub(crate) fn notify_graph(&mut self) {
        let event = GraphEvent::GraphChanged { nodes: self.nodes.len(), edges: self.edges.len() };
        self.listeners.emit(event);
    }

    pub(crate) fn notify_selection(&mut self) {
        let event = GraphEvent::SelectionChanged { selected: self.selected.len() };
        self.listeners.emit(event);
    }

    pub(crate) fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
        self.listeners.emit(GraphEvent::ToolChanged(tool));
    }

    // Derived views

    pub fn adjacency(&self) -> AdjacencyView {
        AdjacencyView::from_graph(self)
    }

    pub fn closest_hover_element(&self, x: f32, y: f32) -> Option<ElementRef> {
        algorithms::picking::closest_hover_element(self, Vec2::new(x, y))
    }

    pub fn is_hidden(&self, r: &ElementRef) -> bool {
        self.element(r).map_or(false, |e| e.is_hidden())
    }

    pub fn set_hidden(&mut self, r: &ElementRef, hidden: bool) -> bool {
        let Some(el) = self.element_mut(r) else { return false };
        el.set_hidden(hidden);
        self.notify_graph();
        true
    }
}
