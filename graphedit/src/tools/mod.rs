//! Interaction tools and the event dispatcher.
//!
//! A [`Tool`] is a bundle of optional callbacks. [`Editor`] owns the
//! [`Session`] all callbacks operate on, routes every raw event through the
//! default shortcut layer first and then to the active tool.

pub mod add_nodes;
pub mod delete;
pub mod drag;
pub mod edges;
pub mod edit;
pub mod select;
pub mod shortcuts;

use crate::clipboard::ClipboardRecord;
use crate::config::EditorConfig;
use crate::error::{Error, Result};
use crate::geometry::tolerance::snap;
use crate::input::{EventOutcome, KeyEvent, PointerEvent, ScrollEvent};
use crate::layout::{LayoutKind, LayoutOutcome};
use crate::model::{ElementId, ElementRef, Node, Vec2};
use crate::render::Frame;
use crate::Graph;
use serde::{Deserialize, Serialize};
use shortcuts::ShortcutAction;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    Select,
    AddNodes,
    Edges,
    Delete,
    Drag,
    Edit,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Select,
        ToolKind::AddNodes,
        ToolKind::Edges,
        ToolKind::Delete,
        ToolKind::Drag,
        ToolKind::Edit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::AddNodes => "add-nodes",
            ToolKind::Edges => "edges",
            ToolKind::Delete => "delete",
            ToolKind::Drag => "drag",
            ToolKind::Edit => "edit",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ToolKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| Error::UnknownTool(s.to_string()))
    }
}

/// Pointer drag progress: pressed on a selected element, then moved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    NotDragging,
    Armed,
    Dragging,
}

/// Pointer callbacks get the raw event and its world-space position.
pub type PointerFn = fn(&mut Session, &PointerEvent, Vec2);
pub type KeyFn = fn(&mut Session, &KeyEvent);
pub type ScrollFn = fn(&mut Session, &ScrollEvent);
pub type ResizeFn = fn(&mut Session, f32, f32);
pub type HookFn = fn(&mut Session);

#[derive(Clone, Copy, Debug, Default)]
pub struct Tool {
    pub setup: Option<HookFn>,
    pub mouse_down: Option<PointerFn>,
    pub mouse_up: Option<PointerFn>,
    pub mouse_move: Option<PointerFn>,
    pub double_click: Option<PointerFn>,
    pub key_down: Option<KeyFn>,
    pub key_up: Option<KeyFn>,
    pub scroll: Option<ScrollFn>,
    pub resize: Option<ResizeFn>,
    pub focus: Option<HookFn>,
    pub blur: Option<HookFn>,
    pub clean: Option<HookFn>,
}

#[derive(Clone, Debug)]
pub struct ToolRegistry {
    tools: Vec<(ToolKind, Tool)>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        ToolRegistry::standard()
    }
}

impl ToolRegistry {
    pub fn empty() -> Self {
        ToolRegistry { tools: Vec::new() }
    }

    /// Registry with the built-in behavior for every [`ToolKind`].
    pub fn standard() -> Self {
        let mut r = ToolRegistry::empty();
        r.register(ToolKind::Select, select::tool());
        r.register(ToolKind::AddNodes, add_nodes::tool());
        r.register(ToolKind::Edges, edges::tool());
        r.register(ToolKind::Delete, delete::tool());
        r.register(ToolKind::Drag, drag::tool());
        r.register(ToolKind::Edit, edit::tool());
        r
    }

    /// Installs or replaces the callbacks for `kind`.
    pub fn register(&mut self, kind: ToolKind, tool: Tool) {
        match self.tools.iter_mut().find(|(k, _)| *k == kind) {
            Some(slot) => slot.1 = tool,
            None => self.tools.push((kind, tool)),
        }
    }

    pub fn get(&self, kind: ToolKind) -> Option<&Tool> {
        self.tools.iter().find(|(k, _)| *k == kind).map(|(_, t)| t)
    }
}

/// Transient state of the interaction in progress.
#[derive(Clone, Debug, Default)]
pub struct Interaction {
    /// Translucent node following the pointer (add-nodes).
    pub preview: Option<Node>,
    /// Node an edge is being drawn from, and the current free end.
    pub edge_from: Option<ElementId>,
    pub edge_end: Option<Vec2>,
    /// Rubber band anchor and the selection it extends.
    pub box_origin: Option<Vec2>,
    pub box_base: Vec<ElementRef>,
    pub drag_last: Option<Vec2>,
    /// Single node moved by the drag tool.
    pub drag_node: Option<ElementId>,
    /// Last screen position while panning.
    pub pan_last: Option<Vec2>,
    /// An undo snapshot was recorded optimistically for this interaction.
    pub speculative: bool,
    pub editing: Option<ElementRef>,
}

/// Everything a tool callback may touch.
#[derive(Debug)]
pub struct Session {
    pub graph: Graph,
    pub config: EditorConfig,
    /// Viewport pan; world = screen - offset.
    pub offset: Vec2,
    pub viewport: Vec2,
    /// Last pointer position, world space.
    pub pointer: Vec2,
    pub focused: bool,
    pub interaction: Interaction,
    pub clipboard: Option<ClipboardRecord>,
}

impl Session {
    pub fn new(config: EditorConfig) -> Self {
        Session {
            graph: Graph::with_config(&config),
            viewport: Vec2::new(config.layout.canvas_width, config.layout.canvas_height),
            config,
            offset: Vec2::default(),
            pointer: Vec2::default(),
            focused: true,
            interaction: Interaction::default(),
            clipboard: None,
        }
    }

    pub fn to_world(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x - self.offset.x, y - self.offset.y)
    }

    /// Grid-snapped position when snapping is configured or `force`d.
    pub fn snapped(&self, p: Vec2, force: bool) -> Vec2 {
        if force || self.graph.grid.snap {
            Vec2::new(snap(p.x, self.graph.grid.size), snap(p.y, self.graph.grid.size))
        } else {
            p
        }
    }

    /// Records an undo snapshot that may later be dropped with
    /// [`Session::discard_snapshot`] if the interaction changes nothing.
    pub fn begin_snapshot(&mut self) {
        self.interaction.speculative = self.graph.record_memento();
    }

    /// Keeps the speculative snapshot.
    pub fn commit_snapshot(&mut self) {
        self.interaction.speculative = false;
    }

    /// Drops the speculative snapshot, if this interaction pushed one.
    pub fn discard_snapshot(&mut self) {
        if std::mem::take(&mut self.interaction.speculative) {
            self.graph.discard_last_snapshot();
        }
    }

    /// Abandons any interaction in progress. Unfinished drags keep whatever
    /// they already moved, together with their snapshot.
    pub fn cancel_interaction(&mut self) {
        if self.graph.drag == DragState::Dragging {
            self.commit_snapshot();
        } else {
            self.discard_snapshot();
        }
        let editing = self.interaction.editing.take();
        self.interaction = Interaction { editing, ..Interaction::default() };
        self.graph.drag = DragState::NotDragging;
        self.graph.set_selection_box(None);
    }

    /// Renderer snapshot including interaction previews.
    pub fn frame(&self) -> Frame<'_> {
        let mut f = self.graph.frame();
        f.preview_node = self.interaction.preview.clone();
        f.preview_edge = match (&self.interaction.edge_from, self.interaction.edge_end) {
            (Some(from), Some(end)) => self.graph.node(from).map(|n| (n.pos(), end)),
            _ => None,
        };
        f.offset = self.offset;
        f
    }
}

/// Owns the session and the tool registry; the entry point for host events.
#[derive(Debug)]
pub struct Editor {
    session: Session,
    registry: ToolRegistry,
    active: Option<ToolKind>,
}

impl Default for Editor {
    fn default() -> Self {
        Editor::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Editor::with_registry(config, ToolRegistry::standard())
    }

    pub fn with_registry(config: EditorConfig, registry: ToolRegistry) -> Self {
        let mut editor = Editor { session: Session::new(config), registry, active: None };
        editor.set_active_tool(ToolKind::Select);
        editor
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
    pub fn graph(&self) -> &Graph {
        &self.session.graph
    }
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.session.graph
    }
    pub fn active_tool(&self) -> Option<ToolKind> {
        self.active
    }
    pub fn frame(&self) -> Frame<'_> {
        self.session.frame()
    }

    fn tool(&self) -> Option<Tool> {
        self.active.and_then(|k| self.registry.get(k).copied())
    }

    /// Runs the current tool's `clean`, swaps, runs the new tool's `setup`
    /// and notifies tool listeners.
    pub fn set_active_tool(&mut self, kind: ToolKind) {
        if let Some(clean) = self.tool().and_then(|t| t.clean) {
            clean(&mut self.session);
        }
        let previous = self.active.replace(kind);
        if let Some(setup) = self.tool().and_then(|t| t.setup) {
            setup(&mut self.session);
        }
        self.session.graph.set_tool(kind);
        tracing::debug!(from = ?previous, to = %kind, "tool activated");
    }

    pub fn set_active_tool_by_name(&mut self, name: &str) -> Result<()> {
        let kind: ToolKind = name.parse()?;
        self.set_active_tool(kind);
        Ok(())
    }

    // Event dispatch

    /// Default layer first; the active tool's callback runs whenever it
    /// exists, and only the default layer decides `handled`.
    fn pointer(
        &mut self,
        ev: &PointerEvent,
        default: fn(&mut Session, &PointerEvent) -> bool,
        pick: fn(&Tool) -> Option<PointerFn>,
    ) -> EventOutcome {
        self.session.pointer = self.session.to_world(ev.x, ev.y);
        let handled = default(&mut self.session, ev);
        // Panning may have moved the viewport.
        let world = self.session.to_world(ev.x, ev.y);
        self.session.pointer = world;
        if let Some(cb) = self.tool().as_ref().and_then(pick) {
            cb(&mut self.session, ev, world);
        }
        EventOutcome { handled }
    }

    pub fn mouse_down(&mut self, ev: &PointerEvent) -> EventOutcome {
        self.pointer(ev, shortcuts::mouse_down, |t| t.mouse_down)
    }

    pub fn mouse_up(&mut self, ev: &PointerEvent) -> EventOutcome {
        self.pointer(ev, shortcuts::mouse_up, |t| t.mouse_up)
    }

    pub fn mouse_move(&mut self, ev: &PointerEvent) -> EventOutcome {
        self.pointer(ev, shortcuts::mouse_move, |t| t.mouse_move)
    }

    pub fn double_click(&mut self, ev: &PointerEvent) -> EventOutcome {
        self.pointer(ev, |_, _| false, |t| t.double_click)
    }

    pub fn key_down(&mut self, ev: &KeyEvent) -> EventOutcome {
        let action = shortcuts::key_action(ev);
        let before = self.active;
        if let Some(action) = action {
            self.run_shortcut(action);
        }
        // A hotkey that switched tools is not replayed to the new tool.
        if self.active == before {
            if let Some(cb) = self.tool().and_then(|t| t.key_down) {
                cb(&mut self.session, ev);
            }
        }
        EventOutcome { handled: action.is_some() }
    }

    pub fn key_up(&mut self, ev: &KeyEvent) -> EventOutcome {
        if let Some(cb) = self.tool().and_then(|t| t.key_up) {
            cb(&mut self.session, ev);
        }
        EventOutcome::default()
    }

    pub fn scroll(&mut self, ev: &ScrollEvent) -> EventOutcome {
        let handled = shortcuts::scroll(&mut self.session, ev);
        if let Some(cb) = self.tool().and_then(|t| t.scroll) {
            cb(&mut self.session, ev);
        }
        EventOutcome { handled }
    }

    pub fn resize(&mut self, width: f32, height: f32) -> EventOutcome {
        if !(width.is_finite() && height.is_finite()) {
            return EventOutcome::default();
        }
        self.session.viewport = Vec2::new(width.max(0.0), height.max(0.0));
        if let Some(cb) = self.tool().and_then(|t| t.resize) {
            cb(&mut self.session, width, height);
        }
        EventOutcome::default()
    }

    pub fn focus(&mut self) -> EventOutcome {
        self.session.focused = true;
        if let Some(cb) = self.tool().and_then(|t| t.focus) {
            cb(&mut self.session);
        }
        EventOutcome::default()
    }

    /// Losing focus abandons the interaction in progress.
    pub fn blur(&mut self) -> EventOutcome {
        self.session.focused = false;
        self.session.cancel_interaction();
        if let Some(cb) = self.tool().and_then(|t| t.blur) {
            cb(&mut self.session);
        }
        EventOutcome::default()
    }

    fn run_shortcut(&mut self, action: ShortcutAction) {
        tracing::trace!(?action, "shortcut");
        match action {
            ShortcutAction::Undo => {
                self.undo();
            }
            ShortcutAction::Redo => {
                self.redo();
            }
            ShortcutAction::SelectAll => self.session.graph.select_all(),
            ShortcutAction::DeleteSelected => {
                self.delete_selected();
            }
            ShortcutAction::Cancel => {
                self.session.cancel_interaction();
                self.session.interaction.editing = None;
                self.session.graph.clear_selection();
            }
            ShortcutAction::Copy => self.copy(),
            ShortcutAction::Paste => {
                if let Err(e) = self.paste() {
                    tracing::warn!(error = %e, "paste failed");
                }
            }
            ShortcutAction::Nudge(dx, dy) => {
                let step = if self.session.graph.grid.size > 0.0 { self.session.graph.grid.size } else { 1.0 };
                self.nudge(dx * step, dy * step);
            }
            ShortcutAction::SwitchTool(kind) => self.set_active_tool(kind),
        }
    }

    // Editing commands

    /// Empties the graph and returns to the select tool. History is kept.
    pub fn reset(&mut self) {
        self.session.cancel_interaction();
        self.session.interaction.editing = None;
        self.session.graph.reset();
        self.set_active_tool(ToolKind::Select);
    }

    pub fn undo(&mut self) -> bool {
        self.session.cancel_interaction();
        self.session.graph.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.session.cancel_interaction();
        self.session.graph.redo()
    }

    /// Deletes the selection inside one undo snapshot.
    pub fn delete_selected(&mut self) -> usize {
        if self.session.graph.selected.is_empty() {
            return 0;
        }
        self.session.graph.record_memento();
        self.session.graph.delete_selected()
    }

    /// Moves the selected nodes inside one undo snapshot.
    pub fn nudge(&mut self, dx: f32, dy: f32) -> usize {
        if !self.session.graph.selected.iter().any(ElementRef::is_node) {
            return 0;
        }
        self.session.graph.record_memento();
        self.session.graph.move_selected(dx, dy)
    }

    pub fn copy(&mut self) {
        let clip = self.session.graph.copy_selection(self.session.pointer);
        tracing::debug!(nodes = clip.graph.nodes.len(), edges = clip.graph.edges.len(), "copied");
        self.session.clipboard = Some(clip);
    }

    /// Pastes the internal clipboard at the last pointer position.
    pub fn paste(&mut self) -> Result<Vec<ElementRef>> {
        let Some(clip) = self.session.clipboard.clone() else { return Ok(Vec::new()) };
        let at = self.session.pointer;
        self.session.graph.paste(&clip, at)
    }

    /// Applies `text` to the current edit target: a node's new label, or an
    /// edge's new weight. The change is one undo step.
    pub fn apply_edit(&mut self, text: &str) -> Result<()> {
        let target = self
            .session
            .interaction
            .editing
            .clone()
            .ok_or_else(|| Error::InvalidStructure("no element is being edited".into()))?;
        let graph = &mut self.session.graph;
        let result = match &target {
            ElementRef::Node(id) => {
                let label = Some(text.trim()).filter(|t| !t.is_empty());
                if graph.node(id).is_none() {
                    Err(Error::missing_node(id))
                } else if let Some(Err(e)) = label.map(|l| graph.check_label(l, Some(id))) {
                    Err(e)
                } else {
                    graph.record_memento();
                    graph.set_label(id, label)
                }
            }
            ElementRef::Edge(id) => {
                let weight: f64 = text.trim().parse().map_err(|_| Error::Parse {
                    line: 1,
                    message: format!("invalid weight {:?}", text.trim()),
                })?;
                if graph.edge(id).is_none() {
                    Err(Error::MissingEdge { id: id.clone() })
                } else if !weight.is_finite() {
                    Err(Error::OutOfBounds { what: "weight".into() })
                } else {
                    graph.record_memento();
                    graph.set_weight(id, weight)
                }
            }
        };
        if result.is_ok() {
            self.session.interaction.editing = None;
        }
        result
    }

    pub fn apply_layout(&mut self, kind: LayoutKind, root: Option<&ElementId>) -> Result<LayoutOutcome> {
        self.session.cancel_interaction();
        let cfg = self.session.config.layout.clone();
        self.session.graph.apply_layout(kind, root, &cfg)
    }

    pub fn load_edge_list(&mut self, text: &str) -> Result<()> {
        self.session.cancel_interaction();
        let cfg = self.session.config.layout.clone();
        self.session.graph.load_edge_list(text, &cfg)
    }
}
