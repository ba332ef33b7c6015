use crate::error;
use crate::interop::{arr_f32, arr_str, new_obj, set_kv, to_js};
use crate::Editor;
use graphedit::algorithms::{coloring, hamiltonian, pert, shortest_path, spanning_tree, toposort, traversal};
use graphedit::events::{GraphEvent, ListenerId, ListenerKind};
use graphedit::input::{KeyEvent, Modifiers, MouseButton, PointerEvent, ScrollEvent};
use graphedit::model::{ElementId, ElementRef};
use graphedit::{EditorConfig, GraphRecord, LayoutKind};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Modifier bit mask: 1 shift, 2 ctrl, 4 alt, 8 meta.
fn modifiers(bits: u8) -> Modifiers {
    Modifiers { shift: bits & 1 != 0, ctrl: bits & 2 != 0, alt: bits & 4 != 0, meta: bits & 8 != 0 }
}

fn pointer(x: f32, y: f32, button: u8, mods: u8) -> Option<PointerEvent> {
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    let button = MouseButton::from_index(button)?;
    Some(PointerEvent::new(x, y).with_button(button).with_modifiers(modifiers(mods)))
}

fn ok_ser<T: Serialize + ?Sized>(v: &T) -> JsValue {
    match to_js(v) {
        Ok(v) => error::ok(v),
        Err(e) => error::serialize(e),
    }
}

fn envelope<T: Serialize>(r: graphedit::Result<T>) -> JsValue {
    match r {
        Ok(v) => ok_ser(&v),
        Err(e) => error::from_core(&e),
    }
}

fn event_obj(ev: &GraphEvent) -> JsValue {
    let o = new_obj();
    match ev {
        GraphEvent::GraphChanged { nodes, edges } => {
            set_kv(&o, "type", &JsValue::from_str("graph"));
            set_kv(&o, "nodes", &JsValue::from_f64(*nodes as f64));
            set_kv(&o, "edges", &JsValue::from_f64(*edges as f64));
        }
        GraphEvent::SelectionChanged { selected } => {
            set_kv(&o, "type", &JsValue::from_str("selection"));
            set_kv(&o, "selected", &JsValue::from_f64(*selected as f64));
        }
        GraphEvent::ToolChanged(tool) => {
            set_kv(&o, "type", &JsValue::from_str("tool"));
            set_kv(&o, "tool", &JsValue::from_str(tool.name()));
        }
    }
    o.into()
}

#[wasm_bindgen]
impl Editor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Editor {
        Editor::rs_new(EditorConfig::default())
    }

    /// Builds an editor from a JSON config; unknown keys are ignored and
    /// missing keys keep their defaults. Throws on invalid config.
    pub fn with_config(json: &str) -> Result<Editor, JsValue> {
        EditorConfig::from_json_str(json)
            .map(Editor::rs_new)
            .map_err(|e| error::from_core(&e))
    }

    /// Same as [`Editor::with_config`] for a plain JS object.
    pub fn with_config_obj(cfg: JsValue) -> Result<Editor, JsValue> {
        let cfg: EditorConfig = serde_wasm_bindgen::from_value(cfg).map_err(error::json_parse)?;
        cfg.validate().map_err(|e| error::from_core(&e))?;
        Ok(Editor::rs_new(cfg))
    }

    // Raw input. Each returns whether the host should suppress its default action.
    pub fn mouse_down(&mut self, x: f32, y: f32, button: u8, mods: u8) -> bool {
        pointer(x, y, button, mods).map_or(false, |ev| self.inner.mouse_down(&ev).handled)
    }
    pub fn mouse_up(&mut self, x: f32, y: f32, button: u8, mods: u8) -> bool {
        pointer(x, y, button, mods).map_or(false, |ev| self.inner.mouse_up(&ev).handled)
    }
    pub fn mouse_move(&mut self, x: f32, y: f32, button: u8, mods: u8) -> bool {
        pointer(x, y, button, mods).map_or(false, |ev| self.inner.mouse_move(&ev).handled)
    }
    pub fn double_click(&mut self, x: f32, y: f32, button: u8, mods: u8) -> bool {
        pointer(x, y, button, mods).map_or(false, |ev| self.inner.double_click(&ev).handled)
    }
    pub fn key_down(&mut self, key: &str, mods: u8) -> bool {
        self.inner.key_down(&KeyEvent::new(key).with_modifiers(modifiers(mods))).handled
    }
    pub fn key_up(&mut self, key: &str, mods: u8) -> bool {
        self.inner.key_up(&KeyEvent::new(key).with_modifiers(modifiers(mods))).handled
    }
    pub fn scroll(&mut self, dx: f32, dy: f32, mods: u8) -> bool {
        self.inner.scroll(&ScrollEvent { dx, dy, modifiers: modifiers(mods) }).handled
    }
    pub fn resize(&mut self, width: f32, height: f32) {
        self.inner.resize(width, height);
    }
    pub fn focus(&mut self) {
        self.inner.focus();
    }
    pub fn blur(&mut self) {
        self.inner.blur();
    }

    // Tools
    pub fn active_tool(&self) -> Option<String> {
        self.inner.active_tool().map(|t| t.name().to_string())
    }
    pub fn set_tool(&mut self, name: &str) -> bool {
        self.inner.set_active_tool_by_name(name).is_ok()
    }
    pub fn set_tool_res(&mut self, name: &str) -> JsValue {
        match self.inner.set_active_tool_by_name(name) {
            Ok(()) => error::ok(JsValue::from_str(name)),
            Err(e) => error::from_core(&e),
        }
    }

    // History
    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }
    pub fn redo(&mut self) -> bool {
        self.inner.redo()
    }
    pub fn can_undo(&self) -> bool {
        self.inner.graph().can_undo()
    }
    pub fn can_redo(&self) -> bool {
        self.inner.graph().can_redo()
    }
    /// Empties the graph and selects the select tool; history survives.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    // Direct edits, each one undo step
    pub fn add_node_res(&mut self, x: f32, y: f32, label: Option<String>) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        let g = self.inner.graph_mut();
        if let Some(l) = &label {
            if let Err(e) = g.check_new_label(l) {
                return error::from_core(&e);
            }
        }
        g.record_memento();
        let r = match label {
            Some(l) => g.add_node_with_label(x, y, &l),
            None => Ok(g.add_node(x, y)),
        };
        match r {
            Ok(id) => error::ok(JsValue::from_str(id.as_str())),
            Err(e) => error::from_core(&e),
        }
    }
    pub fn add_edge_res(&mut self, src: &str, dst: &str, weight: f64, directed: bool) -> JsValue {
        if !weight.is_finite() {
            return error::non_finite("weight");
        }
        let g = self.inner.graph_mut();
        let (s, d) = (ElementId::new(src), ElementId::new(dst));
        if g.node(&s).is_none() {
            return error::invalid_id("node", src);
        }
        if g.node(&d).is_none() {
            return error::invalid_id("node", dst);
        }
        if !g.can_add_edge(&s, &d, directed) {
            return error::err("invalid_edge", "self loop or duplicate edge", None);
        }
        g.record_memento();
        match g.add_edge_with(&s, &d, weight, directed) {
            Some(id) => error::ok(JsValue::from_str(id.as_str())),
            None => error::err("invalid_edge", "failed to add edge", None),
        }
    }
    pub fn delete_selected(&mut self) -> u32 {
        self.inner.delete_selected() as u32
    }
    pub fn apply_edit_res(&mut self, text: &str) -> JsValue {
        match self.inner.apply_edit(text) {
            Ok(()) => error::ok(JsValue::TRUE),
            Err(e) => error::from_core(&e),
        }
    }
    pub fn node_count(&self) -> u32 {
        self.inner.graph().node_count() as u32
    }
    pub fn edge_count(&self) -> u32 {
        self.inner.graph().edge_count() as u32
    }

    // Rendering
    /// Per-frame snapshot: nodes, edges, selection, rubber band, previews, pan offset.
    pub fn frame(&self) -> JsValue {
        to_js(&self.inner.frame()).unwrap_or(JsValue::NULL)
    }
    pub fn frame_res(&self) -> JsValue {
        ok_ser(&self.inner.frame())
    }
    /// Node centers as `[x0, y0, x1, y1, ...]`, in container order.
    pub fn node_positions(&self) -> js_sys::Float32Array {
        let flat: Vec<f32> = self.inner.graph().nodes().iter().flat_map(|n| [n.x, n.y]).collect();
        arr_f32(&flat)
    }
    pub fn selected(&self) -> JsValue {
        to_js(self.inner.graph().selected()).unwrap_or(JsValue::NULL)
    }

    // Persistence
    pub fn to_json_res(&self) -> JsValue {
        match self.inner.graph().to_json_string() {
            Ok(s) => error::ok(JsValue::from_str(&s)),
            Err(e) => error::from_core(&e),
        }
    }
    pub fn from_json_res(&mut self, json: &str) -> JsValue {
        self.inner.session_mut().cancel_interaction();
        envelope(self.inner.graph_mut().load_json_str(json))
    }
    pub fn from_record_res(&mut self, v: JsValue) -> JsValue {
        let record: GraphRecord = match serde_wasm_bindgen::from_value(v) {
            Ok(r) => r,
            Err(e) => return error::json_parse(e),
        };
        self.inner.session_mut().cancel_interaction();
        envelope(self.inner.graph_mut().load_record(&record))
    }
    pub fn load_edge_list_res(&mut self, text: &str) -> JsValue {
        envelope(self.inner.load_edge_list(text))
    }
    pub fn to_edge_list_res(&self) -> JsValue {
        envelope(self.inner.graph().to_edge_list())
    }

    // Clipboard
    pub fn copy(&mut self) -> JsValue {
        self.inner.copy();
        match &self.inner.session().clipboard {
            Some(c) => c.to_json_string().map(|s| JsValue::from_str(&s)).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }
    /// Pastes the internal clipboard, or `json` when given (a clipboard
    /// record from another editor).
    pub fn paste_res(&mut self, json: Option<String>) -> JsValue {
        if let Some(json) = json {
            match graphedit::ClipboardRecord::from_json_str(&json) {
                Ok(c) => self.inner.session_mut().clipboard = Some(c),
                Err(e) => return error::from_core(&e),
            }
        }
        envelope(self.inner.paste())
    }

    // Algorithms
    pub fn bfs_res(&self, start: &str) -> JsValue {
        envelope(traversal::bfs(&self.inner.graph().adjacency(), &ElementId::new(start)))
    }
    pub fn dfs_res(&self, start: &str) -> JsValue {
        envelope(traversal::dfs(&self.inner.graph().adjacency(), &ElementId::new(start)))
    }
    pub fn dijkstra_res(&self, start: &str) -> JsValue {
        envelope(shortest_path::dijkstra(&self.inner.graph().adjacency(), &ElementId::new(start)))
    }
    /// `method` is `"kahn"` (default) or `"dfs"`.
    pub fn toposort_res(&self, method: Option<String>) -> JsValue {
        let view = self.inner.graph().adjacency();
        match method.as_deref() {
            None | Some("kahn") => ok_ser(&toposort::toposort_kahn(&view)),
            Some("dfs") => ok_ser(&toposort::toposort_dfs(&view)),
            Some(other) => error::err("invalid_method", format!("unknown toposort method {:?}", other), None),
        }
    }
    pub fn kruskal_res(&self) -> JsValue {
        ok_ser(&spanning_tree::kruskal(&self.inner.graph().adjacency()))
    }
    pub fn components_res(&self) -> JsValue {
        ok_ser(&traversal::connected_components(&self.inner.graph().adjacency()))
    }
    pub fn critical_nodes_res(&self) -> JsValue {
        let critical = traversal::critical_nodes(&self.inner.graph().adjacency());
        error::ok(arr_str(critical.iter().map(|id| id.as_str())).into())
    }
    pub fn hamiltonian_res(&self, start: Option<String>, cycle: bool, all: bool) -> JsValue {
        let opts = hamiltonian::HamiltonOptions {
            start: start.map(ElementId::new),
            cycle,
            all,
            ..Default::default()
        };
        envelope(hamiltonian::hamiltonian(&self.inner.graph().adjacency(), &opts))
    }
    pub fn coloring_res(&self, start: Option<String>) -> JsValue {
        let start = start.map(ElementId::new);
        envelope(coloring::color_graph(&self.inner.graph().adjacency(), start.as_ref()))
    }
    pub fn pert_res(&self) -> JsValue {
        envelope(pert::pert(&self.inner.graph().adjacency()))
    }

    // Layout
    pub fn layout_res(&mut self, kind: &str, root: Option<String>) -> JsValue {
        let kind: LayoutKind = match kind.parse() {
            Ok(k) => k,
            Err(e) => return error::from_core(&e),
        };
        let root = root.map(ElementId::new);
        envelope(self.inner.apply_layout(kind, root.as_ref()))
    }

    // Listeners
    /// Subscribes `callback` to `"graph"`, `"selection"` or `"tool"` events.
    /// Returns the listener id.
    pub fn on_res(&mut self, kind: &str, callback: js_sys::Function) -> JsValue {
        let kind = match kind {
            "graph" => ListenerKind::Graph,
            "selection" => ListenerKind::Selection,
            "tool" => ListenerKind::Tool,
            other => return error::err("invalid_kind", format!("unknown listener kind {:?}", other), None),
        };
        let id = self.inner.graph_mut().subscribe(kind, move |ev| {
            if let Err(e) = callback.call1(&JsValue::NULL, &event_obj(ev)) {
                web_sys::console::error_2(&JsValue::from_str("graphedit listener failed:"), &e);
            }
        });
        error::ok(JsValue::from_f64(id.0 as f64))
    }
    pub fn off(&mut self, id: f64) -> bool {
        id >= 0.0 && self.inner.graph_mut().unsubscribe(ListenerId(id as u64))
    }

    /// Selects the given element; `kind` is `"node"` or `"edge"`.
    pub fn select_res(&mut self, kind: &str, id: &str, additive: bool) -> JsValue {
        let r = match kind {
            "node" => ElementRef::Node(ElementId::new(id)),
            "edge" => ElementRef::Edge(ElementId::new(id)),
            _ => return error::err("invalid_kind", format!("unknown element kind {:?}", kind), None),
        };
        let g = self.inner.graph_mut();
        if !g.contains(&r) {
            return error::invalid_id(kind, id);
        }
        if additive {
            g.select(&r);
        } else {
            g.set_selected(vec![r]);
        }
        error::ok(JsValue::TRUE)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Editor::new()
    }
}
