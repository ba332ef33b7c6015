use super::{Session, Tool};
use crate::algorithms::picking::node_at;
use crate::input::{MouseButton, PointerEvent};
use crate::model::{Vec2, DEFAULT_WEIGHT};

pub fn tool() -> Tool {
    Tool {
        mouse_down: Some(mouse_down),
        mouse_up: Some(mouse_up),
        mouse_move: Some(mouse_move),
        clean: Some(clean),
        ..Tool::default()
    }
}

/// Pressing on a node starts an edge from it.
fn mouse_down(s: &mut Session, ev: &PointerEvent, p: Vec2) {
    if ev.button != MouseButton::Left {
        return;
    }
    if let Some(id) = node_at(&s.graph, p) {
        s.interaction.edge_from = Some(id);
        s.interaction.edge_end = Some(p);
    }
}

fn mouse_move(s: &mut Session, _ev: &PointerEvent, p: Vec2) {
    if s.interaction.edge_from.is_some() {
        s.interaction.edge_end = Some(p);
    }
}

/// Releasing on a different node commits the edge. Shift, or the
/// `directed_edges` setting, makes it directed.
fn mouse_up(s: &mut Session, ev: &PointerEvent, p: Vec2) {
    if ev.button != MouseButton::Left {
        return;
    }
    s.interaction.edge_end = None;
    let Some(from) = s.interaction.edge_from.take() else { return };
    let Some(to) = node_at(&s.graph, p) else { return };
    let directed = s.config.directed_edges || ev.modifiers.shift;
    if !s.graph.can_add_edge(&from, &to, directed) {
        tracing::debug!(src = %from, dst = %to, "edge rejected");
        return;
    }
    s.graph.record_memento();
    if let Some(id) = s.graph.add_edge_with(&from, &to, DEFAULT_WEIGHT, directed) {
        tracing::debug!(edge = %id, src = %from, dst = %to, "edge added");
    }
}

fn clean(s: &mut Session) {
    s.interaction.edge_from = None;
    s.interaction.edge_end = None;
}
