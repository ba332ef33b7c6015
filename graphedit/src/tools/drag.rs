//! Moves one node without touching the selection; pressing on empty space
//! pans the viewport instead.

use super::{DragState, Session, Tool};
use crate::algorithms::picking::node_at;
use crate::input::{MouseButton, PointerEvent};
use crate::model::Vec2;

pub fn tool() -> Tool {
    Tool {
        mouse_down: Some(mouse_down),
        mouse_up: Some(mouse_up),
        mouse_move: Some(mouse_move),
        clean: Some(clean),
        ..Tool::default()
    }
}

fn mouse_down(s: &mut Session, ev: &PointerEvent, p: Vec2) {
    if ev.button != MouseButton::Left {
        return;
    }
    match node_at(&s.graph, p) {
        Some(id) => {
            s.begin_snapshot();
            s.interaction.drag_node = Some(id);
            s.interaction.drag_last = Some(p);
            s.graph.drag = DragState::Armed;
        }
        // The default layer moves the viewport while `pan_last` is set.
        None => s.interaction.pan_last = Some(Vec2::new(ev.x, ev.y)),
    }
}

fn mouse_move(s: &mut Session, ev: &PointerEvent, p: Vec2) {
    let (Some(id), Some(last)) = (s.interaction.drag_node.clone(), s.interaction.drag_last) else { return };
    let Some(node) = s.graph.node(&id) else { return };
    let target = s.snapped(Vec2::new(node.x + p.x - last.x, node.y + p.y - last.y), ev.modifiers.shift);
    let moved = Vec2::new(target.x - node.x, target.y - node.y);
    if moved.x == 0.0 && moved.y == 0.0 {
        return;
    }
    s.graph.move_node(&id, target.x, target.y);
    s.graph.drag = DragState::Dragging;
    s.interaction.drag_last = Some(Vec2::new(last.x + moved.x, last.y + moved.y));
}

fn mouse_up(s: &mut Session, ev: &PointerEvent, _p: Vec2) {
    if ev.button != MouseButton::Left {
        return;
    }
    s.interaction.pan_last = None;
    if s.interaction.drag_node.take().is_none() {
        return;
    }
    if s.graph.drag == DragState::Dragging {
        s.commit_snapshot();
    } else {
        s.discard_snapshot();
    }
    s.graph.drag = DragState::NotDragging;
    s.interaction.drag_last = None;
}

fn clean(s: &mut Session) {
    s.cancel_interaction();
}
