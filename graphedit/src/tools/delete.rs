use super::{Session, Tool};
use crate::input::{MouseButton, PointerEvent};
use crate::model::Vec2;

pub fn tool() -> Tool {
    Tool { mouse_down: Some(mouse_down), ..Tool::default() }
}

fn mouse_down(s: &mut Session, ev: &PointerEvent, p: Vec2) {
    if ev.button != MouseButton::Left {
        return;
    }
    let Some(hit) = s.graph.closest_hover_element(p.x, p.y) else { return };
    s.graph.record_memento();
    s.graph.delete_element(&hit);
    tracing::debug!(element = %hit.id(), "deleted");
}
