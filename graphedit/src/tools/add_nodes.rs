use super::{Session, Tool};
use crate::input::{MouseButton, PointerEvent};
use crate::model::{Color, Node, Vec2};

pub fn tool() -> Tool {
    Tool {
        setup: Some(setup),
        mouse_down: Some(mouse_down),
        mouse_move: Some(mouse_move),
        clean: Some(clean),
        ..Tool::default()
    }
}

const PREVIEW_ALPHA: u8 = 96;

fn preview_at(s: &Session, p: Vec2) -> Node {
    let mut n = Node::new("preview", p.x, p.y).with_radius(s.graph.defaults.node_radius);
    n.fill = Color::WHITE.with_alpha(PREVIEW_ALPHA);
    n.label_color = Color::BLACK.with_alpha(PREVIEW_ALPHA);
    n.label = Some(String::new());
    n
}

fn setup(s: &mut Session) {
    let p = s.snapped(s.pointer, false);
    s.interaction.preview = Some(preview_at(s, p));
}

fn mouse_move(s: &mut Session, ev: &PointerEvent, p: Vec2) {
    let p = s.snapped(p, ev.modifiers.shift);
    s.interaction.preview = Some(preview_at(s, p));
}

/// Left click commits a node where the preview is.
fn mouse_down(s: &mut Session, ev: &PointerEvent, p: Vec2) {
    if ev.button != MouseButton::Left {
        return;
    }
    let p = s.snapped(p, ev.modifiers.shift);
    s.graph.record_memento();
    let id = s.graph.add_node(p.x, p.y);
    tracing::debug!(node = %id, x = p.x, y = p.y, "node added");
}

fn clean(s: &mut Session) {
    s.interaction.preview = None;
}
