//! Picks the element whose label or weight the host should edit. The new
//! value comes back through `Editor::apply_edit`.

use super::{Session, Tool};
use crate::input::{KeyEvent, MouseButton, PointerEvent};
use crate::model::Vec2;

pub fn tool() -> Tool {
    Tool {
        mouse_down: Some(mouse_down),
        key_down: Some(key_down),
        clean: Some(clean),
        ..Tool::default()
    }
}

fn mouse_down(s: &mut Session, ev: &PointerEvent, p: Vec2) {
    if ev.button != MouseButton::Left {
        return;
    }
    s.interaction.editing = s.graph.closest_hover_element(p.x, p.y);
    if let Some(target) = &s.interaction.editing {
        s.graph.set_selected(vec![target.clone()]);
    }
}

fn key_down(s: &mut Session, ev: &KeyEvent) {
    if ev.key == "Escape" {
        s.interaction.editing = None;
    }
}

fn clean(s: &mut Session) {
    s.interaction.editing = None;
}
