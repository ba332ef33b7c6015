use super::{DragState, Session, Tool};
use crate::algorithms::picking::elements_in_box;
use crate::geometry::tolerance::EPS_POS;
use crate::input::{MouseButton, PointerEvent};
use crate::model::{ElementRef, Rect, Vec2};

pub fn tool() -> Tool {
    Tool {
        mouse_down: Some(mouse_down),
        mouse_up: Some(mouse_up),
        mouse_move: Some(mouse_move),
        double_click: Some(double_click),
        clean: Some(clean),
        ..Tool::default()
    }
}

/// Picks, toggles or starts a rubber band. Shift extends the selection.
/// Pressing on a selected element arms a drag of the whole selection.
fn mouse_down(s: &mut Session, ev: &PointerEvent, p: Vec2) {
    if ev.button != MouseButton::Left {
        return;
    }
    s.begin_snapshot();
    let additive = ev.modifiers.shift;
    let Some(hit) = s.graph.closest_hover_element(p.x, p.y) else {
        s.discard_snapshot();
        s.interaction.box_base = if additive { s.graph.selected().to_vec() } else { Vec::new() };
        if !additive {
            s.graph.clear_selection();
        }
        s.interaction.box_origin = Some(p);
        s.graph.set_selection_box(Some(Rect::from_corners(p, p)));
        return;
    };
    if additive {
        s.graph.toggle_select(&hit);
    } else if !s.graph.is_selected(&hit) {
        s.graph.set_selected(vec![hit.clone()]);
    }
    if s.graph.is_selected(&hit) {
        s.graph.drag = DragState::Armed;
        s.interaction.drag_last = Some(p);
    }
}

fn mouse_move(s: &mut Session, _ev: &PointerEvent, p: Vec2) {
    if let Some(origin) = s.interaction.box_origin {
        let rect = Rect::from_corners(origin, p);
        s.graph.set_selection_box(Some(rect));
        let mut next = s.interaction.box_base.clone();
        for r in elements_in_box(&s.graph, rect) {
            if !next.contains(&r) {
                next.push(r);
            }
        }
        if next.as_slice() != s.graph.selected() {
            s.graph.set_selected(next);
        }
        return;
    }
    if s.graph.drag == DragState::NotDragging {
        return;
    }
    let Some(last) = s.interaction.drag_last else { return };
    let (dx, dy) = (p.x - last.x, p.y - last.y);
    if dx.abs() < EPS_POS && dy.abs() < EPS_POS {
        return;
    }
    s.graph.drag = DragState::Dragging;
    s.graph.move_selected(dx, dy);
    s.interaction.drag_last = Some(p);
}

/// Ends the gesture. A press that never turned into a drag leaves no
/// history entry behind.
fn mouse_up(s: &mut Session, ev: &PointerEvent, _p: Vec2) {
    if ev.button != MouseButton::Left {
        return;
    }
    if s.interaction.box_origin.take().is_some() {
        s.interaction.box_base.clear();
        s.graph.set_selection_box(None);
    }
    if s.graph.drag == DragState::Dragging {
        s.commit_snapshot();
    } else {
        s.discard_snapshot();
    }
    s.graph.drag = DragState::NotDragging;
    s.interaction.drag_last = None;
}

/// Double click marks the element under the pointer for editing.
fn double_click(s: &mut Session, ev: &PointerEvent, p: Vec2) {
    if ev.button != MouseButton::Left {
        return;
    }
    let hit: Option<ElementRef> = s.graph.closest_hover_element(p.x, p.y);
    if hit.is_some() {
        s.interaction.editing = hit;
    }
}

fn clean(s: &mut Session) {
    s.cancel_interaction();
}
