//! Default layer run before every tool: global key bindings and viewport
//! panning.
//!
//! Key handling is split in two steps: [`key_action`] maps an event to a
//! [`ShortcutAction`] without touching any state, and the editor applies it.

use super::{Session, ToolKind};
use crate::input::{KeyEvent, MouseButton, PointerEvent, ScrollEvent};
use crate::model::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShortcutAction {
    Undo,
    Redo,
    SelectAll,
    DeleteSelected,
    /// Clear the selection and abandon the current interaction.
    Cancel,
    Copy,
    Paste,
    /// Move the selection by whole grid steps.
    Nudge(f32, f32),
    SwitchTool(ToolKind),
}

pub fn key_action(ev: &KeyEvent) -> Option<ShortcutAction> {
    let m = ev.modifiers;
    if m.command() {
        return match ev.key.to_ascii_lowercase().as_str() {
            "z" if m.shift => Some(ShortcutAction::Redo),
            "z" => Some(ShortcutAction::Undo),
            "y" => Some(ShortcutAction::Redo),
            "a" => Some(ShortcutAction::SelectAll),
            "c" => Some(ShortcutAction::Copy),
            "v" => Some(ShortcutAction::Paste),
            _ => None,
        };
    }
    match ev.key.as_str() {
        "Delete" | "Backspace" => return Some(ShortcutAction::DeleteSelected),
        "Escape" => return Some(ShortcutAction::Cancel),
        "ArrowLeft" => return Some(ShortcutAction::Nudge(-1.0, 0.0)),
        "ArrowRight" => return Some(ShortcutAction::Nudge(1.0, 0.0)),
        "ArrowUp" => return Some(ShortcutAction::Nudge(0.0, -1.0)),
        "ArrowDown" => return Some(ShortcutAction::Nudge(0.0, 1.0)),
        _ => {}
    }
    if m.any() {
        return None;
    }
    let tool = match ev.key.as_str() {
        "v" | "s" => ToolKind::Select,
        "n" => ToolKind::AddNodes,
        "e" => ToolKind::Edges,
        "d" => ToolKind::Delete,
        "m" => ToolKind::Drag,
        "t" => ToolKind::Edit,
        _ => return None,
    };
    Some(ShortcutAction::SwitchTool(tool))
}

/// Middle button starts a pan.
pub(crate) fn mouse_down(s: &mut Session, ev: &PointerEvent) -> bool {
    if ev.button != MouseButton::Middle {
        return false;
    }
    s.interaction.pan_last = Some(Vec2::new(ev.x, ev.y));
    true
}

pub(crate) fn mouse_move(s: &mut Session, ev: &PointerEvent) -> bool {
    let Some(last) = s.interaction.pan_last else { return false };
    s.offset.x += ev.x - last.x;
    s.offset.y += ev.y - last.y;
    s.interaction.pan_last = Some(Vec2::new(ev.x, ev.y));
    true
}

pub(crate) fn mouse_up(s: &mut Session, ev: &PointerEvent) -> bool {
    if ev.button != MouseButton::Middle {
        return false;
    }
    s.interaction.pan_last.take().is_some()
}

/// Plain wheel scrolling pans; zoom is left to the host.
pub(crate) fn scroll(s: &mut Session, ev: &ScrollEvent) -> bool {
    if ev.modifiers.command() || !(ev.dx.is_finite() && ev.dy.is_finite()) {
        return false;
    }
    s.offset.x -= ev.dx;
    s.offset.y -= ev.dy;
    true
}
