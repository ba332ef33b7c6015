use graphedit::events::{GraphEvent, ListenerKind};
use graphedit::input::{KeyEvent, Modifiers, MouseButton, PointerEvent, ScrollEvent};
use graphedit::model::{ElementId, ElementRef};
use graphedit::{DragState, Editor, EditorConfig, ToolKind};
use std::cell::RefCell;
use std::rc::Rc;

fn click(ed: &mut Editor, x: f32, y: f32) {
    ed.mouse_down(&PointerEvent::new(x, y));
    ed.mouse_up(&PointerEvent::new(x, y));
}

fn drag(ed: &mut Editor, from: (f32, f32), to: (f32, f32)) {
    ed.mouse_down(&PointerEvent::new(from.0, from.1));
    ed.mouse_move(&PointerEvent::new((from.0 + to.0) * 0.5, (from.1 + to.1) * 0.5));
    ed.mouse_move(&PointerEvent::new(to.0, to.1));
    ed.mouse_up(&PointerEvent::new(to.0, to.1));
}

fn key(ed: &mut Editor, k: &str, m: Modifiers) -> bool {
    ed.key_down(&KeyEvent::new(k).with_modifiers(m)).handled
}

fn editor_with_nodes(points: &[(f32, f32)]) -> Editor {
    let mut ed = Editor::default();
    ed.set_active_tool(ToolKind::AddNodes);
    for &(x, y) in points {
        click(&mut ed, x, y);
    }
    ed.set_active_tool(ToolKind::Select);
    ed
}

fn id(s: &str) -> ElementId {
    ElementId::new(s)
}

#[test]
fn add_nodes_uses_sequential_ids_and_previews() {
    let mut ed = Editor::default();
    ed.set_active_tool(ToolKind::AddNodes);
    ed.mouse_move(&PointerEvent::new(40.0, 40.0));
    assert!(ed.frame().preview_node.is_some());
    click(&mut ed, 40.0, 40.0);
    click(&mut ed, 140.0, 40.0);
    let labels: Vec<&str> = ed.graph().nodes().iter().map(|n| n.display_label()).collect();
    assert_eq!(labels, ["1", "2"]);
    assert_eq!(ed.graph().history().undo_depth(), 2);

    ed.set_active_tool(ToolKind::Select);
    assert!(ed.frame().preview_node.is_none());
}

#[test]
fn shift_snaps_new_nodes_to_grid() {
    let mut ed = Editor::new(EditorConfig { grid_size: 20.0, ..EditorConfig::default() });
    ed.set_active_tool(ToolKind::AddNodes);
    ed.mouse_down(&PointerEvent::new(33.0, 47.0).with_modifiers(Modifiers::SHIFT));
    let n = &ed.graph().nodes()[0];
    assert_eq!((n.x, n.y), (40.0, 40.0));
}

#[test]
fn edges_tool_connects_distinct_nodes_once() {
    let mut ed = editor_with_nodes(&[(0.0, 0.0), (200.0, 0.0)]);
    ed.set_active_tool(ToolKind::Edges);
    ed.mouse_down(&PointerEvent::new(0.0, 0.0));
    ed.mouse_move(&PointerEvent::new(100.0, 0.0));
    assert!(ed.frame().preview_edge.is_some());
    ed.mouse_up(&PointerEvent::new(200.0, 0.0));
    assert_eq!(ed.graph().edge_count(), 1);
    assert!(!ed.graph().edges()[0].directed);

    // Same connection again, and a release on the source itself.
    drag(&mut ed, (200.0, 0.0), (0.0, 0.0));
    drag(&mut ed, (0.0, 0.0), (5.0, 0.0));
    assert_eq!(ed.graph().edge_count(), 1);
    assert!(ed.frame().preview_edge.is_none());
}

#[test]
fn shift_release_draws_directed_edge() {
    let mut ed = editor_with_nodes(&[(0.0, 0.0), (200.0, 0.0)]);
    ed.set_active_tool(ToolKind::Edges);
    ed.mouse_down(&PointerEvent::new(0.0, 0.0));
    ed.mouse_up(&PointerEvent::new(200.0, 0.0).with_modifiers(Modifiers::SHIFT));
    let e = &ed.graph().edges()[0];
    assert!(e.directed);
    assert_eq!((e.src.as_str(), e.dst.as_str()), ("1", "2"));
}

#[test]
fn select_click_shift_toggle_and_clear() {
    let mut ed = editor_with_nodes(&[(0.0, 0.0), (200.0, 0.0)]);
    click(&mut ed, 0.0, 0.0);
    assert_eq!(ed.graph().selected(), &[ElementRef::Node(id("1"))]);

    ed.mouse_down(&PointerEvent::new(200.0, 0.0).with_modifiers(Modifiers::SHIFT));
    ed.mouse_up(&PointerEvent::new(200.0, 0.0));
    assert_eq!(ed.graph().selected().len(), 2);

    ed.mouse_down(&PointerEvent::new(0.0, 0.0).with_modifiers(Modifiers::SHIFT));
    ed.mouse_up(&PointerEvent::new(0.0, 0.0));
    assert_eq!(ed.graph().selected(), &[ElementRef::Node(id("2"))]);

    click(&mut ed, 500.0, 500.0);
    assert!(ed.graph().selected().is_empty());
    // Selection changes never reach the history.
    assert_eq!(ed.graph().history().undo_depth(), 2);
}

#[test]
fn rubber_band_selects_and_clears_box() {
    let mut ed = editor_with_nodes(&[(0.0, 0.0), (100.0, 0.0), (400.0, 400.0)]);
    ed.mouse_down(&PointerEvent::new(-50.0, -50.0));
    ed.mouse_move(&PointerEvent::new(150.0, 50.0));
    assert!(ed.graph().selection_box().is_some());
    assert_eq!(ed.graph().selected().len(), 2);
    ed.mouse_up(&PointerEvent::new(150.0, 50.0));
    assert!(ed.graph().selection_box().is_none());
    assert_eq!(ed.graph().selected().len(), 2);
}

#[test]
fn dragging_selection_is_one_undo_step() {
    let mut ed = editor_with_nodes(&[(0.0, 0.0), (100.0, 0.0)]);
    let depth = ed.graph().history().undo_depth();
    click(&mut ed, 0.0, 0.0);
    drag(&mut ed, (0.0, 0.0), (30.0, 40.0));
    assert_eq!(ed.graph().drag_state(), DragState::NotDragging);
    let n = ed.graph().node(&id("1")).unwrap();
    assert_eq!((n.x, n.y), (30.0, 40.0));
    assert_eq!(ed.graph().history().undo_depth(), depth + 1);

    assert!(ed.undo());
    let n = ed.graph().node(&id("1")).unwrap();
    assert_eq!((n.x, n.y), (0.0, 0.0));
}

#[test]
fn drag_tool_moves_one_node_or_pans() {
    let mut ed = editor_with_nodes(&[(0.0, 0.0), (100.0, 0.0)]);
    ed.set_active_tool(ToolKind::Drag);
    drag(&mut ed, (100.0, 0.0), (100.0, 60.0));
    let n = ed.graph().node(&id("2")).unwrap();
    assert_eq!((n.x, n.y), (100.0, 60.0));
    assert!(ed.graph().selected().is_empty());

    drag(&mut ed, (300.0, 300.0), (320.0, 310.0));
    assert_eq!((ed.session().offset.x, ed.session().offset.y), (20.0, 10.0));
    // World coordinates follow the pan.
    let p = ed.session().to_world(120.0, 70.0);
    assert_eq!((p.x, p.y), (100.0, 60.0));
}

#[test]
fn middle_button_and_wheel_pan() {
    let mut ed = Editor::default();
    let down = PointerEvent::new(10.0, 10.0).with_button(MouseButton::Middle);
    assert!(ed.mouse_down(&down).handled);
    ed.mouse_move(&PointerEvent::new(15.0, 30.0).with_button(MouseButton::Middle));
    assert!(ed.mouse_up(&PointerEvent::new(15.0, 30.0).with_button(MouseButton::Middle)).handled);
    assert_eq!((ed.session().offset.x, ed.session().offset.y), (5.0, 20.0));

    assert!(ed.scroll(&ScrollEvent { dx: 5.0, dy: 20.0, modifiers: Modifiers::NONE }).handled);
    assert_eq!((ed.session().offset.x, ed.session().offset.y), (0.0, 0.0));
    assert!(!ed.scroll(&ScrollEvent { dx: 5.0, dy: 5.0, modifiers: Modifiers::CTRL }).handled);
}

#[test]
fn delete_tool_removes_hovered_element() {
    let mut ed = editor_with_nodes(&[(0.0, 0.0), (200.0, 0.0)]);
    ed.graph_mut().add_edge(&id("1"), &id("2"));
    ed.set_active_tool(ToolKind::Delete);
    click(&mut ed, 100.0, 2.0);
    assert_eq!(ed.graph().edge_count(), 0);
    assert_eq!(ed.graph().node_count(), 2);
    click(&mut ed, 0.0, 0.0);
    assert_eq!(ed.graph().node_count(), 1);
    click(&mut ed, 700.0, 700.0);
    assert!(ed.undo());
    assert_eq!(ed.graph().node_count(), 2);
}

#[test]
fn shortcuts_drive_history_selection_and_tools() {
    let mut ed = editor_with_nodes(&[(0.0, 0.0), (100.0, 0.0)]);
    assert!(key(&mut ed, "a", Modifiers::CTRL));
    assert_eq!(ed.graph().selected().len(), 2);
    assert!(key(&mut ed, "Delete", Modifiers::NONE));
    assert_eq!(ed.graph().node_count(), 0);
    assert!(key(&mut ed, "z", Modifiers::CTRL));
    assert_eq!(ed.graph().node_count(), 2);
    assert!(key(&mut ed, "y", Modifiers::CTRL));
    assert_eq!(ed.graph().node_count(), 0);
    assert!(key(&mut ed, "Z", Modifiers { shift: true, ctrl: true, ..Modifiers::NONE }));

    assert!(key(&mut ed, "e", Modifiers::NONE));
    assert_eq!(ed.active_tool(), Some(ToolKind::Edges));
    assert_eq!(ed.graph().tool(), ToolKind::Edges);
    assert!(!key(&mut ed, "q", Modifiers::NONE));
}

#[test]
fn arrows_nudge_by_grid_step() {
    let mut ed = editor_with_nodes(&[(0.0, 0.0)]);
    click(&mut ed, 0.0, 0.0);
    key(&mut ed, "ArrowRight", Modifiers::NONE);
    key(&mut ed, "ArrowDown", Modifiers::NONE);
    let n = &ed.graph().nodes()[0];
    assert_eq!((n.x, n.y), (20.0, 20.0));
    ed.undo();
    ed.undo();
    assert_eq!(ed.graph().nodes()[0].x, 0.0);
}

#[test]
fn escape_cancels_selection_and_rubber_band() {
    let mut ed = editor_with_nodes(&[(0.0, 0.0)]);
    ed.mouse_down(&PointerEvent::new(-50.0, -50.0));
    ed.mouse_move(&PointerEvent::new(50.0, 50.0));
    assert!(key(&mut ed, "Escape", Modifiers::NONE));
    assert!(ed.graph().selection_box().is_none());
    assert!(ed.graph().selected().is_empty());
}

#[test]
fn copy_paste_offsets_and_renames() {
    let mut ed = editor_with_nodes(&[(0.0, 0.0), (100.0, 0.0)]);
    ed.graph_mut().add_edge(&id("1"), &id("2"));
    key(&mut ed, "a", Modifiers::CTRL);
    ed.mouse_move(&PointerEvent::new(0.0, 0.0));
    key(&mut ed, "c", Modifiers::CTRL);
    ed.mouse_move(&PointerEvent::new(0.0, 300.0));
    key(&mut ed, "v", Modifiers::CTRL);

    let g = ed.graph();
    assert_eq!(g.node_count(), 4);
    assert_eq!(g.edge_count(), 2);
    let pasted = g.node_by_label("1_1").unwrap();
    assert_eq!((pasted.x, pasted.y), (0.0, 300.0));
    assert!(g.node_by_label("2_1").is_some());
    assert_eq!(g.selected().len(), 3);
}

#[test]
fn edit_tool_relabels_and_reweights() {
    let mut ed = editor_with_nodes(&[(0.0, 0.0), (200.0, 0.0)]);
    ed.graph_mut().add_edge(&id("1"), &id("2"));
    ed.set_active_tool(ToolKind::Edit);
    click(&mut ed, 0.0, 0.0);
    assert_eq!(ed.session().interaction.editing, Some(ElementRef::Node(id("1"))));
    ed.apply_edit("start").unwrap();
    assert_eq!(ed.graph().node(&id("1")).unwrap().display_label(), "start");
    assert!(ed.session().interaction.editing.is_none());

    click(&mut ed, 100.0, 1.0);
    assert_eq!(ed.apply_edit("abc").unwrap_err().code(), "parse");
    ed.apply_edit(" 2.5 ").unwrap();
    assert_eq!(ed.graph().edges()[0].weight, 2.5);

    click(&mut ed, 200.0, 0.0);
    assert_eq!(ed.apply_edit("start").unwrap_err().code(), "duplicate_label");
    assert!(ed.undo());
    assert_eq!(ed.graph().edges()[0].weight, 1.0);
}

#[test]
fn failed_edit_keeps_redo_history() {
    let mut ed = editor_with_nodes(&[(0.0, 0.0), (200.0, 0.0)]);
    ed.graph_mut().set_selected(vec![ElementRef::Node(id("1"))]);
    assert_eq!(ed.nudge(10.0, 0.0), 1);
    assert!(ed.undo());
    assert!(ed.graph().can_redo());
    let undo_depth = ed.graph().history().undo_depth();

    ed.session_mut().interaction.editing = Some(ElementRef::Node(id("1")));
    assert_eq!(ed.apply_edit("2").unwrap_err().code(), "duplicate_label");
    let long = "x".repeat(1000);
    assert_eq!(ed.apply_edit(&long).unwrap_err().code(), "invalid_structure");
    assert!(ed.graph().can_redo());
    assert_eq!(ed.graph().history().undo_depth(), undo_depth);
    assert_eq!(ed.session().interaction.editing, Some(ElementRef::Node(id("1"))));

    assert!(ed.redo());
    assert_eq!(ed.graph().node(&id("1")).unwrap().x, 10.0);
}

#[test]
fn reset_returns_to_select_tool() {
    let mut ed = editor_with_nodes(&[(0.0, 0.0), (200.0, 0.0)]);
    ed.set_active_tool(ToolKind::AddNodes);
    let seen: Rc<RefCell<Vec<GraphEvent>>> = Rc::default();
    let sink = seen.clone();
    ed.graph_mut().subscribe(ListenerKind::Tool, move |ev| sink.borrow_mut().push(ev.clone()));

    ed.reset();
    assert_eq!(ed.graph().node_count(), 0);
    assert_eq!(ed.active_tool(), Some(ToolKind::Select));
    assert_eq!(ed.graph().tool(), ToolKind::Select);
    assert_eq!(*seen.borrow(), vec![GraphEvent::ToolChanged(ToolKind::Select)]);
    assert!(ed.graph().can_undo());

    click(&mut ed, 50.0, 50.0);
    assert_eq!(ed.graph().node_count(), 0);
}

#[test]
fn double_click_in_select_marks_for_editing() {
    let mut ed = editor_with_nodes(&[(0.0, 0.0)]);
    ed.double_click(&PointerEvent::new(3.0, 3.0));
    assert_eq!(ed.session().interaction.editing, Some(ElementRef::Node(id("1"))));
    assert!(key(&mut ed, "Escape", Modifiers::NONE));
    assert!(ed.session().interaction.editing.is_none());
}

#[test]
fn blur_abandons_interaction() {
    let mut ed = editor_with_nodes(&[(0.0, 0.0)]);
    ed.set_active_tool(ToolKind::Edges);
    ed.mouse_down(&PointerEvent::new(0.0, 0.0));
    ed.mouse_move(&PointerEvent::new(50.0, 0.0));
    ed.blur();
    assert!(!ed.session().focused);
    assert!(ed.frame().preview_edge.is_none());
    assert!(ed.session().interaction.edge_from.is_none());
}

#[test]
fn tool_names_round_trip() {
    let mut ed = Editor::default();
    for kind in ToolKind::ALL {
        ed.set_active_tool_by_name(kind.name()).unwrap();
        assert_eq!(ed.active_tool(), Some(kind));
    }
    assert_eq!(ed.set_active_tool_by_name("lasso").unwrap_err().code(), "unknown_tool");
}
