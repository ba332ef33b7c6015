use graphedit::edge_list::{parse_edge_list, to_edge_list};
use graphedit::events::{GraphEvent, ListenerKind};
use graphedit::model::{ElementId, ElementRef, Vec2};
use graphedit::{ClipboardRecord, EdgeRecord, Graph, GraphRecord, LayoutConfig, NodeRecord};
use std::cell::RefCell;
use std::rc::Rc;

fn id(s: &str) -> ElementId {
    ElementId::new(s)
}

#[test]
fn edge_list_loads_mixed_edges() {
    let mut g = Graph::new();
    g.load_edge_list("A-{5}-B\nB-C\nC->A", &LayoutConfig::default()).unwrap();
    assert_eq!(g.node_count(), 3);
    assert_eq!(g.edge_count(), 3);
    let ca = g.edges().iter().find(|e| e.src == id("C")).unwrap();
    assert!(ca.directed);
    assert_eq!(ca.weight, 1.0);
    let ab = g.edges().iter().find(|e| e.src == id("A")).unwrap();
    assert_eq!(ab.weight, 5.0);
    assert!(!ab.directed);

    // Nodes sit on a circle around the canvas center.
    let cfg = LayoutConfig::default();
    let (cx, cy) = (cfg.canvas_width * 0.5, cfg.canvas_height * 0.5);
    let r0 = ((g.nodes()[0].x - cx).powi(2) + (g.nodes()[0].y - cy).powi(2)).sqrt();
    for n in g.nodes() {
        let r = ((n.x - cx).powi(2) + (n.y - cy).powi(2)).sqrt();
        assert!((r - r0).abs() < 1e-3);
    }
}

#[test]
fn edge_list_skips_comments_loops_and_repeats() {
    let rec = parse_edge_list("# demo\n\nA-B\nB-A\nA-A\nA->B\nC").unwrap();
    let labels: Vec<&str> = rec.nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, ["A", "B", "C"]);
    assert_eq!(rec.edges.len(), 1);
    assert_eq!(to_edge_list(&rec), "A-B\nC\n");
}

#[test]
fn failed_load_leaves_graph_untouched() {
    let mut g = Graph::new();
    g.load_edge_list("A-B", &LayoutConfig::default()).unwrap();
    let depth = g.history().undo_depth();

    let err = g.load_edge_list("X-Y\nY-{w}-Z", &LayoutConfig::default()).unwrap_err();
    assert_eq!(err.code(), "parse");
    assert!(err.to_string().starts_with("line 2:"));

    let bad = r#"{ "nodes": [{ "x": 0, "y": 0, "label": "A" }], "edges": [{ "src": "A", "dst": "Q" }] }"#;
    assert_eq!(g.load_json_str(bad).unwrap_err().code(), "missing_node");
    assert_eq!(g.load_json_str("[1, 2").unwrap_err().code(), "json_parse");

    assert_eq!(g.node_count(), 2);
    assert!(g.node(&id("A")).is_some());
    assert_eq!(g.history().undo_depth(), depth);
}

#[test]
fn record_validation() {
    let node = |label: &str| NodeRecord { x: 0.0, y: 0.0, r: 20.0, label: label.into() };
    let edge = |s: &str, d: &str| EdgeRecord { src: s.into(), dst: d.into(), weight: 1.0, directed: false };
    let mut g = Graph::new();

    let dup = GraphRecord { nodes: vec![node("A"), node("A")], edges: vec![] };
    assert_eq!(g.load_record(&dup).unwrap_err().code(), "duplicate_label");

    let looped = GraphRecord { nodes: vec![node("A")], edges: vec![edge("A", "A")] };
    assert_eq!(g.load_record(&looped).unwrap_err().code(), "invalid_structure");

    let mut far = node("A");
    far.x = f32::INFINITY;
    let far = GraphRecord { nodes: vec![far], edges: vec![] };
    assert_eq!(g.load_record(&far).unwrap_err().code(), "out_of_bounds");

    let repeated = GraphRecord { nodes: vec![node("A"), node("B")], edges: vec![edge("A", "B"), edge("B", "A")] };
    g.load_record(&repeated).unwrap();
    assert_eq!(g.edge_count(), 1);
}

#[test]
fn json_round_trip_and_defaults() {
    let json = r#"{ "nodes": [{ "x": 1, "y": 2, "label": "A" }, { "x": 3, "y": 4, "r": 9, "label": "B" }],
                   "edges": [{ "src": "A", "dst": "B", "directed": true }] }"#;
    let mut g = Graph::new();
    g.load_json_str(json).unwrap();
    assert_eq!(g.node(&id("A")).unwrap().r, 20.0);
    assert_eq!(g.node(&id("B")).unwrap().r, 9.0);
    assert_eq!(g.edges()[0].weight, 1.0);
    assert_eq!(g.edges()[0].id, id("e1"));

    let saved = g.to_json_string().unwrap();
    let mut h = Graph::new();
    h.load_json_str(&saved).unwrap();
    assert_eq!(h.to_record().unwrap(), g.to_record().unwrap());

    // Loading is undoable.
    assert!(h.undo());
    assert_eq!(h.node_count(), 0);
}

#[test]
fn export_uses_labels_for_endpoints() {
    let mut g = Graph::new();
    let a = g.add_node(0.0, 0.0);
    let b = g.add_node(10.0, 0.0);
    g.add_edge_with(&a, &b, 2.0, true).unwrap();
    g.set_label(&a, Some("start")).unwrap();
    let rec = g.to_record().unwrap();
    assert_eq!(rec.edges[0].src, "start");
    assert_eq!(g.to_edge_list().unwrap(), "start-{2}->2\n");
}

#[test]
fn load_notifies_once_per_kind() {
    let mut g = Graph::new();
    let seen: Rc<RefCell<Vec<GraphEvent>>> = Rc::default();
    let sink = seen.clone();
    g.subscribe(ListenerKind::Graph, move |ev| sink.borrow_mut().push(ev.clone()));
    g.load_edge_list("A-B\nB-C", &LayoutConfig::default()).unwrap();
    assert_eq!(*seen.borrow(), vec![GraphEvent::GraphChanged { nodes: 3, edges: 2 }]);
    assert!(g.listeners_enabled());
}

#[test]
fn move_to_same_position_still_notifies() {
    let mut g = Graph::new();
    let a = g.add_node(0.0, 0.0);
    let count = Rc::new(RefCell::new(0usize));
    let sink = count.clone();
    g.subscribe(ListenerKind::Graph, move |_| *sink.borrow_mut() += 1);
    assert!(g.move_node(&a, 0.0, 0.0));
    assert_eq!(*count.borrow(), 1);
    assert!(!g.move_node(&id("ghost"), 1.0, 1.0));
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn paste_renames_and_shifts() {
    let mut g = Graph::new();
    g.load_edge_list("A-{4}->B\nC", &LayoutConfig::default()).unwrap();
    g.set_selected(vec![ElementRef::Node(id("A")), ElementRef::Node(id("B"))]);
    let a = g.node(&id("A")).unwrap().pos();
    let clip = g.copy_selection(a);
    assert_eq!(clip.graph.edges.len(), 1);

    let json = clip.to_json_string().unwrap();
    let clip = ClipboardRecord::from_json_str(&json).unwrap();
    let pasted = g.paste(&clip, Vec2::new(a.x + 10.0, a.y)).unwrap();
    assert_eq!(pasted.len(), 3);
    let copy = g.node_by_label("A_1").unwrap();
    assert!((copy.x - (a.x + 10.0)).abs() < 1e-3 && (copy.y - a.y).abs() < 1e-3);
    let e = g.edges().iter().find(|e| e.src == id("A_1")).unwrap();
    assert_eq!((e.dst.as_str(), e.weight, e.directed), ("B_1", 4.0, true));
    assert_eq!(g.selected(), pasted.as_slice());

    // A second paste needs the next free suffix.
    g.paste(&clip, Vec2::new(0.0, 0.0)).unwrap();
    assert!(g.node_by_label("A_2").is_some());

    assert!(g.undo());
    assert!(g.node_by_label("A_2").is_none());
}

#[test]
fn empty_clipboard_pastes_nothing() {
    let mut g = Graph::new();
    let clip = ClipboardRecord::default();
    assert!(g.paste(&clip, Vec2::new(5.0, 5.0)).unwrap().is_empty());
    assert!(!g.can_undo());
}
