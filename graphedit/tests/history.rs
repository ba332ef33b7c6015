use graphedit::model::ElementRef;
use graphedit::{EditorConfig, Graph};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    AddNode { x: i16, y: i16 },
    MoveNode { idx: u8, dx: i8, dy: i8 },
    RemoveNode { idx: u8 },
    AddEdge { a: u8, b: u8 },
    SetWeight { idx: u8, w: u8 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<i16>(), any::<i16>()).prop_map(|(x, y)| Op::AddNode { x, y }),
        (any::<u8>(), any::<i8>(), any::<i8>()).prop_map(|(idx, dx, dy)| Op::MoveNode { idx, dx, dy }),
        any::<u8>().prop_map(|idx| Op::RemoveNode { idx }),
        (any::<u8>(), any::<u8>()).prop_map(|(a, b)| Op::AddEdge { a, b }),
        (any::<u8>(), any::<u8>()).prop_map(|(idx, w)| Op::SetWeight { idx, w }),
    ]
}

/// Applies one edit the way the tools do: memento first, then mutate.
/// Returns whether a snapshot was pushed.
fn apply(g: &mut Graph, op: &Op) -> bool {
    let n = g.node_count();
    let m = g.edge_count();
    match *op {
        Op::AddNode { x, y } => {
            let pushed = g.record_memento();
            g.add_node(x as f32, y as f32);
            pushed
        }
        Op::MoveNode { idx, dx, dy } if n > 0 => {
            let node = &g.nodes()[idx as usize % n];
            let (id, x, y) = (node.id.clone(), node.x, node.y);
            let pushed = g.record_memento();
            g.move_node(&id, x + dx as f32, y + dy as f32);
            pushed
        }
        Op::RemoveNode { idx } if n > 0 => {
            let id = g.nodes()[idx as usize % n].id.clone();
            let pushed = g.record_memento();
            g.delete_element(&ElementRef::Node(id));
            pushed
        }
        Op::AddEdge { a, b } if n > 1 => {
            let src = g.nodes()[a as usize % n].id.clone();
            let dst = g.nodes()[b as usize % n].id.clone();
            if !g.can_add_edge(&src, &dst, false) {
                return false;
            }
            let pushed = g.record_memento();
            g.add_edge(&src, &dst);
            pushed
        }
        Op::SetWeight { idx, w } if m > 0 => {
            let id = g.edges()[idx as usize % m].id.clone();
            let pushed = g.record_memento();
            g.set_weight(&id, w as f64).unwrap();
            pushed
        }
        _ => false,
    }
}

/// Structural fingerprint: what undo must restore.
fn state(g: &Graph) -> (Vec<(String, f32, f32)>, Vec<(String, String, String, f64)>) {
    let nodes = g.nodes().iter().map(|n| (n.id.to_string(), n.x, n.y)).collect();
    let edges = g
        .edges()
        .iter()
        .map(|e| (e.id.to_string(), e.src.to_string(), e.dst.to_string(), e.weight))
        .collect();
    (nodes, edges)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn undo_restores_previous_state(ops in proptest::collection::vec(op_strategy(), 1..40)) {
        let mut g = Graph::new();
        let initial = state(&g);
        // State before each edit that pushed a snapshot.
        let mut before = Vec::new();
        for op in &ops {
            let prior = state(&g);
            if apply(&mut g, op) {
                before.push(prior);
            }
        }
        prop_assert_eq!(g.history().undo_depth(), before.len());
        while let Some(expected) = before.pop() {
            prop_assert!(g.undo());
            prop_assert_eq!(state(&g), expected);
        }
        prop_assert!(!g.can_undo());
        prop_assert_eq!(state(&g), initial);
    }

    #[test]
    fn undo_then_redo_is_identity(ops in proptest::collection::vec(op_strategy(), 1..30)) {
        let mut g = Graph::new();
        for op in &ops {
            apply(&mut g, op);
        }
        let before = state(&g);
        if g.undo() {
            prop_assert!(g.redo());
        }
        prop_assert_eq!(state(&g), before);
    }

    #[test]
    fn unchanged_snapshots_are_not_stacked(repeats in 1usize..10) {
        let mut g = Graph::new();
        g.record_memento();
        g.add_node(1.0, 2.0);
        g.record_memento();
        for _ in 0..repeats {
            prop_assert!(!g.record_memento());
        }
        prop_assert_eq!(g.history().undo_depth(), 2);
    }
}

#[test]
fn new_edit_clears_redo() {
    let mut g = Graph::new();
    g.record_memento();
    g.add_node(0.0, 0.0);
    assert!(g.undo());
    assert!(g.can_redo());
    g.record_memento();
    g.add_node(5.0, 5.0);
    assert!(!g.can_redo());
}

#[test]
fn depth_limit_evicts_oldest() {
    let cfg = EditorConfig { history_limit: 3, ..EditorConfig::default() };
    let mut g = Graph::with_config(&cfg);
    for i in 0..6 {
        g.record_memento();
        g.add_node(i as f32 * 10.0, 0.0);
    }
    assert_eq!(g.history().undo_depth(), 3);
    while g.undo() {}
    assert_eq!(g.node_count(), 3);
}

#[test]
fn restore_relinks_edges_and_selection() {
    let mut g = Graph::new();
    let a = g.add_node(0.0, 0.0);
    let b = g.add_node(100.0, 0.0);
    let e = g.add_edge(&a, &b).unwrap();
    g.select(&ElementRef::Edge(e.clone()));
    g.record_memento();
    g.delete_element(&ElementRef::Node(a.clone()));
    assert_eq!(g.edge_count(), 0);
    assert!(g.selected().is_empty());

    assert!(g.undo());
    assert_eq!(g.edge_count(), 1);
    assert_eq!(g.selected(), &[ElementRef::Edge(e)]);
    assert!(g.node(&a).is_some());
}

#[test]
fn discarded_snapshot_leaves_no_entry() {
    let mut g = Graph::new();
    g.add_node(0.0, 0.0);
    assert!(g.record_memento());
    assert!(g.discard_last_snapshot());
    assert!(!g.can_undo());
    assert!(!g.discard_last_snapshot());
}
