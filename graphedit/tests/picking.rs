use graphedit::algorithms::picking::{closest_hover_element, elements_in_box, find_elements_by_hover, node_at};
use graphedit::model::{Element, ElementRef, Rect, Vec2};
use graphedit::Graph;

fn two_nodes() -> (Graph, ElementRef, ElementRef, ElementRef) {
    let mut g = Graph::new();
    let a = g.add_node(0.0, 0.0);
    let b = g.add_node(200.0, 0.0);
    let e = g.add_edge(&a, &b).unwrap();
    (g, ElementRef::Node(a), ElementRef::Node(b), ElementRef::Edge(e))
}

#[test]
fn node_rim_is_hovered_but_not_contained() {
    let (g, a, _, _) = two_nodes();
    let n = g.node(a.id()).unwrap();
    assert!(!n.contains(20.0, 0.0));
    assert!(n.contains(19.0, 0.0));
    assert_eq!(closest_hover_element(&g, Vec2::new(0.0, 20.0)), Some(a));
}

#[test]
fn edge_is_not_hovered_inside_its_endpoints() {
    let (g, a, _, e) = two_nodes();
    let edge = g.edge(e.id()).unwrap();
    assert!(!edge.is_hover_at(&g, Vec2::new(10.0, 0.0)));
    assert!(edge.is_hover_at(&g, Vec2::new(100.0, 3.0)));
    assert!(!edge.is_hover_at(&g, Vec2::new(100.0, 30.0)));
    assert_eq!(find_elements_by_hover(&g, Vec2::new(10.0, 0.0)), vec![a]);
}

#[test]
fn closest_wins_and_hidden_is_ignored() {
    let mut g = Graph::new();
    let a = g.add_node(0.0, 0.0);
    let b = g.add_node(30.0, 0.0);
    // Both radii cover x = 16; b is closer.
    assert_eq!(node_at(&g, Vec2::new(16.0, 0.0)), Some(b.clone()));
    g.set_hidden(&ElementRef::Node(b), true);
    assert_eq!(node_at(&g, Vec2::new(16.0, 0.0)), Some(a));
    assert_eq!(closest_hover_element(&g, Vec2::new(500.0, 500.0)), None);
}

#[test]
fn rubber_band_takes_enclosed_nodes_and_edges() {
    let (mut g, a, b, e) = two_nodes();
    let c = g.add_node(500.0, 500.0);
    let all = elements_in_box(&g, Rect::from_corners(Vec2::new(-10.0, -10.0), Vec2::new(210.0, 10.0)));
    assert_eq!(all, vec![a.clone(), b, e]);
    let one = elements_in_box(&g, Rect::from_corners(Vec2::new(5.0, 5.0), Vec2::new(-5.0, -5.0)));
    assert_eq!(one, vec![a]);
    assert!(!one.contains(&ElementRef::Node(c)));
}
