use crate::model::{Element, ElementId, ElementRef, Rect, Vec2};
use crate::Graph;

/// Every visible element whose hover predicate holds at `p`, nodes first,
/// each group in insertion order.
pub fn find_elements_by_hover(g: &Graph, p: Vec2) -> Vec<ElementRef> {
    let nodes = g.nodes.iter().filter(|n| !n.hidden && n.is_hover_at(g, p)).map(|n| n.element_ref());
    let edges = g.edges.iter().filter(|e| !e.hidden && e.is_hover_at(g, p)).map(|e| e.element_ref());
    nodes.chain(edges).collect()
}

/// The hovered element with minimal distance to `p`. Ties go to the first
/// one encountered (nodes before edges).
pub fn closest_hover_element(g: &Graph, p: Vec2) -> Option<ElementRef> {
    let mut best: Option<(ElementRef, f32)> = None;
    for n in g.nodes.iter().filter(|n| !n.hidden) {
        if n.is_hover_at(g, p) {
            let d = n.distance_to(g, p);
            if best.as_ref().map_or(true, |(_, bd)| d < *bd) {
                best = Some((n.element_ref(), d));
            }
        }
    }
    for e in g.edges.iter().filter(|e| !e.hidden) {
        if e.is_hover_at(g, p) {
            let d = e.distance_to(g, p);
            if best.as_ref().map_or(true, |(_, bd)| d < *bd) {
                best = Some((e.element_ref(), d));
            }
        }
    }
    best.map(|(r, _)| r)
}

/// Closest hovered node only; edges are ignored.
pub fn node_at(g: &Graph, p: Vec2) -> Option<ElementId> {
    let mut best: Option<(&ElementId, f32)> = None;
    for n in g.nodes.iter().filter(|n| !n.hidden) {
        if n.is_hover_at(g, p) {
            let d = n.distance_to(g, p);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((&n.id, d));
            }
        }
    }
    best.map(|(id, _)| id.clone())
}

/// Rubber-band query: nodes whose center lies in `rect`, and edges whose
/// endpoints both do.
pub fn elements_in_box(g: &Graph, rect: Rect) -> Vec<ElementRef> {
    let inside: Vec<&ElementId> = g
        .nodes
        .iter()
        .filter(|n| !n.hidden && rect.contains(n.pos()))
        .map(|n| &n.id)
        .collect();
    let mut out: Vec<ElementRef> = inside.iter().map(|id| ElementRef::Node((*id).clone())).collect();
    out.extend(
        g.edges
            .iter()
            .filter(|e| !e.hidden && inside.contains(&&e.src) && inside.contains(&&e.dst))
            .map(|e| e.element_ref()),
    );
    out
}
