//! Read-only per-frame snapshot handed to the host renderer.

use crate::model::{Color, Edge, Element, ElementId, ElementRef, Node, NodeLookup, Painter, Rect, Vec2};
use crate::Graph;
use serde::Serialize;

/// Everything a renderer needs for one frame. Coordinates are world space;
/// `offset` is the viewport pan to add when mapping to the screen.
#[derive(Clone, Debug, Serialize)]
pub struct Frame<'a> {
    pub nodes: &'a [Node],
    pub edges: &'a [Edge],
    pub selected: &'a [ElementRef],
    pub selection_box: Option<Rect>,
    pub preview_node: Option<Node>,
    pub preview_edge: Option<(Vec2, Vec2)>,
    pub offset: Vec2,
}

impl NodeLookup for Frame<'_> {
    fn lookup_node(&self, id: &ElementId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }
}

impl Frame<'_> {
    /// Issues draw calls back to front: edges, nodes, previews, then the
    /// rubber band.
    pub fn draw(&self, painter: &mut dyn Painter) {
        for e in self.edges {
            e.draw(self, painter);
        }
        for n in self.nodes {
            n.draw(self, painter);
        }
        if let Some((a, b)) = self.preview_edge {
            painter.polyline(&[a, b], crate::model::DEFAULT_EDGE_WIDTH, Color::HIGHLIGHT.with_alpha(128), false);
        }
        if let Some(n) = &self.preview_node {
            n.draw(self, painter);
        }
        if let Some(r) = self.selection_box {
            painter.rect(r.min, r.max, Color::SELECTION_BOX);
        }
    }
}

impl Graph {
    /// Snapshot of the container alone, without interaction previews.
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            nodes: &self.nodes,
            edges: &self.edges,
            selected: &self.selected,
            selection_box: self.selection_box,
            preview_node: None,
            preview_edge: None,
            offset: Vec2::default(),
        }
    }
}
