use crate::geometry::math::{bounds, dist, line_distance, polyline_distance};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_NODE_RADIUS: f32 = 20.0;
pub const DEFAULT_EDGE_WIDTH: f32 = 4.0;
pub const DEFAULT_WEIGHT: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const HIGHLIGHT: Color = Color::rgb(30, 136, 229);
    pub const SELECTION_BOX: Color = Color { r: 30, g: 136, b: 229, a: 64 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Color {
        Color { a, ..self }
    }

    /// Parses `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Option<Color> {
        let hex = s.strip_prefix('#')?;
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: byte(6)? }),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Vec2 {
        Vec2 { x, y }
    }
}

/// Stable identity of a node or edge. Survives cloning, so references can be
/// re-resolved after a history restore.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        ElementId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        ElementId(s.to_string())
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        ElementId(s)
    }
}

/// A reference to one element of the container, tagged by variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ElementRef {
    Node(ElementId),
    Edge(ElementId),
}

impl ElementRef {
    pub fn id(&self) -> &ElementId {
        match self {
            ElementRef::Node(id) | ElementRef::Edge(id) => id,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, ElementRef::Node(_))
    }
}

pub type Style = BTreeMap<String, String>;

/// Resolves node identities to nodes; edge geometry goes through this.
pub trait NodeLookup {
    fn lookup_node(&self, id: &ElementId) -> Option<&Node>;
}

impl NodeLookup for Vec<Node> {
    fn lookup_node(&self, id: &ElementId) -> Option<&Node> {
        self.iter().find(|n| &n.id == id)
    }
}

/// Drawing primitives a renderer provides. Elements issue calls through it;
/// the engine never draws on its own.
pub trait Painter {
    fn circle(&mut self, center: Vec2, r: f32, fill: Color, stroke: Option<Color>);
    fn polyline(&mut self, points: &[Vec2], width: f32, color: Color, arrow: bool);
    fn text(&mut self, at: Vec2, text: &str, color: Color);
    fn rect(&mut self, min: Vec2, max: Vec2, fill: Color);
}

/// Capabilities shared by every graph element.
pub trait Element {
    fn id(&self) -> &ElementId;
    fn element_ref(&self) -> ElementRef;
    fn is_selected(&self) -> bool;
    fn set_selected(&mut self, selected: bool);
    fn is_hidden(&self) -> bool;
    fn set_hidden(&mut self, hidden: bool);
    fn style(&self) -> &Style;
    fn draw(&self, nodes: &dyn NodeLookup, painter: &mut dyn Painter);
    fn distance_to(&self, nodes: &dyn NodeLookup, p: Vec2) -> f32;
    fn is_hover_at(&self, nodes: &dyn NodeLookup, p: Vec2) -> bool;
    /// Structural equality; selection, visibility and style are ignored.
    fn same_as(&self, other: &Self) -> bool
    where
        Self: Sized;
    fn move_by(&mut self, dx: f32, dy: f32);
}

fn style_color(style: &Style, key: &str) -> Option<Color> {
    style.get(key).and_then(|v| Color::from_hex(v))
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Node {
    pub id: ElementId,
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub label: Option<String>,
    pub fill: Color,
    pub label_color: Color,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub style: Style,
}

impl Node {
    pub fn new(id: impl Into<ElementId>, x: f32, y: f32) -> Self {
        Node {
            id: id.into(),
            x,
            y,
            r: DEFAULT_NODE_RADIUS,
            label: None,
            fill: Color::WHITE,
            label_color: Color::BLACK,
            selected: false,
            hidden: false,
            style: Style::new(),
        }
    }

    pub fn with_radius(mut self, r: f32) -> Self {
        self.r = r;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Strict containment: points on the rim are outside.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy < self.r * self.r
    }

    /// Label shown to the user, falling back to the identity.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(self.id.as_str())
    }
}

impl Element for Node {
    fn id(&self) -> &ElementId {
        &self.id
    }
    fn element_ref(&self) -> ElementRef {
        ElementRef::Node(self.id.clone())
    }
    fn is_selected(&self) -> bool {
        self.selected
    }
    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
    fn is_hidden(&self) -> bool {
        self.hidden
    }
    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
    fn style(&self) -> &Style {
        &self.style
    }

    fn draw(&self, _nodes: &dyn NodeLookup, painter: &mut dyn Painter) {
        if self.hidden {
            return;
        }
        let fill = style_color(&self.style, "fill").unwrap_or(self.fill);
        let stroke = if self.selected {
            Color::HIGHLIGHT
        } else {
            style_color(&self.style, "stroke").unwrap_or(Color::BLACK)
        };
        painter.circle(self.pos(), self.r, fill, Some(stroke));
        let label_color = style_color(&self.style, "label").unwrap_or(self.label_color);
        painter.text(self.pos(), self.display_label(), label_color);
    }

    fn distance_to(&self, _nodes: &dyn NodeLookup, p: Vec2) -> f32 {
        dist(self.pos(), p)
    }

    fn is_hover_at(&self, nodes: &dyn NodeLookup, p: Vec2) -> bool {
        self.distance_to(nodes, p) <= self.r
    }

    fn same_as(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y && self.r == other.r && self.label == other.label
    }

    fn move_by(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Edge {
    pub id: ElementId,
    pub src: ElementId,
    pub dst: ElementId,
    pub weight: f64,
    pub directed: bool,
    #[serde(default)]
    pub points: Vec<Vec2>,
    pub stroke_width: f32,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub style: Style,
}

impl Edge {
    pub fn new(id: impl Into<ElementId>, src: impl Into<ElementId>, dst: impl Into<ElementId>) -> Self {
        Edge {
            id: id.into(),
            src: src.into(),
            dst: dst.into(),
            weight: DEFAULT_WEIGHT,
            directed: false,
            points: Vec::new(),
            stroke_width: DEFAULT_EDGE_WIDTH,
            selected: false,
            hidden: false,
            style: Style::new(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    pub fn touches(&self, node: &ElementId) -> bool {
        &self.src == node || &self.dst == node
    }

    /// True when traversing this edge leads from `a` to `b`.
    pub fn connects(&self, a: &ElementId, b: &ElementId) -> bool {
        (&self.src == a && &self.dst == b) || (!self.directed && &self.src == b && &self.dst == a)
    }

    /// Full route: source center, intermediate points, destination center.
    pub fn route(&self, nodes: &dyn NodeLookup) -> Option<Vec<Vec2>> {
        let a = nodes.lookup_node(&self.src)?;
        let b = nodes.lookup_node(&self.dst)?;
        let mut pts = Vec::with_capacity(self.points.len() + 2);
        pts.push(a.pos());
        pts.extend_from_slice(&self.points);
        pts.push(b.pos());
        Some(pts)
    }
}

impl Element for Edge {
    fn id(&self) -> &ElementId {
        &self.id
    }
    fn element_ref(&self) -> ElementRef {
        ElementRef::Edge(self.id.clone())
    }
    fn is_selected(&self) -> bool {
        self.selected
    }
    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }
    fn is_hidden(&self) -> bool {
        self.hidden
    }
    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }
    fn style(&self) -> &Style {
        &self.style
    }

    fn draw(&self, nodes: &dyn NodeLookup, painter: &mut dyn Painter) {
        if self.hidden {
            return;
        }
        let Some(route) = self.route(nodes) else { return };
        let color = if self.selected {
            Color::HIGHLIGHT
        } else {
            style_color(&self.style, "stroke").unwrap_or(Color::BLACK)
        };
        painter.polyline(&route, self.stroke_width, color, self.directed);
        if self.weight != DEFAULT_WEIGHT {
            let mid = route[route.len() / 2];
            let prev = route[(route.len() - 1) / 2];
            let at = Vec2::new((mid.x + prev.x) * 0.5, (mid.y + prev.y) * 0.5);
            painter.text(at, &self.weight.to_string(), color);
        }
    }

    fn distance_to(&self, nodes: &dyn NodeLookup, p: Vec2) -> f32 {
        match self.route(nodes) {
            Some(route) if self.points.is_empty() => line_distance(p, route[0], route[1]),
            Some(route) => polyline_distance(p, &route),
            None => f32::INFINITY,
        }
    }

    fn is_hover_at(&self, nodes: &dyn NodeLookup, p: Vec2) -> bool {
        let (Some(a), Some(b)) = (nodes.lookup_node(&self.src), nodes.lookup_node(&self.dst)) else {
            return false;
        };
        let Some(route) = self.route(nodes) else { return false };
        let Some((minx, miny, maxx, maxy)) = bounds(&route) else { return false };
        let pad = self.stroke_width;
        if p.x < minx - pad || p.x > maxx + pad || p.y < miny - pad || p.y > maxy + pad {
            return false;
        }
        // Node hover wins over the edge underneath it.
        if a.is_hover_at(nodes, p) || b.is_hover_at(nodes, p) {
            return false;
        }
        self.distance_to(nodes, p) <= self.stroke_width
    }

    fn same_as(&self, other: &Self) -> bool {
        self.src == other.src
            && self.dst == other.dst
            && self.weight == other.weight
            && self.directed == other.directed
            && self.points == other.points
    }

    fn move_by(&mut self, _dx: f32, _dy: f32) {}
}

/// Axis-aligned rectangle, always normalized so `min <= max`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_corners(a: Vec2, b: Vec2) -> Rect {
        Rect {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
