use super::tolerance::{clamp01, EPS_LEN};
use crate::model::Vec2;

pub fn seg_distance_sq(px: f32, py: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> (f32, f32) {
    let vx = x2 - x1; let vy = y2 - y1;
    let wx = px - x1; let wy = py - y1;
    let vv = vx*vx + vy*vy;
    let t = if vv > 0.0 { clamp01((wx*vx + wy*vy) / vv) } else { 0.0 };
    let projx = x1 + t * vx; let projy = y1 + t * vy;
    let dx = px - projx; let dy = py - projy;
    (dx*dx + dy*dy, t)
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
/// Falls back to the distance to `a` when the line is degenerate.
pub fn line_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let vx = b.x - a.x; let vy = b.y - a.y;
    let len = (vx*vx + vy*vy).sqrt();
    if len <= EPS_LEN {
        return dist(p, a);
    }
    ((p.x - a.x) * vy - (p.y - a.y) * vx).abs() / len
}

/// Distance from `p` to the closest segment of the polyline `pts`.
pub fn polyline_distance(p: Vec2, pts: &[Vec2]) -> f32 {
    match pts {
        [] => f32::INFINITY,
        [only] => dist(p, *only),
        _ => pts
            .windows(2)
            .map(|w| seg_distance_sq(p.x, p.y, w[0].x, w[0].y, w[1].x, w[1].y).0)
            .fold(f32::INFINITY, f32::min)
            .sqrt(),
    }
}

#[inline]
pub fn dist_sq(a: Vec2, b: Vec2) -> f32 {
    let dx = a.x - b.x; let dy = a.y - b.y;
    dx*dx + dy*dy
}

#[inline]
pub fn dist(a: Vec2, b: Vec2) -> f32 { dist_sq(a, b).sqrt() }

/// Axis-aligned bounds of a point set as (minx, miny, maxx, maxy).
pub fn bounds(pts: &[Vec2]) -> Option<(f32, f32, f32, f32)> {
    let first = pts.first()?;
    let mut b = (first.x, first.y, first.x, first.y);
    for p in &pts[1..] {
        b.0 = b.0.min(p.x); b.1 = b.1.min(p.y);
        b.2 = b.2.max(p.x); b.3 = b.3.max(p.y);
    }
    Some(b)
}
