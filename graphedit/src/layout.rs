//! Node arrangement. Layouts only compute coordinates; [`Graph::apply_layout`]
//! writes them back inside one history snapshot.

use crate::algorithms::adjacency::{AdjacencyView, Direction};
use crate::algorithms::toposort::levels;
use crate::algorithms::traversal::bfs_with;
use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::geometry::math::dist;
use crate::model::{ElementId, Vec2};
use crate::Graph;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::f32::consts::{FRAC_PI_2, TAU};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    Circular,
    Grid,
    Horizontal,
    Topological,
    Tree,
    Organic,
}

impl LayoutKind {
    pub fn name(self) -> &'static str {
        match self {
            LayoutKind::Circular => "circular",
            LayoutKind::Grid => "grid",
            LayoutKind::Horizontal => "horizontal",
            LayoutKind::Topological => "topological",
            LayoutKind::Tree => "tree",
            LayoutKind::Organic => "organic",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LayoutKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "circular" => Ok(LayoutKind::Circular),
            "grid" => Ok(LayoutKind::Grid),
            "horizontal" => Ok(LayoutKind::Horizontal),
            "topological" => Ok(LayoutKind::Topological),
            "tree" => Ok(LayoutKind::Tree),
            "organic" => Ok(LayoutKind::Organic),
            other => Err(Error::UnknownLayout(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LayoutOutcome {
    pub positions: Vec<(ElementId, Vec2)>,
    /// Set by the topological layout on a cyclic graph; nothing is positioned.
    pub has_cycle: bool,
}

impl LayoutOutcome {
    fn placed(positions: Vec<(ElementId, Vec2)>) -> Self {
        LayoutOutcome { positions, has_cycle: false }
    }

    pub fn position_of(&self, id: &ElementId) -> Option<Vec2> {
        self.positions.iter().find(|(n, _)| n == id).map(|(_, p)| *p)
    }
}

fn center(cfg: &LayoutConfig) -> Vec2 {
    Vec2::new(cfg.canvas_width * 0.5, cfg.canvas_height * 0.5)
}

/// Positions on a circle around `center`, starting at the top and going
/// clockwise in screen coordinates.
pub(crate) fn circle_points(n: usize, c: Vec2, radius: f32) -> Vec<Vec2> {
    (0..n)
        .map(|i| {
            let a = TAU * i as f32 / n as f32 - FRAC_PI_2;
            Vec2::new(c.x + radius * a.cos(), c.y + radius * a.sin())
        })
        .collect()
}

pub(crate) fn circle_radius(n: usize, cfg: &LayoutConfig) -> f32 {
    if let Some(r) = cfg.circle_radius {
        return r;
    }
    let fit = (cfg.canvas_width.min(cfg.canvas_height) * 0.5 - cfg.margin).max(0.0);
    let spread = cfg.gap_x * n as f32 / TAU;
    fit.max(spread)
}

pub fn circular(view: &AdjacencyView, cfg: &LayoutConfig) -> LayoutOutcome {
    let n = view.len();
    let pts = circle_points(n, center(cfg), circle_radius(n, cfg));
    LayoutOutcome::placed(view.nodes().iter().cloned().zip(pts).collect())
}

/// Row-major square-ish grid.
pub fn grid(view: &AdjacencyView, cfg: &LayoutConfig) -> LayoutOutcome {
    let n = view.len();
    let cols = ((n as f64).sqrt().ceil() as usize).max(1);
    let positions = view
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let (row, col) = (i / cols, i % cols);
            (id.clone(), Vec2::new(cfg.margin + col as f32 * cfg.gap_x, cfg.margin + row as f32 * cfg.gap_y))
        })
        .collect();
    LayoutOutcome::placed(positions)
}

/// Single row across the middle of the canvas.
pub fn horizontal(view: &AdjacencyView, cfg: &LayoutConfig) -> LayoutOutcome {
    let y = cfg.canvas_height * 0.5;
    let positions = view
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), Vec2::new(cfg.margin + i as f32 * cfg.gap_x, y)))
        .collect();
    LayoutOutcome::placed(positions)
}

/// Columns by longest-path level; rows by sorted identity within a column.
pub fn topological(view: &AdjacencyView, cfg: &LayoutConfig) -> LayoutOutcome {
    let Some(level) = levels(view) else {
        tracing::info!("topological layout skipped: graph has a cycle");
        return LayoutOutcome { positions: Vec::new(), has_cycle: true };
    };
    let mut columns: BTreeMap<usize, Vec<&ElementId>> = BTreeMap::new();
    for (i, id) in view.nodes().iter().enumerate() {
        columns.entry(level[i]).or_default().push(id);
    }
    let mut positions = Vec::with_capacity(view.len());
    for (col, mut ids) in columns {
        ids.sort();
        for (row, id) in ids.into_iter().enumerate() {
            positions.push((
                id.clone(),
                Vec2::new(cfg.margin + col as f32 * cfg.gap_x, cfg.margin + row as f32 * cfg.gap_y),
            ));
        }
    }
    LayoutOutcome::placed(positions)
}

/// Tree layout from the undirected BFS tree of `root` (default: first node).
/// A node's first child shares its row; later children take the lowest row
/// not used so far. Components not reached from the root are laid out below.
pub fn tree(view: &AdjacencyView, root: Option<&ElementId>, cfg: &LayoutConfig) -> Result<LayoutOutcome> {
    if let Some(r) = root {
        view.require(r)?;
    }
    let mut cells: HashMap<ElementId, (usize, usize)> = HashMap::new();
    let mut order: Vec<ElementId> = Vec::with_capacity(view.len());
    let mut max_row: Option<usize> = None;
    let mut next_root = root.cloned();
    loop {
        let r = match next_root.take() {
            Some(r) => r,
            None => match view.nodes().iter().find(|id| !cells.contains_key(*id)) {
                Some(id) => id.clone(),
                None => break,
            },
        };
        let t = bfs_with(view, &r, Direction::Both, None)?;
        let mut children: HashMap<&ElementId, Vec<&ElementId>> = HashMap::new();
        for id in &t.order {
            if let Some(Some(p)) = t.predecessors.get(id) {
                children.entry(p).or_default().push(id);
            }
        }

        let base = max_row.map_or(0, |m| m + 1);
        let mut lowest = base;
        cells.insert(r.clone(), (base, 0));
        order.push(r.clone());
        // (node, row, column, next child)
        let mut stack: Vec<(&ElementId, usize, usize, usize)> = vec![(&r, base, 0, 0)];
        while let Some(top) = stack.last_mut() {
            let (id, row, col, k) = *top;
            let Some(kid) = children.get(id).and_then(|kids| kids.get(k)).copied() else {
                stack.pop();
                continue;
            };
            top.3 += 1;
            let kid_row = if k == 0 { row } else { lowest + 1 };
            lowest = lowest.max(kid_row);
            cells.insert(kid.clone(), (kid_row, col + 1));
            order.push(kid.clone());
            stack.push((kid, kid_row, col + 1, 0));
        }
        max_row = Some(lowest);
    }

    let positions = order
        .into_iter()
        .filter_map(|id| {
            let (row, col) = *cells.get(&id)?;
            Some((id, Vec2::new(cfg.margin + col as f32 * cfg.gap_x, cfg.margin + row as f32 * cfg.gap_y)))
        })
        .collect();
    Ok(LayoutOutcome::placed(positions))
}

/// Greedy spiral placement. Each node is placed around its first already
/// placed neighbor (or the centroid of everything placed so far) at the
/// first candidate farther than `min_separation` from every placed node.
pub fn organic(view: &AdjacencyView, cfg: &LayoutConfig) -> LayoutOutcome {
    let step = cfg.angle_step_deg.to_radians();
    let per_ring = ((TAU / step).floor() as usize).max(1);
    let mut placed: Vec<(ElementId, Vec2)> = Vec::with_capacity(view.len());
    let mut at: HashMap<&ElementId, Vec2> = HashMap::new();

    for (i, id) in view.nodes().iter().enumerate() {
        let anchor = view
            .neighbors_at(i, Direction::Both)
            .iter()
            .find_map(|inc| at.get(&inc.to).copied())
            .unwrap_or_else(|| centroid(&placed).unwrap_or_else(|| center(cfg)));
        let clear = |p: Vec2| placed.iter().all(|(_, q)| dist(p, *q) > cfg.min_separation);
        let mut spot = None;
        'rings: for ring in 0..=cfg.max_rings {
            let radius = ring as f32 * cfg.ring_step;
            let candidates = if ring == 0 { 1 } else { per_ring };
            for k in 0..candidates {
                let a = k as f32 * step;
                let p = Vec2::new(anchor.x + radius * a.cos(), anchor.y + radius * a.sin());
                if clear(p) {
                    spot = Some(p);
                    break 'rings;
                }
            }
        }
        let p = spot.unwrap_or_else(|| {
            tracing::debug!(node = %id, "organic layout: no free spot, stacking to the right");
            let far = cfg.max_rings as f32 * cfg.ring_step + cfg.min_separation * (placed.len() as f32 + 1.0);
            Vec2::new(anchor.x + far, anchor.y)
        });
        at.insert(id, p);
        placed.push((id.clone(), p));
    }
    LayoutOutcome::placed(placed)
}

fn centroid(placed: &[(ElementId, Vec2)]) -> Option<Vec2> {
    if placed.is_empty() {
        return None;
    }
    let n = placed.len() as f32;
    let (sx, sy) = placed.iter().fold((0.0, 0.0), |(sx, sy), (_, p)| (sx + p.x, sy + p.y));
    Some(Vec2::new(sx / n, sy / n))
}

/// Runs one layout over `view`. `root` is only used by the tree layout.
pub fn compute(
    kind: LayoutKind,
    view: &AdjacencyView,
    root: Option<&ElementId>,
    cfg: &LayoutConfig,
) -> Result<LayoutOutcome> {
    Ok(match kind {
        LayoutKind::Circular => circular(view, cfg),
        LayoutKind::Grid => grid(view, cfg),
        LayoutKind::Horizontal => horizontal(view, cfg),
        LayoutKind::Topological => topological(view, cfg),
        LayoutKind::Tree => tree(view, root, cfg)?,
        LayoutKind::Organic => organic(view, cfg),
    })
}

impl Graph {
    /// Computes a layout and moves the nodes, recording one undo snapshot.
    /// Nothing is recorded when the layout positions nothing (empty graph or
    /// a cyclic graph under the topological layout).
    pub fn apply_layout(
        &mut self,
        kind: LayoutKind,
        root: Option<&ElementId>,
        cfg: &LayoutConfig,
    ) -> Result<LayoutOutcome> {
        let outcome = compute(kind, &self.adjacency(), root, cfg)?;
        if !outcome.positions.is_empty() {
            self.record_memento();
            let moved = self.apply_positions(&outcome.positions);
            tracing::debug!(layout = %kind, moved, "layout applied");
        }
        Ok(outcome)
    }
}
