use super::adjacency::AdjacencyView;
use crate::error::{Error, Result};
use crate::model::ElementId;
use serde::Serialize;
use std::collections::HashMap;

/// Single-source shortest paths. Unreachable nodes have distance
/// `f64::INFINITY` and no predecessor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShortestPaths {
    pub source: ElementId,
    pub distances: HashMap<ElementId, f64>,
    pub predecessors: HashMap<ElementId, Option<ElementId>>,
    /// Edge used to reach each node with a predecessor.
    pub via: HashMap<ElementId, ElementId>,
}

impl ShortestPaths {
    pub fn distance(&self, id: &ElementId) -> f64 {
        self.distances.get(id).copied().unwrap_or(f64::INFINITY)
    }

    /// Node sequence from the source to `target`, or `None` if unreachable.
    pub fn path_to(&self, target: &ElementId) -> Option<Vec<ElementId>> {
        if !self.distance(target).is_finite() {
            return None;
        }
        let mut path = vec![target.clone()];
        let mut cur = target;
        while let Some(Some(p)) = self.predecessors.get(cur) {
            path.push(p.clone());
            cur = p;
        }
        path.reverse();
        Some(path)
    }

    /// Edges along [`ShortestPaths::path_to`].
    pub fn edges_to(&self, target: &ElementId) -> Option<Vec<ElementId>> {
        let path = self.path_to(target)?;
        path.iter().skip(1).map(|n| self.via.get(n).cloned()).collect()
    }
}

/// Dijkstra with a linear scan for the next closest node. Among equally
/// close candidates the one listed first in the view wins.
pub fn dijkstra(view: &AdjacencyView, start: &ElementId) -> Result<ShortestPaths> {
    let s = view.require(start)?;
    if let Some(e) = view.edges().iter().find(|e| e.weight < 0.0) {
        return Err(Error::NegativeWeight { edge: e.id.clone(), weight: e.weight });
    }
    let n = view.len();
    let mut dist = vec![f64::INFINITY; n];
    let mut pred: Vec<Option<(usize, ElementId)>> = vec![None; n];
    let mut done = vec![false; n];
    dist[s] = 0.0;
    loop {
        let mut best: Option<usize> = None;
        for i in 0..n {
            if done[i] || !dist[i].is_finite() {
                continue;
            }
            if best.map_or(true, |b| dist[i] < dist[b]) {
                best = Some(i);
            }
        }
        let Some(u) = best else { break };
        done[u] = true;
        for inc in view.out_at(u) {
            let v = view.target(inc);
            let alt = dist[u] + inc.weight;
            if alt < dist[v] {
                dist[v] = alt;
                pred[v] = Some((u, inc.edge.clone()));
            }
        }
    }

    let ids = view.nodes();
    let mut out = ShortestPaths {
        source: start.clone(),
        distances: HashMap::with_capacity(n),
        predecessors: HashMap::with_capacity(n),
        via: HashMap::new(),
    };
    for (i, id) in ids.iter().enumerate() {
        out.distances.insert(id.clone(), dist[i]);
        let p = pred[i].as_ref().map(|(p, edge)| {
            out.via.insert(id.clone(), edge.clone());
            ids[*p].clone()
        });
        out.predecessors.insert(id.clone(), p);
    }
    Ok(out)
}
