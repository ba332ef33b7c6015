use super::adjacency::{AdjacencyView, EdgeInfo};
use crate::model::ElementId;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SpanningForest {
    pub edges: Vec<ElementId>,
    pub total_weight: f64,
}

/// Kruskal's minimum spanning forest. Direction is ignored. Edges are sorted
/// stably by weight, so equal weights keep insertion order; components are
/// merged by relabelling the representative array.
pub fn kruskal(view: &AdjacencyView) -> SpanningForest {
    let mut seen: HashSet<&ElementId> = HashSet::new();
    let mut edges: Vec<&EdgeInfo> = view.edges().iter().filter(|e| seen.insert(&e.id)).collect();
    edges.sort_by(|a, b| a.weight.total_cmp(&b.weight));

    let mut rep: Vec<usize> = (0..view.len()).collect();
    let mut forest = SpanningForest::default();
    for e in edges {
        let (Some(s), Some(d)) = (view.index_of(&e.src), view.index_of(&e.dst)) else { continue };
        let (rs, rd) = (rep[s], rep[d]);
        if rs == rd {
            continue;
        }
        for r in rep.iter_mut() {
            if *r == rd {
                *r = rs;
            }
        }
        forest.edges.push(e.id.clone());
        forest.total_weight += e.weight;
    }
    forest
}
