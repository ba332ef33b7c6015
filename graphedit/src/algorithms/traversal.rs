use super::adjacency::{AdjacencyView, Direction};
use crate::error::Result;
use crate::model::ElementId;
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

/// Visit order plus the search tree. The root maps to `None` in
/// `predecessors`; `tree_edges` lists the edge used to reach each non-root
/// node, in visit order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Traversal {
    pub order: Vec<ElementId>,
    pub visited: HashSet<ElementId>,
    pub predecessors: HashMap<ElementId, Option<ElementId>>,
    pub tree_edges: Vec<ElementId>,
}

impl Traversal {
    fn from_indices(
        view: &AdjacencyView,
        order: Vec<usize>,
        pred: &[Option<(usize, ElementId)>],
    ) -> Traversal {
        let ids = view.nodes();
        let mut t = Traversal::default();
        for i in order {
            let id = ids[i].clone();
            let p = pred[i].as_ref().map(|(p, edge)| {
                t.tree_edges.push(edge.clone());
                ids[*p].clone()
            });
            t.predecessors.insert(id.clone(), p);
            t.visited.insert(id.clone());
            t.order.push(id);
        }
        t
    }
}

pub fn bfs(view: &AdjacencyView, start: &ElementId) -> Result<Traversal> {
    bfs_with(view, start, Direction::Outgoing, None)
}

/// Breadth-first search. `skip` names a node treated as absent, which is how
/// critical-node detection removes a node without rebuilding the view.
pub fn bfs_with(
    view: &AdjacencyView,
    start: &ElementId,
    dir: Direction,
    skip: Option<&ElementId>,
) -> Result<Traversal> {
    let s = view.require(start)?;
    let skip = skip.and_then(|id| view.index_of(id));
    let mut seen = vec![false; view.len()];
    let mut pred: Vec<Option<(usize, ElementId)>> = vec![None; view.len()];
    let mut order = Vec::new();
    let mut queue = VecDeque::new();
    if skip != Some(s) {
        seen[s] = true;
        queue.push_back(s);
    }
    while let Some(v) = queue.pop_front() {
        order.push(v);
        for inc in view.neighbors_at(v, dir) {
            let w = view.target(inc);
            if seen[w] || skip == Some(w) {
                continue;
            }
            seen[w] = true;
            pred[w] = Some((v, inc.edge.clone()));
            queue.push_back(w);
        }
    }
    Ok(Traversal::from_indices(view, order, &pred))
}

/// Depth-first search with an explicit stack: the first listed neighbor is
/// explored first.
pub fn dfs(view: &AdjacencyView, start: &ElementId) -> Result<Traversal> {
    let s = view.require(start)?;
    let mut seen = vec![false; view.len()];
    let mut pred: Vec<Option<(usize, ElementId)>> = vec![None; view.len()];
    let mut order = Vec::new();
    let mut stack: Vec<(usize, Option<(usize, ElementId)>)> = vec![(s, None)];
    while let Some((v, from)) = stack.pop() {
        if seen[v] {
            continue;
        }
        seen[v] = true;
        pred[v] = from;
        order.push(v);
        for inc in view.out_at(v).iter().rev() {
            let w = view.target(inc);
            if !seen[w] {
                stack.push((w, Some((v, inc.edge.clone()))));
            }
        }
    }
    Ok(Traversal::from_indices(view, order, &pred))
}

/// Weakly connected components, each in BFS order, components ordered by
/// their first node.
pub fn connected_components(view: &AdjacencyView) -> Vec<Vec<ElementId>> {
    let mut seen: HashSet<ElementId> = HashSet::new();
    let mut out = Vec::new();
    for id in view.nodes() {
        if seen.contains(id) {
            continue;
        }
        // `id` comes from the view, so the search cannot fail.
        let Ok(t) = bfs_with(view, id, Direction::Both, None) else { continue };
        seen.extend(t.order.iter().cloned());
        out.push(t.order);
    }
    out
}

/// Nodes whose removal disconnects the rest of their component.
///
/// Each node of a component with more than one node is skipped in turn and
/// the remaining nodes are searched from a single witness; the node is
/// critical when the search no longer reaches all of them.
pub fn critical_nodes(view: &AdjacencyView) -> Vec<ElementId> {
    let mut critical = Vec::new();
    for comp in connected_components(view) {
        if comp.len() < 2 {
            continue;
        }
        for removed in &comp {
            let Some(witness) = comp.iter().find(|id| *id != removed) else { continue };
            let Ok(t) = bfs_with(view, witness, Direction::Both, Some(removed)) else { continue };
            if t.order.len() < comp.len() - 1 {
                critical.push(removed.clone());
            }
        }
    }
    let rank: HashMap<&ElementId, usize> = view.nodes().iter().enumerate().map(|(i, id)| (id, i)).collect();
    critical.sort_by_key(|id| rank.get(id).copied().unwrap_or(usize::MAX));
    critical
}
