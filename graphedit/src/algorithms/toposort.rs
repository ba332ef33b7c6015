//! Topological orderings. Undirected edges count as two opposite arcs, so any
//! undirected edge makes the graph cyclic.

use super::adjacency::AdjacencyView;
use crate::model::ElementId;
use serde::Serialize;
use std::collections::VecDeque;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TopoOrder {
    pub order: Vec<ElementId>,
    /// Edges consumed while emitting nodes, in emission order.
    pub edges: Vec<ElementId>,
    pub has_cycle: bool,
    /// Nodes never emitted because they sit on or behind a cycle.
    pub remainder: Vec<ElementId>,
}

/// Kahn's algorithm. Zero in-degree nodes are released in view order.
pub fn toposort_kahn(view: &AdjacencyView) -> TopoOrder {
    let n = view.len();
    let mut indeg = vec![0usize; n];
    for i in 0..n {
        for inc in view.out_at(i) {
            indeg[view.target(inc)] += 1;
        }
    }
    let mut queue: VecDeque<usize> = (0..n).filter(|&i| indeg[i] == 0).collect();
    let mut emitted = vec![false; n];
    let mut out = TopoOrder::default();
    while let Some(u) = queue.pop_front() {
        emitted[u] = true;
        out.order.push(view.nodes()[u].clone());
        for inc in view.out_at(u) {
            let v = view.target(inc);
            out.edges.push(inc.edge.clone());
            indeg[v] -= 1;
            if indeg[v] == 0 {
                queue.push_back(v);
            }
        }
    }
    out.has_cycle = out.order.len() < n;
    out.remainder = (0..n).filter(|&i| !emitted[i]).map(|i| view.nodes()[i].clone()).collect();
    if out.has_cycle {
        tracing::debug!(remainder = out.remainder.len(), "kahn: graph is cyclic");
    }
    out
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    White,
    Gray,
    Black,
}

/// Reverse-postorder DFS. On a cycle, `remainder` holds the nodes that were
/// on the search stack when a back edge was found; `order` is left empty.
pub fn toposort_dfs(view: &AdjacencyView) -> TopoOrder {
    let n = view.len();
    let mut mark = vec![Mark::White; n];
    let mut post: Vec<usize> = Vec::with_capacity(n);
    let mut on_cycle = vec![false; n];
    let mut has_cycle = false;

    for root in 0..n {
        if mark[root] != Mark::White {
            continue;
        }
        // (node, next incidence to inspect)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        mark[root] = Mark::Gray;
        while let Some(top) = stack.last_mut() {
            let (u, k) = *top;
            let outs = view.out_at(u);
            if k == outs.len() {
                mark[u] = Mark::Black;
                post.push(u);
                stack.pop();
                continue;
            }
            top.1 += 1;
            let v = view.target(&outs[k]);
            match mark[v] {
                Mark::White => {
                    mark[v] = Mark::Gray;
                    stack.push((v, 0));
                }
                Mark::Gray => {
                    has_cycle = true;
                    if let Some(from) = stack.iter().position(|(w, _)| *w == v) {
                        for (w, _) in &stack[from..] {
                            on_cycle[*w] = true;
                        }
                    }
                }
                Mark::Black => {}
            }
        }
    }

    let ids = view.nodes();
    if has_cycle {
        return TopoOrder {
            order: Vec::new(),
            edges: Vec::new(),
            has_cycle,
            remainder: (0..n).filter(|&i| on_cycle[i]).map(|i| ids[i].clone()).collect(),
        };
    }
    post.reverse();
    let order: Vec<ElementId> = post.iter().map(|&i| ids[i].clone()).collect();
    let edges = post
        .iter()
        .flat_map(|&u| view.out_at(u).iter().map(|inc| inc.edge.clone()))
        .collect();
    TopoOrder { order, edges, has_cycle, remainder: Vec::new() }
}

/// Longest-path level of every node (sources at 0), in view order, or `None`
/// when the graph is cyclic.
pub fn levels(view: &AdjacencyView) -> Option<Vec<usize>> {
    let topo = toposort_kahn(view);
    if topo.has_cycle {
        return None;
    }
    let mut level = vec![0usize; view.len()];
    for id in &topo.order {
        let u = view.index_of(id)?;
        for inc in view.out_at(u) {
            let v = view.target(inc);
            level[v] = level[v].max(level[u] + 1);
        }
    }
    Some(level)
}
