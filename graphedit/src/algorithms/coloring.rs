use super::adjacency::{AdjacencyView, Direction};
use crate::error::Result;
use crate::model::ElementId;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Coloring {
    /// Color index per node, starting at 0.
    pub colors: HashMap<ElementId, usize>,
    pub count: usize,
}

fn lowest_free(view: &AdjacencyView, colors: &[Option<usize>], u: usize) -> usize {
    let taken: Vec<usize> = view
        .neighbors_at(u, Direction::Both)
        .iter()
        .filter_map(|inc| colors[view.target(inc)])
        .collect();
    (0..).find(|c| !taken.contains(c)).unwrap_or(0)
}

/// Colors `start`, then its uncolored neighbors depth first.
fn spread(view: &AdjacencyView, colors: &mut [Option<usize>], start: usize) {
    let mut stack = vec![start];
    while let Some(u) = stack.pop() {
        if colors[u].is_some() {
            continue;
        }
        colors[u] = Some(lowest_free(view, colors, u));
        for inc in view.neighbors_at(u, Direction::Both).iter().rev() {
            let v = view.target(inc);
            if colors[v].is_none() {
                stack.push(v);
            }
        }
    }
}

fn color_from(view: &AdjacencyView, start: usize) -> Vec<Option<usize>> {
    let mut colors = vec![None; view.len()];
    spread(view, &mut colors, start);
    for i in 0..view.len() {
        spread(view, &mut colors, i);
    }
    colors
}

fn used(colors: &[Option<usize>]) -> usize {
    colors.iter().flatten().max().map_or(0, |m| m + 1)
}

/// Greedy coloring ignoring edge direction. Without a start node every node
/// is tried and the first coloring with the fewest colors is kept.
pub fn color_graph(view: &AdjacencyView, start: Option<&ElementId>) -> Result<Coloring> {
    let best = match start {
        Some(id) => color_from(view, view.require(id)?),
        None => {
            let mut best: Option<Vec<Option<usize>>> = None;
            for s in 0..view.len() {
                let c = color_from(view, s);
                if best.as_ref().map_or(true, |b| used(&c) < used(b)) {
                    best = Some(c);
                }
            }
            best.unwrap_or_default()
        }
    };
    let count = used(&best);
    let colors = view
        .nodes()
        .iter()
        .zip(&best)
        .filter_map(|(id, c)| c.map(|c| (id.clone(), c)))
        .collect();
    Ok(Coloring { colors, count })
}
