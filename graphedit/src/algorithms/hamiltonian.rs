use super::adjacency::AdjacencyView;
use crate::error::Result;
use crate::model::ElementId;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq)]
pub struct HamiltonOptions {
    /// First node of every path. Required for a meaningful cycle search;
    /// without it cycles start at the first node and paths try every node.
    pub start: Option<ElementId>,
    /// Require an edge from the last node back to the start.
    pub cycle: bool,
    /// Collect every solution instead of stopping at the first.
    pub all: bool,
    /// Extension steps before the search gives up; `None` is unbounded.
    pub max_steps: Option<usize>,
}

impl Default for HamiltonOptions {
    fn default() -> Self {
        HamiltonOptions { start: None, cycle: true, all: false, max_steps: Some(1_000_000) }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HamiltonResult {
    /// Node sequences. Cycles repeat the start node at the end.
    pub paths: Vec<Vec<ElementId>>,
    /// The step budget ran out before the search space was exhausted.
    pub truncated: bool,
    pub steps: usize,
}

struct Search<'a> {
    view: &'a AdjacencyView,
    cycle: bool,
    all: bool,
    max_steps: Option<usize>,
    steps: usize,
    truncated: bool,
    on_path: Vec<bool>,
    path: Vec<usize>,
    used_edges: Vec<&'a ElementId>,
    found: Vec<Vec<usize>>,
}

impl<'a> Search<'a> {
    fn done(&self) -> bool {
        self.truncated || (!self.all && !self.found.is_empty())
    }

    fn extend(&mut self, u: usize) {
        if self.done() {
            return;
        }
        self.steps += 1;
        if self.max_steps.is_some_and(|m| self.steps > m) {
            self.truncated = true;
            return;
        }
        let view = self.view;
        if self.path.len() == view.len() {
            self.complete(u);
            return;
        }
        for inc in view.out_at(u) {
            let v = view.target(inc);
            if self.on_path[v] {
                continue;
            }
            self.on_path[v] = true;
            self.path.push(v);
            self.used_edges.push(&inc.edge);
            self.extend(v);
            self.used_edges.pop();
            self.path.pop();
            self.on_path[v] = false;
            if self.done() {
                return;
            }
        }
    }

    fn complete(&mut self, last: usize) {
        if !self.cycle {
            self.found.push(self.path.clone());
            return;
        }
        let first = self.path[0];
        let closes = self.view.out_at(last).iter().any(|inc| {
            self.view.target(inc) == first && !self.used_edges.contains(&&inc.edge)
        });
        if closes {
            let mut p = self.path.clone();
            p.push(first);
            self.found.push(p);
        }
    }
}

/// Backtracking Hamiltonian path / cycle search following traversable edges.
pub fn hamiltonian(view: &AdjacencyView, opts: &HamiltonOptions) -> Result<HamiltonResult> {
    let starts: Vec<usize> = match &opts.start {
        Some(id) => vec![view.require(id)?],
        None if view.is_empty() => Vec::new(),
        None if opts.cycle => vec![0],
        None => (0..view.len()).collect(),
    };
    let mut search = Search {
        view,
        cycle: opts.cycle,
        all: opts.all,
        max_steps: opts.max_steps,
        steps: 0,
        truncated: false,
        on_path: vec![false; view.len()],
        path: Vec::with_capacity(view.len() + 1),
        used_edges: Vec::new(),
        found: Vec::new(),
    };
    for s in starts {
        if search.done() {
            break;
        }
        search.on_path[s] = true;
        search.path.push(s);
        search.extend(s);
        search.path.pop();
        search.on_path[s] = false;
    }
    if search.truncated {
        tracing::warn!(steps = search.steps, "hamiltonian search hit its step budget");
    }
    let ids = view.nodes();
    Ok(HamiltonResult {
        paths: search
            .found
            .into_iter()
            .map(|p| p.into_iter().map(|i| ids[i].clone()).collect())
            .collect(),
        truncated: search.truncated,
        steps: search.steps,
    })
}
