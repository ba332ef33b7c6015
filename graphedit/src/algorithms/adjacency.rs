//! Derived adjacency view consumed by every algorithm.
//!
//! Nodes keep the container's insertion order. Directed edges appear in the
//! source's outgoing list only; undirected edges appear in both endpoints'
//! outgoing lists. Hidden elements are left out.

use crate::error::{Error, Result};
use crate::model::ElementId;
use crate::Graph;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub struct Incidence {
    pub edge: ElementId,
    pub to: ElementId,
    pub weight: f64,
    pub directed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeInfo {
    pub id: ElementId,
    pub src: ElementId,
    pub dst: ElementId,
    pub weight: f64,
    pub directed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Follow edges the way they can be traversed.
    Outgoing,
    /// Ignore edge direction.
    Both,
}

#[derive(Clone, Debug, Default)]
pub struct AdjacencyView {
    order: Vec<ElementId>,
    index: HashMap<ElementId, usize>,
    out: Vec<Vec<Incidence>>,
    incoming: Vec<Vec<Incidence>>,
    both: Vec<Vec<Incidence>>,
    edges: Vec<EdgeInfo>,
}

impl AdjacencyView {
    pub fn from_graph(g: &Graph) -> Self {
        let nodes = g.nodes.iter().filter(|n| !n.hidden).map(|n| n.id.clone());
        let edges = g.edges.iter().filter(|e| !e.hidden).map(|e| EdgeInfo {
            id: e.id.clone(),
            src: e.src.clone(),
            dst: e.dst.clone(),
            weight: e.weight,
            directed: e.directed,
        });
        AdjacencyView::from_parts(nodes, edges)
    }

    /// Builds a view from raw parts. Edges touching unknown nodes, self loops
    /// and repeated edge ids are skipped.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = ElementId>,
        edges: impl IntoIterator<Item = EdgeInfo>,
    ) -> Self {
        let mut view = AdjacencyView::default();
        for id in nodes {
            if view.index.contains_key(&id) {
                continue;
            }
            view.index.insert(id.clone(), view.order.len());
            view.order.push(id);
            view.out.push(Vec::new());
            view.incoming.push(Vec::new());
            view.both.push(Vec::new());
        }
        for e in edges {
            let (Some(&s), Some(&d)) = (view.index.get(&e.src), view.index.get(&e.dst)) else {
                continue;
            };
            if s == d || view.edges.iter().any(|x| x.id == e.id) {
                continue;
            }
            let fwd = Incidence { edge: e.id.clone(), to: e.dst.clone(), weight: e.weight, directed: e.directed };
            let back = Incidence { edge: e.id.clone(), to: e.src.clone(), weight: e.weight, directed: e.directed };
            view.out[s].push(fwd.clone());
            view.incoming[d].push(back.clone());
            if !e.directed {
                view.out[d].push(back.clone());
                view.incoming[s].push(fwd.clone());
            }
            view.both[s].push(fwd);
            view.both[d].push(back);
            view.edges.push(e);
        }
        view
    }

    pub fn nodes(&self) -> &[ElementId] {
        &self.order
    }

    pub fn edges(&self) -> &[EdgeInfo] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.index.contains_key(id)
    }

    pub fn index_of(&self, id: &ElementId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Index of `id`, or the missing-node error every algorithm reports.
    pub fn require(&self, id: &ElementId) -> Result<usize> {
        self.index_of(id).ok_or_else(|| Error::missing_node(id))
    }

    fn slot<'a>(&self, lists: &'a [Vec<Incidence>], id: &ElementId) -> &'a [Incidence] {
        match self.index_of(id) {
            Some(i) => &lists[i],
            None => &[],
        }
    }

    pub fn outgoing(&self, id: &ElementId) -> &[Incidence] {
        self.slot(&self.out, id)
    }

    /// Incidences arriving at `id`; `to` names the node they come from.
    pub fn incoming(&self, id: &ElementId) -> &[Incidence] {
        self.slot(&self.incoming, id)
    }

    pub fn neighbors(&self, id: &ElementId, dir: Direction) -> &[Incidence] {
        match dir {
            Direction::Outgoing => self.outgoing(id),
            Direction::Both => self.slot(&self.both, id),
        }
    }

    pub(crate) fn out_at(&self, i: usize) -> &[Incidence] {
        &self.out[i]
    }

    pub(crate) fn in_at(&self, i: usize) -> &[Incidence] {
        &self.incoming[i]
    }

    pub(crate) fn neighbors_at(&self, i: usize, dir: Direction) -> &[Incidence] {
        match dir {
            Direction::Outgoing => &self.out[i],
            Direction::Both => &self.both[i],
        }
    }

    /// Index of an incidence's far end. Incidences are only built for known
    /// nodes, so this always resolves.
    pub(crate) fn target(&self, inc: &Incidence) -> usize {
        self.index[&inc.to]
    }
}
