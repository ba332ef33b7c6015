//! Critical-path analysis. Every node is an activity whose duration is the
//! weight shared by all of its outgoing edges; sinks take no time.

use super::adjacency::AdjacencyView;
use super::toposort::toposort_kahn;
use crate::error::{Error, Result};
use crate::geometry::tolerance::approx_eq_f64;
use crate::model::ElementId;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Schedule {
    pub duration: f64,
    pub early_start: f64,
    pub early_finish: f64,
    pub late_start: f64,
    pub late_finish: f64,
    /// Total float: `late_start - early_start`.
    pub float: f64,
    pub free_float: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PertResult {
    pub schedule: HashMap<ElementId, Schedule>,
    /// Topological order used for the forward pass.
    pub order: Vec<ElementId>,
    pub project_duration: f64,
    /// Zero-float nodes, in topological order.
    pub critical_nodes: Vec<ElementId>,
    /// Edges joining two critical nodes where the target starts exactly when
    /// the source finishes.
    pub critical_edges: Vec<ElementId>,
}

fn durations(view: &AdjacencyView) -> Result<Vec<f64>> {
    let mut out = Vec::with_capacity(view.len());
    for (i, id) in view.nodes().iter().enumerate() {
        let outs = view.out_at(i);
        let Some(first) = outs.first() else {
            out.push(0.0);
            continue;
        };
        if let Some(other) = outs.iter().find(|inc| !approx_eq_f64(inc.weight, first.weight)) {
            return Err(Error::InconsistentDuration {
                node: id.clone(),
                first: first.weight,
                other: other.weight,
            });
        }
        out.push(first.weight);
    }
    Ok(out)
}

pub fn pert(view: &AdjacencyView) -> Result<PertResult> {
    let topo = toposort_kahn(view);
    if topo.has_cycle {
        return Err(Error::Cycle { nodes: topo.remainder });
    }
    let dur = durations(view)?;
    let n = view.len();
    let order: Vec<usize> = topo.order.iter().filter_map(|id| view.index_of(id)).collect();

    let mut es = vec![0.0f64; n];
    for &u in &order {
        for inc in view.out_at(u) {
            let v = view.target(inc);
            es[v] = es[v].max(es[u] + dur[u]);
        }
    }
    let ef: Vec<f64> = (0..n).map(|i| es[i] + dur[i]).collect();
    let total = ef.iter().copied().fold(0.0, f64::max);

    let mut lf = vec![total; n];
    for &u in order.iter().rev() {
        for inc in view.out_at(u) {
            let v = view.target(inc);
            lf[u] = lf[u].min(lf[v] - dur[v]);
        }
    }

    let ids = view.nodes();
    let mut result = PertResult { project_duration: total, order: topo.order.clone(), ..Default::default() };
    for &u in &order {
        let ls = lf[u] - dur[u];
        let free = view
            .out_at(u)
            .iter()
            .map(|inc| es[view.target(inc)] - ef[u])
            .reduce(f64::min)
            .unwrap_or(total - ef[u]);
        let s = Schedule {
            duration: dur[u],
            early_start: es[u],
            early_finish: ef[u],
            late_start: ls,
            late_finish: lf[u],
            float: ls - es[u],
            free_float: free,
        };
        if approx_eq_f64(s.float, 0.0) {
            result.critical_nodes.push(ids[u].clone());
        }
        result.schedule.insert(ids[u].clone(), s);
    }
    let critical = |i: usize| approx_eq_f64(lf[i] - dur[i], es[i]);
    for &u in &order {
        for inc in view.out_at(u) {
            let v = view.target(inc);
            if critical(u) && critical(v) && approx_eq_f64(es[v], ef[u]) {
                result.critical_edges.push(inc.edge.clone());
            }
        }
    }
    tracing::debug!(duration = total, critical = result.critical_nodes.len(), "pert computed");
    Ok(result)
}
