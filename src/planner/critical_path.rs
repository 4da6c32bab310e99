//! Node-weighted longest path through the task graph.
//!
//! Weights are raw task durations: the critical path reflects intrinsic task
//! cost, not the co-dispatch discounts a particular schedule earns.

use crate::core::dag::DependencyGraph;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriticalPath {
    pub tasks: Vec<String>,
    pub minutes: f64,
}

/// Longest path by cumulative duration.
///
/// `order` must be a topological order of `graph`. Ties between
/// predecessors go to the first listed dependency; ties between end nodes
/// go to the earliest node in `order`.
pub fn critical_path(graph: &DependencyGraph<'_>, order: &[usize]) -> CriticalPath {
    let mut dist = vec![0.0_f64; graph.len()];
    let mut prev: Vec<Option<usize>> = vec![None; graph.len()];

    for &v in order {
        let mut best: Option<usize> = None;
        for &u in graph.predecessors(v) {
            if best.map_or(true, |b| dist[u] > dist[b]) {
                best = Some(u);
            }
        }
        dist[v] = graph.task(v).duration_minutes + best.map_or(0.0, |b| dist[b]);
        prev[v] = best;
    }

    let mut end: Option<usize> = None;
    for &v in order {
        if end.map_or(true, |e| dist[v] > dist[e]) {
            end = Some(v);
        }
    }

    let Some(end) = end else {
        return CriticalPath::default();
    };

    let mut tasks = Vec::new();
    let mut node = Some(end);
    while let Some(n) = node {
        tasks.push(graph.task(n).task_id.clone());
        node = prev[n];
    }
    tasks.reverse();

    CriticalPath {
        tasks,
        minutes: dist[end],
    }
}
