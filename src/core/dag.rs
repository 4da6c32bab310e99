//! Task dependency graph.
//!
//! Nodes are tasks, identified by their position in the input slice; edges
//! point from a dependency to its dependent. Node `i` of the petgraph
//! `DiGraph` is task `i`. Leveling and dependency lists follow input order so
//! every result is reproducible for a given input.

use crate::core::task::TaskNode;
use crate::error::{Error, Result};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{depth_first_search, Control, DfsEvent};
use petgraph::Direction;
use std::collections::HashMap;

/// Dependency graph over a task slice.
pub struct DependencyGraph<'a> {
    tasks: &'a [TaskNode],
    /// Node weights are task positions; edges run dependency -> dependent.
    graph: DiGraph<usize, ()>,
    /// Incoming edges in the task's listed order, deduplicated. petgraph
    /// walks neighbours newest-first, so listed order is kept here.
    predecessors: Vec<Vec<usize>>,
}

impl<'a> DependencyGraph<'a> {
    /// Build the graph, checking that ids are unique and that every
    /// dependency names a task in the set.
    ///
    /// # Errors
    /// - [`Error::DuplicateTask`] if two tasks share an id
    /// - [`Error::UnknownDependency`] for the first dependency (in input
    ///   order) that names no task
    pub fn build(tasks: &'a [TaskNode]) -> Result<Self> {
        let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(tasks.len(), tasks.len());
        let mut index: HashMap<&str, NodeIndex> = HashMap::with_capacity(tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            let node = graph.add_node(i);
            if index.insert(task.task_id.as_str(), node).is_some() {
                return Err(Error::DuplicateTask(task.task_id.clone()));
            }
        }

        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); tasks.len()];
        for (i, task) in tasks.iter().enumerate() {
            for dep in &task.dependencies {
                let &d = index
                    .get(dep.as_str())
                    .ok_or_else(|| Error::UnknownDependency {
                        task: task.task_id.clone(),
                        dependency: dep.clone(),
                    })?;
                if predecessors[i].contains(&d.index()) {
                    continue;
                }
                predecessors[i].push(d.index());
                graph.add_edge(d, NodeIndex::new(i), ());
            }
        }

        Ok(Self {
            tasks,
            graph,
            predecessors,
        })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn task(&self, node: usize) -> &'a TaskNode {
        &self.tasks[self.graph[NodeIndex::new(node)]]
    }

    /// Dependencies of `node`, in the order the task lists them.
    pub fn predecessors(&self, node: usize) -> &[usize] {
        &self.predecessors[node]
    }

    /// Find a dependency cycle, if any.
    ///
    /// Depth-first search from each unvisited task in input order; the first
    /// back edge closes the cycle. The returned ids start and end with the
    /// same task, e.g. `[A, B, A]`.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        if !is_cyclic_directed(&self.graph) {
            return None;
        }

        let mut parent: Vec<Option<NodeIndex>> = vec![None; self.len()];
        let back_edge = depth_first_search(&self.graph, self.graph.node_indices(), |event| {
            match event {
                DfsEvent::TreeEdge(u, v) => parent[v.index()] = Some(u),
                DfsEvent::BackEdge(u, v) => return Control::Break((u, v)),
                _ => {}
            }
            Control::Continue
        })
        .break_value()?;

        // Walk tree edges back from the tail of the back edge to its head.
        let (tail, head) = back_edge;
        let mut path = vec![tail];
        let mut node = tail;
        while node != head {
            node = parent[node.index()]?;
            path.push(node);
        }
        path.reverse();
        path.push(head);

        Some(
            path.into_iter()
                .map(|n| self.task(n.index()).task_id.clone())
                .collect(),
        )
    }

    /// # Errors
    /// Returns [`Error::CycleDetected`] naming the first cycle found.
    pub fn ensure_acyclic(&self) -> Result<()> {
        match self.find_cycle() {
            Some(cycle) => Err(Error::CycleDetected { cycle }),
            None => Ok(()),
        }
    }

    /// Partition the graph into topological generations.
    ///
    /// Generation 0 holds tasks with no dependencies; generation k holds
    /// tasks whose longest dependency chain has k edges. Each generation
    /// lists its tasks in input order. Nodes on a cycle are never placed,
    /// so callers must check [`ensure_acyclic`](Self::ensure_acyclic) first.
    pub fn generations(&self) -> Vec<Vec<usize>> {
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|n| self.graph.neighbors_directed(n, Direction::Incoming).count())
            .collect();
        let mut current: Vec<usize> = (0..self.len()).filter(|&n| in_degree[n] == 0).collect();
        let mut generations = Vec::new();

        while !current.is_empty() {
            let mut next = Vec::new();
            for &node in &current {
                for succ in self
                    .graph
                    .neighbors_directed(NodeIndex::new(node), Direction::Outgoing)
                {
                    in_degree[succ.index()] -= 1;
                    if in_degree[succ.index()] == 0 {
                        next.push(succ.index());
                    }
                }
            }
            next.sort_unstable();
            generations.push(std::mem::replace(&mut current, next));
        }

        generations
    }
}

impl std::fmt::Debug for DependencyGraph<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("tasks", &self.len())
            .field("dependencies", &self.edge_count())
            .finish()
    }
}
