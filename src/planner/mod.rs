//! Dependency-aware multi-agent wave planner.
//!
//! [`plan_waves`] levels the task graph into topological generations, packs
//! each generation across the agents' slots with the LPT heuristic, and
//! derives the critical path and utilization figures for the whole plan.
//!
//! The planner is a pure function: no I/O, and identical inputs always
//! produce an identical [`WavePlan`].

pub mod critical_path;
pub mod metrics;
pub mod packing;
mod types;

pub use packing::CO_DISPATCH_FACTOR;
pub use types::{Wave, WaveAssignment, WavePlan};

use crate::core::agent::{expand_slots, AgentProfile};
use crate::core::dag::DependencyGraph;
use crate::core::task::TaskNode;
use crate::error::{Error, Result};
use crate::{wlog_debug, wlog_warn};

/// Schedule `tasks` into dependency-respecting waves across `agents`.
///
/// `inter_wave_overhead_minutes` of idle time separates consecutive waves.
///
/// All validation happens before any packing, so an error never comes with
/// a partial plan.
///
/// # Errors
/// - [`Error::InvalidOverhead`] if the overhead is negative or NaN
/// - [`Error::DuplicateTask`] / [`Error::UnknownDependency`] for a malformed
///   task set
/// - [`Error::CycleDetected`] if the dependencies form a cycle
/// - [`Error::NoAgentsProvided`] for an empty roster
/// - [`Error::NoEligibleAgent`] if some task's required capabilities are not
///   covered by any slot
pub fn plan_waves(
    tasks: &[TaskNode],
    agents: &[AgentProfile],
    inter_wave_overhead_minutes: f64,
) -> Result<WavePlan> {
    if inter_wave_overhead_minutes.is_nan() || inter_wave_overhead_minutes < 0.0 {
        return Err(Error::InvalidOverhead(inter_wave_overhead_minutes));
    }

    if tasks.is_empty() {
        wlog_debug!("plan_waves: no tasks, returning empty plan");
        return Ok(WavePlan::empty());
    }

    let graph = DependencyGraph::build(tasks)?;
    graph.ensure_acyclic()?;

    if agents.is_empty() {
        return Err(Error::NoAgentsProvided);
    }

    let slots = expand_slots(agents);
    if let Some(task) = tasks
        .iter()
        .find(|t| !slots.iter().any(|s| s.is_eligible(&t.required_capabilities)))
    {
        return Err(Error::NoEligibleAgent {
            task: task.task_id.clone(),
            required: task.required_capabilities.clone(),
        });
    }

    wlog_debug!(
        "plan_waves: tasks={}, dependencies={}, agents={}, slots={}, overhead={}m",
        graph.len(),
        graph.edge_count(),
        agents.len(),
        slots.len(),
        inter_wave_overhead_minutes
    );

    let generations = graph.generations();
    let mut waves: Vec<Wave> = Vec::with_capacity(generations.len());
    let mut cursor = 0.0_f64;

    for (wave_number, generation) in generations.iter().enumerate() {
        let packed = packing::pack_generation(generation, tasks, &slots)?;

        let start_minutes = if wave_number == 0 {
            0.0
        } else {
            cursor + inter_wave_overhead_minutes
        };
        let end_minutes = start_minutes + packed.makespan_minutes;
        cursor = end_minutes;

        wlog_debug!(
            "wave {}: tasks={}, agents={}, start={}m, end={}m",
            wave_number,
            packed.assignments.len(),
            packed.agent_review_minutes.len(),
            start_minutes,
            end_minutes
        );

        waves.push(Wave {
            wave_number,
            start_minutes,
            end_minutes,
            assignments: packed.assignments,
            agent_review_minutes: packed.agent_review_minutes,
        });
    }

    let order: Vec<usize> = generations.into_iter().flatten().collect();
    let critical = critical_path::critical_path(&graph, &order);

    let total_wall_clock_minutes = waves.last().map_or(0.0, |w| w.end_minutes);
    let metrics = metrics::compute(&waves, agents, total_wall_clock_minutes);

    for (name, utilization) in &metrics.agent_utilization {
        if *utilization == 0.0 {
            wlog_warn!("agent {} received no work", name);
        }
    }
    wlog_debug!(
        "plan_waves: waves={}, wall_clock={}m, critical_path={} ({}m), efficiency={:.3}",
        waves.len(),
        total_wall_clock_minutes,
        critical.tasks.join(" -> "),
        critical.minutes,
        metrics.parallel_efficiency
    );

    Ok(WavePlan {
        waves,
        critical_path: critical.tasks,
        critical_path_minutes: critical.minutes,
        agent_utilization: metrics.agent_utilization,
        parallel_efficiency: metrics.parallel_efficiency,
        total_wall_clock_minutes,
        total_sequential_minutes: metrics.total_sequential_minutes,
    })
}
