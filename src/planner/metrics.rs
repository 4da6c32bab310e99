//! Whole-plan utilization and efficiency metrics.

use crate::core::agent::AgentProfile;
use crate::planner::types::Wave;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanMetrics {
    pub agent_utilization: BTreeMap<String, f64>,
    pub parallel_efficiency: f64,
    pub total_sequential_minutes: f64,
}

/// Compute metrics for a scheduled plan.
///
/// Utilization counts adjusted work only. Sequential minutes count adjusted
/// work plus one review charge per agent per wave, the same convention the
/// wave makespan uses.
pub fn compute(waves: &[Wave], agents: &[AgentProfile], wall_clock_minutes: f64) -> PlanMetrics {
    let mut busy: BTreeMap<String, f64> = agents.iter().map(|a| (a.name.clone(), 0.0)).collect();
    let mut total_sequential_minutes = 0.0;

    for wave in waves {
        for assignment in &wave.assignments {
            *busy.entry(assignment.agent_name.clone()).or_insert(0.0) += assignment.duration_minutes;
            total_sequential_minutes += assignment.duration_minutes;
        }
        total_sequential_minutes += wave.agent_review_minutes.values().sum::<f64>();
    }

    let slot_count: usize = agents.iter().map(|a| a.parallelism).sum();

    if wall_clock_minutes <= 0.0 || slot_count == 0 {
        return PlanMetrics {
            agent_utilization: busy.into_keys().map(|name| (name, 0.0)).collect(),
            parallel_efficiency: 0.0,
            total_sequential_minutes,
        };
    }

    let agent_utilization = busy
        .into_iter()
        .map(|(name, minutes)| (name, minutes / wall_clock_minutes))
        .collect();
    let parallel_efficiency =
        (total_sequential_minutes / (slot_count as f64 * wall_clock_minutes)).min(1.0);

    PlanMetrics {
        agent_utilization,
        parallel_efficiency,
        total_sequential_minutes,
    }
}
