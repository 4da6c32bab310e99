//! Value types produced by the wave planner.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One task placed on an agent slot within a wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveAssignment {
    pub task_id: String,
    pub agent_name: String,
    pub slot_index: usize,
    /// Duration after the co-dispatch discount.
    pub duration_minutes: f64,
    /// Every task the same agent received in this wave, in the order it
    /// received them. Empty when the agent ran this task alone.
    pub co_dispatch_group: Vec<String>,
}

impl WaveAssignment {
    pub fn is_co_dispatched(&self) -> bool {
        !self.co_dispatch_group.is_empty()
    }
}

/// Tasks started together once all of their dependencies have finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    pub wave_number: usize,
    pub start_minutes: f64,
    pub end_minutes: f64,
    pub assignments: Vec<WaveAssignment>,
    /// One amortized review charge per agent that received work.
    pub agent_review_minutes: BTreeMap<String, f64>,
}

impl Wave {
    pub fn duration_minutes(&self) -> f64 {
        self.end_minutes - self.start_minutes
    }

    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.assignments.iter().map(|a| a.task_id.as_str())
    }

    /// Assignments handled by `agent`, in assignment order.
    pub fn assignments_for<'a>(&'a self, agent: &'a str) -> impl Iterator<Item = &'a WaveAssignment> {
        self.assignments.iter().filter(move |a| a.agent_name == agent)
    }
}

/// Complete schedule with critical-path and utilization metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WavePlan {
    pub waves: Vec<Wave>,
    pub critical_path: Vec<String>,
    pub critical_path_minutes: f64,
    /// Adjusted work per agent over total wall clock; idle agents report 0.0.
    pub agent_utilization: BTreeMap<String, f64>,
    /// Sequential minutes over slot-minutes available, capped at 1.0.
    pub parallel_efficiency: f64,
    pub total_wall_clock_minutes: f64,
    pub total_sequential_minutes: f64,
}

impl WavePlan {
    /// The all-zero plan returned for an empty task list.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.waves.is_empty()
    }

    pub fn task_count(&self) -> usize {
        self.waves.iter().map(|w| w.assignments.len()).sum()
    }

    /// Wave number and assignment for `task_id`.
    pub fn find_assignment(&self, task_id: &str) -> Option<(usize, &WaveAssignment)> {
        self.waves.iter().find_map(|wave| {
            wave.assignments
                .iter()
                .find(|a| a.task_id == task_id)
                .map(|a| (wave.wave_number, a))
        })
    }

    pub fn wave_of(&self, task_id: &str) -> Option<usize> {
        self.find_assignment(task_id).map(|(wave, _)| wave)
    }

    pub fn is_critical(&self, task_id: &str) -> bool {
        self.critical_path.iter().any(|t| t == task_id)
    }
}
