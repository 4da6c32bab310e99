//! Flattened plan views for the CLI.
//!
//! A [`PlanReport`] turns a [`WavePlan`] into per-wave rows and per-agent
//! load rows, and renders them as plain text or JSON.

use crate::core::agent::AgentProfile;
use crate::planner::WavePlan;
use crate::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Agent turns are priced assuming one turn per five minutes of work.
pub const MINUTES_PER_TURN: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveRow {
    pub number: usize,
    pub start_minutes: f64,
    pub end_minutes: f64,
    pub duration_minutes: f64,
    pub tasks: Vec<String>,
    pub agent_assignments: BTreeMap<String, Vec<String>>,
    pub agent_review_minutes: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentLoad {
    pub agent: String,
    pub model_tier: Option<String>,
    pub task_count: usize,
    pub total_work_minutes: f64,
    pub review_minutes: f64,
    pub utilization: f64,
    pub estimated_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub waves: Vec<WaveRow>,
    pub agent_load: Vec<AgentLoad>,
    pub critical_path: Vec<String>,
    pub critical_path_minutes: f64,
    pub total_wall_clock_minutes: f64,
    pub total_sequential_minutes: f64,
    pub parallel_efficiency: f64,
    pub estimated_cost: f64,
}

impl PlanReport {
    /// Build a report. Agent load rows follow roster order.
    pub fn build(plan: &WavePlan, agents: &[AgentProfile]) -> Self {
        let waves = plan
            .waves
            .iter()
            .map(|wave| {
                let mut agent_assignments: BTreeMap<String, Vec<String>> = BTreeMap::new();
                for a in &wave.assignments {
                    agent_assignments
                        .entry(a.agent_name.clone())
                        .or_default()
                        .push(a.task_id.clone());
                }
                WaveRow {
                    number: wave.wave_number,
                    start_minutes: wave.start_minutes,
                    end_minutes: wave.end_minutes,
                    duration_minutes: wave.duration_minutes(),
                    tasks: wave.task_ids().map(str::to_string).collect(),
                    agent_assignments,
                    agent_review_minutes: wave.agent_review_minutes.clone(),
                }
            })
            .collect();

        let agent_load: Vec<AgentLoad> = agents
            .iter()
            .map(|agent| {
                let mut task_count = 0;
                let mut total_work_minutes = 0.0;
                let mut review_minutes = 0.0;
                for wave in &plan.waves {
                    for a in wave.assignments_for(&agent.name) {
                        task_count += 1;
                        total_work_minutes += a.duration_minutes;
                    }
                    review_minutes += wave.agent_review_minutes.get(&agent.name).copied().unwrap_or(0.0);
                }
                AgentLoad {
                    agent: agent.name.clone(),
                    model_tier: agent.model_tier.clone(),
                    task_count,
                    total_work_minutes,
                    review_minutes,
                    utilization: plan.agent_utilization.get(&agent.name).copied().unwrap_or(0.0),
                    estimated_cost: total_work_minutes / MINUTES_PER_TURN * agent.cost_per_turn,
                }
            })
            .collect();

        let estimated_cost = agent_load.iter().map(|l| l.estimated_cost).sum();

        Self {
            waves,
            agent_load,
            critical_path: plan.critical_path.clone(),
            critical_path_minutes: plan.critical_path_minutes,
            total_wall_clock_minutes: plan.total_wall_clock_minutes,
            total_sequential_minutes: plan.total_sequential_minutes,
            parallel_efficiency: plan.parallel_efficiency,
            estimated_cost,
        }
    }

    pub fn render_json(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    /// Plain-text summary. Critical-path tasks are marked with `*`.
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        if self.waves.is_empty() {
            out.push_str("No tasks to schedule.\n");
            return out;
        }

        let _ = writeln!(
            out,
            "Wall clock: {}  Sequential: {}  Efficiency: {:.0}%",
            format_minutes(self.total_wall_clock_minutes),
            format_minutes(self.total_sequential_minutes),
            self.parallel_efficiency * 100.0
        );
        let _ = writeln!(
            out,
            "Critical path ({}): {}",
            format_minutes(self.critical_path_minutes),
            self.critical_path.join(" -> ")
        );

        for wave in &self.waves {
            let _ = writeln!(
                out,
                "\nWave {}  [{} - {}]  {}",
                wave.number,
                format_minutes(wave.start_minutes),
                format_minutes(wave.end_minutes),
                format_minutes(wave.duration_minutes)
            );
            for (agent, tasks) in &wave.agent_assignments {
                let marked: Vec<String> = tasks
                    .iter()
                    .map(|t| {
                        if self.critical_path.contains(t) {
                            format!("{}*", t)
                        } else {
                            t.clone()
                        }
                    })
                    .collect();
                let review = wave.agent_review_minutes.get(agent).copied().unwrap_or(0.0);
                let _ = writeln!(
                    out,
                    "  {:<16} {}  (review {})",
                    agent,
                    marked.join(", "),
                    format_minutes(review)
                );
            }
        }

        let _ = writeln!(out, "\nAgent load:");
        for load in &self.agent_load {
            let _ = writeln!(
                out,
                "  {:<16} tasks {:>3}  work {:>8}  util {:>4.0}%  cost {:.2}",
                load.agent,
                load.task_count,
                format_minutes(load.total_work_minutes),
                load.utilization * 100.0,
                load.estimated_cost
            );
        }

        out
    }
}

/// `95.0` -> `"1h35m"`, `30.0` -> `"30m"`, `12.5` -> `"12.5m"`.
///
/// Minutes are rounded to a tenth before splitting off whole hours.
pub fn format_minutes(minutes: f64) -> String {
    let tenths = (minutes * 10.0).round() as i64;
    let hours = tenths / 600;
    let rest = tenths % 600;

    let rest_text = if rest % 10 == 0 {
        format!("{}m", rest / 10)
    } else {
        format!("{}.{}m", rest / 10, rest % 10)
    };

    match (hours, rest) {
        (0, _) => rest_text,
        (h, 0) => format!("{}h", h),
        (h, _) => format!("{}h{}", h, rest_text),
    }
}
