//! Invariants checked over generated task graphs.
//!
//! Graphs come from a fixed-seed generator so every run sees the same
//! inputs. Each test walks all seeds and checks one property of the plan.

use std::collections::{HashMap, HashSet};

use crate::fixtures::*;
use waveplan::{plan_waves, AgentProfile, TaskNode, WavePlan};

const SEEDS: std::ops::RangeInclusive<u64> = 1..=24;
const GRAPH_SIZE: usize = 30;
const OVERHEAD: f64 = 5.0;

fn plans() -> impl Iterator<Item = (u64, Vec<TaskNode>, WavePlan)> {
    SEEDS.map(|seed| {
        let tasks = random_dag(seed, GRAPH_SIZE);
        let plan = plan_waves(&tasks, &random_roster(), OVERHEAD)
            .unwrap_or_else(|e| panic!("seed {}: {}", seed, e));
        (seed, tasks, plan)
    })
}

fn roster_by_name(roster: &[AgentProfile]) -> HashMap<&str, &AgentProfile> {
    roster.iter().map(|a| (a.name.as_str(), a)).collect()
}

/// Every task is scheduled exactly once.
#[test]
fn test_every_task_scheduled_once() {
    for (seed, tasks, plan) in plans() {
        let mut seen = HashSet::new();
        for wave in &plan.waves {
            for id in wave.task_ids() {
                assert!(seen.insert(id.to_string()), "seed {}: {} twice", seed, id);
            }
        }
        assert_eq!(seen.len(), tasks.len(), "seed {}", seed);
    }
}

/// A task's wave comes strictly after the waves of all its dependencies.
#[test]
fn test_dependencies_run_in_earlier_waves() {
    for (seed, tasks, plan) in plans() {
        for task in &tasks {
            let wave = plan.wave_of(&task.task_id).unwrap();
            for dep in &task.dependencies {
                let dep_wave = plan.wave_of(dep).unwrap();
                assert!(
                    dep_wave < wave,
                    "seed {}: {} (wave {}) depends on {} (wave {})",
                    seed,
                    task.task_id,
                    wave,
                    dep,
                    dep_wave
                );
            }
        }
    }
}

/// The assigned agent holds every capability the task requires.
#[test]
fn test_assignments_respect_capabilities() {
    let roster = random_roster();
    let by_name = roster_by_name(&roster);

    for (seed, tasks, plan) in plans() {
        for task in &tasks {
            let (_, assignment) = plan.find_assignment(&task.task_id).unwrap();
            let agent = by_name[assignment.agent_name.as_str()];
            assert!(
                agent.can_run(&task.required_capabilities),
                "seed {}: {} on {}",
                seed,
                task.task_id,
                agent.name
            );
            assert!(assignment.slot_index < agent.parallelism);
        }
    }
}

/// Waves are ordered in time and separated by at least the overhead.
#[test]
fn test_waves_do_not_overlap() {
    for (seed, _, plan) in plans() {
        assert_eq!(plan.waves[0].start_minutes, 0.0);
        for (i, pair) in plan.waves.windows(2).enumerate() {
            assert_eq!(pair[1].wave_number, i + 1);
            assert!(
                approx_eq(pair[1].start_minutes, pair[0].end_minutes + OVERHEAD),
                "seed {}: wave {} starts at {}",
                seed,
                i + 1,
                pair[1].start_minutes
            );
        }
        for wave in &plan.waves {
            assert!(wave.end_minutes >= wave.start_minutes);
        }
        let last = plan.waves.last().unwrap();
        assert_eq!(plan.total_wall_clock_minutes, last.end_minutes);
    }
}

/// Each agent with work in a wave is charged the largest review among its
/// tasks there, and co-dispatch never makes a task longer.
#[test]
fn test_review_and_discount_per_agent() {
    for (seed, tasks, plan) in plans() {
        let by_id: HashMap<&str, &TaskNode> =
            tasks.iter().map(|t| (t.task_id.as_str(), t)).collect();

        for wave in &plan.waves {
            let agents: HashSet<&str> = wave
                .assignments
                .iter()
                .map(|a| a.agent_name.as_str())
                .collect();
            assert_eq!(agents.len(), wave.agent_review_minutes.len(), "seed {}", seed);

            for agent in agents {
                let batch: Vec<_> = wave.assignments_for(agent).collect();
                let max_review = batch
                    .iter()
                    .map(|a| by_id[a.task_id.as_str()].review_minutes)
                    .fold(0.0, f64::max);
                assert_eq!(wave.agent_review_minutes[agent], max_review, "seed {}", seed);

                for (nth, a) in batch.iter().enumerate() {
                    let raw = by_id[a.task_id.as_str()].duration_minutes;
                    let expected = if nth == 0 { raw } else { raw * 0.5 };
                    assert!(approx_eq(a.duration_minutes, expected), "seed {}", seed);
                    assert_eq!(a.is_co_dispatched(), batch.len() > 1);
                }
            }
        }
    }
}

/// The critical path is a real dependency chain weighted by raw durations.
#[test]
fn test_critical_path_is_a_chain() {
    for (seed, tasks, plan) in plans() {
        let by_id: HashMap<&str, &TaskNode> =
            tasks.iter().map(|t| (t.task_id.as_str(), t)).collect();

        assert!(!plan.critical_path.is_empty());
        for pair in plan.critical_path.windows(2) {
            let next = by_id[pair[1].as_str()];
            assert!(
                next.dependencies.contains(&pair[0]),
                "seed {}: {} does not depend on {}",
                seed,
                pair[1],
                pair[0]
            );
        }
        let total: f64 = plan
            .critical_path
            .iter()
            .map(|id| by_id[id.as_str()].duration_minutes)
            .sum();
        assert!(approx_eq(total, plan.critical_path_minutes), "seed {}", seed);

        let heaviest = tasks.iter().map(|t| t.duration_minutes).fold(0.0, f64::max);
        assert!(plan.critical_path_minutes >= heaviest);
    }
}

/// Utilization is never negative and efficiency stays within [0, 1].
#[test]
fn test_utilization_bounds() {
    let roster = random_roster();
    for (seed, _, plan) in plans() {
        assert_eq!(plan.agent_utilization.len(), roster.len());
        for (name, utilization) in &plan.agent_utilization {
            assert!(*utilization >= 0.0, "seed {}: {} = {}", seed, name, utilization);
        }
        assert!(
            (0.0..=1.0).contains(&plan.parallel_efficiency),
            "seed {}: efficiency {}",
            seed,
            plan.parallel_efficiency
        );
    }
}

/// Planning the same input twice gives identical plans.
#[test]
fn test_planning_is_idempotent() {
    let roster = random_roster();
    for seed in SEEDS {
        let tasks = random_dag(seed, GRAPH_SIZE);
        let before = tasks.clone();

        let first = plan_waves(&tasks, &roster, OVERHEAD).unwrap();
        let second = plan_waves(&tasks, &roster, OVERHEAD).unwrap();

        assert_eq!(first, second, "seed {}", seed);
        assert_eq!(tasks, before, "seed {}: input mutated", seed);
    }
}

/// Tasks needing a capability that only one agent holds fail once that
/// agent is removed.
#[test]
fn test_removing_only_capable_agent_fails() {
    let tasks = vec![
        TaskNode::new("build", 10.0),
        TaskNode::new("ship", 5.0)
            .with_dependencies(["build"])
            .with_capabilities(["deploy"]),
    ];
    let full = random_roster();
    assert!(plan_waves(&tasks, &full, 0.0).is_ok());

    let without_beta: Vec<AgentProfile> =
        full.into_iter().filter(|a| a.name != "beta").collect();
    assert!(plan_waves(&tasks, &without_beta, 0.0).is_err());
}
