//! Wave planning scenarios with hand-computed schedules.
//!
//! Each test builds a small task graph, plans it, and checks the exact wave
//! contents, timings, and summary figures.

use crate::fixtures::*;
use waveplan::{plan_waves, AgentProfile, Error, TaskNode};

/// Given: a three-task chain on one agent with 15 minutes between waves
/// When: the chain is planned
/// Then: each task gets its own wave and overhead separates the waves
#[test]
fn test_chain_gets_one_wave_per_task() {
    let plan = plan_waves(&chain(), &[claude(1)], 15.0).unwrap();

    assert_eq!(plan.waves.len(), 3);
    let bounds: Vec<(f64, f64)> = plan
        .waves
        .iter()
        .map(|w| (w.start_minutes, w.end_minutes))
        .collect();
    assert_eq!(bounds, vec![(0.0, 10.0), (25.0, 45.0), (60.0, 75.0)]);

    assert!(approx_eq(plan.total_wall_clock_minutes, 75.0));
    assert!(approx_eq(plan.total_sequential_minutes, 45.0));
    assert!(approx_eq(plan.parallel_efficiency, 45.0 / 75.0));
    assert_eq!(plan.critical_path, vec!["A", "B", "C"]);
}

/// Given: four independent tasks [40, 30, 20, 10] on one agent with two slots
/// When: the single generation is packed
/// Then: LPT gives slots {40, 10} and {30, 20}, co-dispatch halves every task
///       after the first, and the wave lasts 45 minutes
#[test]
fn test_lpt_with_agent_wide_co_dispatch() {
    let tasks = vec![
        node("t40", 40.0, &[]),
        node("t30", 30.0, &[]),
        node("t20", 20.0, &[]),
        node("t10", 10.0, &[]),
    ];
    let plan = plan_waves(&tasks, &[claude(2)], 0.0).unwrap();

    assert_eq!(plan.waves.len(), 1);
    let wave = &plan.waves[0];
    assert!(approx_eq(wave.end_minutes, 45.0));

    let slot_of = |id: &str| plan.find_assignment(id).unwrap().1.slot_index;
    assert_eq!(slot_of("t40"), slot_of("t10"));
    assert_eq!(slot_of("t30"), slot_of("t20"));
    assert_ne!(slot_of("t40"), slot_of("t30"));

    let adjusted: Vec<(&str, f64)> = wave
        .assignments
        .iter()
        .map(|a| (a.task_id.as_str(), a.duration_minutes))
        .collect();
    assert_eq!(
        adjusted,
        vec![("t40", 40.0), ("t30", 15.0), ("t20", 10.0), ("t10", 5.0)]
    );
    for a in &wave.assignments {
        assert_eq!(a.co_dispatch_group, vec!["t40", "t30", "t20", "t10"]);
    }
}

/// Given: the diamond A -> {B, C} -> D on two slots
/// When: it is planned
/// Then: the critical path is A, B, D at 55 minutes
#[test]
fn test_diamond_critical_path() {
    let plan = plan_waves(&diamond(), &[claude(2)], 0.0).unwrap();

    assert_eq!(plan.critical_path, vec!["A", "B", "D"]);
    assert!(approx_eq(plan.critical_path_minutes, 55.0));
    assert_eq!(plan.waves.len(), 3);
    assert_eq!(plan.wave_of("B"), Some(1));
    assert_eq!(plan.wave_of("C"), Some(1));
    assert!(plan.is_critical("B"));
    assert!(!plan.is_critical("C"));
}

/// Given: one task with 30 minutes of work and 15 of review
/// When: it runs on a single slot
/// Then: the wave lasts 45 minutes
#[test]
fn test_single_task_pays_full_review() {
    let plan = plan_waves(&[reviewed("solo", 30.0, 15.0, &[])], &[claude(1)], 0.0).unwrap();

    assert!(approx_eq(plan.waves[0].end_minutes, 45.0));
    assert_eq!(plan.waves[0].agent_review_minutes["claude"], 15.0);
    assert!(!plan.waves[0].assignments[0].is_co_dispatched());
}

/// Given: A (40 + 15 review) and B (30 + 15 review) on one single-slot agent
/// When: they share a wave
/// Then: B is halved to 15, review is charged once, and the wave lasts 70
#[test]
fn test_two_task_co_dispatch_amortizes_review() {
    let tasks = vec![reviewed("A", 40.0, 15.0, &[]), reviewed("B", 30.0, 15.0, &[])];
    let plan = plan_waves(&tasks, &[claude(1)], 0.0).unwrap();

    let wave = &plan.waves[0];
    assert!(approx_eq(wave.end_minutes, 70.0));
    assert!(approx_eq(wave.assignments[0].duration_minutes, 40.0));
    assert!(approx_eq(wave.assignments[1].duration_minutes, 15.0));
    assert_eq!(wave.agent_review_minutes["claude"], 15.0);
}

/// Given: the fan-out/fan-in graph on one agent with two slots
/// When: it is planned
/// Then: the middle wave is bounded by its longest task after discounts
#[test]
fn test_fan_out_on_one_agent() {
    let plan = plan_waves(&fan_out_fan_in(), &[claude(2)], 0.0).unwrap();

    assert_eq!(plan.waves.len(), 3);
    let middle = &plan.waves[1];
    let order: Vec<&str> = middle.task_ids().collect();
    assert_eq!(order, vec!["C", "B", "D"]);
    assert!(approx_eq(middle.duration_minutes(), 25.0));

    assert!(approx_eq(plan.total_wall_clock_minutes, 45.0));
    assert_eq!(plan.critical_path, vec!["A", "C", "E"]);
    assert!(approx_eq(plan.critical_path_minutes, 45.0));
    assert!(approx_eq(plan.total_sequential_minutes, 62.5));
    assert!(approx_eq(plan.parallel_efficiency, 62.5 / 90.0));
}

/// Given: the same fan-out graph on two single-slot agents
/// When: it is planned
/// Then: co-dispatch applies per agent name, so only beta's second task is
///       discounted and beta's slot sets the wave length
#[test]
fn test_fan_out_across_two_agents() {
    let agents = vec![agent("alpha", &["code"], 1), agent("beta", &["code"], 1)];
    let plan = plan_waves(&fan_out_fan_in(), &agents, 0.0).unwrap();

    let middle = &plan.waves[1];
    let c = plan.find_assignment("C").unwrap().1;
    let b = plan.find_assignment("B").unwrap().1;
    let d = plan.find_assignment("D").unwrap().1;
    assert_eq!(c.agent_name, "alpha");
    assert_eq!(b.agent_name, "beta");
    assert_eq!(d.agent_name, "beta");
    assert!(!c.is_co_dispatched());
    assert_eq!(d.co_dispatch_group, vec!["B", "D"]);
    assert!(approx_eq(d.duration_minutes, 7.5));
    assert!(approx_eq(middle.duration_minutes(), 27.5));
}

/// Given: a docs task and a code task with specialised agents
/// When: they are planned
/// Then: each lands on the only agent holding its capability
#[test]
fn test_capabilities_route_tasks() {
    let tasks = vec![
        node("impl", 30.0, &[]).with_capabilities(["code"]),
        node("guide", 20.0, &[]).with_capabilities(["docs"]),
    ];
    let agents = vec![agent("writer", &["docs"], 2), agent("coder", &["code"], 1)];
    let plan = plan_waves(&tasks, &agents, 0.0).unwrap();

    assert_eq!(plan.find_assignment("impl").unwrap().1.agent_name, "coder");
    assert_eq!(plan.find_assignment("guide").unwrap().1.agent_name, "writer");
    assert!(approx_eq(plan.waves[0].end_minutes, 30.0));
    assert!(approx_eq(plan.agent_utilization["writer"], 20.0 / 30.0));
}

/// Given: an agent that no task can use
/// When: the plan is built
/// Then: it is still reported with zero utilization
#[test]
fn test_idle_agent_listed() {
    let agents = vec![claude(1), agent("auditor", &["security"], 1)];
    let tasks = vec![node("A", 10.0, &[]).with_capabilities(["code"])];
    let plan = plan_waves(&tasks, &agents, 0.0).unwrap();

    assert_eq!(plan.agent_utilization["auditor"], 0.0);
    assert_eq!(plan.agent_utilization["claude"], 1.0);
}

/// Given: no tasks and no agents
/// When: planning
/// Then: the result is an empty plan with zero totals
#[test]
fn test_zero_tasks() {
    let plan = plan_waves(&[], &[], 0.0).unwrap();

    assert!(plan.is_empty());
    assert!(plan.critical_path.is_empty());
    assert_eq!(plan.critical_path_minutes, 0.0);
    assert_eq!(plan.total_wall_clock_minutes, 0.0);
    assert_eq!(plan.total_sequential_minutes, 0.0);
    assert_eq!(plan.parallel_efficiency, 0.0);
    assert!(plan.agent_utilization.is_empty());
}

/// Given: a three-task dependency cycle
/// When: planning
/// Then: the cycle is reported as a closed path and no plan is returned
#[test]
fn test_cycle_rejected() {
    let tasks = vec![
        node("A", 10.0, &["C"]),
        node("B", 10.0, &["A"]),
        node("C", 10.0, &["B"]),
    ];
    match plan_waves(&tasks, &[claude(1)], 0.0) {
        Err(Error::CycleDetected { cycle }) => {
            assert_eq!(cycle.len(), 4);
            assert_eq!(cycle.first(), cycle.last());
        }
        other => panic!("expected CycleDetected, got {:?}", other),
    }
}

/// Given: a task depending on an id that is not in the set
/// When: planning
/// Then: the missing dependency is named in the error
#[test]
fn test_unknown_dependency_rejected() {
    let tasks = vec![node("A", 10.0, &[]), node("B", 10.0, &["Z"])];
    let err = plan_waves(&tasks, &[claude(1)], 0.0).unwrap_err();

    assert!(matches!(err, Error::UnknownDependency { .. }));
    assert_eq!(err.to_string(), "Task \"B\" depends on unknown task \"Z\"");
}

/// Given: a task needing a capability nobody has
/// When: planning
/// Then: planning fails before any wave is packed
#[test]
fn test_missing_capability_rejected() {
    let tasks = vec![TaskNode::new("train", 60.0).with_capabilities(["gpu", "code"])];
    let agents: Vec<AgentProfile> = vec![claude(4)];
    let err = plan_waves(&tasks, &agents, 0.0).unwrap_err();

    assert_eq!(
        err.to_string(),
        "No eligible agent for task \"train\" (requires [gpu, code])"
    );
}
