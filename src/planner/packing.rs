//! Per-generation LPT bin packing.
//!
//! One generation becomes one wave. Tasks are placed longest-first onto the
//! eligible slot with the least raw load, then adjusted for co-dispatch
//! (warm context) and charged one review cycle per agent.

use crate::core::agent::Slot;
use crate::core::task::TaskNode;
use crate::error::{Error, Result};
use crate::planner::types::WaveAssignment;
use crate::wlog_trace;
use std::collections::{BTreeMap, HashMap};

/// Multiplier for every task after the first that one agent receives in a wave.
pub const CO_DISPATCH_FACTOR: f64 = 0.5;

/// A packed generation, before wall-clock placement.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedWave {
    pub assignments: Vec<WaveAssignment>,
    pub agent_review_minutes: BTreeMap<String, f64>,
    pub makespan_minutes: f64,
}

/// Tasks one agent received in a wave, in assignment order.
struct AgentBatch<'a> {
    agent_name: &'a str,
    /// Indices into the placement list.
    placements: Vec<usize>,
}

/// Pack one generation onto `slots`.
///
/// `generation` holds indices into `tasks`, in input order; that order breaks
/// ties between equal durations.
///
/// # Errors
/// Returns [`Error::NoEligibleAgent`] if a task fits no slot.
pub fn pack_generation(generation: &[usize], tasks: &[TaskNode], slots: &[Slot<'_>]) -> Result<PackedWave> {
    let mut order = generation.to_vec();
    // Stable: equal durations keep input order.
    order.sort_by(|&a, &b| {
        tasks[b]
            .duration_minutes
            .total_cmp(&tasks[a].duration_minutes)
    });

    // 1. Greedy LPT on raw durations: (task, slot) in assignment order.
    let mut raw_load = vec![0.0_f64; slots.len()];
    let mut placements: Vec<(usize, usize)> = Vec::with_capacity(order.len());

    for &task_idx in &order {
        let task = &tasks[task_idx];
        let slot_idx = least_loaded_eligible(slots, &raw_load, &task.required_capabilities)
            .ok_or_else(|| Error::NoEligibleAgent {
                task: task.task_id.clone(),
                required: task.required_capabilities.clone(),
            })?;

        raw_load[slot_idx] += task.duration_minutes;
        placements.push((task_idx, slot_idx));
        wlog_trace!(
            "pack: {} ({} min) -> {}#{} (load {})",
            task.task_id,
            task.duration_minutes,
            slots[slot_idx].agent_name(),
            slots[slot_idx].slot_index,
            raw_load[slot_idx]
        );
    }

    // 2. Group by agent name, keeping first-assignment order.
    let mut batches: Vec<AgentBatch<'_>> = Vec::new();
    let mut batch_of: HashMap<&str, usize> = HashMap::new();
    for (pos, &(_, slot_idx)) in placements.iter().enumerate() {
        let name = slots[slot_idx].agent_name();
        let batch = *batch_of.entry(name).or_insert_with(|| {
            batches.push(AgentBatch {
                agent_name: name,
                placements: Vec::new(),
            });
            batches.len() - 1
        });
        batches[batch].placements.push(pos);
    }

    // 3. Co-dispatch discount and group membership.
    let mut adjusted: Vec<f64> = placements
        .iter()
        .map(|&(task_idx, _)| tasks[task_idx].duration_minutes)
        .collect();
    let mut groups: Vec<Vec<String>> = vec![Vec::new(); placements.len()];

    for batch in &batches {
        if batch.placements.len() < 2 {
            continue;
        }
        let members: Vec<String> = batch
            .placements
            .iter()
            .map(|&pos| tasks[placements[pos].0].task_id.clone())
            .collect();
        for (nth, &pos) in batch.placements.iter().enumerate() {
            if nth > 0 {
                adjusted[pos] *= CO_DISPATCH_FACTOR;
            }
            groups[pos] = members.clone();
        }
    }

    // 4. Amortized review and makespan: each agent pays its largest review
    //    once, on top of its busiest slot.
    let mut slot_load = vec![0.0_f64; slots.len()];
    for (pos, &(_, slot_idx)) in placements.iter().enumerate() {
        slot_load[slot_idx] += adjusted[pos];
    }

    let mut agent_review_minutes = BTreeMap::new();
    let mut makespan_minutes = 0.0_f64;
    for batch in &batches {
        let review = batch
            .placements
            .iter()
            .map(|&pos| tasks[placements[pos].0].review_minutes)
            .fold(f64::NEG_INFINITY, f64::max);
        let busiest_slot = batch
            .placements
            .iter()
            .map(|&pos| slot_load[placements[pos].1])
            .fold(f64::NEG_INFINITY, f64::max);

        makespan_minutes = makespan_minutes.max(busiest_slot + review);
        agent_review_minutes.insert(batch.agent_name.to_string(), review);
    }

    let assignments = placements
        .iter()
        .zip(adjusted)
        .zip(groups)
        .map(|((&(task_idx, slot_idx), duration_minutes), co_dispatch_group)| WaveAssignment {
            task_id: tasks[task_idx].task_id.clone(),
            agent_name: slots[slot_idx].agent_name().to_string(),
            slot_index: slots[slot_idx].slot_index,
            duration_minutes,
            co_dispatch_group,
        })
        .collect();

    Ok(PackedWave {
        assignments,
        agent_review_minutes,
        makespan_minutes,
    })
}

/// First eligible slot with the smallest load.
fn least_loaded_eligible(slots: &[Slot<'_>], load: &[f64], required: &[String]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, slot) in slots.iter().enumerate() {
        if !slot.is_eligible(required) {
            continue;
        }
        if best.map_or(true, |b| load[i] < load[b]) {
            best = Some(i);
        }
    }
    best
}
