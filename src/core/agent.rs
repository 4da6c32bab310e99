//! Agent profiles and the execution slots they contribute.

use serde::{Deserialize, Serialize};

/// Configuration for one agent in the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentProfile {
    /// Unique name; co-dispatch and review amortization group by it.
    pub name: String,
    pub capabilities: Vec<String>,
    /// Number of concurrent slots this agent contributes.
    pub parallelism: usize,
    pub cost_per_turn: f64,
    /// Free-form model tier label, carried through to reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_tier: Option<String>,
}

impl AgentProfile {
    pub fn new<I, S>(name: impl Into<String>, capabilities: I, parallelism: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            capabilities: capabilities.into_iter().map(Into::into).collect(),
            parallelism,
            cost_per_turn: 0.0,
            model_tier: None,
        }
    }

    pub fn with_cost(mut self, cost_per_turn: f64) -> Self {
        self.cost_per_turn = cost_per_turn;
        self
    }

    pub fn with_model_tier(mut self, tier: impl Into<String>) -> Self {
        self.model_tier = Some(tier.into());
        self
    }

    /// True if this agent holds every tag in `required`.
    pub fn can_run(&self, required: &[String]) -> bool {
        required.iter().all(|cap| self.capabilities.contains(cap))
    }
}

/// One unit of concurrent capacity: `(agent, slot_index)`.
#[derive(Debug, Clone, Copy)]
pub struct Slot<'a> {
    pub slot_index: usize,
    pub agent: &'a AgentProfile,
}

impl<'a> Slot<'a> {
    pub fn agent_name(&self) -> &'a str {
        &self.agent.name
    }

    pub fn is_eligible(&self, required: &[String]) -> bool {
        self.agent.can_run(required)
    }
}

/// Expand every profile into `parallelism` slots, in roster order.
pub fn expand_slots(agents: &[AgentProfile]) -> Vec<Slot<'_>> {
    agents
        .iter()
        .flat_map(|agent| {
            (0..agent.parallelism).map(move |slot_index| Slot {
                slot_index,
                agent,
            })
        })
        .collect()
}
