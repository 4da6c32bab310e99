//! Task data model for wave planning.
//!
//! [`TaskNode`] is what the planner consumes: a sized unit of work with its
//! dependency edges and capability requirements. [`TaskFile`] is the on-disk
//! form the CLI reads before sizing adjustments are applied.

use crate::config::ProjectSettings;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// One task to be scheduled.
///
/// `duration_minutes` is work only; review is carried separately in
/// `review_minutes` because the planner amortizes it per agent per wave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskNode {
    /// Unique identifier within a task set.
    pub task_id: String,
    /// Work-only duration, already including estimation modifiers.
    pub duration_minutes: f64,
    /// Tasks that must complete before this one starts.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Capability tags the assigned agent must hold.
    #[serde(default)]
    pub required_capabilities: Vec<String>,
    /// Per-task review overhead.
    #[serde(default)]
    pub review_minutes: f64,
}

impl TaskNode {
    /// Create an independent task with no review overhead.
    pub fn new(task_id: impl Into<String>, duration_minutes: f64) -> Self {
        Self {
            task_id: task_id.into(),
            duration_minutes,
            dependencies: Vec::new(),
            required_capabilities: Vec::new(),
            review_minutes: 0.0,
        }
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_capabilities<I, S>(mut self, caps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_capabilities = caps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_review(mut self, review_minutes: f64) -> Self {
        self.review_minutes = review_minutes;
        self
    }
}

/// A task as written in a task file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskSpec {
    pub id: String,
    pub duration_minutes: f64,
    /// Falls back to the project's default review when absent.
    #[serde(default)]
    pub review_minutes: Option<f64>,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl TaskSpec {
    /// Convert to a planner node, applying the friction multiplier and the
    /// default review overhead.
    pub fn to_node(&self, settings: &ProjectSettings) -> TaskNode {
        TaskNode {
            task_id: self.id.clone(),
            duration_minutes: self.duration_minutes * settings.friction_multiplier,
            dependencies: self.depends_on.clone(),
            required_capabilities: self.capabilities.clone(),
            review_minutes: self
                .review_minutes
                .unwrap_or(settings.default_review_minutes),
        }
    }
}

/// A TOML task list: `[[tasks]]` tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskFile {
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
}

impl TaskFile {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Validation(format!(
                "Task file not found: {}",
                path.display()
            )));
        }
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: Self = toml::from_str(content)?;
        file.validate()?;
        Ok(file)
    }

    /// Check ids and numeric fields. Graph-level problems (unknown
    /// dependencies, cycles) are left to the planner.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        let mut seen = HashSet::new();

        for (i, task) in self.tasks.iter().enumerate() {
            if task.id.trim().is_empty() {
                problems.push(format!("tasks[{}].id: must not be empty", i));
            } else if !seen.insert(task.id.as_str()) {
                problems.push(format!("tasks[{}].id: duplicate id {:?}", i, task.id));
            }
            if !task.duration_minutes.is_finite() || task.duration_minutes < 0.0 {
                problems.push(format!(
                    "tasks[{}].duration_minutes: must be >= 0, got {}",
                    i, task.duration_minutes
                ));
            }
            if let Some(review) = task.review_minutes {
                if !review.is_finite() || review < 0.0 {
                    problems.push(format!(
                        "tasks[{}].review_minutes: must be >= 0, got {}",
                        i, review
                    ));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(problems.join("\n")))
        }
    }

    pub fn to_nodes(&self, settings: &ProjectSettings) -> Vec<TaskNode> {
        self.tasks.iter().map(|t| t.to_node(settings)).collect()
    }
}
