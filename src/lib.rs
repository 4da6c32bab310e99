//! Dependency-aware wave planning for multi-agent task execution.
//!
//! Tasks with durations, dependencies and capability requirements are
//! scheduled across a roster of agents into waves: sets of tasks that can run
//! in parallel once everything they depend on has finished.
//!
//! ```
//! use waveplan::{plan_waves, AgentProfile, TaskNode};
//!
//! let tasks = vec![
//!     TaskNode::new("schema", 30.0),
//!     TaskNode::new("api", 45.0).with_dependencies(["schema"]),
//! ];
//! let agents = vec![AgentProfile::new("claude", ["code"], 2)];
//!
//! let plan = plan_waves(&tasks, &agents, 0.0).unwrap();
//! assert_eq!(plan.waves.len(), 2);
//! assert_eq!(plan.critical_path, vec!["schema", "api"]);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod log;
pub mod planner;
pub mod report;

pub use crate::core::{AgentProfile, DependencyGraph, TaskFile, TaskNode, TaskSpec};
pub use config::{Config, ProjectSettings};
pub use error::{Error, Result};
pub use planner::{plan_waves, Wave, WaveAssignment, WavePlan};
