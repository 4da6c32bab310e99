//! Core domain models for wave planning.
//!
//! Tasks, agent profiles and the dependency graph the planner walks.

pub mod agent;
pub mod dag;
pub mod task;

pub use agent::{expand_slots, AgentProfile, Slot};
pub use dag::DependencyGraph;
pub use task::{TaskFile, TaskNode, TaskSpec};
