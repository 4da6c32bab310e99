use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("No home directory")]
    NoHomeDir,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Duplicate task id {0:?}")]
    DuplicateTask(String),

    #[error("Task {task:?} depends on unknown task {dependency:?}")]
    UnknownDependency { task: String, dependency: String },

    #[error("Dependency cycle detected: {}", .cycle.join(" -> "))]
    CycleDetected { cycle: Vec<String> },

    #[error("At least one agent is required to schedule tasks")]
    NoAgentsProvided,

    #[error("No eligible agent for task {task:?} (requires [{}])", .required.join(", "))]
    NoEligibleAgent { task: String, required: Vec<String> },

    #[error("Inter-wave overhead must be >= 0, got {0}")]
    InvalidOverhead(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
