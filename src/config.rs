use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::agent::AgentProfile;
use crate::{wlog_debug, Error, Result};

/// Project-level calibration and overhead settings. Keys missing from
/// `[settings]` keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectSettings {
    /// Multiplier applied to every task duration before planning.
    pub friction_multiplier: f64,
    /// Idle time between consecutive waves.
    pub inter_wave_overhead_hours: f64,
    /// Review overhead for tasks that do not specify their own.
    pub default_review_minutes: f64,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            friction_multiplier: 1.0,
            inter_wave_overhead_hours: 0.25,
            default_review_minutes: 15.0,
        }
    }
}

impl ProjectSettings {
    pub fn inter_wave_overhead_minutes(&self) -> f64 {
        self.inter_wave_overhead_hours * 60.0
    }
}

/// Agent roster plus project settings, stored as TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: ProjectSettings,
    pub agents: Vec<AgentProfile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: ProjectSettings::default(),
            agents: vec![AgentProfile::new(
                "claude",
                ["planning", "implementation", "review", "testing", "docs"],
                1,
            )
            .with_cost(0.12)
            .with_model_tier("frontier")],
        }
    }
}

impl Config {
    pub fn waveplan_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".waveplan"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::waveplan_dir()?.join("agents.toml"))
    }

    /// Load the default config file, falling back to the built-in roster
    /// when none exists.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        wlog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            wlog_debug!("Config file not found, using built-in roster");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load and validate a specific config file. A missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let path = expand_tilde(&path.to_string_lossy());
        if !path.exists() {
            return Err(Error::Validation(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let config = Self::parse(&fs::read_to_string(&path)?)?;
        wlog_debug!(
            "Config loaded from {}: agents={}, friction={}, overhead_hours={}",
            path.display(),
            config.agents.len(),
            config.settings.friction_multiplier,
            config.settings.inter_wave_overhead_hours
        );
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config to the default path, creating the directory.
    pub fn save(&self) -> Result<PathBuf> {
        let dir = Self::waveplan_dir()?;
        if !dir.exists() {
            wlog_debug!("Creating waveplan directory: {}", dir.display());
            fs::create_dir_all(&dir)?;
        }
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        fs::write(path, toml::to_string_pretty(self)?)?;
        wlog_debug!("Config saved to {}", path.display());
        Ok(())
    }

    /// Check every field, reporting all violations at once as
    /// `location: message` lines.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        let settings = &self.settings;

        if !(settings.friction_multiplier.is_finite() && settings.friction_multiplier > 0.0) {
            problems.push(format!(
                "settings.friction_multiplier: must be > 0, got {}",
                settings.friction_multiplier
            ));
        }
        if settings.inter_wave_overhead_hours.is_nan() || settings.inter_wave_overhead_hours < 0.0 {
            problems.push(format!(
                "settings.inter_wave_overhead_hours: must be >= 0, got {}",
                settings.inter_wave_overhead_hours
            ));
        }
        if settings.default_review_minutes.is_nan() || settings.default_review_minutes < 0.0 {
            problems.push(format!(
                "settings.default_review_minutes: must be >= 0, got {}",
                settings.default_review_minutes
            ));
        }

        if self.agents.is_empty() {
            problems.push("agents: at least one agent is required".to_string());
        }

        let mut names = HashSet::new();
        for (i, agent) in self.agents.iter().enumerate() {
            let name = agent.name.trim();
            if name.is_empty() {
                problems.push(format!("agents[{}].name: must not be empty", i));
            } else if !names.insert(name) {
                problems.push(format!("agents[{}].name: duplicate agent {:?}", i, name));
            }
            if agent.capabilities.is_empty() {
                problems.push(format!("agents[{}].capabilities: must not be empty", i));
            }
            if agent.capabilities.iter().any(|c| c.trim().is_empty()) {
                problems.push(format!(
                    "agents[{}].capabilities: tags must not be empty",
                    i
                ));
            }
            if agent.parallelism < 1 {
                problems.push(format!("agents[{}].parallelism: must be >= 1", i));
            }
            if !agent.cost_per_turn.is_finite() || agent.cost_per_turn < 0.0 {
                problems.push(format!(
                    "agents[{}].cost_per_turn: must be >= 0, got {}",
                    i, agent.cost_per_turn
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(problems.join("\n")))
        }
    }

    pub fn total_slots(&self) -> usize {
        self.agents.iter().map(|a| a.parallelism).sum()
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
