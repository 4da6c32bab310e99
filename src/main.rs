use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use waveplan::report::PlanReport;
use waveplan::{plan_waves, wlog, wlog_error, Config, Error, Result, TaskFile, WavePlan};

/// waveplan - schedule agent tasks into dependency-respecting waves
#[derive(Parser, Debug)]
#[command(name = "waveplan")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    WAVEPLAN_DEBUG=1     Enable debug logging (alternative to --debug)\n    WAVEPLAN_LOG=<level> Force a log level (error, warn, info, debug, trace)")]
pub struct Cli {
    /// Enable debug logging (writes to ~/.waveplan/waveplan.log)
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Plan a task file and print the schedule
    Plan {
        /// TOML file with [[tasks]] entries
        tasks: PathBuf,

        /// Agent roster (defaults to ~/.waveplan/agents.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Override the configured inter-wave overhead, in hours
        #[arg(long)]
        overhead_hours: Option<f64>,

        /// Print JSON instead of the text summary
        #[arg(long)]
        json: bool,
    },

    /// Check a task file against the roster without printing the schedule
    Validate {
        tasks: PathBuf,

        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// List the configured agents
    Agents {
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },

    /// Write the built-in roster to ~/.waveplan/agents.toml
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    waveplan::log::init(cli.debug);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            wlog_error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Plan {
            tasks,
            config,
            overhead_hours,
            json,
        } => run_plan(&tasks, config.as_deref(), overhead_hours, json),
        Command::Validate { tasks, config } => run_validate(&tasks, config.as_deref()),
        Command::Agents { config } => run_agents(config.as_deref()),
        Command::Init { force } => run_init(force),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn plan_from_files(
    tasks_path: &Path,
    config: &Config,
    overhead_hours: Option<f64>,
) -> Result<WavePlan> {
    let file = TaskFile::load(tasks_path)?;
    let nodes = file.to_nodes(&config.settings);
    let overhead_minutes = match overhead_hours {
        Some(hours) => hours * 60.0,
        None => config.settings.inter_wave_overhead_minutes(),
    };
    wlog!(
        "Planning {} tasks from {} across {} agents",
        nodes.len(),
        tasks_path.display(),
        config.agents.len()
    );
    plan_waves(&nodes, &config.agents, overhead_minutes)
}

fn run_plan(
    tasks_path: &Path,
    config_path: Option<&Path>,
    overhead_hours: Option<f64>,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let plan = plan_from_files(tasks_path, &config, overhead_hours)?;
    let report = PlanReport::build(&plan, &config.agents);

    if json {
        print!("{}", report.render_json()?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

fn run_validate(tasks_path: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let plan = plan_from_files(tasks_path, &config, None)?;
    println!(
        "OK: {} tasks, {} waves",
        plan.task_count(),
        plan.waves.len()
    );
    Ok(())
}

fn run_agents(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    for agent in &config.agents {
        println!(
            "{:<16} slots {:>2}  cost/turn {:.2}  tier {:<10} [{}]",
            agent.name,
            agent.parallelism,
            agent.cost_per_turn,
            agent.model_tier.as_deref().unwrap_or("-"),
            agent.capabilities.join(", ")
        );
    }
    println!("total slots: {}", config.total_slots());
    Ok(())
}

fn run_init(force: bool) -> Result<()> {
    let path = Config::config_path()?;
    if path.exists() && !force {
        return Err(Error::Validation(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    let written = Config::default().save()?;
    println!("Wrote {}", written.display());
    Ok(())
}
