//! Neuron Garden - CLI
//!
//! Runs puzzle files through the network simulator.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use neuron_garden::levels::{daily_tasks, todays_tasks, LevelConfig};
use neuron_garden::puzzle::{Puzzle, PuzzleFile};
use neuron_garden::Config;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "garden")]
#[command(about = "Neuron Garden network simulator")]
struct Cli {
    /// Path to the simulator config file
    #[arg(long, env = "GARDEN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Propagate activation through a puzzle network
    Run {
        /// Puzzle file (YAML or JSON)
        file: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate a puzzle against its success condition
    Check {
        /// Puzzle file (YAML or JSON)
        file: PathBuf,
    },

    /// Describe a built-in campaign level
    Level {
        /// Level number
        number: u32,
    },

    /// List the daily challenges
    Daily {
        /// Day of the year (defaults to today)
        #[arg(long)]
        day: Option<u32>,
    },
}

fn main() -> Result<ExitCode> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,neuron_garden=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_yaml_and_env(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { file, json } => run_puzzle(&config, &file, json),
        Commands::Check { file } => check_puzzle(&config, &file),
        Commands::Level { number } => describe_level(number),
        Commands::Daily { day } => list_daily(day),
    }
}

fn load(path: &Path) -> Result<Puzzle> {
    let puzzle = PuzzleFile::load(path)?.into_puzzle()?;
    tracing::debug!(
        "Loaded {}: {} neurons, {} connections, {} inputs",
        path.display(),
        puzzle.neurons.len(),
        puzzle.connections.len(),
        puzzle.inputs.len()
    );
    Ok(puzzle)
}

fn run_puzzle(config: &Config, path: &Path, as_json: bool) -> Result<ExitCode> {
    let puzzle = load(path)?;
    let (updated, state) =
        config
            .simulator()
            .propagate(&puzzle.neurons, &puzzle.connections, &puzzle.inputs)?;

    if as_json {
        let neurons: Vec<_> = updated
            .iter()
            .map(|n| {
                json!({
                    "label": puzzle.label(&n.id),
                    "kind": n.kind,
                    "activity": state.activity(&n.id),
                    "active": n.is_active,
                })
            })
            .collect();
        let connections: Vec<_> = puzzle
            .connections
            .iter()
            .map(|c| {
                json!({
                    "from": puzzle.label(&c.source()),
                    "to": puzzle.label(&c.target()),
                    "active": state.is_connection_active(&c.id),
                })
            })
            .collect();
        let report = json!({
            "iterations": state.iterations,
            "converged": state.converged,
            "neurons": neurons,
            "connections": connections,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} passes ({})",
        state.iterations,
        if state.converged { "converged" } else { "iteration cap reached" }
    );
    for n in &updated {
        println!(
            "  {:<16} {:<12} {:.3} {}",
            puzzle.label(&n.id),
            n.kind.to_string(),
            state.activity(&n.id),
            if n.is_active { "ACTIVE" } else { "-" }
        );
    }
    for c in &puzzle.connections {
        println!(
            "  {} {} {} {}",
            puzzle.label(&c.source()),
            if c.is_excitatory { "-->" } else { "--|" },
            puzzle.label(&c.target()),
            if state.is_connection_active(&c.id) { "(signal)" } else { "" }
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn check_puzzle(config: &Config, path: &Path) -> Result<ExitCode> {
    let puzzle = load(path)?;
    let passed = config.simulator().check_success(
        &puzzle.neurons,
        &puzzle.connections,
        &puzzle.inputs,
        &puzzle.condition,
    )?;

    println!(
        "{}: {}",
        puzzle.condition.kind(),
        if passed { "PASS" } else { "FAIL" }
    );
    if passed {
        return Ok(ExitCode::SUCCESS);
    }

    for hint in puzzle.failure_hints()? {
        println!("  hint: {}", hint);
    }
    Ok(ExitCode::FAILURE)
}

fn describe_level(number: u32) -> Result<ExitCode> {
    let level = LevelConfig::for_level(number);
    println!("Level {}: {}", level.level_number, level.title);
    println!("  {}", level.task_description);
    println!("  hint: {}", level.hint);
    println!("  condition: {}", level.success_condition.kind());
    for setup in &level.neurons {
        let neuron = setup.spawn();
        println!(
            "  - {:<12} threshold {:.2}  strength {:.2}",
            neuron.kind.display_name(),
            neuron.activation_threshold,
            neuron.output_strength
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn list_daily(day: Option<u32>) -> Result<ExitCode> {
    let tasks = match day {
        Some(day) => daily_tasks(day),
        None => todays_tasks(),
    };
    for task in &tasks {
        println!(
            "{} [{}] {}: level {} ({})",
            task.id,
            "*".repeat(task.difficulty as usize),
            task.title,
            task.level.level_number,
            task.level.title
        );
        println!("  {}", task.description);
    }
    Ok(ExitCode::SUCCESS)
}
