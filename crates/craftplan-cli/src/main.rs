//! # Craftplan
//!
//! Command-line front end: loads a crafting domain, plans, prints the plan.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

mod engine;
mod output;

use engine::Engine;

/// Heuristic used to order the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HeuristicKind {
    /// Penalise redundant tools and useless items, else the action's cost
    Penalty,
    /// Cost of the action that produced the state
    ActionCost,
    /// No guidance (uniform-cost search)
    Zero,
}

#[derive(Parser, Debug)]
#[command(
    name = "craftplan",
    version,
    about = "Find a cheap sequence of recipes that reaches a crafting goal"
)]
struct Cli {
    /// Path to the domain definition
    #[arg(default_value = "crafting.json")]
    domain: PathBuf,

    /// Search time budget in seconds
    #[arg(short, long, default_value_t = 30.0)]
    time_limit: f64,

    /// Heuristic guiding the search
    #[arg(long, value_enum, default_value_t = HeuristicKind::Penalty)]
    heuristic: HeuristicKind,

    /// JSON file overriding the penalty heuristic's item rules
    #[arg(long)]
    penalty_config: Option<PathBuf>,

    /// Print the search report as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let engine = match Engine::load(&cli.domain, cli.time_limit, cli.penalty_config.as_deref()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(1);
        }
    };

    if !cli.json {
        output::print_domain(engine.domain());
    }

    let report = engine.run(cli.heuristic);

    if cli.json {
        if let Err(e) = output::print_json(&report) {
            eprintln!("error: {e:#}");
            return ExitCode::from(1);
        }
    } else {
        output::print_report(engine.domain(), &report);
    }

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}
