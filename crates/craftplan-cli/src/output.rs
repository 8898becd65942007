//! Human-readable and JSON rendering of domains and search reports.

use anyhow::Context;
use craftplan_core::Domain;
use craftplan_planner::{FailureKind, SearchOutcome, SearchReport, START_ACTION};

pub fn print_domain(domain: &Domain) {
    println!("All items: {}", domain.items.join(", "));
    println!("Initial inventory: {}", domain.initial_state());
    let goal: Vec<String> = domain
        .goal
        .iter()
        .map(|(item, amount)| format!("{item}: {}", amount.get()))
        .collect();
    println!("Goal: {{{}}}", goal.join(", "));
    println!();
}

pub fn print_report(domain: &Domain, report: &SearchReport) {
    let stats = &report.stats;
    match &report.outcome {
        SearchOutcome::Found(plan) => {
            println!("\t{}", domain.initial_state());
            println!("{START_ACTION}");
            for step in &plan.steps {
                println!("{}", step.action);
                println!("\t{}", step.state);
            }
            println!();
            println!("Total cost: {}", plan.total_cost);
            println!("Steps: {}", plan.step_count());
        }
        SearchOutcome::Failed(FailureKind::Timeout) => {
            println!(
                "No plan from {} within the time limit.",
                domain.initial_state()
            );
        }
        SearchOutcome::Failed(FailureKind::FrontierExhausted) => {
            println!(
                "Goal is unreachable from {}: every reachable state was explored.",
                domain.initial_state()
            );
        }
    }
    println!(
        "{:.3} seconds, {} states, {} expansions, frontier {}",
        stats.elapsed.as_secs_f64(),
        stats.states_visited,
        stats.expansions,
        stats.frontier_len
    );
}

pub fn print_json(report: &SearchReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    println!("{json}");
    Ok(())
}
