//! Run a scenario.

use anyhow::{Context, Result};
use colored::Colorize;
use deltanotch_runtime::prelude::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use super::painted;
use crate::config::Scenario;

pub fn run(config: Option<&Path>, output: Option<&Path>, serial: bool, verbose: bool) -> Result<()> {
    let scenario = Scenario::load(config)?;
    let mut sim = scenario.build(serial)?;
    let total = sim.config().total_steps();

    println!(
        "{} Running {} cells for {} steps (run {})...",
        "→".blue(),
        scenario.cells.len().to_string().cyan(),
        total.to_string().cyan(),
        sim.run_id().to_string().dimmed()
    );
    sim.setup()?;
    let initial = sim.counts();

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} steps")
            .context("Invalid progress template")?
            .progress_chars("#>-"),
    );

    while sim.current_step() < total {
        let report = sim.step()?;
        if verbose {
            for outcome in report.phenotype_changes() {
                pb.println(format!(
                    "  t={:.2} {} {} → {}",
                    report.time,
                    outcome.cell,
                    painted(outcome.previous_phenotype),
                    painted(outcome.phenotype)
                ));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    let summary = sim.summary();
    println!();
    println!("{} Simulation complete!", "✓".green().bold());
    print_counts("Delta-high", initial.high, summary.final_counts.high);
    print_counts("Delta-low", initial.low, summary.final_counts.low);
    print_counts("None", initial.none, summary.final_counts.none);
    println!("  Divisions:          {}", summary.divisions.to_string().cyan());
    println!("  Removals:           {}", summary.removals.to_string().cyan());
    println!("  Phenotype changes:  {}", summary.phenotype_changes.to_string().cyan());
    println!("  Cycle restarts:     {}", summary.reinitialisations.to_string().cyan());

    if let Some(path) = output {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), sim.snapshots())
            .with_context(|| format!("Failed to write snapshots to {}", path.display()))?;
        println!(
            "  {} Wrote {} snapshots to {}",
            "✓".green(),
            sim.snapshots().len(),
            path.display()
        );
    }

    Ok(())
}

fn print_counts(label: &str, before: usize, after: usize) {
    println!(
        "  {:<19} {} → {}",
        format!("{label}:"),
        before.to_string().yellow(),
        after.to_string().green()
    );
}
