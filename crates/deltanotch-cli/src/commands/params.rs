//! Show scenario parameters.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::config::Scenario;

pub fn run(config: Option<&Path>) -> Result<()> {
    let scenario = Scenario::load(config)?;

    println!("{}", "Target Area".blue().bold());
    for (name, value) in scenario.target_area.parameters() {
        let shown = match value {
            Some(v) => v.to_string().cyan(),
            None => "from G1 duration".dimmed(),
        };
        println!("  {:<42} {}", name, shown);
    }
    println!();

    let cycle = &scenario.cycle;
    println!("{}", "Cell Cycle".blue().bold());
    println!("  {:<42} {}", "StemCellG1Duration", cycle.stem_cell_g1_duration.to_string().cyan());
    println!("  {:<42} {}", "TransitCellG1Duration", cycle.transit_cell_g1_duration.to_string().cyan());
    println!("  {:<42} {}", "SG2MDuration", cycle.sg2m_duration().to_string().cyan());
    println!(
        "  {:<42} {}",
        "DaughterDifferentiationProbability",
        cycle.daughter_differentiation_probability.to_string().cyan()
    );
    println!();

    let sim = &scenario.simulation;
    println!("{}", "Simulation".blue().bold());
    println!("  {:<42} {}", "dt", sim.dt.to_string().cyan());
    println!("  {:<42} {}", "end_time", sim.end_time.to_string().cyan());
    println!("  {:<42} {}", "apoptosis_duration", sim.apoptosis_duration.to_string().cyan());
    println!("  {:<42} {}", "cells", scenario.cells.len().to_string().cyan());

    Ok(())
}
