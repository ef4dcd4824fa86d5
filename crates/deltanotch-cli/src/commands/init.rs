//! Write a default scenario file.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Scenario, SCENARIO_FILE};

pub fn run(path: Option<PathBuf>) -> Result<()> {
    let base_path = match path {
        Some(p) => p,
        None => std::env::current_dir().context("Failed to resolve current directory")?,
    };

    println!("{} Initializing Delta-Notch scenario...", "→".blue());

    std::fs::create_dir_all(&base_path)
        .with_context(|| format!("Failed to create {}", base_path.display()))?;

    let scenario_path = base_path.join(SCENARIO_FILE);
    if scenario_path.exists() {
        println!("  {} {} already exists", "•".yellow(), scenario_path.display());
    } else {
        Scenario::default().save(&scenario_path)?;
        println!("  {} Created {}", "✓".green(), scenario_path.display());
    }

    println!();
    println!("Next steps:");
    println!("  {} edit the [[cells]] Delta schedules", "1.".blue());
    println!("  {} deltanotch params", "2.".blue());
    println!("  {} deltanotch run --output snapshots.json", "3.".blue());

    Ok(())
}
