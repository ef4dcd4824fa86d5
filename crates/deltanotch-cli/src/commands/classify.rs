//! Classify a single Delta level.

use anyhow::Result;
use colored::Colorize;
use deltanotch_core::phenotype::{classify, HIGH_DELTA_THRESHOLD, LOW_DELTA_THRESHOLD};

use super::painted;

pub fn run(delta: f64) -> Result<()> {
    let classification = classify(delta);
    println!(
        "{} delta {} → {} (code {}), {}",
        "•".blue(),
        delta.to_string().cyan(),
        painted(classification.phenotype).bold(),
        classification.phenotype.code(),
        classification.capability
    );
    println!(
        "  {}",
        format!("low < {LOW_DELTA_THRESHOLD} < none < {HIGH_DELTA_THRESHOLD} < high").dimmed()
    );
    Ok(())
}
