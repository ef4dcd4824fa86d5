//! CLI command implementations.

pub mod init;
pub mod run;
pub mod classify;
pub mod params;

use colored::{ColoredString, Colorize};
use deltanotch_core::types::Phenotype;

/// Phenotype label in its visualizer colour.
pub fn painted(phenotype: Phenotype) -> ColoredString {
    let label = phenotype.label();
    match phenotype.colour() {
        31 => label.red(),
        32 => label.green(),
        _ => label.normal(),
    }
}
