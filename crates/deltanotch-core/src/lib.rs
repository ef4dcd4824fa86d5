//! # Delta-Notch Core
//!
//! Core types and per-cell decision logic for Delta-Notch patterned cell
//! populations.
//!
//! Each simulation step, every cell carries a Delta signalling level that an
//! upstream reaction network keeps up to date. This crate turns that level
//! into two things:
//!
//! - **Phenotype**: a discrete Delta-high / Delta-low / neither label, and
//!   with it whether the cell may still proliferate
//! - **Target area**: the size the mechanical solver should drive the cell
//!   towards, given its phenotype, age, division state and apoptosis
//!
//! Cell-cycle models plug in through the [`cycle::CellCycleModel`] capability
//! trait; populations and signal producers through the traits in
//! [`population`].
//!
//! ## Quick Start
//!
//! ```rust
//! use deltanotch_core::prelude::*;
//!
//! let classification = classify(0.75);
//! assert_eq!(classification.phenotype, Phenotype::High);
//! assert_eq!(classification.capability, ProliferativeCapability::Proliferative);
//!
//! let config = TargetAreaConfig::default();
//! assert_eq!(config.reference_target_area(), 1.0);
//! ```

pub mod types;
pub mod error;
pub mod phenotype;
pub mod cell;
pub mod cycle;
pub mod target_area;
pub mod population;
pub mod prelude;
