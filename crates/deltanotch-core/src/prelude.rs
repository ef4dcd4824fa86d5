//! Delta-Notch Core Prelude — convenient imports for common usage.
//!
//! ```rust
//! use deltanotch_core::prelude::*;
//! ```

pub use crate::types::{
    CellId, SimTime,
    Phenotype, ProliferativeCapability, Classification,
};

pub use crate::phenotype::{classify, DELTA_KEY, HIGH_DELTA_THRESHOLD, LOW_DELTA_THRESHOLD};

pub use crate::cell::{Apoptosis, Cell, CellData};

pub use crate::cycle::{
    derive_cell_rng, CellCycleModel, CycleConfig, FixedCycleModel, G1Duration,
    PhaseBasedCycle, StochasticG1CycleModel,
};

pub use crate::target_area::{TargetAreaConfig, TargetAreaPolicy, TARGET_AREA_KEY};

pub use crate::population::{CellPopulation, SignalSource};

pub use crate::error::{ConfigError, DataError, DeltaError, Result};
