//! Delta-Notch Runtime Prelude — convenient imports for common usage.
//!
//! ```rust
//! use deltanotch_runtime::prelude::*;
//! ```

// Re-export the core vocabulary
pub use deltanotch_core::prelude::*;

// Re-export coordinator
pub use crate::coordinator::{CellOutcome, PhenotypeCoordinator, StepReport};

// Re-export tissue
pub use crate::tissue::{Tissue, DEFAULT_APOPTOSIS_DURATION};

// Re-export signal sources
pub use crate::signal::{ConstantSignal, DeltaSchedule, ScriptedSignals};

// Re-export snapshots
pub use crate::snapshot::{CellSnapshot, PhenotypeCounts, RunId, TissueSnapshot};

// Re-export simulation
pub use crate::simulation::{RunSummary, Simulation, SimulationConfig, SimulationEvent};
