//! Population and signal-producer interfaces.
//!
//! The population owns the cells and whatever neighbour structure the
//! upstream signalling needs. The step coordinator only asks it to refresh
//! that structure (and which cells are ready to divide) and hand out the
//! cells.

use crate::cell::Cell;
use crate::error::Result;
use crate::types::{CellId, SimTime};

/// A collection of cells stepped together.
pub trait CellPopulation {
    /// Bring the population's neighbour structure and division flags up to
    /// date. Called once per step before any Delta level is read.
    fn update(&mut self, now: SimTime) -> Result<()>;

    fn cells(&self) -> &[Cell];

    fn cells_mut(&mut self) -> &mut [Cell];

    fn len(&self) -> usize {
        self.cells().len()
    }

    fn is_empty(&self) -> bool {
        self.cells().is_empty()
    }

    fn find(&self, id: CellId) -> Option<&Cell> {
        self.cells().iter().find(|c| c.id() == id)
    }
}

/// A plain list of cells with no neighbour structure.
impl CellPopulation for Vec<Cell> {
    fn update(&mut self, _now: SimTime) -> Result<()> {
        Ok(())
    }

    fn cells(&self) -> &[Cell] {
        self
    }

    fn cells_mut(&mut self) -> &mut [Cell] {
        self
    }
}

/// Producer of each cell's Delta level.
///
/// Implementations write the `"delta"` cell data item for every cell they
/// know about.
pub trait SignalSource: Send {
    fn update_signals(&mut self, cells: &mut [Cell], now: SimTime) -> Result<()>;
}
