//! Tissue — the population manager for standalone runs.
//!
//! Owns the cells, hands out ids, and does the lifecycle bookkeeping a host
//! simulation would normally do around each step:
//! - marks which cells are ready to divide before target areas are assigned
//! - splits ready cells once target areas are written
//! - starts apoptosis and removes cells whose apoptosis has completed

use deltanotch_core::cell::Cell;
use deltanotch_core::cycle::{derive_cell_rng, CellCycleModel, CycleConfig, StochasticG1CycleModel};
use deltanotch_core::error::{ensure_non_negative, DataError, DeltaError, Result};
use deltanotch_core::population::CellPopulation;
use deltanotch_core::types::*;
use tracing::debug;

/// Default apoptosis duration, in hours.
pub const DEFAULT_APOPTOSIS_DURATION: f64 = 0.25;

/// A population of cells with division and apoptosis bookkeeping.
#[derive(Debug)]
pub struct Tissue {
    cells: Vec<Cell>,
    next_id: u64,
    seed: u64,
    cycle_config: CycleConfig,
    apoptosis_duration: f64,
}

impl Tissue {
    pub fn new(seed: u64, cycle_config: CycleConfig) -> Result<Self> {
        cycle_config.validate()?;
        Ok(Self {
            cells: Vec::new(),
            next_id: 0,
            seed,
            cycle_config,
            apoptosis_duration: DEFAULT_APOPTOSIS_DURATION,
        })
    }

    pub fn with_apoptosis_duration(mut self, duration: f64) -> Result<Self> {
        self.apoptosis_duration = ensure_non_negative("apoptosis duration", duration)?;
        Ok(self)
    }

    pub fn apoptosis_duration(&self) -> f64 {
        self.apoptosis_duration
    }

    fn allocate_id(&mut self) -> CellId {
        let id = CellId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a cell driven by a [`StochasticG1CycleModel`] seeded from the
    /// tissue seed and the new cell's id.
    pub fn add_cell(&mut self, birth_time: SimTime) -> CellId {
        let id = self.allocate_id();
        let model = StochasticG1CycleModel::new(
            self.cycle_config,
            derive_cell_rng(self.seed, id.as_u64()),
        );
        self.cells.push(Cell::new(id, birth_time, Box::new(model)));
        id
    }

    /// Add a cell driven by the given cycle model.
    pub fn add_cell_with_model(
        &mut self,
        birth_time: SimTime,
        model: Box<dyn CellCycleModel>,
    ) -> CellId {
        let id = self.allocate_id();
        self.cells.push(Cell::new(id, birth_time, model));
        id
    }

    pub fn get(&self, id: CellId) -> Result<&Cell> {
        self.cells
            .iter()
            .find(|c| c.id() == id)
            .ok_or(DeltaError::Data(DataError::UnknownCell(id)))
    }

    pub fn get_mut(&mut self, id: CellId) -> Result<&mut Cell> {
        self.cells
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or(DeltaError::Data(DataError::UnknownCell(id)))
    }

    pub fn ids(&self) -> Vec<CellId> {
        self.cells.iter().map(|c| c.id()).collect()
    }

    /// Start apoptosis of `id` at `now` with the tissue's apoptosis duration.
    /// Returns `false` if the cell was already apoptotic.
    pub fn start_apoptosis(&mut self, id: CellId, now: SimTime) -> Result<bool> {
        let duration = self.apoptosis_duration;
        let started = self.get_mut(id)?.start_apoptosis(now, duration)?;
        if started {
            debug!(cell = %id, now, "apoptosis started");
        }
        Ok(started)
    }

    /// Split every cell flagged ready to divide. Returns `(parent, daughter)`
    /// pairs. Daughters are appended after the existing cells.
    pub fn divide_ready_cells(&mut self, now: SimTime) -> Vec<(CellId, CellId)> {
        let ready: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_ready_to_divide())
            .map(|(idx, _)| idx)
            .collect();

        let mut divisions = Vec::with_capacity(ready.len());
        for idx in ready {
            let daughter_id = self.allocate_id();
            let daughter = self.cells[idx].divide(daughter_id, now);
            let parent_id = self.cells[idx].id();
            debug!(
                parent = %parent_id,
                daughter = %daughter_id,
                target_area = daughter.target_area(),
                "cell divided"
            );
            self.cells.push(daughter);
            divisions.push((parent_id, daughter_id));
        }
        divisions
    }

    /// Remove cells whose apoptosis has run its course by `now`.
    pub fn remove_dead(&mut self, now: SimTime) -> Vec<CellId> {
        let mut removed = Vec::new();
        self.cells.retain(|cell| {
            let dead = cell.apoptosis().is_some_and(|a| a.is_complete(now));
            if dead {
                removed.push(cell.id());
            }
            !dead
        });
        for id in &removed {
            debug!(cell = %id, now, "apoptotic cell removed");
        }
        removed
    }
}

impl CellPopulation for Tissue {
    /// Flag cells whose cycle model says they should divide. Apoptotic cells
    /// never divide.
    fn update(&mut self, now: SimTime) -> Result<()> {
        for cell in &mut self.cells {
            let ready = !cell.is_apoptotic() && cell.cycle_model().ready_to_divide(now);
            cell.set_division_ready(ready);
        }
        Ok(())
    }

    fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deltanotch_core::cycle::FixedCycleModel;

    fn tissue() -> Tissue {
        Tissue::new(1, CycleConfig::default()).unwrap()
    }

    #[test]
    fn ids_are_unique_and_never_reused() {
        let mut t = tissue().with_apoptosis_duration(1.0).unwrap();
        let a = t.add_cell(0.0);
        let b = t.add_cell(0.0);
        assert_ne!(a, b);

        t.start_apoptosis(a, 0.0).unwrap();
        assert_eq!(t.remove_dead(1.0), vec![a]);
        let c = t.add_cell(1.0);
        assert_ne!(c, a);
        assert_ne!(c, b);
    }

    #[test]
    fn update_marks_ready_cells() {
        let mut t = tissue();
        let id = t.add_cell_with_model(0.0, Box::new(FixedCycleModel::new(5.0).unwrap()));
        t.get_mut(id).unwrap().initialise_cycle_model(0.0);
        t.update(4.0).unwrap();
        assert!(!t.get(id).unwrap().is_ready_to_divide());

        let cell = t.get_mut(id).unwrap();
        let _ = cell.apply_classification(Classification {
            phenotype: Phenotype::High,
            capability: ProliferativeCapability::Proliferative,
        });
        cell.initialise_cycle_model(0.0);
        t.update(5.0).unwrap();
        assert!(t.get(id).unwrap().is_ready_to_divide());
    }

    #[test]
    fn apoptotic_cells_are_never_ready() {
        let mut t = tissue();
        let id = t.add_cell_with_model(
            0.0,
            Box::new(FixedCycleModel::new(0.0).unwrap()),
        );
        let cell = t.get_mut(id).unwrap();
        cell.apply_classification(Classification {
            phenotype: Phenotype::High,
            capability: ProliferativeCapability::Proliferative,
        });
        cell.initialise_cycle_model(0.0);
        t.start_apoptosis(id, 0.0).unwrap();
        t.update(10.0).unwrap();
        assert!(!t.get(id).unwrap().is_ready_to_divide());
    }

    #[test]
    fn division_appends_daughter_with_parent_target_area() {
        let mut t = tissue();
        let id = t.add_cell(0.0);
        {
            let cell = t.get_mut(id).unwrap();
            cell.set_target_area(0.6);
            cell.set_division_ready(true);
        }
        let divisions = t.divide_ready_cells(10.0);
        assert_eq!(divisions.len(), 1);
        let (parent, daughter) = divisions[0];
        assert_eq!(parent, id);
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(daughter).unwrap().target_area(), 0.6);
        assert_eq!(t.get(parent).unwrap().target_area(), 0.6);
    }

    #[test]
    fn unknown_cell_is_a_data_error() {
        let mut t = tissue();
        let err = t.start_apoptosis(CellId::new(99), 0.0).unwrap_err();
        assert_eq!(err, DeltaError::Data(DataError::UnknownCell(CellId::new(99))));
    }

    #[test]
    fn invalid_cycle_config_is_rejected() {
        let config = CycleConfig {
            m_duration: -1.0,
            ..CycleConfig::default()
        };
        assert!(Tissue::new(0, config).is_err());
    }
}
