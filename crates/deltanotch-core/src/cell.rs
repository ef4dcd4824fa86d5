//! Cell — one agent of the simulated population.
//!
//! A cell owns its lifecycle state (birth time, division readiness,
//! apoptosis), its current phenotype, its target area and a small map of
//! named scalars written by upstream collaborators (the Delta/Notch reaction
//! network writes `"delta"` there every step).

use crate::cycle::CellCycleModel;
use crate::error::{ensure_non_negative, DeltaError, Result};
use crate::phenotype::DELTA_KEY;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named scalar values attached to a cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellData {
    items: BTreeMap<String, f64>,
}

impl CellData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        self.items.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.items.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.items.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Apoptosis timing, fixed once apoptosis begins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Apoptosis {
    pub start_time: SimTime,
    pub duration: f64,
}

impl Apoptosis {
    /// Time spent apoptotic at `now`.
    pub fn elapsed(&self, now: SimTime) -> f64 {
        now - self.start_time
    }

    /// Whether apoptosis has run its full course at `now`.
    pub fn is_complete(&self, now: SimTime) -> bool {
        self.elapsed(now) >= self.duration
    }
}

/// A simulated cell.
#[derive(Debug)]
pub struct Cell {
    id: CellId,
    birth_time: SimTime,
    phenotype: Phenotype,
    capability: ProliferativeCapability,
    division_ready: bool,
    apoptosis: Option<Apoptosis>,
    target_area: f64,
    data: CellData,
    cycle: Box<dyn CellCycleModel>,
}

impl Cell {
    /// Create a cell with no phenotype label. The cycle model is initialised
    /// for a differentiated cell at its birth time.
    pub fn new(id: CellId, birth_time: SimTime, mut cycle: Box<dyn CellCycleModel>) -> Self {
        let capability = ProliferativeCapability::default();
        cycle.initialise(capability, birth_time);
        Self {
            id,
            birth_time,
            phenotype: Phenotype::None,
            capability,
            division_ready: false,
            apoptosis: None,
            target_area: 0.0,
            data: CellData::new(),
            cycle,
        }
    }

    /// Start with a given capability instead of the differentiated default.
    pub fn with_capability(mut self, capability: ProliferativeCapability) -> Self {
        self.capability = capability;
        self.cycle.initialise(capability, self.birth_time);
        self
    }

    /// Start with an initial Delta level.
    pub fn with_delta(mut self, delta: f64) -> Self {
        self.data.set(DELTA_KEY, delta);
        self
    }

    pub fn id(&self) -> CellId {
        self.id
    }

    pub fn birth_time(&self) -> SimTime {
        self.birth_time
    }

    /// Restart the cell's age, as happens to both cells at division.
    pub fn set_birth_time(&mut self, birth_time: SimTime) {
        self.birth_time = birth_time;
    }

    /// Age at `now`, never negative.
    pub fn age(&self, now: SimTime) -> f64 {
        (now - self.birth_time).max(0.0)
    }

    pub fn phenotype(&self) -> Phenotype {
        self.phenotype
    }

    pub fn capability(&self) -> ProliferativeCapability {
        self.capability
    }

    /// Store a classification result. Returns the previous capability.
    pub fn apply_classification(&mut self, classification: Classification) -> ProliferativeCapability {
        self.phenotype = classification.phenotype;
        std::mem::replace(&mut self.capability, classification.capability)
    }

    pub fn is_ready_to_divide(&self) -> bool {
        self.division_ready
    }

    pub fn set_division_ready(&mut self, ready: bool) {
        self.division_ready = ready;
    }

    pub fn is_apoptotic(&self) -> bool {
        self.apoptosis.is_some()
    }

    pub fn apoptosis(&self) -> Option<&Apoptosis> {
        self.apoptosis.as_ref()
    }

    pub fn start_of_apoptosis_time(&self) -> Option<SimTime> {
        self.apoptosis.map(|a| a.start_time)
    }

    pub fn apoptosis_duration(&self) -> Option<f64> {
        self.apoptosis.map(|a| a.duration)
    }

    /// Begin apoptosis at `now`.
    ///
    /// Apoptosis is irreversible: if the cell is already apoptotic its
    /// original timing is kept and `false` is returned. An apoptotic cell
    /// never divides.
    pub fn start_apoptosis(&mut self, now: SimTime, duration: f64) -> Result<bool> {
        let duration = ensure_non_negative("apoptosis duration", duration)?;
        if self.apoptosis.is_some() {
            return Ok(false);
        }
        self.apoptosis = Some(Apoptosis {
            start_time: now,
            duration,
        });
        self.division_ready = false;
        Ok(true)
    }

    pub fn target_area(&self) -> f64 {
        self.target_area
    }

    pub fn set_target_area(&mut self, target_area: f64) {
        self.target_area = target_area;
    }

    pub fn data(&self) -> &CellData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut CellData {
        &mut self.data
    }

    /// Read a required item from the cell data.
    pub fn item(&self, key: &str) -> Result<f64> {
        self.data
            .get(key)
            .ok_or_else(|| DeltaError::missing_item(self.id, key))
    }

    /// Current Delta level.
    pub fn delta(&self) -> Result<f64> {
        self.item(DELTA_KEY)
    }

    pub fn cycle_model(&self) -> &dyn CellCycleModel {
        self.cycle.as_ref()
    }

    pub fn cycle_model_mut(&mut self) -> &mut dyn CellCycleModel {
        self.cycle.as_mut()
    }

    /// Reinitialise the cycle model for the current capability.
    pub fn initialise_cycle_model(&mut self, now: SimTime) {
        self.cycle.initialise(self.capability, now);
    }

    /// Split off a daughter cell at `now`.
    ///
    /// Both cells restart their age at `now`. The daughter copies the
    /// parent's data, phenotype and target area; its capability comes from
    /// the cycle model's daughter fate.
    pub fn divide(&mut self, daughter_id: CellId, now: SimTime) -> Cell {
        let (daughter_cycle, daughter_capability) = self.cycle.create_daughter(now);
        self.birth_time = now;
        self.division_ready = false;
        self.cycle.initialise(self.capability, now);

        Cell {
            id: daughter_id,
            birth_time: now,
            phenotype: self.phenotype,
            capability: daughter_capability,
            division_ready: false,
            apoptosis: None,
            target_area: self.target_area,
            data: self.data.clone(),
            cycle: daughter_cycle,
        }
    }
}
