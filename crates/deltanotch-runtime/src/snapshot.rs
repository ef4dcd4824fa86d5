//! Serializable views of the tissue for reporting.

use deltanotch_core::cell::Cell;
use deltanotch_core::types::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of one simulation run, stamped on every snapshot it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of cells per phenotype and per capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhenotypeCounts {
    pub none: usize,
    pub low: usize,
    pub high: usize,
    pub proliferative: usize,
    pub differentiated: usize,
    pub apoptotic: usize,
}

impl PhenotypeCounts {
    pub fn from_cells<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Self {
        let mut counts = Self::default();
        for cell in cells {
            counts.record(cell);
        }
        counts
    }

    fn record(&mut self, cell: &Cell) {
        match cell.phenotype() {
            Phenotype::None => self.none += 1,
            Phenotype::Low => self.low += 1,
            Phenotype::High => self.high += 1,
        }
        match cell.capability() {
            ProliferativeCapability::Proliferative => self.proliferative += 1,
            ProliferativeCapability::Differentiated => self.differentiated += 1,
        }
        if cell.is_apoptotic() {
            self.apoptotic += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.none + self.low + self.high
    }
}

/// A serializable snapshot of one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub id: CellId,
    /// Phenotype code: 0 none, 1 Delta-low, 2 Delta-high.
    pub phenotype: u8,
    pub capability: ProliferativeCapability,
    pub age: f64,
    pub delta: Option<f64>,
    pub target_area: f64,
    pub apoptotic: bool,
}

impl CellSnapshot {
    pub fn capture(cell: &Cell, now: SimTime) -> Self {
        Self {
            id: cell.id(),
            phenotype: cell.phenotype().code(),
            capability: cell.capability(),
            age: cell.age(now),
            delta: cell.delta().ok(),
            target_area: cell.target_area(),
            apoptotic: cell.is_apoptotic(),
        }
    }
}

/// A complete serializable snapshot of the tissue at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TissueSnapshot {
    pub run_id: RunId,
    pub step: u64,
    pub time: SimTime,
    pub counts: PhenotypeCounts,
    pub cells: Vec<CellSnapshot>,
}

impl TissueSnapshot {
    pub fn capture(run_id: RunId, step: u64, time: SimTime, cells: &[Cell]) -> Self {
        Self {
            run_id,
            step,
            time,
            counts: PhenotypeCounts::from_cells(cells),
            cells: cells.iter().map(|c| CellSnapshot::capture(c, time)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deltanotch_core::cycle::FixedCycleModel;

    fn labelled(id: u64, phenotype: Phenotype) -> Cell {
        let capability = match phenotype {
            Phenotype::High => ProliferativeCapability::Proliferative,
            _ => ProliferativeCapability::Differentiated,
        };
        let mut cell = Cell::new(CellId::new(id), 0.0, Box::new(FixedCycleModel::new(1.0).unwrap()));
        cell.apply_classification(Classification { phenotype, capability });
        cell
    }

    #[test]
    fn counts_partition_the_population() {
        let cells = vec![
            labelled(1, Phenotype::High),
            labelled(2, Phenotype::High),
            labelled(3, Phenotype::Low),
            labelled(4, Phenotype::None),
        ];
        let counts = PhenotypeCounts::from_cells(&cells);
        assert_eq!(counts.high, 2);
        assert_eq!(counts.low, 1);
        assert_eq!(counts.none, 1);
        assert_eq!(counts.proliferative, 2);
        assert_eq!(counts.differentiated, 2);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn snapshot_serializes_phenotype_codes() {
        let cells = vec![labelled(1, Phenotype::Low).with_delta(0.1)];
        let snapshot = TissueSnapshot::capture(RunId::new(), 3, 1.5, &cells);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["cells"][0]["phenotype"], 1);
        assert_eq!(json["cells"][0]["delta"], 0.1);
        assert_eq!(json["step"], 3);

        let back: TissueSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back.run_id, snapshot.run_id);
        assert_eq!(back.counts, snapshot.counts);
    }
}
