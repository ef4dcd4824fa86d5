//! Scripted Delta sources.
//!
//! Stand-ins for the Delta/Notch reaction network: they write each cell's
//! `"delta"` item from a fixed script instead of integrating ODEs. Cells the
//! script doesn't mention (daughters, typically) keep whatever Delta level
//! they inherited.

use deltanotch_core::cell::Cell;
use deltanotch_core::error::{DeltaError, Result};
use deltanotch_core::phenotype::DELTA_KEY;
use deltanotch_core::population::SignalSource;
use deltanotch_core::types::{CellId, SimTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Piecewise-constant Delta level over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaSchedule {
    /// `(from_time, delta)` pairs, sorted by time.
    points: Vec<(SimTime, f64)>,
}

impl DeltaSchedule {
    pub fn new(mut points: Vec<(SimTime, f64)>) -> Result<Self> {
        if points.is_empty() {
            return Err(DeltaError::invalid_config(
                "delta schedule",
                "[]",
                "needs at least one point",
            ));
        }
        if let Some((t, _)) = points.iter().find(|(t, v)| !t.is_finite() || !v.is_finite()) {
            return Err(DeltaError::invalid_config(
                "delta schedule",
                t.to_string(),
                "times and levels must be finite",
            ));
        }
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(Self { points })
    }

    /// A schedule holding one level forever.
    pub fn constant(delta: f64) -> Result<Self> {
        Self::new(vec![(f64::MIN, delta)])
    }

    /// Level in effect at `now`: the last point at or before `now`, or the
    /// first point if `now` precedes them all.
    pub fn value_at(&self, now: SimTime) -> f64 {
        let idx = self.points.partition_point(|(t, _)| *t <= now);
        let (_, delta) = self.points[idx.saturating_sub(1)];
        delta
    }
}

/// Per-cell Delta schedules.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSignals {
    schedules: HashMap<CellId, DeltaSchedule>,
}

impl ScriptedSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, cell: CellId, schedule: DeltaSchedule) {
        self.schedules.insert(cell, schedule);
    }

    pub fn with_schedule(mut self, cell: CellId, schedule: DeltaSchedule) -> Self {
        self.insert(cell, schedule);
        self
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }
}

impl SignalSource for ScriptedSignals {
    fn update_signals(&mut self, cells: &mut [Cell], now: SimTime) -> Result<()> {
        for cell in cells.iter_mut() {
            if let Some(schedule) = self.schedules.get(&cell.id()) {
                cell.data_mut().set(DELTA_KEY, schedule.value_at(now));
            }
        }
        Ok(())
    }
}

/// The same Delta level for every cell.
#[derive(Debug, Clone, Copy)]
pub struct ConstantSignal(pub f64);

impl SignalSource for ConstantSignal {
    fn update_signals(&mut self, cells: &mut [Cell], _now: SimTime) -> Result<()> {
        for cell in cells.iter_mut() {
            cell.data_mut().set(DELTA_KEY, self.0);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deltanotch_core::cycle::FixedCycleModel;
    use proptest::prelude::*;

    #[test]
    fn schedule_is_piecewise_constant() {
        let s = DeltaSchedule::new(vec![(2.0, 0.15), (0.0, 0.65), (4.0, 0.65)]).unwrap();
        assert_eq!(s.value_at(-1.0), 0.65);
        assert_eq!(s.value_at(0.0), 0.65);
        assert_eq!(s.value_at(1.99), 0.65);
        assert_eq!(s.value_at(2.0), 0.15);
        assert_eq!(s.value_at(3.0), 0.15);
        assert_eq!(s.value_at(100.0), 0.65);
    }

    #[test]
    fn empty_or_non_finite_schedules_are_rejected() {
        assert!(DeltaSchedule::new(vec![]).is_err());
        assert!(DeltaSchedule::new(vec![(0.0, f64::NAN)]).is_err());
    }

    #[test]
    fn unscripted_cells_keep_their_delta() {
        let mut cells = vec![
            Cell::new(CellId::new(0), 0.0, Box::new(FixedCycleModel::new(1.0).unwrap())),
            Cell::new(CellId::new(1), 0.0, Box::new(FixedCycleModel::new(1.0).unwrap()))
                .with_delta(0.3),
        ];
        let mut signals = ScriptedSignals::new()
            .with_schedule(CellId::new(0), DeltaSchedule::constant(0.9).unwrap());
        signals.update_signals(&mut cells, 0.0).unwrap();
        assert_eq!(cells[0].delta(), Ok(0.9));
        assert_eq!(cells[1].delta(), Ok(0.3));
    }

    proptest! {
        #[test]
        fn value_is_always_a_scheduled_level(
            levels in proptest::collection::vec(0.0f64..1.0, 1..8),
            now in -10.0f64..20.0,
        ) {
            let points: Vec<(f64, f64)> = levels
                .iter()
                .enumerate()
                .map(|(i, &v)| (i as f64 * 2.0, v))
                .collect();
            let schedule = DeltaSchedule::new(points).unwrap();
            prop_assert!(levels.contains(&schedule.value_at(now)));
        }
    }
}
