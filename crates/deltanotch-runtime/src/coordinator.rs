//! Phenotype coordinator — the per-step driver.
//!
//! Each step:
//! 1. The population refreshes its own bookkeeping (division flags, neighbours)
//! 2. Every cell's Delta level is classified into a phenotype
//! 3. Cells whose proliferative capability changed restart their cell cycle
//! 4. Every cell's target area is recomputed
//!
//! Steps 2–4 touch only the cell itself plus the shared read-only policy,
//! so cells are processed in parallel when enabled. Any error aborts the
//! whole step.

use deltanotch_core::cell::Cell;
use deltanotch_core::error::Result;
use deltanotch_core::phenotype::classify;
use deltanotch_core::population::CellPopulation;
use deltanotch_core::target_area::TargetAreaPolicy;
use deltanotch_core::types::*;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument, trace};

/// What happened to one cell during a step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellOutcome {
    pub cell: CellId,
    pub previous_phenotype: Phenotype,
    pub phenotype: Phenotype,
    pub capability: ProliferativeCapability,
    /// Whether the cell cycle was reinitialised because capability changed.
    pub reinitialised: bool,
    pub target_area: f64,
}

impl CellOutcome {
    pub fn phenotype_changed(&self) -> bool {
        self.previous_phenotype != self.phenotype
    }
}

/// Summary of one population step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub time: SimTime,
    pub outcomes: Vec<CellOutcome>,
}

impl StepReport {
    pub fn cell_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn phenotype_changes(&self) -> impl Iterator<Item = &CellOutcome> {
        self.outcomes.iter().filter(|o| o.phenotype_changed())
    }

    pub fn reinitialised_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.reinitialised).count()
    }

    pub fn outcome(&self, cell: CellId) -> Option<&CellOutcome> {
        self.outcomes.iter().find(|o| o.cell == cell)
    }
}

/// Drives phenotype classification and target-area assignment over a
/// population.
#[derive(Debug, Clone)]
pub struct PhenotypeCoordinator {
    policy: TargetAreaPolicy,
    parallel: bool,
}

impl PhenotypeCoordinator {
    pub fn new(policy: TargetAreaPolicy) -> Self {
        Self {
            policy,
            parallel: true,
        }
    }

    /// Process cells on the rayon thread pool (default) or sequentially.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn policy(&self) -> &TargetAreaPolicy {
        &self.policy
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Step every cell in `population` at time `now`.
    #[instrument(skip_all, fields(now = now, cells = population.len()))]
    pub fn step_all<P>(&self, population: &mut P, now: SimTime) -> Result<StepReport>
    where
        P: CellPopulation + ?Sized,
    {
        population.update(now)?;

        let cells = population.cells_mut();
        let outcomes = if self.parallel {
            cells
                .par_iter_mut()
                .map(|cell| self.step_cell(cell, now))
                .collect::<Result<Vec<_>>>()?
        } else {
            cells
                .iter_mut()
                .map(|cell| self.step_cell(cell, now))
                .collect::<Result<Vec<_>>>()?
        };

        let report = StepReport { time: now, outcomes };
        trace!(
            changes = report.phenotype_changes().count(),
            reinitialised = report.reinitialised_count(),
            "population step complete"
        );
        Ok(report)
    }

    /// Classify one cell, restart its cycle on a capability change, and
    /// assign its target area.
    pub fn step_cell(&self, cell: &mut Cell, now: SimTime) -> Result<CellOutcome> {
        let delta = cell.delta()?;
        let classification = classify(delta);
        let previous_phenotype = cell.phenotype();
        let previous_capability = cell.apply_classification(classification);

        let reinitialised = previous_capability != classification.capability;
        if reinitialised {
            cell.initialise_cycle_model(now);
            debug!(
                cell = %cell.id(),
                from = %previous_capability,
                to = %classification.capability,
                delta,
                "capability changed, cell cycle reinitialised"
            );
        }

        let target_area = self.policy.update_target_area(cell, now)?;

        Ok(CellOutcome {
            cell: cell.id(),
            previous_phenotype,
            phenotype: classification.phenotype,
            capability: classification.capability,
            reinitialised,
            target_area,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deltanotch_core::cycle::FixedCycleModel;
    use deltanotch_core::error::DeltaError;
    use deltanotch_core::phenotype::DELTA_KEY;
    use deltanotch_core::target_area::TargetAreaConfig;

    fn coordinator(parallel: bool) -> PhenotypeCoordinator {
        let mut config = TargetAreaConfig::default();
        config.set_growth_duration(12.0).unwrap();
        PhenotypeCoordinator::new(TargetAreaPolicy::new(config).unwrap()).with_parallel(parallel)
    }

    fn cell(id: u64, delta: f64) -> Cell {
        Cell::new(CellId::new(id), 0.0, Box::new(FixedCycleModel::new(5.0).unwrap())).with_delta(delta)
    }

    #[test]
    fn flicker_reinitialises_on_every_capability_change() {
        let coordinator = coordinator(false);
        let mut population = vec![cell(1, 0.65)];

        let mut phenotypes = Vec::new();
        let mut reinits = Vec::new();
        for (step, delta) in [0.65, 0.15, 0.65].into_iter().enumerate() {
            population[0].data_mut().set(DELTA_KEY, delta);
            let report = coordinator.step_all(&mut population, step as f64).unwrap();
            let outcome = report.outcome(CellId::new(1)).copied().unwrap();
            phenotypes.push(outcome.phenotype);
            reinits.push(outcome.reinitialised);
        }

        assert_eq!(phenotypes, vec![Phenotype::High, Phenotype::Low, Phenotype::High]);
        assert_eq!(reinits, vec![true, true, true]);
    }

    #[test]
    fn band_change_without_capability_change_does_not_reinitialise() {
        let coordinator = coordinator(false);
        let mut population = vec![cell(1, 0.1)];
        let first = coordinator.step_all(&mut population, 0.0).unwrap();
        assert!(!first.outcomes[0].reinitialised);
        assert_eq!(first.outcomes[0].phenotype, Phenotype::Low);

        population[0].data_mut().set(DELTA_KEY, 0.4);
        let second = coordinator.step_all(&mut population, 1.0).unwrap();
        assert_eq!(second.outcomes[0].phenotype, Phenotype::None);
        assert!(second.outcomes[0].phenotype_changed());
        assert!(!second.outcomes[0].reinitialised);
    }

    #[test]
    fn missing_delta_aborts_the_step() {
        let coordinator = coordinator(true);
        let mut population = vec![
            cell(1, 0.7),
            Cell::new(CellId::new(2), 0.0, Box::new(FixedCycleModel::new(5.0).unwrap())),
        ];
        let err = coordinator.step_all(&mut population, 0.0).unwrap_err();
        assert!(matches!(err, DeltaError::Data(_)));
        assert!(err.to_string().contains("cell-2"));
    }

    #[test]
    fn not_phase_based_without_override_aborts() {
        let coordinator = PhenotypeCoordinator::new(TargetAreaPolicy::default());
        let mut population = vec![cell(7, 0.3)];
        let err = coordinator.step_all(&mut population, 0.0).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn parallel_and_serial_agree() {
        let deltas: Vec<f64> = (0..200).map(|i| (i as f64 * 0.37).sin().abs()).collect();
        let mut serial: Vec<Cell> = deltas.iter().enumerate().map(|(i, &d)| cell(i as u64, d)).collect();
        let mut parallel: Vec<Cell> = deltas.iter().enumerate().map(|(i, &d)| cell(i as u64, d)).collect();

        let a = coordinator(false).step_all(&mut serial, 6.0).unwrap();
        let b = coordinator(true).step_all(&mut parallel, 6.0).unwrap();
        assert_eq!(a.outcomes, b.outcomes);
    }

    #[test]
    fn target_area_follows_phenotype() {
        let mut config = TargetAreaConfig::default();
        config.set_growth_duration(12.0).unwrap();
        config.set_high_phenotype_coefficient(1.5).unwrap();
        config.set_low_phenotype_coefficient(0.7).unwrap();
        let coordinator = PhenotypeCoordinator::new(TargetAreaPolicy::new(config).unwrap());

        let mut population = vec![cell(1, 0.9), cell(2, 0.05), cell(3, 0.4)];
        coordinator.step_all(&mut population, 24.0).unwrap();
        let areas: Vec<f64> = population.iter().map(|c| c.target_area()).collect();
        assert_eq!(areas, vec![1.5, 0.7, 1.0]);
    }
}
