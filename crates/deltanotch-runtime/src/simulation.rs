//! Simulation — the time loop for standalone runs.
//!
//! Setup classifies the population once at the start time so every cell has
//! a phenotype and target area before the first step. Each step then:
//! 1. Advances the clock
//! 2. Starts any apoptosis scheduled up to the new time
//! 3. Refreshes every cell's Delta level from the signal source
//! 4. Runs the phenotype coordinator (division flags, classification,
//!    target areas)
//! 5. Divides flagged cells; daughters inherit the parent's target area
//! 6. Removes cells whose apoptosis has completed
//! 7. Records a snapshot every `sampling_multiple` steps

use crate::coordinator::{PhenotypeCoordinator, StepReport};
use crate::snapshot::{PhenotypeCounts, RunId, TissueSnapshot};
use crate::tissue::{Tissue, DEFAULT_APOPTOSIS_DURATION};
use deltanotch_core::error::{DeltaError, Result};
use deltanotch_core::population::{CellPopulation, SignalSource};
use deltanotch_core::types::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Time-stepping parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Time step, in hours (default: 0.05).
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Start time (default: 0.0).
    #[serde(default)]
    pub start_time: SimTime,
    /// End time (default: 30.0).
    #[serde(default = "default_end_time")]
    pub end_time: SimTime,
    /// Run seed for cell-cycle randomness (default: 1).
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Step cells on the rayon thread pool (default: true).
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Record a snapshot every this many steps (default: 10).
    #[serde(default = "default_sampling_multiple")]
    pub sampling_multiple: u64,
    /// Apoptosis duration, in hours (default: 0.25).
    #[serde(default = "default_apoptosis_duration")]
    pub apoptosis_duration: f64,
}

fn default_dt() -> f64 { 0.05 }
fn default_end_time() -> f64 { 30.0 }
fn default_seed() -> u64 { 1 }
fn default_parallel() -> bool { true }
fn default_sampling_multiple() -> u64 { 10 }
fn default_apoptosis_duration() -> f64 { DEFAULT_APOPTOSIS_DURATION }

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            start_time: 0.0,
            end_time: default_end_time(),
            seed: default_seed(),
            parallel: default_parallel(),
            sampling_multiple: default_sampling_multiple(),
            apoptosis_duration: default_apoptosis_duration(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(DeltaError::invalid_config("dt", self.dt.to_string(), "must be positive"));
        }
        if !(self.end_time >= self.start_time) {
            return Err(DeltaError::invalid_config(
                "end_time",
                self.end_time.to_string(),
                "must not precede start_time",
            ));
        }
        if self.sampling_multiple == 0 {
            return Err(DeltaError::invalid_config(
                "sampling_multiple",
                "0",
                "must be at least 1",
            ));
        }
        deltanotch_core::error::ensure_non_negative("apoptosis duration", self.apoptosis_duration)?;
        Ok(())
    }

    /// Number of steps between start and end time.
    pub fn total_steps(&self) -> u64 {
        ((self.end_time - self.start_time) / self.dt).round() as u64
    }
}

/// Event emitted during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimulationEvent {
    /// A cell's phenotype label changed.
    PhenotypeChanged { cell: CellId, from: Phenotype, to: Phenotype },
    /// A cell's capability changed and its cycle was restarted.
    CycleReinitialised { cell: CellId, capability: ProliferativeCapability },
    /// A cell divided.
    Divided { parent: CellId, daughter: CellId },
    /// A cell began apoptosis.
    ApoptosisStarted { cell: CellId },
    /// An apoptotic cell was removed.
    Removed { cell: CellId },
    /// A step completed.
    StepComplete { step: u64, time: SimTime, alive: usize },
}

/// Totals over a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub steps: u64,
    pub final_time: SimTime,
    pub final_counts: PhenotypeCounts,
    pub phenotype_changes: usize,
    pub reinitialisations: usize,
    pub divisions: usize,
    pub removals: usize,
}

/// A standalone simulation of a tissue under a Delta signal source.
pub struct Simulation {
    config: SimulationConfig,
    run_id: RunId,
    tissue: Tissue,
    signals: Box<dyn SignalSource>,
    coordinator: PhenotypeCoordinator,
    apoptosis_schedule: Vec<(SimTime, CellId)>,
    step: u64,
    time: SimTime,
    is_set_up: bool,
    events: Vec<(u64, SimulationEvent)>,
    snapshots: Vec<TissueSnapshot>,
}

impl Simulation {
    pub fn new(
        config: SimulationConfig,
        tissue: Tissue,
        signals: Box<dyn SignalSource>,
        coordinator: PhenotypeCoordinator,
    ) -> Result<Self> {
        config.validate()?;
        let tissue = tissue.with_apoptosis_duration(config.apoptosis_duration)?;
        let coordinator = coordinator.with_parallel(config.parallel);
        let time = config.start_time;
        Ok(Self {
            config,
            run_id: RunId::new(),
            tissue,
            signals,
            coordinator,
            apoptosis_schedule: Vec::new(),
            step: 0,
            time,
            is_set_up: false,
            events: Vec::new(),
            snapshots: Vec::new(),
        })
    }

    /// Schedule `cell` to begin apoptosis at `time`.
    pub fn schedule_apoptosis(&mut self, cell: CellId, time: SimTime) {
        self.apoptosis_schedule.push((time, cell));
        self.apoptosis_schedule.sort_by(|a, b| a.0.total_cmp(&b.0));
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn tissue(&self) -> &Tissue {
        &self.tissue
    }

    pub fn tissue_mut(&mut self) -> &mut Tissue {
        &mut self.tissue
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn current_step(&self) -> u64 {
        self.step
    }

    pub fn events(&self) -> &[(u64, SimulationEvent)] {
        &self.events
    }

    pub fn snapshots(&self) -> &[TissueSnapshot] {
        &self.snapshots
    }

    pub fn counts(&self) -> PhenotypeCounts {
        PhenotypeCounts::from_cells(self.tissue.cells())
    }

    /// Classify the population and assign target areas at the start time.
    /// Called automatically by the first [`Simulation::step`].
    pub fn setup(&mut self) -> Result<StepReport> {
        self.start_scheduled_apoptosis()?;
        self.signals.update_signals(self.tissue.cells_mut(), self.time)?;
        let report = self.coordinator.step_all(&mut self.tissue, self.time)?;
        self.record_outcomes(&report);
        self.is_set_up = true;
        self.snapshots.push(TissueSnapshot::capture(
            self.run_id,
            self.step,
            self.time,
            self.tissue.cells(),
        ));
        info!(
            run = %self.run_id,
            cells = self.tissue.len(),
            steps = self.config.total_steps(),
            "simulation set up"
        );
        Ok(report)
    }

    /// Advance one time step.
    pub fn step(&mut self) -> Result<StepReport> {
        if !self.is_set_up {
            self.setup()?;
        }

        self.step += 1;
        self.time = self.config.start_time + self.step as f64 * self.config.dt;

        self.start_scheduled_apoptosis()?;
        self.signals.update_signals(self.tissue.cells_mut(), self.time)?;
        let report = self.coordinator.step_all(&mut self.tissue, self.time)?;
        self.record_outcomes(&report);

        for (parent, daughter) in self.tissue.divide_ready_cells(self.time) {
            self.events.push((self.step, SimulationEvent::Divided { parent, daughter }));
        }
        for cell in self.tissue.remove_dead(self.time) {
            self.events.push((self.step, SimulationEvent::Removed { cell }));
        }

        self.events.push((
            self.step,
            SimulationEvent::StepComplete {
                step: self.step,
                time: self.time,
                alive: self.tissue.len(),
            },
        ));

        if self.step % self.config.sampling_multiple == 0 {
            self.snapshots.push(TissueSnapshot::capture(
                self.run_id,
                self.step,
                self.time,
                self.tissue.cells(),
            ));
        }
        Ok(report)
    }

    /// Run to the configured end time.
    pub fn run(&mut self) -> Result<RunSummary> {
        if !self.is_set_up {
            self.setup()?;
        }
        let total = self.config.total_steps();
        while self.step < total {
            self.step()?;
        }
        let summary = self.summary();
        info!(
            run = %summary.run_id,
            steps = summary.steps,
            cells = summary.final_counts.total(),
            divisions = summary.divisions,
            removals = summary.removals,
            "simulation complete"
        );
        Ok(summary)
    }

    /// Totals over everything run so far.
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            run_id: self.run_id,
            steps: self.step,
            final_time: self.time,
            final_counts: self.counts(),
            phenotype_changes: 0,
            reinitialisations: 0,
            divisions: 0,
            removals: 0,
        };
        for (_, event) in &self.events {
            match event {
                SimulationEvent::PhenotypeChanged { .. } => summary.phenotype_changes += 1,
                SimulationEvent::CycleReinitialised { .. } => summary.reinitialisations += 1,
                SimulationEvent::Divided { .. } => summary.divisions += 1,
                SimulationEvent::Removed { .. } => summary.removals += 1,
                SimulationEvent::ApoptosisStarted { .. } | SimulationEvent::StepComplete { .. } => {}
            }
        }
        summary
    }

    fn start_scheduled_apoptosis(&mut self) -> Result<()> {
        let now = self.time;
        let split = self
            .apoptosis_schedule
            .partition_point(|(time, _)| *time <= now);
        let due: Vec<(SimTime, CellId)> = self.apoptosis_schedule.drain(..split).collect();
        for (_, cell) in due {
            // Cells removed or never present are skipped.
            match self.tissue.start_apoptosis(cell, self.time) {
                Ok(true) => self.events.push((self.step, SimulationEvent::ApoptosisStarted { cell })),
                Ok(false) => {}
                Err(DeltaError::Data(_)) => debug!(cell = %cell, "scheduled apoptosis for missing cell"),
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    fn record_outcomes(&mut self, report: &StepReport) {
        for outcome in &report.outcomes {
            if outcome.phenotype_changed() {
                self.events.push((
                    self.step,
                    SimulationEvent::PhenotypeChanged {
                        cell: outcome.cell,
                        from: outcome.previous_phenotype,
                        to: outcome.phenotype,
                    },
                ));
            }
            if outcome.reinitialised {
                self.events.push((
                    self.step,
                    SimulationEvent::CycleReinitialised {
                        cell: outcome.cell,
                        capability: outcome.capability,
                    },
                ));
            }
        }
    }
}
