//! Cell-cycle models.
//!
//! A cell-cycle model decides when a cell is ready to divide. The target-area
//! policy only needs one thing from it: the G1 duration, which sets how long
//! a freshly divided cell takes to grow to full size. Models that track
//! phases expose it through [`PhaseBasedCycle`]; models that don't return
//! `None` from [`CellCycleModel::as_phase_based`].
//!
//! Randomness is owned per model (seeded from the run seed and cell id), so
//! stepping cells in parallel needs no shared generator.

use crate::error::{ensure_non_negative, DeltaError, Result};
use crate::types::{ProliferativeCapability, SimTime};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prime used to spread per-cell seeds across the seed space.
const SEED_DERIVATION_PRIME: u64 = 0x9E37_79B9_7F4A_7C15;

/// Derive an independent RNG stream for one cell from the run seed.
pub fn derive_cell_rng(run_seed: u64, cell: u64) -> SmallRng {
    SmallRng::seed_from_u64(run_seed.wrapping_add(cell.wrapping_mul(SEED_DERIVATION_PRIME)))
}

/// Duration of the G1 phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum G1Duration {
    Finite(f64),
    /// Cells that never divide have no finite G1 phase.
    Infinite,
}

/// Getters exposed by phase-based cycle models.
pub trait PhaseBasedCycle {
    /// Current G1 duration, drawn at the last initialisation.
    fn g1_duration(&self) -> G1Duration;

    /// Mean G1 duration for transit cells.
    fn transit_cell_g1_duration(&self) -> f64;
}

/// A cell's cycle model.
pub trait CellCycleModel: Send + Sync + fmt::Debug {
    /// Model name for logging and snapshots.
    fn name(&self) -> &str;

    /// Restart the cycle for a cell that now has `capability`.
    fn initialise(&mut self, capability: ProliferativeCapability, now: SimTime);

    /// Whether a cell governed by this model should divide at `now`.
    fn ready_to_divide(&self, now: SimTime) -> bool;

    /// Create the daughter's cycle model at division, along with the
    /// capability the daughter starts with. The daughter model is already
    /// initialised at `now`.
    fn create_daughter(&mut self, now: SimTime) -> (Box<dyn CellCycleModel>, ProliferativeCapability);

    /// Phase-based view of this model, if it has one.
    fn as_phase_based(&self) -> Option<&dyn PhaseBasedCycle> {
        None
    }

    fn is_phase_based(&self) -> bool {
        self.as_phase_based().is_some()
    }
}

/// Phase durations and daughter fate for [`StochasticG1CycleModel`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Mean G1 duration of proliferative (stem) cells (default: 14.0).
    #[serde(default = "default_stem_g1")]
    pub stem_cell_g1_duration: f64,
    /// Mean G1 duration of transit cells (default: 2.0).
    #[serde(default = "default_transit_g1")]
    pub transit_cell_g1_duration: f64,
    /// S phase duration (default: 5.0).
    #[serde(default = "default_s")]
    pub s_duration: f64,
    /// G2 phase duration (default: 4.0).
    #[serde(default = "default_g2")]
    pub g2_duration: f64,
    /// M phase duration (default: 1.0).
    #[serde(default = "default_m")]
    pub m_duration: f64,
    /// Probability a daughter starts differentiated (default: 0.75).
    #[serde(default = "default_daughter_differentiation")]
    pub daughter_differentiation_probability: f64,
}

fn default_stem_g1() -> f64 { 14.0 }
fn default_transit_g1() -> f64 { 2.0 }
fn default_s() -> f64 { 5.0 }
fn default_g2() -> f64 { 4.0 }
fn default_m() -> f64 { 1.0 }
fn default_daughter_differentiation() -> f64 { 0.75 }

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            stem_cell_g1_duration: default_stem_g1(),
            transit_cell_g1_duration: default_transit_g1(),
            s_duration: default_s(),
            g2_duration: default_g2(),
            m_duration: default_m(),
            daughter_differentiation_probability: default_daughter_differentiation(),
        }
    }
}

impl CycleConfig {
    /// Check every duration is non-negative and the probability is in [0, 1].
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("stem cell G1 duration", self.stem_cell_g1_duration)?;
        ensure_non_negative("transit cell G1 duration", self.transit_cell_g1_duration)?;
        ensure_non_negative("S duration", self.s_duration)?;
        ensure_non_negative("G2 duration", self.g2_duration)?;
        ensure_non_negative("M duration", self.m_duration)?;
        let p = self.daughter_differentiation_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(DeltaError::invalid_config(
                "daughter_differentiation_probability",
                p.to_string(),
                "must be within [0, 1]",
            ));
        }
        Ok(())
    }

    /// Combined S, G2 and M duration.
    pub fn sg2m_duration(&self) -> f64 {
        self.s_duration + self.g2_duration + self.m_duration
    }
}

/// Phase-based model with an exponentially distributed G1 phase.
///
/// Proliferative cells draw G1 with the stem-cell mean; differentiated cells
/// have an infinite G1 and never divide. Daughters start differentiated with
/// the configured probability.
#[derive(Debug, Clone)]
pub struct StochasticG1CycleModel {
    config: CycleConfig,
    rng: SmallRng,
    g1: G1Duration,
    cycle_start: SimTime,
}

impl StochasticG1CycleModel {
    pub fn new(config: CycleConfig, rng: SmallRng) -> Self {
        Self {
            config,
            rng,
            g1: G1Duration::Infinite,
            cycle_start: 0.0,
        }
    }

    pub fn config(&self) -> &CycleConfig {
        &self.config
    }

    /// Time at which the current cycle started.
    pub fn cycle_start(&self) -> SimTime {
        self.cycle_start
    }

    fn draw_g1(&mut self, capability: ProliferativeCapability) -> G1Duration {
        match capability {
            ProliferativeCapability::Proliferative => {
                // 1 - U lies in (0, 1], so the log is finite.
                let uniform = 1.0 - self.rng.gen::<f64>();
                G1Duration::Finite(-uniform.ln() * self.config.stem_cell_g1_duration)
            }
            ProliferativeCapability::Differentiated => G1Duration::Infinite,
        }
    }
}

impl PhaseBasedCycle for StochasticG1CycleModel {
    fn g1_duration(&self) -> G1Duration {
        self.g1
    }

    fn transit_cell_g1_duration(&self) -> f64 {
        self.config.transit_cell_g1_duration
    }
}

impl CellCycleModel for StochasticG1CycleModel {
    fn name(&self) -> &str {
        "stochastic-g1"
    }

    fn initialise(&mut self, capability: ProliferativeCapability, now: SimTime) {
        self.g1 = self.draw_g1(capability);
        self.cycle_start = now;
    }

    fn ready_to_divide(&self, now: SimTime) -> bool {
        match self.g1 {
            G1Duration::Finite(g1) => now - self.cycle_start >= g1 + self.config.sg2m_duration(),
            G1Duration::Infinite => false,
        }
    }

    fn create_daughter(&mut self, now: SimTime) -> (Box<dyn CellCycleModel>, ProliferativeCapability) {
        let capability = if self.rng.gen::<f64>() < self.config.daughter_differentiation_probability {
            ProliferativeCapability::Differentiated
        } else {
            ProliferativeCapability::Proliferative
        };
        let seed: u64 = self.rng.gen();
        let mut daughter = StochasticG1CycleModel::new(self.config, SmallRng::seed_from_u64(seed));
        daughter.initialise(capability, now);
        (Box::new(daughter), capability)
    }

    fn as_phase_based(&self) -> Option<&dyn PhaseBasedCycle> {
        Some(self)
    }
}

/// Model with a fixed total cycle time and no phase structure.
///
/// Useful when growth should follow an explicit growth duration; it cannot
/// supply a G1 duration of its own.
#[derive(Debug, Clone)]
pub struct FixedCycleModel {
    cycle_duration: f64,
    capability: ProliferativeCapability,
    cycle_start: SimTime,
}

impl FixedCycleModel {
    pub fn new(cycle_duration: f64) -> Result<Self> {
        Ok(Self {
            cycle_duration: ensure_non_negative("cycle duration", cycle_duration)?,
            capability: ProliferativeCapability::Differentiated,
            cycle_start: 0.0,
        })
    }

    pub fn cycle_duration(&self) -> f64 {
        self.cycle_duration
    }
}

impl CellCycleModel for FixedCycleModel {
    fn name(&self) -> &str {
        "fixed"
    }

    fn initialise(&mut self, capability: ProliferativeCapability, now: SimTime) {
        self.capability = capability;
        self.cycle_start = now;
    }

    fn ready_to_divide(&self, now: SimTime) -> bool {
        self.capability.is_proliferative() && now - self.cycle_start >= self.cycle_duration
    }

    fn create_daughter(&mut self, now: SimTime) -> (Box<dyn CellCycleModel>, ProliferativeCapability) {
        let mut daughter = self.clone();
        daughter.initialise(self.capability, now);
        (Box::new(daughter), self.capability)
    }
}
