//! Target area — how large each cell is trying to be.
//!
//! The mechanical solver drives every cell's actual area towards its target
//! area. The target depends on phenotype (Delta-high and Delta-low cells have
//! different full sizes), on age (a young cell ramps from half to full size
//! over the growth duration), on division (a cell about to divide is given
//! the half size both daughters should start from) and on apoptosis (a dying
//! cell shrinks linearly).

use crate::cell::Cell;
use crate::cycle::G1Duration;
use crate::error::{ensure_non_negative, DeltaError, Result};
use crate::types::{Phenotype, SimTime};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Cell data key the target area is mirrored under for downstream consumers.
pub const TARGET_AREA_KEY: &str = "target area";

/// Coefficients and growth duration for [`TargetAreaPolicy`].
///
/// Immutable while the population is being stepped; change it between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAreaConfig {
    /// Full-grown target area of a cell with coefficient 1 (default: 1.0).
    #[serde(default = "default_reference_target_area")]
    reference_target_area: f64,
    /// Growth duration override. When unset, each cell's G1 duration is used.
    #[serde(default)]
    growth_duration: Option<f64>,
    /// Multiplier for Delta-high cells (default: 1.0).
    #[serde(default = "default_coefficient")]
    high_phenotype_coefficient: f64,
    /// Multiplier for Delta-low cells (default: 1.0).
    #[serde(default = "default_coefficient")]
    low_phenotype_coefficient: f64,
    /// Multiplier for cells with neither phenotype (default: 1.0).
    #[serde(default = "default_coefficient")]
    default_phenotype_coefficient: f64,
}

fn default_reference_target_area() -> f64 { 1.0 }
fn default_coefficient() -> f64 { 1.0 }

impl Default for TargetAreaConfig {
    fn default() -> Self {
        Self {
            reference_target_area: default_reference_target_area(),
            growth_duration: None,
            high_phenotype_coefficient: default_coefficient(),
            low_phenotype_coefficient: default_coefficient(),
            default_phenotype_coefficient: default_coefficient(),
        }
    }
}

impl TargetAreaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-check every field, e.g. after deserializing.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("reference target area", self.reference_target_area)?;
        if let Some(duration) = self.growth_duration {
            ensure_non_negative("growth duration", duration)?;
        }
        ensure_non_negative("high phenotype coefficient", self.high_phenotype_coefficient)?;
        ensure_non_negative("low phenotype coefficient", self.low_phenotype_coefficient)?;
        ensure_non_negative("default phenotype coefficient", self.default_phenotype_coefficient)?;
        Ok(())
    }

    pub fn reference_target_area(&self) -> f64 {
        self.reference_target_area
    }

    pub fn set_reference_target_area(&mut self, value: f64) -> Result<()> {
        self.reference_target_area = ensure_non_negative("reference target area", value)?;
        Ok(())
    }

    pub fn growth_duration(&self) -> Option<f64> {
        self.growth_duration
    }

    /// Use `value` as the growth duration for every cell, regardless of its
    /// cycle model.
    pub fn set_growth_duration(&mut self, value: f64) -> Result<()> {
        self.growth_duration = Some(ensure_non_negative("growth duration", value)?);
        Ok(())
    }

    /// Go back to deriving the growth duration from each cell's G1 phase.
    pub fn clear_growth_duration(&mut self) {
        self.growth_duration = None;
    }

    pub fn high_phenotype_coefficient(&self) -> f64 {
        self.high_phenotype_coefficient
    }

    pub fn set_high_phenotype_coefficient(&mut self, value: f64) -> Result<()> {
        self.high_phenotype_coefficient = ensure_non_negative("high phenotype coefficient", value)?;
        Ok(())
    }

    pub fn low_phenotype_coefficient(&self) -> f64 {
        self.low_phenotype_coefficient
    }

    pub fn set_low_phenotype_coefficient(&mut self, value: f64) -> Result<()> {
        self.low_phenotype_coefficient = ensure_non_negative("low phenotype coefficient", value)?;
        Ok(())
    }

    pub fn default_phenotype_coefficient(&self) -> f64 {
        self.default_phenotype_coefficient
    }

    pub fn set_default_phenotype_coefficient(&mut self, value: f64) -> Result<()> {
        self.default_phenotype_coefficient =
            ensure_non_negative("default phenotype coefficient", value)?;
        Ok(())
    }

    /// Coefficient applied to the reference area for `phenotype`.
    pub fn coefficient(&self, phenotype: Phenotype) -> f64 {
        match phenotype {
            Phenotype::High => self.high_phenotype_coefficient,
            Phenotype::Low => self.low_phenotype_coefficient,
            Phenotype::None => self.default_phenotype_coefficient,
        }
    }

    /// Named parameter listing for run reports. An unset growth duration is
    /// reported as `None`.
    pub fn parameters(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("ReferenceTargetArea", Some(self.reference_target_area)),
            ("GrowthDuration", self.growth_duration),
            ("DeltaHighPhenotypeTargetAreaCoefficient", Some(self.high_phenotype_coefficient)),
            ("DeltaLowPhenotypeTargetAreaCoefficient", Some(self.low_phenotype_coefficient)),
            ("DefaultPhenotypeTargetAreaCoefficient", Some(self.default_phenotype_coefficient)),
        ]
    }
}

/// Computes and assigns target areas.
#[derive(Debug, Clone, Default)]
pub struct TargetAreaPolicy {
    config: TargetAreaConfig,
}

impl TargetAreaPolicy {
    pub fn new(config: TargetAreaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TargetAreaConfig {
        &self.config
    }

    /// Full-grown target area for a cell of `phenotype`.
    pub fn base_area(&self, phenotype: Phenotype) -> f64 {
        self.config.reference_target_area * self.config.coefficient(phenotype)
    }

    /// Growth duration for `cell`.
    ///
    /// The configured override wins. Otherwise the cell's cycle model must
    /// be phase based; its G1 duration is used, falling back to the transit
    /// G1 duration for cells whose G1 is infinite.
    pub fn growth_duration_for(&self, cell: &Cell) -> Result<f64> {
        if let Some(duration) = self.config.growth_duration {
            return Ok(duration);
        }
        let phase_based = cell
            .cycle_model()
            .as_phase_based()
            .ok_or_else(|| DeltaError::not_phase_based(cell.id()))?;
        Ok(match phase_based.g1_duration() {
            G1Duration::Finite(g1) => g1,
            G1Duration::Infinite => phase_based.transit_cell_g1_duration(),
        })
    }

    /// Target area of `cell` at `now`, without modifying the cell.
    pub fn compute(&self, cell: &Cell, now: SimTime) -> Result<f64> {
        let mut area = self.base_area(cell.phenotype());
        let growth_duration = self.growth_duration_for(cell)?;

        if let Some(apoptosis) = cell.apoptosis() {
            // A cell that started dying before it finished growing shrinks
            // from the size it had reached.
            let age_at_apoptosis = apoptosis.start_time - cell.birth_time();
            if age_at_apoptosis < growth_duration {
                area *= 0.5 * (1.0 + age_at_apoptosis / growth_duration);
            }

            let elapsed = apoptosis.elapsed(now);
            if apoptosis.duration > 0.0 {
                // Reaches half of `area` at the end of apoptosis, not zero.
                area *= 1.0 - 0.5 * elapsed / apoptosis.duration;
            } else if elapsed > 0.0 {
                area = 0.0;
            }
            Ok(area.max(0.0))
        } else {
            let age = cell.age(now);
            if age < growth_duration {
                area *= 0.5 * (1.0 + age / growth_duration);
            } else if cell.is_ready_to_divide() {
                // Daughters inherit this value, so give it the size of a
                // freshly divided cell.
                area *= 0.5;
            }
            Ok(area)
        }
    }

    /// Compute the target area of `cell` and store it on the cell.
    pub fn update_target_area(&self, cell: &mut Cell, now: SimTime) -> Result<f64> {
        let area = self.compute(cell, now)?;
        cell.set_target_area(area);
        cell.data_mut().set(TARGET_AREA_KEY, area);
        trace!(cell = %cell.id(), phenotype = %cell.phenotype(), area, "target area updated");
        Ok(area)
    }
}
