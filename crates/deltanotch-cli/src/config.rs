//! Scenario files for the Delta-Notch CLI.

use anyhow::{Context, Result};
use deltanotch_runtime::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up by [`Scenario::load`].
pub const SCENARIO_FILE: &str = "deltanotch.toml";

/// A complete runnable scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub target_area: TargetAreaConfig,
    #[serde(default)]
    pub cycle: CycleConfig,
    #[serde(default = "default_cells")]
    pub cells: Vec<CellSpec>,
}

/// An initial cell and the Delta level scripted for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellSpec {
    #[serde(default)]
    pub birth_time: f64,
    /// Time at which the cell starts apoptosis, if ever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apoptosis_at: Option<f64>,
    /// Piecewise-constant Delta level.
    pub delta: Vec<DeltaPoint>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeltaPoint {
    /// Time from which `level` applies.
    #[serde(default)]
    pub from: f64,
    pub level: f64,
}

impl CellSpec {
    fn constant(birth_time: f64, level: f64) -> Self {
        Self {
            birth_time,
            apoptosis_at: None,
            delta: vec![DeltaPoint { from: 0.0, level }],
        }
    }

    fn schedule(&self) -> Result<DeltaSchedule> {
        let points = self.delta.iter().map(|p| (p.from, p.level)).collect();
        Ok(DeltaSchedule::new(points)?)
    }
}

// Default value functions
fn default_cells() -> Vec<CellSpec> {
    vec![
        CellSpec::constant(-4.0, 0.9),
        CellSpec::constant(-4.0, 0.1),
        CellSpec {
            birth_time: -4.0,
            apoptosis_at: None,
            delta: vec![
                DeltaPoint { from: 0.0, level: 0.65 },
                DeltaPoint { from: 10.0, level: 0.15 },
                DeltaPoint { from: 20.0, level: 0.65 },
            ],
        },
        CellSpec {
            apoptosis_at: Some(15.0),
            ..CellSpec::constant(-4.0, 0.4)
        },
    ]
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            target_area: TargetAreaConfig::default(),
            cycle: CycleConfig::default(),
            cells: default_cells(),
        }
    }
}

impl Scenario {
    /// Load `path`, or the nearest deltanotch.toml in the current or parent
    /// directories, or the default scenario if neither exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path.map(Path::to_path_buf).or_else(find_scenario_file) {
            Some(path) => Self::from_file(&path),
            None => Ok(Scenario::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario: {}", path.display()))?;
        let scenario: Scenario = toml::from_str(&content)
            .with_context(|| format!("Failed to parse scenario: {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario: {}", path.display()))?;
        Ok(scenario)
    }

    /// Save scenario to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write scenario: {}", path.display()))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize scenario")
    }

    /// Generate the default scenario as a TOML string.
    pub fn default_toml() -> Result<String> {
        Scenario::default().to_toml()
    }

    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        self.target_area.validate()?;
        self.cycle.validate()?;
        for (idx, cell) in self.cells.iter().enumerate() {
            cell.schedule()
                .with_context(|| format!("cells[{idx}] has an invalid delta schedule"))?;
        }
        Ok(())
    }

    /// Build a ready-to-run simulation. `serial` overrides the configured
    /// parallelism.
    pub fn build(&self, serial: bool) -> Result<Simulation> {
        self.validate()?;
        let mut tissue = Tissue::new(self.simulation.seed, self.cycle)?;
        let mut signals = ScriptedSignals::new();
        let mut apoptosis = Vec::new();
        for cell in &self.cells {
            let id = tissue.add_cell(cell.birth_time);
            signals.insert(id, cell.schedule()?);
            if let Some(at) = cell.apoptosis_at {
                apoptosis.push((id, at));
            }
        }

        let mut config = self.simulation.clone();
        if serial {
            config.parallel = false;
        }
        let policy = TargetAreaPolicy::new(self.target_area.clone())?;
        let mut sim = Simulation::new(
            config,
            tissue,
            Box::new(signals),
            PhenotypeCoordinator::new(policy),
        )?;
        for (id, at) in apoptosis {
            sim.schedule_apoptosis(id, at);
        }
        Ok(sim)
    }
}

/// Find deltanotch.toml in current or parent directories.
fn find_scenario_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let candidate = dir.join(SCENARIO_FILE);
        if candidate.exists() {
            return Some(candidate);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario_survives_a_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SCENARIO_FILE);
        Scenario::default().save(&path).unwrap();

        let loaded = Scenario::load(Some(&path)).unwrap();
        assert_eq!(loaded.cells.len(), 4);
        assert_eq!(loaded.cells[3].apoptosis_at, Some(15.0));
        assert_eq!(loaded.simulation, SimulationConfig::default());
        assert_eq!(loaded.target_area, TargetAreaConfig::default());
    }

    #[test]
    fn missing_sections_take_defaults() {
        let scenario: Scenario = toml::from_str(
            r#"
            [target_area]
            growth_duration = 12.0
            high_phenotype_coefficient = 1.5

            [[cells]]
            delta = [{ level = 0.7 }]
            "#,
        )
        .unwrap();
        assert_eq!(scenario.target_area.growth_duration(), Some(12.0));
        assert_eq!(scenario.target_area.high_phenotype_coefficient(), 1.5);
        assert_eq!(scenario.target_area.low_phenotype_coefficient(), 1.0);
        assert_eq!(scenario.cycle, CycleConfig::default());
        assert_eq!(scenario.cells.len(), 1);
        assert_eq!(scenario.cells[0].birth_time, 0.0);
    }

    #[test]
    fn negative_coefficient_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SCENARIO_FILE);
        std::fs::write(&path, "[target_area]\nlow_phenotype_coefficient = -0.5\n").unwrap();
        let err = Scenario::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("negative"), "{err:#}");
    }

    #[test]
    fn empty_delta_schedule_is_rejected() {
        let scenario = Scenario {
            cells: vec![CellSpec {
                birth_time: 0.0,
                apoptosis_at: None,
                delta: vec![],
            }],
            ..Scenario::default()
        };
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn built_simulation_runs() {
        let mut scenario = Scenario::default();
        scenario.simulation.end_time = 1.0;
        let mut sim = scenario.build(true).unwrap();
        assert!(!sim.config().parallel);
        let summary = sim.run().unwrap();
        assert_eq!(summary.steps, 20);
        assert_eq!(summary.final_counts.high, 2);
        assert_eq!(summary.final_counts.low, 1);
        assert_eq!(summary.final_counts.none, 1);
    }
}
