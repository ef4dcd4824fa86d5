//! Integration tests — full tissue simulation.

use deltanotch_runtime::prelude::*;

fn coordinator() -> PhenotypeCoordinator {
    let mut config = TargetAreaConfig::new();
    config.set_high_phenotype_coefficient(1.5).unwrap();
    config.set_low_phenotype_coefficient(0.7).unwrap();
    PhenotypeCoordinator::new(TargetAreaPolicy::new(config).unwrap())
}

fn fast_cycle() -> CycleConfig {
    CycleConfig {
        stem_cell_g1_duration: 1.0,
        transit_cell_g1_duration: 0.5,
        s_duration: 0.5,
        g2_duration: 0.5,
        m_duration: 0.5,
        ..CycleConfig::default()
    }
}

fn build(seed: u64, parallel: bool) -> Simulation {
    let mut tissue = Tissue::new(seed, fast_cycle()).unwrap();
    let high = tissue.add_cell(-2.0);
    let low = tissue.add_cell(-2.0);
    let flicker = tissue.add_cell(-2.0);
    let doomed = tissue.add_cell(-2.0);

    let signals = ScriptedSignals::new()
        .with_schedule(high, DeltaSchedule::constant(0.9).unwrap())
        .with_schedule(low, DeltaSchedule::constant(0.1).unwrap())
        .with_schedule(
            flicker,
            DeltaSchedule::new(vec![(0.0, 0.65), (2.0, 0.15), (4.0, 0.65)]).unwrap(),
        )
        .with_schedule(doomed, DeltaSchedule::constant(0.4).unwrap());

    let config = SimulationConfig {
        dt: 0.1,
        end_time: 6.0,
        seed,
        parallel,
        sampling_multiple: 5,
        apoptosis_duration: 0.5,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(config, tissue, Box::new(signals), coordinator()).unwrap();
    sim.schedule_apoptosis(doomed, 1.0);
    sim
}

#[test]
fn full_run_produces_all_event_types() {
    let mut sim = build(7, true);
    let summary = sim.run().unwrap();

    assert_eq!(summary.steps, 60);
    assert!(summary.phenotype_changes >= 4);
    assert!(summary.reinitialisations >= 3);
    assert_eq!(summary.removals, 1);
    assert!(summary.divisions >= 1, "the Delta-high cell should have divided");

    let has = |pred: fn(&SimulationEvent) -> bool| sim.events().iter().any(|(_, e)| pred(e));
    assert!(has(|e| matches!(e, SimulationEvent::ApoptosisStarted { .. })));
    assert!(has(|e| matches!(e, SimulationEvent::Removed { .. })));
    assert!(has(|e| matches!(e, SimulationEvent::Divided { .. })));
    assert!(has(|e| matches!(e, SimulationEvent::CycleReinitialised { .. })));
}

#[test]
fn every_cell_carries_a_target_area_after_each_step() {
    let mut sim = build(3, false);
    for _ in 0..30 {
        let report = sim.step().unwrap();
        for outcome in &report.outcomes {
            assert!(outcome.target_area >= 0.0);
        }
    }
    for cell in sim.tissue().cells() {
        assert!(cell.data().contains(TARGET_AREA_KEY));
        assert!(cell.data().contains(DELTA_KEY));
    }
}

#[test]
fn flickering_cell_follows_its_script() {
    let mut sim = build(5, true);
    let flicker = CellId::new(2);
    let mut seen = Vec::new();
    for _ in 0..60 {
        sim.step().unwrap();
        let phenotype = sim.tissue().get(flicker).unwrap().phenotype();
        if seen.last() != Some(&phenotype) {
            seen.push(phenotype);
        }
    }
    assert_eq!(seen, vec![Phenotype::High, Phenotype::Low, Phenotype::High]);
}

#[test]
fn same_seed_same_population() {
    let a = build(21, true).run().unwrap();
    let b = build(21, false).run().unwrap();
    assert_eq!(a.final_counts, b.final_counts);
    assert_eq!(a.divisions, b.divisions);
}

#[test]
fn snapshots_serialize_to_json() {
    let mut sim = build(1, true);
    sim.run().unwrap();
    // setup + every fifth of sixty steps
    assert_eq!(sim.snapshots().len(), 13);

    let last = sim.snapshots().last().unwrap();
    let json = serde_json::to_string(last).unwrap();
    assert!(json.contains("\"counts\""));
    assert_eq!(last.counts.total(), last.cells.len());
}
