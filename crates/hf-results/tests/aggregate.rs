use hf_components::{LinkStatus, TankStatus};
use hf_network::{
    JunctionRecord, Network, NetworkRecords, PipeRecord, PumpRecord, ReservoirRecord, RunOptions,
    TankRecord, build_topology,
};
use hf_results::{Aggregator, ResultsError, RunResults, load_json, save_json};
use hf_sim::{GradientSolver, run_extended_period};

fn pipe(id: &str, from: &str, to: &str) -> PipeRecord {
    PipeRecord {
        id: id.into(),
        from_node_id: from.into(),
        to_node_id: to.into(),
        length_m: 100.0,
        diameter_m: 0.2,
        roughness: 120.0,
        status: LinkStatus::Open,
    }
}

fn junction(id: &str, elevation_m: f64, demand: f64) -> JunctionRecord {
    JunctionRecord {
        id: id.into(),
        elevation_m,
        base_demand_m3s: demand,
        inactive: false,
    }
}

fn single_pipe() -> Network {
    build_topology(&NetworkRecords {
        junctions: vec![junction("J1", 50.0, 0.1)],
        reservoirs: vec![ReservoirRecord {
            id: "R1".into(),
            head_m: 100.0,
            inactive: false,
        }],
        pipes: vec![pipe("P1", "R1", "J1")],
        ..Default::default()
    })
    .unwrap()
}

fn with_tank_and_pump() -> Network {
    build_topology(&NetworkRecords {
        junctions: vec![junction("J1", 40.0, 0.02)],
        reservoirs: vec![ReservoirRecord {
            id: "R1".into(),
            head_m: 60.0,
            inactive: false,
        }],
        tanks: vec![TankRecord {
            id: "T1".into(),
            elevation_m: 70.0,
            init_level_m: 2.0,
            min_level_m: 0.0,
            max_level_m: 5.0,
            diameter_m: 10.0,
            inactive: false,
        }],
        pipes: vec![pipe("P1", "T1", "J1")],
        pumps: vec![PumpRecord {
            id: "PU1".into(),
            from_node_id: "R1".into(),
            to_node_id: "T1".into(),
            head_gain_m: 20.0,
            status: LinkStatus::Open,
        }],
        ..Default::default()
    })
    .unwrap()
}

fn aggregate(net: &Network, options: RunOptions) -> RunResults {
    let record = run_extended_period(net, options, GradientSolver::default()).unwrap();
    Aggregator::from_record(net, &record, "internal").unwrap()
}

#[test]
fn single_pipe_series_cover_every_step() {
    let net = single_pipe();
    let results = aggregate(&net, RunOptions::default());

    assert_eq!(results.engine, "internal");
    assert_eq!(results.time_steps.len(), 24);
    assert_eq!(results.time_steps[0], "0:00");
    assert_eq!(results.time_steps[23], "23:00");

    let pressure = &results.nodes.pressure["J1"];
    assert_eq!(pressure.len(), 24);
    assert!((pressure[0] - 44.8).abs() < 0.5, "pressure {}", pressure[0]);
    assert!(!results.nodes.pressure.contains_key("R1"));
    assert_eq!(results.nodes.head["R1"][0], 100.0);

    let flow = &results.links.flow["P1"];
    assert!(flow.iter().all(|q| (q - 0.1).abs() < 1e-4));

    let area = std::f64::consts::PI * 0.2 * 0.2 / 4.0;
    let v = results.links.velocity["P1"][0];
    assert!((v - 0.1 / area).abs() < 1e-3, "velocity {v}");

    let hl = results.links.headloss["P1"][0];
    assert!((hl - 5.2).abs() < 0.3, "headloss {hl}");
}

#[test]
fn stats_summarise_the_series() {
    let net = single_pipe();
    let results = aggregate(&net, RunOptions::default());
    let stats = &results.stats;

    assert_eq!(stats.duration_hours, 24);
    assert!(stats.pressure.min <= stats.pressure.avg);
    assert!(stats.pressure.avg <= stats.pressure.max);
    assert!((stats.flow.max - 0.1).abs() < 1e-4);
    assert!(stats.velocity.min >= 0.0);
}

#[test]
fn pattern_runs_vary_flow_over_the_day() {
    let net = single_pipe();
    let options = RunOptions {
        use_demand_pattern: true,
        ..RunOptions::default()
    };
    let results = aggregate(&net, options);
    let flow = &results.links.flow["P1"];
    let (min, max) = flow
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), q| (lo.min(*q), hi.max(*q)));
    assert!(max > min + 1e-3);
    assert!((results.stats.flow.max - max).abs() < 1e-12);
}

#[test]
fn tank_and_pump_series_are_reported() {
    let net = with_tank_and_pump();
    let results = aggregate(&net, RunOptions::default());

    let level = &results.tanks.level["T1"];
    let status = &results.tanks.status["T1"];
    assert_eq!(level.len(), 24);
    assert_eq!(status.len(), 24);
    assert_eq!(level[0], 2.0);
    assert!(level.iter().all(|l| (0.0..=5.0).contains(l)));
    assert_ne!(status[0], TankStatus::Empty);

    // Tank pressure is the level it was solved with.
    let pressure = &results.nodes.pressure["T1"];
    assert!((pressure[0] - level[0]).abs() < 1e-9);

    // The pump has no cross-section to report a velocity against.
    assert!(results.links.velocity["PU1"].iter().all(|v| *v == 0.0));
    assert!(results.links.flow["PU1"][0] > 0.0);
}

#[test]
fn completeness_check_rejects_short_series() {
    let net = single_pipe();
    let mut results = aggregate(&net, RunOptions::default());
    results.check_complete().unwrap();

    results.links.flow.get_mut("P1").unwrap().pop();
    match results.check_complete() {
        Err(ResultsError::Incomplete {
            series,
            id,
            expected,
            found,
        }) => {
            assert_eq!(series, "links.flow");
            assert_eq!(id, "P1");
            assert_eq!(expected, 24);
            assert_eq!(found, 23);
        }
        other => panic!("expected Incomplete, got {other:?}"),
    }
}

#[test]
fn completeness_check_rejects_non_finite_values() {
    let net = single_pipe();
    let mut results = aggregate(&net, RunOptions::default());
    results.nodes.pressure.get_mut("J1").unwrap()[3] = f64::NAN;
    assert!(matches!(
        results.check_complete(),
        Err(ResultsError::NonFinite { step: 3, .. })
    ));
}

#[test]
fn empty_aggregation_is_an_error() {
    let net = single_pipe();
    let agg = Aggregator::new(&net, 24, "internal");
    assert_eq!(agg.step_count(), 0);
    assert!(matches!(agg.finish(), Err(ResultsError::Empty)));
}

#[test]
fn results_survive_a_json_file() {
    let net = with_tank_and_pump();
    let results = aggregate(&net, RunOptions::default());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    save_json(&path, &results).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(loaded.time_steps, results.time_steps);
    assert_eq!(loaded.tanks.status, results.tanks.status);
    assert_eq!(loaded.links.flow.keys().collect::<Vec<_>>(), vec!["P1", "PU1"]);
    assert_eq!(loaded.stats.duration_hours, 24);
}

#[test]
fn loaded_file_with_short_tank_levels_is_rejected() {
    let net = with_tank_and_pump();
    let mut results = aggregate(&net, RunOptions::default());
    results.tanks.level.get_mut("T1").unwrap().truncate(20);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    std::fs::write(&path, serde_json::to_string(&results).unwrap()).unwrap();
    match load_json(&path) {
        Err(ResultsError::Incomplete {
            series, id, found, ..
        }) => {
            assert_eq!(series, "tanks.level");
            assert_eq!(id, "T1");
            assert_eq!(found, 20);
        }
        other => panic!("expected Incomplete, got {other:?}"),
    }
}

#[test]
fn malformed_json_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(load_json(&path), Err(ResultsError::Json(_))));
}
