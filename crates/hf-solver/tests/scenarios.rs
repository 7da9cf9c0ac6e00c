//! Hand-checkable solver scenarios.

use hf_components::LinkStatus;
use hf_network::{
    JunctionRecord, Network, NetworkRecords, PipeRecord, PumpRecord, ReservoirRecord, TankRecord,
    build_topology,
};
use hf_solver::{
    Conditions, InitializationStrategy, SolverConfig, SolverError, solve, solve_with_progress,
};

fn junction(id: &str, elevation_m: f64, demand: f64) -> JunctionRecord {
    JunctionRecord {
        id: id.into(),
        elevation_m,
        base_demand_m3s: demand,
        inactive: false,
    }
}

fn reservoir(id: &str, head_m: f64) -> ReservoirRecord {
    ReservoirRecord {
        id: id.into(),
        head_m,
        inactive: false,
    }
}

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

fn single_pipe() -> Network {
    build_topology(&NetworkRecords {
        junctions: vec![junction("J1", 50.0, 0.1)],
        reservoirs: vec![reservoir("R1", 100.0)],
        pipes: vec![pipe("P1", "R1", "J1")],
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn single_pipe_from_reservoir() {
    let net = single_pipe();
    let sol = solve(&net, &Conditions::initial(&net), &SolverConfig::default(), None).unwrap();

    let p1 = net.graph().find_link("P1").unwrap();
    let j1 = net.graph().find_node("J1").unwrap();
    let q = sol.flow(p1).unwrap().value;
    let hl = sol.headlosses[p1.slot()].value;
    let pressure = sol.head(j1).unwrap().value - 50.0;

    assert!((q - 0.1).abs() < 1e-6, "flow {q}");
    // 10.67 * 100 * 0.1^1.85 / (120^1.85 * 0.2^4.87)
    assert!((hl - 5.4408).abs() < 1e-3, "headloss {hl}");
    assert!((hl - 5.2).abs() < 0.3);
    assert!((pressure - 44.8).abs() < 0.5, "pressure {pressure}");
    assert!(sol.iterations <= 5);
}

#[test]
fn dead_end_without_demand_carries_no_flow() {
    let net = build_topology(&NetworkRecords {
        junctions: vec![junction("J1", 50.0, 0.05), junction("J2", 40.0, 0.0)],
        reservoirs: vec![reservoir("R1", 100.0)],
        pipes: vec![pipe("P1", "R1", "J1"), pipe("P2", "J1", "J2")],
        ..Default::default()
    })
    .unwrap();
    let sol = solve(&net, &Conditions::initial(&net), &SolverConfig::default(), None).unwrap();
    let p2 = net.graph().find_link("P2").unwrap();
    assert!(sol.flow(p2).unwrap().value.abs() < 1e-9);

    // no flow, no loss: the dead end sits at the upstream head
    let j1 = net.graph().find_node("J1").unwrap();
    let j2 = net.graph().find_node("J2").unwrap();
    let dh = sol.head(j1).unwrap().value - sol.head(j2).unwrap().value;
    assert!(dh.abs() < 1e-3, "head difference {dh}");
}

#[test]
fn disconnected_junctions_are_named() {
    let net = build_topology(&NetworkRecords {
        junctions: vec![
            junction("J1", 50.0, 0.01),
            junction("J2", 50.0, 0.01),
            junction("J3", 50.0, 0.0),
        ],
        reservoirs: vec![reservoir("R1", 100.0)],
        pipes: vec![pipe("P1", "R1", "J1"), pipe("P2", "J2", "J3")],
        ..Default::default()
    })
    .unwrap();
    let err = solve(&net, &Conditions::initial(&net), &SolverConfig::default(), None).unwrap_err();
    assert_eq!(
        err,
        SolverError::Unsolvable {
            orphaned: vec!["J2".to_string(), "J3".to_string()]
        }
    );
    assert_eq!(err.offending_ids().len(), 2);
}

#[test]
fn closed_pipe_cuts_off_supply() {
    let mut p1 = pipe("P1", "R1", "J1");
    p1.status = LinkStatus::Closed;
    let net = build_topology(&NetworkRecords {
        junctions: vec![junction("J1", 50.0, 0.01)],
        reservoirs: vec![reservoir("R1", 100.0)],
        pipes: vec![p1],
        ..Default::default()
    })
    .unwrap();
    let err = solve(&net, &Conditions::initial(&net), &SolverConfig::default(), None).unwrap_err();
    assert!(matches!(err, SolverError::Unsolvable { ref orphaned } if orphaned == &["J1"]));
}

#[test]
fn iteration_cap_reports_residual() {
    let net = single_pipe();
    let config = SolverConfig {
        max_iterations: 1,
        ..SolverConfig::default()
    };
    match solve(&net, &Conditions::initial(&net), &config, None).unwrap_err() {
        SolverError::Convergence {
            iterations,
            residual,
        } => {
            assert_eq!(iterations, 1);
            assert!(residual > config.flow_tolerance);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn tank_head_follows_its_level() {
    let net = build_topology(&NetworkRecords {
        junctions: vec![junction("J1", 20.0, 0.0)],
        tanks: vec![TankRecord {
            id: "T1".into(),
            elevation_m: 40.0,
            init_level_m: 3.0,
            min_level_m: 0.0,
            max_level_m: 6.0,
            diameter_m: 10.0,
            inactive: false,
        }],
        pipes: vec![pipe("P1", "T1", "J1")],
        ..Default::default()
    })
    .unwrap();
    let t1 = net.graph().find_node("T1").unwrap();
    let j1 = net.graph().find_node("J1").unwrap();
    let config = SolverConfig::default();

    let sol = solve(&net, &Conditions::initial(&net), &config, None).unwrap();
    assert!((sol.head(j1).unwrap().value - 43.0).abs() < 1e-3);

    let mut conditions = Conditions::initial(&net);
    conditions.set_tank_level(t1, hf_core::units::m(5.0));
    let sol = solve(&net, &conditions, &config, None).unwrap();
    assert!((sol.head(j1).unwrap().value - 45.0).abs() < 1e-3);
}

#[test]
fn pump_lifts_head() {
    let net = build_topology(&NetworkRecords {
        junctions: vec![junction("J1", 50.0, 0.05)],
        reservoirs: vec![reservoir("R1", 100.0)],
        pumps: vec![PumpRecord {
            id: "PU1".into(),
            from_node_id: "R1".into(),
            to_node_id: "J1".into(),
            head_gain_m: 20.0,
            status: LinkStatus::Open,
        }],
        ..Default::default()
    })
    .unwrap();
    let sol = solve(&net, &Conditions::initial(&net), &SolverConfig::default(), None).unwrap();
    let j1 = net.graph().find_node("J1").unwrap();
    let head = sol.head(j1).unwrap().value;
    assert!((head - 120.0).abs() < 0.01, "head {head}");
}

#[test]
fn demand_multiplier_scales_flow() {
    let net = single_pipe();
    let conditions = Conditions::initial(&net).with_multiplier(0.5);
    let sol = solve(&net, &conditions, &SolverConfig::default(), None).unwrap();
    let p1 = net.graph().find_link("P1").unwrap();
    assert!((sol.flow(p1).unwrap().value - 0.05).abs() < 1e-6);
}

#[test]
fn warm_start_reuses_flows() {
    let net = single_pipe();
    let config = SolverConfig::default();
    let conditions = Conditions::initial(&net);
    let cold = solve(&net, &conditions, &config, None).unwrap();
    assert_eq!(cold.initialization, InitializationStrategy::NominalVelocity);

    let warm = solve(&net, &conditions, &config, Some(&cold)).unwrap();
    assert_eq!(warm.initialization, InitializationStrategy::WarmStart);
    assert!(warm.iterations <= cold.iterations);
}

#[test]
fn progress_sees_every_iteration() {
    let net = single_pipe();
    let mut seen = Vec::new();
    let mut record = |e: hf_solver::IterationEvent| seen.push(e.iteration);
    let sol = solve_with_progress(
        &net,
        &Conditions::initial(&net),
        &SolverConfig::default(),
        None,
        Some(&mut record),
    )
    .unwrap();
    assert_eq!(seen, (1..=sol.iterations).collect::<Vec<_>>());
}

fn tank(id: &str, elevation_m: f64, init_level_m: f64) -> TankRecord {
    TankRecord {
        id: id.into(),
        elevation_m,
        init_level_m,
        min_level_m: 0.0,
        max_level_m: 10.0,
        diameter_m: 15.0,
        inactive: false,
    }
}

fn main_pipe(id: &str, from: &str, to: &str) -> PipeRecord {
    PipeRecord {
        length_m: 1000.0,
        diameter_m: 0.3,
        ..pipe(id, from, to)
    }
}

#[test]
fn reservoir_feeding_tank_directly_balances_energy() {
    let direct = NetworkRecords {
        reservoirs: vec![reservoir("R", 100.0)],
        tanks: vec![tank("T", 60.0, 5.0)],
        pipes: vec![main_pipe("P1", "R", "T")],
        ..Default::default()
    };
    let mut with_side_junction = direct.clone();
    with_side_junction.junctions.push(junction("J1", 40.0, 0.01));
    with_side_junction.pipes.push(pipe("P2", "R", "J1"));

    let config = SolverConfig::default();
    for records in [direct, with_side_junction] {
        let net = build_topology(&records).unwrap();
        let sol = solve(&net, &Conditions::initial(&net), &config, None).unwrap();
        let p1 = net.graph().find_link("P1").unwrap();

        // the full 35 m difference is spent along the main
        let hl = sol.headlosses[p1.slot()].value;
        assert!((hl - 35.0).abs() < 1e-3, "headloss {hl}");
        assert!(sol.link_energy_error(&net) < 1e-3);
        assert!(sol.residual < config.flow_tolerance, "residual {}", sol.residual);
        assert!(sol.flow(p1).unwrap().value > 0.0);
    }
}

#[test]
fn large_grid_solves() {
    let k = 40;
    let name = |r: usize, c: usize| format!("J{r}_{c}");
    let mut records = NetworkRecords {
        reservoirs: vec![reservoir("R1", 150.0)],
        ..Default::default()
    };
    for r in 0..k {
        for c in 0..k {
            records.junctions.push(junction(&name(r, c), 10.0, 1e-4));
            if c + 1 < k {
                records
                    .pipes
                    .push(main_pipe(&format!("H{r}_{c}"), &name(r, c), &name(r, c + 1)));
            }
            if r + 1 < k {
                records
                    .pipes
                    .push(main_pipe(&format!("V{r}_{c}"), &name(r, c), &name(r + 1, c)));
            }
        }
    }
    records.pipes.push(main_pipe("PR", "R1", &name(0, 0)));
    let net = build_topology(&records).unwrap();

    let sol = solve(&net, &Conditions::initial(&net), &SolverConfig::default(), None).unwrap();
    assert!(sol.mass_balance_error(&net) < 1e-6);
    assert!(sol.link_energy_error(&net) < 1e-2);
}
