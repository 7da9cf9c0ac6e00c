use hf_components::{LinkStatus, TankStatus};
use hf_network::{
    DemandPattern, JunctionRecord, Network, NetworkRecords, PipeRecord, ReservoirRecord,
    RunOptions, TankRecord, TimeStep, build_topology,
};
use hf_sim::{
    CancelToken, Controller, GradientSolver, RunPhase, SimError, StepSolver, run_extended_period,
};
use hf_solver::{Conditions, HydraulicSolution, SolverError, SolverResult};
use proptest::prelude::*;

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
        junctions: vec![JunctionRecord {
            id: "J1".into(),
            elevation_m: 50.0,
            base_demand_m3s: 0.1,
            inactive: false,
        }],
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

fn reservoir_tank_junction(head_m: f64, tank_diameter_m: f64, demand: f64) -> Network {
    build_topology(&NetworkRecords {
        junctions: vec![JunctionRecord {
            id: "J1".into(),
            elevation_m: 40.0,
            base_demand_m3s: demand,
            inactive: false,
        }],
        reservoirs: vec![ReservoirRecord {
            id: "R1".into(),
            head_m,
            inactive: false,
        }],
        tanks: vec![TankRecord {
            id: "T1".into(),
            elevation_m: 80.0,
            init_level_m: 3.0,
            min_level_m: 0.5,
            max_level_m: 6.0,
            diameter_m: tank_diameter_m,
            inactive: false,
        }],
        pipes: vec![pipe("P1", "R1", "T1"), pipe("P2", "T1", "J1")],
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn day_at_hourly_steps_has_24_labels() {
    let net = single_pipe();
    let record = run_extended_period(&net, RunOptions::default(), GradientSolver::default()).unwrap();
    let labels = record.labels();
    assert_eq!(labels.len(), 24);
    assert_eq!(labels.first().map(String::as_str), Some("0:00"));
    assert_eq!(labels.last().map(String::as_str), Some("23:00"));
    assert_eq!(record.duration_hours, 24);
}

#[test]
fn pattern_scales_demand_by_hour() {
    let net = single_pipe();
    let p1 = net.graph().find_link("P1").unwrap();
    let options = RunOptions {
        use_demand_pattern: true,
        ..RunOptions::default()
    };
    let record = run_extended_period(&net, options, GradientSolver::default()).unwrap();
    let at = |t: usize| record.steps[t].solution.flow(p1).unwrap().value;
    assert!((at(0) - 0.05).abs() < 1e-6);
    assert!((at(8) - 0.13).abs() < 1e-6);
    assert!((at(16) - 0.14).abs() < 1e-6);
    assert_eq!(record.steps[8].demand_multiplier, 1.3);
}

#[test]
fn custom_pattern_and_half_hour_steps() {
    let net = single_pipe();
    let options = RunOptions {
        duration_hours: 2,
        time_step: TimeStep::HalfHour,
        use_demand_pattern: true,
    };
    let pattern = DemandPattern::new("TWO", vec![1.0, 2.0]).unwrap();
    let mut controller = Controller::new(&net, options, GradientSolver::default()).with_pattern(pattern);
    let record = controller.run().unwrap();
    let multipliers: Vec<f64> = record.steps.iter().map(|s| s.demand_multiplier).collect();
    assert_eq!(multipliers, vec![1.0, 1.0, 2.0, 2.0]);
    assert_eq!(controller.phase(), RunPhase::Done);
    assert!(controller.solver().total_iterations >= 4);
}

#[test]
fn tank_fills_and_pins_at_max() {
    let net = reservoir_tank_junction(100.0, 5.0, 0.01);
    let t1 = net.graph().find_node("T1").unwrap();
    let options = RunOptions {
        duration_hours: 4,
        ..RunOptions::default()
    };
    let record = run_extended_period(&net, options, GradientSolver::default()).unwrap();

    let first = record.steps[0].tanks.iter().find(|s| s.node == t1).unwrap();
    assert_eq!(first.level.value, 3.0);
    assert_eq!(first.next_level.value, 6.0);
    assert_eq!(first.status, TankStatus::Full);

    // the next solve sees the raised level
    let head = record.steps[1].solution.head(t1).unwrap().value;
    assert!((head - 86.0).abs() < 1e-9);
}

#[test]
fn tank_drains_to_min_and_run_continues() {
    let net = reservoir_tank_junction(60.0, 2.0, 0.02);
    let t1 = net.graph().find_node("T1").unwrap();
    let record = run_extended_period(&net, RunOptions::default(), GradientSolver::default()).unwrap();
    assert_eq!(record.steps.len(), 24);
    let last = record.steps[23].tanks.iter().find(|s| s.node == t1).unwrap();
    assert_eq!(last.status, TankStatus::Empty);
    assert_eq!(last.next_level.value, 0.5);
}

struct FailAt {
    step: usize,
    calls: usize,
    inner: GradientSolver,
}

impl StepSolver for FailAt {
    fn solve_step(
        &mut self,
        network: &Network,
        conditions: &Conditions,
        previous: Option<&HydraulicSolution>,
    ) -> SolverResult<HydraulicSolution> {
        let call = self.calls;
        self.calls += 1;
        if call == self.step {
            return Err(SolverError::Convergence {
                iterations: 200,
                residual: 0.5,
            });
        }
        self.inner.solve_step(network, conditions, previous)
    }
}

#[test]
fn step_failure_aborts_with_index() {
    let net = single_pipe();
    let solver = FailAt {
        step: 5,
        calls: 0,
        inner: GradientSolver::default(),
    };
    let err = run_extended_period(&net, RunOptions::default(), solver).unwrap_err();
    assert_eq!(err.step(), Some(5));
    assert!(matches!(
        err,
        SimError::StepFailed {
            source: SolverError::Convergence { .. },
            ..
        }
    ));
}

#[test]
fn cancellation_between_steps() {
    let net = single_pipe();
    let token = CancelToken::new();
    let mut controller =
        Controller::new(&net, RunOptions::default(), GradientSolver::default())
            .with_cancel(token.clone());
    let err = controller
        .run_with_progress(|event| {
            if event.phase == RunPhase::Updating(2) {
                token.cancel();
            }
        })
        .unwrap_err();
    assert_eq!(err, SimError::Cancelled { step: 3 });
}

#[test]
fn cancelled_before_start() {
    let net = single_pipe();
    let token = CancelToken::new();
    token.cancel();
    let mut controller =
        Controller::new(&net, RunOptions::default(), GradientSolver::default()).with_cancel(token);
    assert_eq!(controller.run().unwrap_err(), SimError::Cancelled { step: 0 });
}

#[test]
fn controller_runs_once() {
    let net = single_pipe();
    let options = RunOptions {
        duration_hours: 1,
        ..RunOptions::default()
    };
    let mut controller = Controller::new(&net, options, GradientSolver::default());
    controller.run().unwrap();
    assert!(matches!(controller.run(), Err(SimError::InvalidArg { .. })));
}

#[test]
fn first_step_is_reproducible() {
    let net = reservoir_tank_junction(95.0, 8.0, 0.03);
    let a = run_extended_period(&net, RunOptions::default(), GradientSolver::default()).unwrap();
    let b = run_extended_period(&net, RunOptions::default(), GradientSolver::default()).unwrap();
    assert_eq!(a.steps[0].solution.flows, b.steps[0].solution.flows);
    assert_eq!(a.steps[0].solution.heads, b.steps[0].solution.heads);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn tank_levels_stay_within_bounds(
        head in 60.0f64..120.0,
        diameter in 1.0f64..20.0,
        demand in 0.0f64..0.05,
        pattern in any::<bool>(),
    ) {
        let net = reservoir_tank_junction(head, diameter, demand);
        let options = RunOptions { use_demand_pattern: pattern, ..RunOptions::default() };
        let record = run_extended_period(&net, options, GradientSolver::default()).unwrap();
        for step in &record.steps {
            for tank in &step.tanks {
                for level in [tank.level.value, tank.next_level.value] {
                    prop_assert!((0.5..=6.0).contains(&level), "level {level}");
                }
            }
        }
    }
}
