//! Run execution: build, engine order with fallback, results.

use std::path::Path;
use std::time::Instant;

use hf_core::timing::Timer;
use hf_engine::{
    EngineError, EngineSelection, ExternalEngine, ExternalEngineConfig, HydraulicEngine,
    InternalEngine,
};
use hf_network::{DemandPattern, NetworkRecords, NetworkSummary, RunOptions, build_network};
use hf_results::RunResults;
use hf_sim::{CancelToken, ControllerEvent, RunPhase};
use hf_solver::SolverConfig;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::progress::{RunProgressEvent, RunStage, StepProgress};

/// Which engines may run, and how each is configured.
#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub selection: EngineSelection,
    /// External executable; without one, `Auto` goes straight to internal
    pub external: Option<ExternalEngineConfig>,
    pub solver: SolverConfig,
    /// Demand curve for pattern runs; the daily curve when unset
    pub pattern: Option<DemandPattern>,
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub records: &'a NetworkRecords,
    pub options: RunOptions,
    pub engines: EngineSettings,
}

#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub build_time_s: f64,
    pub solve_time_s: f64,
    pub total_time_s: f64,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub results: RunResults,
    pub summary: NetworkSummary,
    /// Why an earlier engine in the order was passed over
    pub fallback_reason: Option<String>,
    pub timing: RunTimingSummary,
}

/// Engines to try, in order.
pub fn engine_order(settings: &EngineSettings) -> AppResult<Vec<Box<dyn HydraulicEngine>>> {
    let mut engines: Vec<Box<dyn HydraulicEngine>> = Vec::new();
    if settings.selection.allows_external() {
        match &settings.external {
            Some(config) => engines.push(Box::new(ExternalEngine::new(config.clone()))),
            None if settings.selection == EngineSelection::ExternalOnly => {
                return Err(AppError::EngineUnavailable {
                    reason: "no external engine configured".to_string(),
                });
            }
            None => info!("no external engine configured, using internal solver"),
        }
    }
    if settings.selection.allows_internal() {
        let mut internal = InternalEngine::new(settings.solver);
        if let Some(pattern) = &settings.pattern {
            internal = internal.with_pattern(pattern.clone());
        }
        engines.push(Box::new(internal));
    }
    Ok(engines)
}

fn emit(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    started: Instant,
    stage: RunStage,
    message: Option<String>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            stage,
            started.elapsed().as_secs_f64(),
            message,
        ));
    }
}

fn step_event(engine: &'static str, started: Instant, event: &ControllerEvent) -> RunProgressEvent {
    let step = match event.phase {
        RunPhase::Solving(t) | RunPhase::Updating(t) => t,
        RunPhase::Pending => 0,
        RunPhase::Done => event.total_steps,
    };
    let fraction_complete = if event.total_steps == 0 {
        0.0
    } else {
        step as f64 / event.total_steps as f64
    };
    RunProgressEvent {
        stage: RunStage::RunningEngine { engine },
        elapsed_wall_s: started.elapsed().as_secs_f64(),
        message: None,
        step: Some(StepProgress {
            step,
            total_steps: event.total_steps,
            sim_hours: event.sim_hours,
            iterations: event.iterations,
            fraction_complete,
        }),
    }
}

/// Execute a run.
pub fn run(request: &RunRequest) -> AppResult<RunResponse> {
    run_with_progress(request, &CancelToken::new(), None)
}

/// Execute a run, checking `cancel` between steps and streaming progress.
///
/// Validation happens once before any engine starts. An engine reporting
/// itself unavailable hands over to the next one in the order; any other
/// failure ends the run.
pub fn run_with_progress(
    request: &RunRequest,
    cancel: &CancelToken,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    emit(
        &mut progress_cb,
        started,
        RunStage::BuildingNetwork,
        Some("Building network".to_string()),
    );
    let build_timer = Timer::start("build");
    let built = build_network(request.records, &request.options)?;
    timing.build_time_s = build_timer.stop();
    let summary = NetworkSummary::of(&built.network);
    info!(
        nodes = built.network.node_count(),
        links = built.network.link_count(),
        duration_h = request.options.duration_hours,
        engine = %request.engines.selection,
        "starting run"
    );

    let engines = engine_order(&request.engines)?;
    let total = engines.len();
    let solve_timer = Timer::start("solve");
    let mut fallback_reason: Option<String> = None;

    for (idx, mut engine) in engines.into_iter().enumerate() {
        let name = engine.name();
        emit(
            &mut progress_cb,
            started,
            RunStage::RunningEngine { engine: name },
            Some(format!("Running {name} engine")),
        );

        let outcome = {
            let mut forward = |e: &ControllerEvent| {
                if let Some(cb) = progress_cb.as_deref_mut() {
                    cb(step_event(name, started, e));
                }
            };
            engine.run(&built, &request.options, cancel, Some(&mut forward))
        };

        match outcome {
            Ok(results) => {
                timing.solve_time_s = solve_timer.stop();
                timing.total_time_s = started.elapsed().as_secs_f64();
                info!(
                    engine = name,
                    steps = results.time_steps.len(),
                    total_s = timing.total_time_s,
                    "run completed"
                );
                emit(
                    &mut progress_cb,
                    started,
                    RunStage::Completed,
                    Some("Run completed".to_string()),
                );
                return Ok(RunResponse {
                    results,
                    summary,
                    fallback_reason,
                    timing,
                });
            }
            Err(EngineError::Unavailable { reason }) if idx + 1 < total => {
                warn!(engine = name, %reason, "engine unavailable, falling back");
                emit(
                    &mut progress_cb,
                    started,
                    RunStage::FallingBack {
                        from: name,
                        reason: reason.clone(),
                    },
                    None,
                );
                fallback_reason = Some(reason);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::EngineUnavailable {
        reason: "no engine selected".to_string(),
    })
}

pub fn save_results(path: &Path, results: &RunResults) -> AppResult<()> {
    hf_results::save_json(path, results)?;
    info!(path = %path.display(), "saved results");
    Ok(())
}
