use hf_network::{BuiltNetwork, DemandPattern, RunOptions};
use hf_results::{Aggregator, RunResults};
use hf_sim::{CancelToken, Controller, GradientSolver};
use hf_solver::SolverConfig;
use tracing::info;

use crate::engine::{HydraulicEngine, ProgressFn};
use crate::EngineResult;

/// Built-in gradient solver stepped by the extended-period controller.
#[derive(Debug, Clone, Default)]
pub struct InternalEngine {
    config: SolverConfig,
    pattern: Option<DemandPattern>,
}

impl InternalEngine {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            pattern: None,
        }
    }

    /// Use a custom demand curve instead of the daily default.
    pub fn with_pattern(mut self, pattern: DemandPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl HydraulicEngine for InternalEngine {
    fn name(&self) -> &'static str {
        "internal"
    }

    fn run(
        &mut self,
        built: &BuiltNetwork,
        options: &RunOptions,
        cancel: &CancelToken,
        progress: Option<ProgressFn<'_>>,
    ) -> EngineResult<RunResults> {
        let network = &built.network;
        let mut controller = Controller::new(network, *options, GradientSolver::new(self.config))
            .with_cancel(cancel.clone());
        if let Some(pattern) = &self.pattern {
            controller = controller.with_pattern(pattern.clone());
        }

        let record = match progress {
            Some(on_event) => controller.run_with_progress(|e| on_event(e))?,
            None => controller.run()?,
        };

        info!(
            steps = record.steps.len(),
            iterations = controller.solver().total_iterations,
            "internal engine finished"
        );
        Ok(Aggregator::from_record(network, &record, self.name())?)
    }
}
