use hf_network::{BuiltNetwork, RunOptions};
use hf_results::RunResults;
use hf_sim::{CancelToken, ControllerEvent};

use crate::EngineResult;

/// Observer for controller phase transitions.
pub type ProgressFn<'p> = &'p mut dyn FnMut(&ControllerEvent);

/// One way of turning a built network and run options into results.
pub trait HydraulicEngine {
    /// Short name recorded in [`RunResults::engine`].
    fn name(&self) -> &'static str;

    /// Run the whole extended period.
    ///
    /// Engines check `cancel` between steps, or while waiting on a
    /// subprocess, and stop with `EngineError::Cancelled`.
    fn run(
        &mut self,
        built: &BuiltNetwork,
        options: &RunOptions,
        cancel: &CancelToken,
        progress: Option<ProgressFn<'_>>,
    ) -> EngineResult<RunResults>;
}
