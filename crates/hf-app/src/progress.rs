#[derive(Debug, Clone, PartialEq)]
pub enum RunStage {
    BuildingNetwork,
    RunningEngine { engine: &'static str },
    FallingBack { from: &'static str, reason: String },
    Completed,
}

/// Controller position within the period.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepProgress {
    pub step: usize,
    pub total_steps: usize,
    pub sim_hours: f64,
    pub iterations: Option<usize>,
    pub fraction_complete: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub step: Option<StepProgress>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            step: None,
        }
    }
}
