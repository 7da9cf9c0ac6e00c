//! Run options accepted at the core boundary.

use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Hydraulic time step, restricted to the supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum TimeStep {
    HalfHour,
    #[default]
    OneHour,
    TwoHours,
    SixHours,
}

impl TimeStep {
    pub const ALL: [TimeStep; 4] = [
        TimeStep::HalfHour,
        TimeStep::OneHour,
        TimeStep::TwoHours,
        TimeStep::SixHours,
    ];

    pub fn hours(self) -> f64 {
        match self {
            TimeStep::HalfHour => 0.5,
            TimeStep::OneHour => 1.0,
            TimeStep::TwoHours => 2.0,
            TimeStep::SixHours => 6.0,
        }
    }

    pub fn seconds(self) -> f64 {
        self.hours() * 3600.0
    }

    pub fn from_hours(hours: f64) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|s| (s.hours() - hours).abs() < 1e-9)
            .ok_or_else(|| ValidationError::InvalidRunOption {
                field: "time_step",
                reason: format!("{hours} h is not one of 0.5, 1, 2, 6"),
            })
    }
}

impl TryFrom<f64> for TimeStep {
    type Error = ValidationError;

    fn try_from(hours: f64) -> Result<Self, Self::Error> {
        Self::from_hours(hours)
    }
}

impl From<TimeStep> for f64 {
    fn from(step: TimeStep) -> f64 {
        step.hours()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Simulated horizon in whole hours (>= 1)
    pub duration_hours: u32,
    pub time_step: TimeStep,
    #[serde(default)]
    pub use_demand_pattern: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            duration_hours: 24,
            time_step: TimeStep::OneHour,
            use_demand_pattern: false,
        }
    }
}

impl RunOptions {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.duration_hours == 0 {
            return Err(ValidationError::InvalidRunOption {
                field: "duration",
                reason: "must be at least 1 hour".to_string(),
            });
        }
        Ok(())
    }

    /// Number of extended-period steps: `round(duration / time_step)`, at least one.
    pub fn step_count(&self) -> usize {
        let n = (f64::from(self.duration_hours) / self.time_step.hours()).round();
        (n as usize).max(1)
    }

    /// Simulated time (hours) at the start of step `t`.
    pub fn step_start_hours(&self, t: usize) -> f64 {
        t as f64 * self.time_step.hours()
    }

    /// `H:MM` labels, one per step.
    pub fn step_labels(&self) -> Vec<String> {
        (0..self.step_count())
            .map(|t| clock_label(self.step_start_hours(t)))
            .collect()
    }
}

/// Format elapsed hours as `H:MM` (hours are not wrapped at 24).
pub fn clock_label(hours: f64) -> String {
    let minutes = (hours * 60.0).round().max(0.0) as u64;
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_at_one_hour_has_24_labels() {
        let opts = RunOptions::default();
        let labels = opts.step_labels();
        assert_eq!(labels.len(), 24);
        assert_eq!(labels[0], "0:00");
        assert_eq!(labels[23], "23:00");
    }

    #[test]
    fn half_hour_labels() {
        let opts = RunOptions {
            duration_hours: 2,
            time_step: TimeStep::HalfHour,
            use_demand_pattern: true,
        };
        assert_eq!(opts.step_labels(), vec!["0:00", "0:30", "1:00", "1:30"]);
    }

    #[test]
    fn step_count_rounds() {
        let opts = RunOptions {
            duration_hours: 5,
            time_step: TimeStep::TwoHours,
            use_demand_pattern: false,
        };
        // 2.5 rounds away from zero
        assert_eq!(opts.step_count(), 3);
        let short = RunOptions {
            duration_hours: 1,
            time_step: TimeStep::SixHours,
            use_demand_pattern: false,
        };
        assert_eq!(short.step_count(), 1);
    }

    #[test]
    fn rejects_unsupported_step_and_zero_duration() {
        assert!(TimeStep::from_hours(3.0).is_err());
        assert_eq!(TimeStep::from_hours(6.0).unwrap(), TimeStep::SixHours);
        let opts = RunOptions {
            duration_hours: 0,
            ..RunOptions::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn options_deserialize_from_hours() {
        let opts: RunOptions =
            serde_json::from_str(r#"{"duration_hours": 12, "time_step": 2.0}"#).unwrap();
        assert_eq!(opts.time_step, TimeStep::TwoHours);
        assert!(!opts.use_demand_pattern);
        assert!(serde_json::from_str::<RunOptions>(r#"{"duration_hours": 1, "time_step": 4}"#).is_err());
    }
}
