//! Hourly demand multiplier curves.

use crate::validate::ValidationError;

/// Typical daily residential demand curve, one multiplier per hour from 0:00.
pub const DAILY_MULTIPLIERS: [f64; 24] = [
    0.5, 0.4, 0.4, 0.4, 0.5, 0.7, 0.9, 1.2, 1.3, 1.2, 1.1, 1.0, //
    1.0, 1.1, 1.2, 1.3, 1.4, 1.2, 1.1, 1.0, 0.9, 0.8, 0.7, 0.6,
];

/// Hourly multiplier curve applied to junction base demands.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandPattern {
    id: String,
    multipliers: Vec<f64>,
}

impl DemandPattern {
    pub fn new(id: impl Into<String>, multipliers: Vec<f64>) -> Result<Self, ValidationError> {
        let id = id.into();
        if multipliers.is_empty() || multipliers.iter().any(|m| !m.is_finite() || *m < 0.0) {
            return Err(ValidationError::InvalidRunOption {
                field: "demand_pattern",
                reason: format!("pattern {id} needs at least one finite, non-negative multiplier"),
            });
        }
        Ok(Self { id, multipliers })
    }

    /// The built-in daily curve.
    pub fn daily() -> Self {
        Self {
            id: "DAILY".to_string(),
            multipliers: DAILY_MULTIPLIERS.to_vec(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn multipliers(&self) -> &[f64] {
        &self.multipliers
    }

    /// Multiplier in effect at `hours` after the start: the curve is keyed by
    /// whole hour and repeats.
    pub fn multiplier_at(&self, hours: f64) -> f64 {
        let hour = hours.max(0.0).floor() as usize;
        self.multipliers[hour % self.multipliers.len()]
    }
}

impl Default for DemandPattern {
    fn default() -> Self {
        Self::daily()
    }
}
