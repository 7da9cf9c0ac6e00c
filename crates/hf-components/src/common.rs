//! Common utilities for head-loss calculations.

use crate::error::{ComponentError, ComponentResult};
use hf_core::numeric::{ensure_finite, ensure_positive};

/// Hazen-Williams coefficient for SI units (m, m³/s).
pub const HW_COEFF: f64 = 10.67;

/// Hazen-Williams flow exponent.
pub const HW_EXPONENT: f64 = 1.85;

/// Hazen-Williams diameter exponent.
pub const HW_DIAMETER_EXPONENT: f64 = 4.87;

/// Lower bound on dh/dq (m per m³/s). Below it the law is replaced by a
/// straight line through the origin with this slope.
pub const MIN_GRADIENT: f64 = 1e-7;

/// Linear resistance of a closed link (m per m³/s).
pub const CLOSED_RESISTANCE: f64 = 1e8;

/// `8 / (g * pi^2)`: minor-loss head per unit K for unit flow through unit diameter.
pub const MINOR_LOSS_FACTOR: f64 = 0.082_627;

/// Head drop from link start to link end at a given flow, with its slope.
///
/// `head_m` carries the sign of the flow for passive links; pumps may
/// report a negative drop (head gain).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadLoss {
    /// Head drop start -> end (m)
    pub head_m: f64,
    /// d(head_m)/dQ (m per m³/s), always >= MIN_GRADIENT
    pub gradient: f64,
}

impl HeadLoss {
    /// Straight-line law `h = r * q`.
    pub fn linear(resistance: f64, q: f64) -> Self {
        let r = resistance.max(MIN_GRADIENT);
        Self {
            head_m: r * q,
            gradient: r,
        }
    }

    /// Power law `h = r * |q|^(n-1) * q`, regularized near zero flow.
    pub fn power_law(resistance: f64, exponent: f64, q: f64) -> Self {
        let q_abs = q.abs();
        let r_term = resistance * q_abs.powf(exponent - 1.0);
        let gradient = exponent * r_term;
        if gradient < MIN_GRADIENT {
            return Self::linear(MIN_GRADIENT, q);
        }
        Self {
            head_m: r_term * q,
            gradient,
        }
    }
}

/// Ensure a value is finite, returning ComponentError if not.
pub fn check_finite(value: f64, what: &'static str) -> ComponentResult<f64> {
    ensure_finite(value, what).map_err(|_| ComponentError::NonPhysical { what })
}

/// Ensure a value is finite and strictly positive.
pub fn check_positive(value: f64, what: &'static str) -> ComponentResult<f64> {
    ensure_positive(value, what).map_err(|_| ComponentError::NonPhysical { what })
}
