//! Pipe with Hazen-Williams friction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::{
    CLOSED_RESISTANCE, HW_COEFF, HW_DIAMETER_EXPONENT, HW_EXPONENT, HeadLoss, check_positive,
};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::HeadLossLaw;
use hf_core::units::{Area, Flow, Length, circle_area};

/// Open/closed state shared by pipes and pumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    #[default]
    Open,
    Closed,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Open => write!(f, "Open"),
            LinkStatus::Closed => write!(f, "Closed"),
        }
    }
}

impl FromStr for LinkStatus {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(LinkStatus::Open),
            "closed" => Ok(LinkStatus::Closed),
            _ => Err(ComponentError::UnknownKind {
                category: "link status",
                value: s.to_string(),
            }),
        }
    }
}

/// Pipe with friction from the Hazen-Williams formula:
///
/// ```text
/// h = 10.67 * L * |Q|^0.85 * Q / (C^1.85 * D^4.87)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    /// Pipe length
    pub length: Length,
    /// Pipe inner diameter
    pub diameter: Length,
    /// Hazen-Williams C (dimensionless, higher is smoother)
    pub roughness: f64,
    pub status: LinkStatus,
    resistance: f64,
}

impl Pipe {
    /// Create an open pipe.
    pub fn new(length: Length, diameter: Length, roughness: f64) -> ComponentResult<Self> {
        check_positive(length.value, "pipe length")?;
        check_positive(diameter.value, "pipe diameter")?;
        check_positive(roughness, "pipe roughness")?;
        let resistance = HW_COEFF * length.value
            / (roughness.powf(HW_EXPONENT) * diameter.value.powf(HW_DIAMETER_EXPONENT));
        Ok(Self {
            length,
            diameter,
            roughness,
            status: LinkStatus::Open,
            resistance,
        })
    }

    pub fn with_status(mut self, status: LinkStatus) -> Self {
        self.status = status;
        self
    }

    /// Hazen-Williams resistance `r` in `h = r * |Q|^0.85 * Q`.
    pub fn resistance(&self) -> f64 {
        self.resistance
    }
}

impl HeadLossLaw for Pipe {
    fn headloss(&self, flow: Flow) -> HeadLoss {
        match self.status {
            LinkStatus::Open => HeadLoss::power_law(self.resistance, HW_EXPONENT, flow.value),
            LinkStatus::Closed => HeadLoss::linear(CLOSED_RESISTANCE, flow.value),
        }
    }

    fn flow_area(&self) -> Option<Area> {
        Some(circle_area(self.diameter))
    }

    fn is_closed(&self) -> bool {
        self.status == LinkStatus::Closed
    }
}
