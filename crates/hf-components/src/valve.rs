//! Valve model: type tag plus an operational status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::{CLOSED_RESISTANCE, HeadLoss, MINOR_LOSS_FACTOR, check_finite, check_positive};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::HeadLossLaw;
use hf_core::units::{Area, Flow, Length, circle_area};

/// Valve type as named in network descriptions.
///
/// The type is carried for description output; hydraulically every type
/// follows its [`ValveStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValveType {
    /// Pressure reducing
    Prv,
    /// Pressure sustaining
    Psv,
    /// Pressure breaker
    Pbv,
    /// Flow control
    Fcv,
    /// Throttle control
    Tcv,
    /// General purpose
    Gpv,
}

impl fmt::Display for ValveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValveType::Prv => "PRV",
            ValveType::Psv => "PSV",
            ValveType::Pbv => "PBV",
            ValveType::Fcv => "FCV",
            ValveType::Tcv => "TCV",
            ValveType::Gpv => "GPV",
        };
        f.pad(s)
    }
}

impl FromStr for ValveType {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PRV" => Ok(ValveType::Prv),
            "PSV" => Ok(ValveType::Psv),
            "PBV" => Ok(ValveType::Pbv),
            "FCV" => Ok(ValveType::Fcv),
            "TCV" => Ok(ValveType::Tcv),
            "GPV" => Ok(ValveType::Gpv),
            _ => Err(ComponentError::UnknownKind {
                category: "valve type",
                value: s.to_string(),
            }),
        }
    }
}

/// Operational status of a valve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ValveStatus {
    Open,
    Closed,
    /// Partially open with the given minor-loss coefficient K.
    Throttled { loss_coefficient: f64 },
}

/// Valve between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Valve {
    pub valve_type: ValveType,
    pub diameter: Length,
    pub status: ValveStatus,
    /// Minor-loss coefficient applied when fully open
    pub open_loss_coefficient: f64,
}

impl Valve {
    pub fn new(valve_type: ValveType, diameter: Length, status: ValveStatus) -> ComponentResult<Self> {
        check_positive(diameter.value, "valve diameter")?;
        if let ValveStatus::Throttled { loss_coefficient } = status {
            let k = check_finite(loss_coefficient, "valve loss coefficient")?;
            if k < 0.0 {
                return Err(ComponentError::NonPhysical {
                    what: "valve loss coefficient",
                });
            }
        }
        Ok(Self {
            valve_type,
            diameter,
            status,
            open_loss_coefficient: 0.0,
        })
    }

    /// Quadratic minor-loss resistance for coefficient `k`: `h = r * Q|Q|`.
    fn minor_resistance(&self, k: f64) -> f64 {
        MINOR_LOSS_FACTOR * k / self.diameter.value.powi(4)
    }
}

impl HeadLossLaw for Valve {
    fn headloss(&self, flow: Flow) -> HeadLoss {
        let q = flow.value;
        match self.status {
            ValveStatus::Open => {
                HeadLoss::power_law(self.minor_resistance(self.open_loss_coefficient), 2.0, q)
            }
            ValveStatus::Throttled { loss_coefficient } => {
                HeadLoss::power_law(self.minor_resistance(loss_coefficient), 2.0, q)
            }
            ValveStatus::Closed => HeadLoss::linear(CLOSED_RESISTANCE, q),
        }
    }

    fn flow_area(&self) -> Option<Area> {
        Some(circle_area(self.diameter))
    }

    fn is_closed(&self) -> bool {
        matches!(self.status, ValveStatus::Closed)
    }
}
