//! Pump model: a fixed head gain between its endpoints.

use crate::common::{CLOSED_RESISTANCE, HeadLoss, check_finite};
use crate::error::{ComponentError, ComponentResult};
use crate::pipe::LinkStatus;
use crate::traits::HeadLossLaw;
use hf_core::units::{Flow, Length};

/// Slope of the pump characteristic (m per m³/s). Keeps the linearized
/// system well posed while leaving the head gain nearly flow-independent.
pub const PUMP_GRADIENT: f64 = 1e-2;

/// Pump adding a fixed head between its start (suction) and end (discharge).
///
/// ```text
/// h_start->end = -gain + PUMP_GRADIENT * Q
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Pump {
    /// Head added to the stream (m)
    pub head_gain: Length,
    pub status: LinkStatus,
}

impl Pump {
    pub fn new(head_gain: Length) -> ComponentResult<Self> {
        let gain = check_finite(head_gain.value, "pump head gain")?;
        if gain < 0.0 {
            return Err(ComponentError::NonPhysical {
                what: "pump head gain",
            });
        }
        Ok(Self {
            head_gain,
            status: LinkStatus::Open,
        })
    }

    pub fn with_status(mut self, status: LinkStatus) -> Self {
        self.status = status;
        self
    }
}

impl HeadLossLaw for Pump {
    fn headloss(&self, flow: Flow) -> HeadLoss {
        match self.status {
            LinkStatus::Open => HeadLoss {
                head_m: -self.head_gain.value + PUMP_GRADIENT * flow.value,
                gradient: PUMP_GRADIENT,
            },
            LinkStatus::Closed => HeadLoss::linear(CLOSED_RESISTANCE, flow.value),
        }
    }

    fn is_closed(&self) -> bool {
        self.status == LinkStatus::Closed
    }
}
