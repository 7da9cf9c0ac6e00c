//! Storage tank: a cylindrical vessel whose level evolves between steps.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::{check_finite, check_positive};
use crate::error::{ComponentError, ComponentResult};
use hf_core::units::{Area, Flow, Length, Time, circle_area, m};

/// Fill state of a tank after a level update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TankStatus {
    #[default]
    Normal,
    Full,
    Empty,
}

impl fmt::Display for TankStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TankStatus::Normal => write!(f, "normal"),
            TankStatus::Full => write!(f, "full"),
            TankStatus::Empty => write!(f, "empty"),
        }
    }
}

/// Water level and fill state of a tank at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankState {
    /// Level above the tank bottom
    pub level: Length,
    pub status: TankStatus,
}

/// Cylindrical storage tank.
#[derive(Debug, Clone, PartialEq)]
pub struct Tank {
    /// Bottom elevation
    pub elevation: Length,
    pub init_level: Length,
    pub min_level: Length,
    pub max_level: Length,
    pub diameter: Length,
}

impl Tank {
    /// Create a tank, checking `0 <= min <= init <= max` and a positive diameter.
    pub fn new(
        elevation: Length,
        init_level: Length,
        min_level: Length,
        max_level: Length,
        diameter: Length,
    ) -> ComponentResult<Self> {
        check_finite(elevation.value, "tank elevation")?;
        check_finite(init_level.value, "tank initial level")?;
        check_finite(min_level.value, "tank minimum level")?;
        check_finite(max_level.value, "tank maximum level")?;
        check_positive(diameter.value, "tank diameter")?;
        if min_level.value < 0.0
            || min_level.value > init_level.value
            || init_level.value > max_level.value
        {
            return Err(ComponentError::InvalidArg {
                what: "tank levels must satisfy 0 <= min <= init <= max",
            });
        }
        Ok(Self {
            elevation,
            init_level,
            min_level,
            max_level,
            diameter,
        })
    }

    pub fn area(&self) -> Area {
        circle_area(self.diameter)
    }

    /// Hydraulic head for a given level.
    pub fn head_at(&self, level: Length) -> Length {
        self.elevation + level
    }

    pub fn initial_state(&self) -> TankState {
        TankState {
            level: self.init_level,
            status: self.status_at(self.init_level),
        }
    }

    /// Advance the level by `net_inflow * dt / area`, clamped to the
    /// operating range.
    pub fn advance(&self, level: Length, net_inflow: Flow, dt: Time) -> TankState {
        let delta = net_inflow.value * dt.value / self.area().value;
        let raw = level.value + delta;
        let clamped = raw.clamp(self.min_level.value, self.max_level.value);
        TankState {
            level: m(clamped),
            status: self.status_at(m(clamped)),
        }
    }

    /// Fill state of a level within the operating range.
    pub fn status_at(&self, level: Length) -> TankStatus {
        if level.value >= self.max_level.value {
            TankStatus::Full
        } else if level.value <= self.min_level.value {
            TankStatus::Empty
        } else {
            TankStatus::Normal
        }
    }
}
