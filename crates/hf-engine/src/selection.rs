use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which engines a run may use, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineSelection {
    /// External first when configured, internal on unavailability.
    #[default]
    Auto,
    InternalOnly,
    ExternalOnly,
}

impl EngineSelection {
    pub fn allows_external(self) -> bool {
        !matches!(self, Self::InternalOnly)
    }

    pub fn allows_internal(self) -> bool {
        !matches!(self, Self::ExternalOnly)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::InternalOnly => "internal",
            Self::ExternalOnly => "external",
        }
    }
}

impl fmt::Display for EngineSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for EngineSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "internal" | "internal_only" => Ok(Self::InternalOnly),
            "external" | "external_only" | "epanet" => Ok(Self::ExternalOnly),
            other => Err(format!("unknown engine selection '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cli_names() {
        assert_eq!("auto".parse::<EngineSelection>(), Ok(EngineSelection::Auto));
        assert_eq!(
            "Internal".parse::<EngineSelection>(),
            Ok(EngineSelection::InternalOnly)
        );
        assert_eq!(
            "epanet".parse::<EngineSelection>(),
            Ok(EngineSelection::ExternalOnly)
        );
        assert!("both".parse::<EngineSelection>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for sel in [
            EngineSelection::Auto,
            EngineSelection::InternalOnly,
            EngineSelection::ExternalOnly,
        ] {
            assert_eq!(sel.to_string().parse::<EngineSelection>(), Ok(sel));
        }
    }

    #[test]
    fn only_modes_exclude_the_other_engine() {
        assert!(!EngineSelection::InternalOnly.allows_external());
        assert!(!EngineSelection::ExternalOnly.allows_internal());
        assert!(EngineSelection::Auto.allows_external());
        assert!(EngineSelection::Auto.allows_internal());
    }
}
