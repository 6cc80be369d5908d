use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Lifecycle of an architectural issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    #[default]
    Current,
    Resolved,
    Discarded,
}

/// Lifecycle of a risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskStatus {
    #[default]
    Potential,
    Current,
    Mitigated,
    Discarded,
}

/// Lifecycle of an improvement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImprovementStatus {
    #[default]
    Proposed,
    Accepted,
    Implemented,
    Discarded,
}

/// Lifecycle of an architecture decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    #[default]
    Proposed,
    Accepted,
    Deprecated,
    Superseded,
}

impl IssueStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Resolved => "resolved",
            Self::Discarded => "discarded",
        }
    }
}

impl RiskStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Potential => "potential",
            Self::Current => "current",
            Self::Mitigated => "mitigated",
            Self::Discarded => "discarded",
        }
    }
}

impl ImprovementStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::Accepted => "accepted",
            Self::Implemented => "implemented",
            Self::Discarded => "discarded",
        }
    }
}

impl DecisionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::Accepted => "accepted",
            Self::Deprecated => "deprecated",
            Self::Superseded => "superseded",
        }
    }
}

/// Error returned when parsing a status value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid status '{}': expected one of {}", self.got, self.expected)
    }
}

impl std::error::Error for ParseStatusError {}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for IssueStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "current" => Ok(Self::Current),
            "resolved" => Ok(Self::Resolved),
            "discarded" => Ok(Self::Discarded),
            _ => Err(ParseStatusError {
                expected: "current, resolved, discarded",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for RiskStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "potential" => Ok(Self::Potential),
            "current" => Ok(Self::Current),
            "mitigated" => Ok(Self::Mitigated),
            "discarded" => Ok(Self::Discarded),
            _ => Err(ParseStatusError {
                expected: "potential, current, mitigated, discarded",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for ImprovementStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "proposed" => Ok(Self::Proposed),
            "accepted" => Ok(Self::Accepted),
            "implemented" => Ok(Self::Implemented),
            "discarded" => Ok(Self::Discarded),
            _ => Err(ParseStatusError {
                expected: "proposed, accepted, implemented, discarded",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for DecisionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "proposed" => Ok(Self::Proposed),
            "accepted" => Ok(Self::Accepted),
            "deprecated" => Ok(Self::Deprecated),
            "superseded" => Ok(Self::Superseded),
            _ => Err(ParseStatusError {
                expected: "proposed, accepted, deprecated, superseded",
                got: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ImprovementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
