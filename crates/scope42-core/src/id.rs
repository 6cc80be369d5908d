//! Typed item identifiers.
//!
//! An [`ItemId`] carries both the item kind and a per-kind serial number.
//! The canonical text form is `<kind>-<serial>` (`issue-3`, `decision-12`);
//! parsing validates both halves instead of trusting the string shape.
//!
//! Serials are only unique within a kind, so anything that must be unique
//! across kinds (graph node IDs) uses [`ItemId::node_id`], which prefixes
//! the kind tag once more: `issue:issue-3`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/// The four kinds of tracked item.
///
/// Variant order is the canonical ordering of the item mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Issue,
    Risk,
    Improvement,
    Decision,
}

impl ItemKind {
    pub const ALL: [Self; 4] = [Self::Issue, Self::Risk, Self::Improvement, Self::Decision];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::Risk => "risk",
            Self::Improvement => "improvement",
            Self::Decision => "decision",
        }
    }

    /// Directory name under `items/` holding files of this kind.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Issue => "issues",
            Self::Risk => "risks",
            Self::Improvement => "improvements",
            Self::Decision => "decisions",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a kind or an item ID from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseIdError {
    #[error("unknown item type '{0}' (expected issue, risk, improvement or decision)")]
    UnknownKind(String),
    #[error("malformed item ID '{0}' (expected <type>-<serial>, e.g. issue-3)")]
    Malformed(String),
    #[error("invalid serial in item ID '{0}' (expected a positive integer)")]
    InvalidSerial(String),
}

impl FromStr for ItemKind {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "issue" => Ok(Self::Issue),
            "risk" => Ok(Self::Risk),
            "improvement" => Ok(Self::Improvement),
            "decision" => Ok(Self::Decision),
            _ => Err(ParseIdError::UnknownKind(s.to_string())),
        }
    }
}

/// Identifier of a tracked item: kind tag plus a serial starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId {
    kind: ItemKind,
    serial: u32,
}

impl ItemId {
    /// Build an ID. Returns `None` for serial 0, which is never allocated.
    #[must_use]
    pub const fn new(kind: ItemKind, serial: u32) -> Option<Self> {
        if serial == 0 {
            None
        } else {
            Some(Self { kind, serial })
        }
    }

    #[must_use]
    pub const fn kind(self) -> ItemKind {
        self.kind
    }

    #[must_use]
    pub const fn serial(self) -> u32 {
        self.serial
    }

    /// Globally unique node identifier: `<kind>:<kind>-<serial>`.
    #[must_use]
    pub fn node_id(self) -> String {
        format!("{}:{self}", self.kind)
    }

    /// File name of the persisted item, e.g. `issue-3.yml`.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{self}.yml")
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.serial)
    }
}

impl FromStr for ItemId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let (prefix, serial) = value
            .rsplit_once('-')
            .ok_or_else(|| ParseIdError::Malformed(s.to_string()))?;
        let kind = prefix
            .parse::<ItemKind>()
            .map_err(|_| ParseIdError::UnknownKind(prefix.to_string()))?;
        if serial.is_empty() || !serial.chars().all(|c| c.is_ascii_digit()) {
            return Err(ParseIdError::InvalidSerial(s.to_string()));
        }
        let serial = serial
            .parse::<u32>()
            .map_err(|_| ParseIdError::InvalidSerial(s.to_string()))?;
        Self::new(kind, serial).ok_or_else(|| ParseIdError::InvalidSerial(s.to_string()))
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
