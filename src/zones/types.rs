//! Core types for the zone subsystem.

use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A named barangay and the extra strings that also identify it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    /// Matched the same way as the name (e.g. "Poblacion" for Barangay 1).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

impl Zone {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), aliases: Vec::new() }
    }

    pub fn with_aliases<I, S>(name: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }

    /// First whitespace-delimited token of the name ("San" for "San Rafael").
    pub fn first_token(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// How zone strings are compared against free text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Name, any alias, or the first token of the name.
    #[default]
    NameOrFirstToken,
    /// Name or any alias only.
    NameOnly,
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameOrFirstToken => write!(f, "name-or-first-token"),
            Self::NameOnly => write!(f, "name-only"),
        }
    }
}

impl std::str::FromStr for MatchRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name-or-first-token" | "loose" | "first-token" => Ok(Self::NameOrFirstToken),
            "name-only" | "strict" => Ok(Self::NameOnly),
            _ => Err(format!(
                "Unknown match rule '{}'. Use 'name-or-first-token' or 'name-only'.",
                s
            )),
        }
    }
}

/// Result of bucketing one location string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneBucket<'a> {
    Matched(&'a Zone),
    Unmatched,
}

impl<'a> ZoneBucket<'a> {
    pub fn zone(&self) -> Option<&'a Zone> {
        match self {
            Self::Matched(z) => Some(z),
            Self::Unmatched => None,
        }
    }

    pub fn name(&self) -> Option<&'a str> {
        self.zone().map(|z| z.name.as_str())
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

/// A zone's representative map point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZonePoint {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl ZonePoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Errors loading a zone catalog from disk.
#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    #[error("Cannot read zone catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid zone catalog {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Zone catalog {} lists no zones", .0.display())]
    Empty(PathBuf),
    #[error("Zone #{0} in the catalog has an empty name")]
    BlankName(usize),
}
