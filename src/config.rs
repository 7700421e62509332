//! Dispatch desk configuration at ~/.tera/config.json.
//!
//! Every field is optional in the file; missing ones take the Tigbauan
//! defaults. A missing file is not an error.

use crate::eta::{EtaEstimator, DEFAULT_ORIGIN, DEFAULT_SPEED_KMH};
use crate::geo::Coordinate;
use crate::zones::{MatchRule, ZoneCatalog, ZoneError};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TIMEZONE: &str = "Asia/Manila";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Origin {0} is outside lat -90..90 / lng -180..180")]
    InvalidOrigin(Coordinate),
    #[error("Average speed must be a positive number of km/h, got {0}")]
    InvalidSpeed(f64),
    #[error("Unknown timezone '{0}'. Use IANA format (e.g. Asia/Manila).")]
    UnknownTimezone(String),
    #[error(transparent)]
    Zones(#[from] ZoneError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Where response units leave from.
    pub origin: Coordinate,
    pub average_speed_kmh: f64,
    pub match_rule: MatchRule,
    /// JSON zone catalog replacing the built-in roster.
    pub zones_file: Option<PathBuf>,
    /// IANA zone used for "today" and dispatch timestamps.
    pub timezone: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN,
            average_speed_kmh: DEFAULT_SPEED_KMH,
            match_rule: MatchRule::default(),
            zones_file: None,
            timezone: DEFAULT_TIMEZONE.into(),
        }
    }
}

impl DispatchConfig {
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tera")
            .join("config.json")
    }

    /// Load from the default location, or defaults if there is no file.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::info!(path = %path.display(), "loaded dispatch config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.origin.is_valid() {
            return Err(ConfigError::InvalidOrigin(self.origin));
        }
        if !self.average_speed_kmh.is_finite() || self.average_speed_kmh <= 0.0 {
            return Err(ConfigError::InvalidSpeed(self.average_speed_kmh));
        }
        self.tz()?;
        Ok(())
    }

    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse()
            .map_err(|_| ConfigError::UnknownTimezone(self.timezone.clone()))
    }

    pub fn estimator(&self) -> EtaEstimator {
        EtaEstimator::new(self.origin, self.average_speed_kmh)
    }

    /// The configured zone catalog, or the built-in roster.
    pub fn catalog(&self) -> Result<ZoneCatalog, ConfigError> {
        match &self.zones_file {
            Some(path) => Ok(ZoneCatalog::load_from(path)?),
            None => Ok(ZoneCatalog::builtin()),
        }
    }
}
