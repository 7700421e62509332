//! Zone catalog: the ordered zone list plus the zone → map point table.
//!
//! Built-in by default; can be loaded from a JSON file shaped like
//!
//! ```json
//! {
//!   "zones": [{ "name": "Alupidian" }, { "name": "Namocon", "aliases": ["Namucon"] }],
//!   "points": [{ "name": "Alupidian", "lat": 10.7005, "lng": 122.3897 }],
//!   "default_point": { "lat": 10.6747, "lng": 122.3964 }
//! }
//! ```
//!
//! `points` and `default_point` are optional and fall back to built-in values.

use super::builtin::{self, DEFAULT_ZONE_POINT};
use super::bucketer;
use super::types::{MatchRule, Zone, ZoneBucket, ZoneError, ZonePoint};
use crate::geo::Coordinate;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
struct CatalogFile {
    zones: Vec<Zone>,
    #[serde(default)]
    points: Option<Vec<ZonePoint>>,
    #[serde(default)]
    default_point: Option<Coordinate>,
}

/// Immutable zone configuration handed to bucketing and aggregation.
#[derive(Debug, Clone)]
pub struct ZoneCatalog {
    zones: Vec<Zone>,
    points: HashMap<String, Coordinate>,
    default_point: Coordinate,
}

impl Default for ZoneCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ZoneCatalog {
    /// The Tigbauan roster with its surveyed points.
    pub fn builtin() -> Self {
        Self::new(builtin::builtin_zones(), builtin::builtin_points(), DEFAULT_ZONE_POINT)
    }

    pub fn new(zones: Vec<Zone>, points: Vec<ZonePoint>, default_point: Coordinate) -> Self {
        let points = points
            .into_iter()
            .map(|p| (p.name.clone(), p.coordinate()))
            .collect();
        Self { zones, points, default_point }
    }

    /// A catalog with the given zones and no surveyed points (for tests and
    /// ad-hoc zone sets).
    pub fn from_zones(zones: Vec<Zone>) -> Self {
        Self::new(zones, Vec::new(), DEFAULT_ZONE_POINT)
    }

    /// Load a catalog from a JSON file.
    pub fn load_from(path: &Path) -> Result<Self, ZoneError> {
        let data = fs::read_to_string(path).map_err(|source| ZoneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: CatalogFile = serde_json::from_str(&data).map_err(|source| ZoneError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if file.zones.is_empty() {
            return Err(ZoneError::Empty(path.to_path_buf()));
        }
        if let Some(idx) = file.zones.iter().position(|z| z.name.trim().is_empty()) {
            return Err(ZoneError::BlankName(idx));
        }

        let points = file.points.unwrap_or_else(builtin::builtin_points);
        let default_point = file.default_point.unwrap_or(DEFAULT_ZONE_POINT);
        tracing::debug!(
            path = %path.display(),
            zones = file.zones.len(),
            points = points.len(),
            "loaded zone catalog"
        );
        Ok(Self::new(file.zones, points, default_point))
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn default_point(&self) -> Coordinate {
        self.default_point
    }

    /// Bucket a free-text location against this catalog.
    pub fn bucket(&self, free_text: Option<&str>, rule: MatchRule) -> ZoneBucket<'_> {
        bucketer::bucket_location(free_text, &self.zones, rule)
    }

    /// Position of the matching zone in [`Self::zones`].
    pub fn bucket_index(&self, free_text: Option<&str>, rule: MatchRule) -> Option<usize> {
        bucketer::bucket_index(free_text, &self.zones, rule)
    }

    /// Representative point for a zone label, or the default point when the
    /// label has none on record.
    pub fn zone_coordinates(&self, label: &str) -> Coordinate {
        self.points.get(label).copied().unwrap_or(self.default_point)
    }

    /// Whether a zone has its own surveyed point.
    pub fn has_point(&self, label: &str) -> bool {
        self.points.contains_key(label)
    }
}
