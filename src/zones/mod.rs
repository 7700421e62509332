//! Barangay zones: the roster, free-text bucketing, and map points.
//!
//! Zones are configuration, not state. A [`ZoneCatalog`] is built once
//! (built-in roster or a JSON file) and shared read-only.

pub mod bucketer;
pub mod builtin;
pub mod catalog;
pub mod types;

pub use bucketer::{bucket_index, bucket_location, zone_matches};
pub use builtin::{builtin_points, builtin_zones, DEFAULT_ZONE_POINT};
pub use catalog::ZoneCatalog;
pub use types::{MatchRule, Zone, ZoneBucket, ZoneError, ZonePoint};
