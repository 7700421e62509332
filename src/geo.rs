//! Great-circle geometry on a spherical Earth.
//!
//! Coordinates are decimal degrees. The source records use 0 for "no fix",
//! so a zero component is never treated as the equator or prime meridian.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when both components are finite and inside the degree ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Build a coordinate from nullable record fields.
    ///
    /// Returns None when either component is missing, zero, or non-finite.
    pub fn from_known(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        let (lat, lng) = (lat?, lng?);
        if !lat.is_finite() || !lng.is_finite() || lat == 0.0 || lng == 0.0 {
            return None;
        }
        Some(Self { lat, lng })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.lat >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lng >= 0.0 { 'E' } else { 'W' };
        write!(f, "{:.4}°{}, {:.4}°{}", self.lat.abs(), ns, self.lng.abs(), ew)
    }
}

/// A coordinate component as it comes out of a persisted record: a number,
/// a numeric string, or anything else the store let through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDegrees {
    Number(f64),
    Text(String),
    /// Booleans, arrays, objects. Never parses.
    Other(serde_json::Value),
}

impl RawDegrees {
    /// Parse to degrees. Unparseable or non-finite values yield None.
    pub fn value(&self) -> Option<f64> {
        let v = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
            Self::Other(_) => return None,
        };
        v.is_finite().then_some(v)
    }
}

impl From<f64> for RawDegrees {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for RawDegrees {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Haversine distance in kilometers.
///
/// Always returns a number for finite input; out-of-range degrees are not
/// rejected, callers decide what a result means.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    // rounding can push `a` past 1 near antipodes
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Travel time in minutes at a constant speed. None for a non-positive or
/// non-finite speed, or a non-finite distance.
pub fn travel_minutes(distance_km: f64, speed_kmh: f64) -> Option<f64> {
    if !distance_km.is_finite() || !speed_kmh.is_finite() || speed_kmh <= 0.0 {
        return None;
    }
    let minutes = distance_km / speed_kmh * 60.0;
    minutes.is_finite().then_some(minutes)
}
