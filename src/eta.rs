//! Banded arrival-time estimation.
//!
//! A report's coordinates are turned into a coarse time range from the
//! dispatch origin. Estimation never fails: missing data and numeric trouble
//! both come back as [`ArrivalEstimate::Unavailable`], which displays as
//! `"Calculating..."` in citizen-facing fields.

use crate::geo::{self, Coordinate, RawDegrees};
use serde::Serialize;
use std::fmt;

/// Tigbauan Plaza, where response units start from.
pub const DEFAULT_ORIGIN: Coordinate = Coordinate::new(10.6746, 122.3765);

/// Assumed average urban travel speed.
pub const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Display string for an estimate that could not be made.
pub const UNAVAILABLE_LABEL: &str = "Calculating...";

/// One time range: matches when `minutes < upper_minutes`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceBand {
    pub upper_minutes: f64,
    pub label: &'static str,
}

/// Ordered bands, lowest bound first. Anything past the last is `OVERFLOW_LABEL`.
pub const DISTANCE_BANDS: &[DistanceBand] = &[
    DistanceBand { upper_minutes: 5.0, label: "Less than 5 minutes" },
    DistanceBand { upper_minutes: 10.0, label: "5-10 minutes" },
    DistanceBand { upper_minutes: 20.0, label: "10-20 minutes" },
    DistanceBand { upper_minutes: 30.0, label: "20-30 minutes" },
];

pub const OVERFLOW_LABEL: &str = "30+ minutes";

/// Why no estimate was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// Latitude or longitude is null, zero, or not a number.
    MissingCoordinates,
    /// Coordinates were present but distance or time came out non-finite,
    /// or the configured speed is unusable.
    ComputationFailed,
}

/// Result of an arrival estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArrivalEstimate {
    Known {
        distance_km: f64,
        minutes: f64,
        label: &'static str,
    },
    Unavailable {
        reason: UnavailableReason,
    },
}

impl ArrivalEstimate {
    /// The string shown to users and written into dispatch records.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Known { label, .. } => label,
            Self::Unavailable { .. } => UNAVAILABLE_LABEL,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known { .. })
    }

    fn unavailable(reason: UnavailableReason) -> Self {
        Self::Unavailable { reason }
    }
}

impl fmt::Display for ArrivalEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map travel minutes to a band label. First band whose bound exceeds
/// `minutes` wins, so exactly 5.0 lands in "5-10 minutes".
pub fn band_label(minutes: f64) -> &'static str {
    DISTANCE_BANDS
        .iter()
        .find(|band| minutes < band.upper_minutes)
        .map(|band| band.label)
        .unwrap_or(OVERFLOW_LABEL)
}

/// Estimate arrival from `origin` to the given destination.
///
/// A null or zero component means the record has no usable fix.
pub fn estimate_arrival(
    origin: Coordinate,
    destination_lat: Option<f64>,
    destination_lng: Option<f64>,
    average_speed_kmh: f64,
) -> ArrivalEstimate {
    let Some(destination) = Coordinate::from_known(destination_lat, destination_lng) else {
        return ArrivalEstimate::unavailable(UnavailableReason::MissingCoordinates);
    };

    let distance_km = geo::haversine_km(origin, destination);
    let Some(minutes) = geo::travel_minutes(distance_km, average_speed_kmh) else {
        return ArrivalEstimate::unavailable(UnavailableReason::ComputationFailed);
    };

    ArrivalEstimate::Known {
        distance_km,
        minutes,
        label: band_label(minutes),
    }
}

/// Same as [`estimate_arrival`] but for raw record fields, which may hold
/// numeric strings or junk.
pub fn estimate_arrival_raw(
    origin: Coordinate,
    destination_lat: Option<&RawDegrees>,
    destination_lng: Option<&RawDegrees>,
    average_speed_kmh: f64,
) -> ArrivalEstimate {
    estimate_arrival(
        origin,
        destination_lat.and_then(RawDegrees::value),
        destination_lng.and_then(RawDegrees::value),
        average_speed_kmh,
    )
}

/// An origin and speed bundled together, as the dispatch desk uses them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EtaEstimator {
    pub origin: Coordinate,
    pub average_speed_kmh: f64,
}

impl Default for EtaEstimator {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN,
            average_speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl EtaEstimator {
    pub fn new(origin: Coordinate, average_speed_kmh: f64) -> Self {
        Self { origin, average_speed_kmh }
    }

    pub fn estimate(&self, lat: Option<f64>, lng: Option<f64>) -> ArrivalEstimate {
        estimate_arrival(self.origin, lat, lng, self.average_speed_kmh)
    }

    pub fn estimate_raw(
        &self,
        lat: Option<&RawDegrees>,
        lng: Option<&RawDegrees>,
    ) -> ArrivalEstimate {
        estimate_arrival_raw(self.origin, lat, lng, self.average_speed_kmh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_origin_to_itself() {
        let est = estimate_arrival(DEFAULT_ORIGIN, Some(10.6746), Some(122.3765), 40.0);
        assert_eq!(est.label(), "Less than 5 minutes");
        assert!(est.is_known());
    }

    #[test]
    fn test_eleven_km_north() {
        let est = estimate_arrival(DEFAULT_ORIGIN, Some(10.7746), Some(122.3765), 40.0);
        match est {
            ArrivalEstimate::Known { distance_km, minutes, label } => {
                assert_abs_diff_eq!(distance_km, 11.12, epsilon = 0.01);
                assert_abs_diff_eq!(minutes, 16.68, epsilon = 0.02);
                assert_eq!(label, "10-20 minutes");
            }
            other => panic!("expected a known estimate, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_or_missing_components() {
        for (lat, lng) in [
            (Some(0.0), Some(122.3765)),
            (Some(10.7), Some(0.0)),
            (None, Some(122.3765)),
            (Some(10.7), None),
            (None, None),
        ] {
            let est = estimate_arrival(DEFAULT_ORIGIN, lat, lng, 40.0);
            assert_eq!(
                est,
                ArrivalEstimate::Unavailable { reason: UnavailableReason::MissingCoordinates }
            );
            assert_eq!(est.label(), "Calculating...");
        }
    }

    #[test]
    fn test_zero_destination_ignores_origin() {
        let far_origin = Coordinate::new(-33.86, 151.21);
        let est = estimate_arrival(far_origin, Some(0.0), Some(0.0), 40.0);
        assert_eq!(est.label(), UNAVAILABLE_LABEL);
    }

    #[test]
    fn test_band_boundaries_exclusive() {
        assert_eq!(band_label(0.0), "Less than 5 minutes");
        assert_eq!(band_label(4.999), "Less than 5 minutes");
        assert_eq!(band_label(5.0), "5-10 minutes");
        assert_eq!(band_label(10.0), "10-20 minutes");
        assert_eq!(band_label(20.0), "20-30 minutes");
        assert_eq!(band_label(30.0), "30+ minutes");
        assert_eq!(band_label(500.0), "30+ minutes");
    }

    #[test]
    fn test_bad_speed_is_computation_failure() {
        for speed in [0.0, -40.0, f64::NAN, f64::INFINITY] {
            let est = estimate_arrival(DEFAULT_ORIGIN, Some(10.7746), Some(122.3765), speed);
            assert_eq!(
                est,
                ArrivalEstimate::Unavailable { reason: UnavailableReason::ComputationFailed }
            );
            assert_eq!(est.label(), "Calculating...");
        }
    }

    #[test]
    fn test_nan_and_out_of_range_never_panic() {
        let nan = estimate_arrival(DEFAULT_ORIGIN, Some(f64::NAN), Some(122.0), 40.0);
        assert_eq!(nan.label(), UNAVAILABLE_LABEL);

        let wild = estimate_arrival(DEFAULT_ORIGIN, Some(500.0), Some(-999.0), 40.0);
        assert!(!wild.label().is_empty());
    }

    #[test]
    fn test_raw_fields() {
        let lat = RawDegrees::from("10.7746");
        let lng = RawDegrees::from(122.3765);
        let est = estimate_arrival_raw(DEFAULT_ORIGIN, Some(&lat), Some(&lng), 40.0);
        assert_eq!(est.label(), "10-20 minutes");

        let junk = RawDegrees::from("ten point seven");
        let est = estimate_arrival_raw(DEFAULT_ORIGIN, Some(&junk), Some(&lng), 40.0);
        assert_eq!(
            est,
            ArrivalEstimate::Unavailable { reason: UnavailableReason::MissingCoordinates }
        );
    }

    #[test]
    fn test_far_destination() {
        // Roxas City, ~80 km north-east
        let est = estimate_arrival(DEFAULT_ORIGIN, Some(11.5853), Some(122.7511), 40.0);
        assert_eq!(est.label(), "30+ minutes");
    }

    #[test]
    fn test_idempotent() {
        let e = EtaEstimator::default();
        let a = e.estimate(Some(10.70), Some(122.40));
        let b = e.estimate(Some(10.70), Some(122.40));
        assert_eq!(a, b);
    }

    #[test]
    fn test_serialize_tagged() {
        let est = estimate_arrival(DEFAULT_ORIGIN, None, None, 40.0);
        let json = serde_json::to_value(est).unwrap();
        assert_eq!(json["status"], "unavailable");
        assert_eq!(json["reason"], "missing_coordinates");
    }
}
