//! Incident report records as they come out of the portal's store.

use crate::geo::{Coordinate, RawDegrees};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Emergency categories tracked in the monthly dispatch chart, in chart order.
pub const EMERGENCY_TYPES: &[&str] = &["fire", "medical", "natural", "accident", "other"];

/// Lifecycle of a report on the admin side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
}

impl ReportStatus {
    /// Pending and in-progress reports still need responders.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

fn default_emergency_type() -> String {
    "other".into()
}

/// One citizen-submitted incident.
///
/// Coordinates are kept raw: the store holds decimals, strings and zeros
/// side by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentReport {
    pub id: u64,
    #[serde(default = "default_emergency_type")]
    pub emergency_type: String,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default)]
    pub latitude: Option<RawDegrees>,
    #[serde(default)]
    pub longitude: Option<RawDegrees>,
    /// Free-text location typed by the citizen.
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub dispatched_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_arrival: Option<String>,
}

impl IncidentReport {
    pub fn new(id: u64, emergency_type: &str, created_at: NaiveDateTime) -> Self {
        Self {
            id,
            emergency_type: emergency_type.to_string(),
            status: ReportStatus::Pending,
            latitude: None,
            longitude: None,
            location: None,
            description: None,
            created_at,
            dispatched_at: None,
            response_type: None,
            estimated_arrival: None,
        }
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn with_coords(mut self, lat: f64, lng: f64) -> Self {
        self.latitude = Some(RawDegrees::Number(lat));
        self.longitude = Some(RawDegrees::Number(lng));
        self
    }

    pub fn with_status(mut self, status: ReportStatus) -> Self {
        self.status = status;
        self
    }

    pub fn latitude_value(&self) -> Option<f64> {
        self.latitude.as_ref().and_then(RawDegrees::value)
    }

    pub fn longitude_value(&self) -> Option<f64> {
        self.longitude.as_ref().and_then(RawDegrees::value)
    }

    /// The report's fix, unless it is missing, zero, or unparseable.
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_known(self.latitude_value(), self.longitude_value())
    }

    pub fn has_coordinates(&self) -> bool {
        self.coordinate().is_some()
    }

    /// Non-empty free-text location, if any.
    pub fn location_text(&self) -> Option<&str> {
        self.location.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(8, 30, 0).unwrap()
    }

    #[test]
    fn test_deserialize_mixed_coordinates() {
        let json = r#"{
            "id": 7,
            "emergency_type": "fire",
            "status": "in_progress",
            "latitude": "10.7005",
            "longitude": 122.3897,
            "location": "Purok 3, Alupidian, Tigbauan",
            "created_at": "2025-03-14T08:30:00"
        }"#;
        let r: IncidentReport = serde_json::from_str(json).unwrap();
        assert_eq!(r.status, ReportStatus::InProgress);
        assert_eq!(r.coordinate(), Some(Coordinate::new(10.7005, 122.3897)));
        assert!(r.dispatched_at.is_none());
    }

    #[test]
    fn test_defaults() {
        let r: IncidentReport =
            serde_json::from_str(r#"{ "id": 1, "created_at": "2025-01-01T00:00:00" }"#).unwrap();
        assert_eq!(r.emergency_type, "other");
        assert_eq!(r.status, ReportStatus::Pending);
        assert!(!r.has_coordinates());
        assert_eq!(r.location_text(), None);
    }

    #[test]
    fn test_zero_fix_is_unknown() {
        let r = IncidentReport::new(1, "medical", at(2025, 5, 1)).with_coords(0.0, 0.0);
        assert!(!r.has_coordinates());
    }

    #[test]
    fn test_null_coordinates() {
        let json = r#"{ "id": 2, "latitude": null, "longitude": null, "created_at": "2025-01-01T00:00:00" }"#;
        let r: IncidentReport = serde_json::from_str(json).unwrap();
        assert!(r.coordinate().is_none());
    }

    #[test]
    fn test_non_numeric_json_coordinates() {
        for junk in ["true", "{}", "[10.7]"] {
            let json = format!(
                r#"{{ "id": 4, "latitude": {junk}, "longitude": 122.3765, "created_at": "2025-01-01T00:00:00" }}"#
            );
            let r: IncidentReport = serde_json::from_str(&json).unwrap();
            assert_eq!(r.coordinate(), None, "{junk}");
            assert!(!r.has_coordinates());
        }
    }

    #[test]
    fn test_status_activity() {
        assert!(ReportStatus::Pending.is_active());
        assert!(ReportStatus::InProgress.is_active());
        assert!(!ReportStatus::Resolved.is_active());
        assert_eq!(ReportStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn test_empty_location_text() {
        let r = IncidentReport::new(3, "fire", at(2025, 5, 1)).with_location("");
        assert_eq!(r.location_text(), None);
    }
}
