//! The Dispatcher: public entry point tying ETA, zones and reports together.
//!
//! Builds per-report assessments for API responses, applies a dispatch to
//! a report, and renders the CLI's ASCII zone chart.

use crate::config::{ConfigError, DispatchConfig};
use crate::eta::{ArrivalEstimate, EtaEstimator};
use crate::geo::Coordinate;
use crate::report::{IncidentReport, ReportStatus};
use crate::stats::ZoneCount;
use crate::zones::{MatchRule, ZoneCatalog};
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

/// Written into the dispatch record when the report has no usable fix.
pub const LOCATION_UNAVAILABLE: &str = "Location data unavailable";

/// Responder unit name for a response type.
pub fn response_unit(response_type: &str) -> &'static str {
    match response_type {
        "fire" => "Fire truck",
        "medical" => "Ambulance",
        "police" => "Police unit",
        "rescue" => "Rescue team",
        _ => "Emergency response",
    }
}

/// ETA and zone for one report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportAssessment {
    pub report_id: u64,
    pub estimated_arrival: String,
    pub estimate: ArrivalEstimate,
    /// None when the location text matches no zone.
    pub barangay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinate>,
}

/// Message queued for the citizen who filed the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub report_id: u64,
    pub notification_type: &'static str,
    pub title: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub report: IncidentReport,
    pub estimated_arrival: String,
    pub notification: Notification,
    /// Confirmation shown to the dispatcher.
    pub message: String,
}

pub struct Dispatcher {
    estimator: EtaEstimator,
    catalog: ZoneCatalog,
    rule: MatchRule,
    tz: Tz,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self {
            estimator: EtaEstimator::default(),
            catalog: ZoneCatalog::builtin(),
            rule: MatchRule::default(),
            tz: chrono_tz::Asia::Manila,
        }
    }
}

impl Dispatcher {
    pub fn new(estimator: EtaEstimator, catalog: ZoneCatalog) -> Self {
        Self { estimator, catalog, ..Self::default() }
    }

    /// Build a dispatcher from validated configuration.
    pub fn from_config(config: &DispatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            estimator: config.estimator(),
            catalog: config.catalog()?,
            rule: config.match_rule,
            tz: config.tz()?,
        })
    }

    pub fn with_rule(mut self, rule: MatchRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn with_tz(mut self, tz: Tz) -> Self {
        self.tz = tz;
        self
    }

    pub fn estimator(&self) -> &EtaEstimator {
        &self.estimator
    }

    pub fn catalog(&self) -> &ZoneCatalog {
        &self.catalog
    }

    pub fn rule(&self) -> MatchRule {
        self.rule
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Wall-clock time in the desk's timezone.
    pub fn now_local(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }

    /// Zone label for a free-text location, if any zone claims it.
    pub fn zone_of(&self, location: Option<&str>) -> Option<&str> {
        self.catalog.bucket(location, self.rule).name()
    }

    pub fn assess(&self, report: &IncidentReport) -> ReportAssessment {
        let estimate = self
            .estimator
            .estimate_raw(report.latitude.as_ref(), report.longitude.as_ref());
        ReportAssessment {
            report_id: report.id,
            estimated_arrival: estimate.label().to_string(),
            estimate,
            barangay: self.zone_of(report.location_text()).map(str::to_string),
            coordinates: report.coordinate(),
        }
    }

    /// Send responders to a report.
    ///
    /// The returned report is marked in progress and carries the response
    /// type, ETA label and dispatch time. Reports with no usable fix get
    /// [`LOCATION_UNAVAILABLE`] instead of an estimate.
    pub fn dispatch(
        &self,
        report: &IncidentReport,
        response_type: &str,
        notes: Option<&str>,
        at: NaiveDateTime,
    ) -> DispatchOutcome {
        let estimated_arrival = if report.has_coordinates() {
            self.estimator
                .estimate_raw(report.latitude.as_ref(), report.longitude.as_ref())
                .label()
                .to_string()
        } else {
            LOCATION_UNAVAILABLE.to_string()
        };

        let mut updated = report.clone();
        updated.status = ReportStatus::InProgress;
        updated.response_type = Some(response_type.to_string());
        updated.estimated_arrival = Some(estimated_arrival.clone());
        updated.dispatched_at = Some(at);

        let notes = notes.map(str::trim).filter(|n| !n.is_empty());
        let mut text = format!(
            "{} has been dispatched! Estimated arrival: {}",
            response_unit(response_type),
            estimated_arrival
        );
        if let Some(n) = notes {
            text.push_str(&format!(". Notes: {}", n));
        }

        tracing::info!(
            report_id = report.id,
            response_type,
            eta = %estimated_arrival,
            "response dispatched"
        );

        DispatchOutcome {
            message: format!("Response dispatched successfully! Estimated arrival: {}", estimated_arrival),
            notification: Notification {
                report_id: report.id,
                notification_type: "dispatched",
                title: "Response Dispatched",
                message: text,
            },
            estimated_arrival,
            report: updated,
        }
    }
}

/// Horizontal bar chart of a zone distribution for terminal output.
pub fn render_ascii_distribution(rows: &[ZoneCount], bar_width: usize) -> String {
    let mut out = String::new();
    if rows.is_empty() {
        out.push_str("  (no reports matched a barangay)\n");
        return out;
    }

    let name_width = rows.iter().map(|r| r.barangay.chars().count()).max().unwrap_or(0);
    let max = rows.iter().map(|r| r.count).max().unwrap_or(0).max(1);
    let total: u32 = rows.iter().map(|r| r.count).sum();

    out.push_str(&format!("  Reports by barangay ({} matched)\n", total));
    out.push_str(&format!("  {}\n", "─".repeat(name_width + bar_width + 8)));
    for row in rows {
        let len = (row.count as usize * bar_width).div_ceil(max as usize);
        out.push_str(&format!(
            "  {:<name_width$} │{:<bar_width$} {:>4}\n",
            row.barangay,
            "█".repeat(len),
            row.count,
            name_width = name_width,
            bar_width = bar_width,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eta::DEFAULT_ORIGIN;
    use crate::zones::Zone;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn test_response_units() {
        assert_eq!(response_unit("fire"), "Fire truck");
        assert_eq!(response_unit("medical"), "Ambulance");
        assert_eq!(response_unit("police"), "Police unit");
        assert_eq!(response_unit("rescue"), "Rescue team");
        assert_eq!(response_unit("boat"), "Emergency response");
    }

    #[test]
    fn test_assess() {
        let d = Dispatcher::default();
        let r = IncidentReport::new(9, "fire", at(8))
            .with_location("Purok 3, Alupidian, Tigbauan")
            .with_coords(10.7746, 122.3765);
        let a = d.assess(&r);
        assert_eq!(a.estimated_arrival, "10-20 minutes");
        assert_eq!(a.barangay.as_deref(), Some("Alupidian"));
        assert!(a.estimate.is_known());
    }

    #[test]
    fn test_assess_without_fix() {
        let d = Dispatcher::default();
        let r = IncidentReport::new(10, "fire", at(8)).with_location("Nowhereville");
        let a = d.assess(&r);
        assert_eq!(a.estimated_arrival, "Calculating...");
        assert_eq!(a.barangay, None);
        assert_eq!(a.coordinates, None);
    }

    #[test]
    fn test_dispatch_with_fix() {
        let d = Dispatcher::default();
        let r = IncidentReport::new(11, "fire", at(8)).with_coords(10.6746, 122.3765);
        let out = d.dispatch(&r, "fire", Some("  bring ladder "), at(9));
        assert_eq!(out.estimated_arrival, "Less than 5 minutes");
        assert_eq!(out.report.status, ReportStatus::InProgress);
        assert_eq!(out.report.dispatched_at, Some(at(9)));
        assert_eq!(out.report.response_type.as_deref(), Some("fire"));
        assert_eq!(
            out.notification.message,
            "Fire truck has been dispatched! Estimated arrival: Less than 5 minutes. Notes: bring ladder"
        );
        assert_eq!(
            out.message,
            "Response dispatched successfully! Estimated arrival: Less than 5 minutes"
        );
    }

    #[test]
    fn test_dispatch_without_fix() {
        let d = Dispatcher::default();
        let r = IncidentReport::new(12, "medical", at(8)).with_coords(0.0, 122.0);
        let out = d.dispatch(&r, "medical", Some(""), at(9));
        assert_eq!(out.estimated_arrival, LOCATION_UNAVAILABLE);
        assert_eq!(
            out.notification.message,
            "Ambulance has been dispatched! Estimated arrival: Location data unavailable"
        );
        // the original report is untouched
        assert_eq!(r.status, ReportStatus::Pending);
    }

    #[test]
    fn test_blank_notes_are_dropped() {
        let d = Dispatcher::default();
        let r = IncidentReport::new(14, "police", at(8)).with_coords(10.6746, 122.3765);
        let out = d.dispatch(&r, "police", Some("   "), at(9));
        assert_eq!(
            out.notification.message,
            "Police unit has been dispatched! Estimated arrival: Less than 5 minutes"
        );
    }

    #[test]
    fn test_injected_catalog_and_origin() {
        let origin = Coordinate::new(10.7746, 122.3765);
        let d = Dispatcher::new(
            EtaEstimator::new(origin, 40.0),
            ZoneCatalog::from_zones(vec![Zone::new("Harbor")]),
        )
        .with_rule(MatchRule::NameOnly);
        let r = IncidentReport::new(13, "fire", at(8))
            .with_location("Harbor pier 2")
            .with_coords(DEFAULT_ORIGIN.lat, DEFAULT_ORIGIN.lng);
        let a = d.assess(&r);
        assert_eq!(a.barangay.as_deref(), Some("Harbor"));
        assert_eq!(a.estimated_arrival, "10-20 minutes");
    }

    #[test]
    fn test_from_config() {
        let cfg = DispatchConfig { match_rule: MatchRule::NameOnly, ..DispatchConfig::default() };
        let d = Dispatcher::from_config(&cfg).unwrap();
        assert_eq!(d.rule(), MatchRule::NameOnly);
        assert_eq!(d.tz(), chrono_tz::Asia::Manila);
        assert_eq!(d.catalog().len(), 52);
    }

    #[test]
    fn test_render_ascii_distribution() {
        let rows = vec![
            ZoneCount { barangay: "Alupidian".into(), count: 4 },
            ZoneCount { barangay: "Taro".into(), count: 1 },
        ];
        let out = render_ascii_distribution(&rows, 20);
        assert!(out.contains("5 matched"));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2].matches('█').count(), 20);
        assert_eq!(lines[3].matches('█').count(), 5);
        assert!(lines[3].trim_end().ends_with('1'));
    }

    #[test]
    fn test_render_empty() {
        assert!(render_ascii_distribution(&[], 20).contains("no reports"));
    }
}
