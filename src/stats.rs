//! Dashboard aggregations over incident reports.
//!
//! Everything here is a group-by/count over an in-memory slice, reshaped
//! into label/series pairs a chart library can take directly.

use crate::report::{IncidentReport, ReportStatus, EMERGENCY_TYPES};
use crate::zones::{MatchRule, ZoneCatalog};
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Zones shown on the dashboard bar chart.
pub const TOP_ZONES: usize = 15;

/// Reports per heatmap zone at which intensity saturates.
const INTENSITY_SATURATION: f64 = 10.0;

const RECENT_LIMIT: usize = 10;

// ─── Zone aggregations ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneCount {
    pub barangay: String,
    pub count: u32,
}

/// Per-zone report counts, busiest first. Unmatched and empty locations are
/// dropped, as are zones with no reports. Ties keep catalog order.
pub fn zone_distribution(
    reports: &[IncidentReport],
    catalog: &ZoneCatalog,
    rule: MatchRule,
) -> Vec<ZoneCount> {
    let counts = count_by_zone(reports.iter(), catalog, rule);

    let mut rows: Vec<ZoneCount> = catalog
        .zones()
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(zone, count)| ZoneCount { barangay: zone.name.clone(), count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

fn count_by_zone<'r>(
    reports: impl Iterator<Item = &'r IncidentReport>,
    catalog: &ZoneCatalog,
    rule: MatchRule,
) -> Vec<u32> {
    let mut counts = vec![0u32; catalog.len()];
    for report in reports {
        if let Some(idx) = catalog.bucket_index(report.location_text(), rule) {
            counts[idx] += 1;
        }
    }
    counts
}

/// A zone drawn on the heatmap at its representative point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneHeatPoint {
    pub barangay: String,
    pub count: u32,
    pub latitude: f64,
    pub longitude: f64,
    /// `count / 10`, capped at 1.
    pub intensity: f64,
}

/// Heatmap points per zone, in catalog order. Only reports carrying a usable
/// fix are counted; zones with no such reports are omitted.
pub fn zone_heatmap(
    reports: &[IncidentReport],
    catalog: &ZoneCatalog,
    rule: MatchRule,
) -> Vec<ZoneHeatPoint> {
    let located = reports.iter().filter(|r| r.has_coordinates());
    let counts = count_by_zone(located, catalog, rule);

    catalog
        .zones()
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(zone, count)| {
            let point = catalog.zone_coordinates(&zone.name);
            ZoneHeatPoint {
                barangay: zone.name.clone(),
                count,
                latitude: point.lat,
                longitude: point.lng,
                intensity: heat_intensity(count),
            }
        })
        .collect()
}

pub fn heat_intensity(count: u32) -> f64 {
    (f64::from(count) / INTENSITY_SATURATION).min(1.0)
}

/// Month-by-month counts per zone for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyZoneStats {
    pub months: Vec<&'static str>,
    /// Zones with at least one report that year, alphabetical.
    pub barangays: Vec<String>,
    pub monthly_stats: BTreeMap<String, Vec<u32>>,
    pub total_reports: Vec<u32>,
    pub year: i32,
}

pub fn monthly_zone_stats(
    reports: &[IncidentReport],
    year: i32,
    catalog: &ZoneCatalog,
    rule: MatchRule,
) -> MonthlyZoneStats {
    let mut monthly_stats: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    let mut total_reports = vec![0u32; 12];

    for report in reports.iter().filter(|r| r.created_at.year() == year) {
        let Some(zone) = catalog.bucket(report.location_text(), rule).name() else {
            continue;
        };
        let month = report.created_at.month0() as usize;
        monthly_stats.entry(zone.to_string()).or_insert_with(|| vec![0; 12])[month] += 1;
        total_reports[month] += 1;
    }

    MonthlyZoneStats {
        months: MONTH_LABELS.to_vec(),
        barangays: monthly_stats.keys().cloned().collect(),
        monthly_stats,
        total_reports,
        year,
    }
}

// ─── Dispatch aggregations ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSeries {
    pub emergency_type: String,
    pub counts: Vec<u32>,
}

/// Dispatches per month for one year, split by emergency type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyDispatchStats {
    pub months: Vec<&'static str>,
    pub emergency_types: Vec<TypeSeries>,
    pub total_dispatches: Vec<u32>,
    pub year: i32,
}

/// Counts by `dispatched_at` month. Types outside [`EMERGENCY_TYPES`] are
/// not charted and do not count toward the totals.
pub fn monthly_dispatch_stats(reports: &[IncidentReport], year: i32) -> MonthlyDispatchStats {
    let mut series: Vec<TypeSeries> = EMERGENCY_TYPES
        .iter()
        .map(|t| TypeSeries { emergency_type: t.to_string(), counts: vec![0; 12] })
        .collect();
    let mut total_dispatches = vec![0u32; 12];

    for report in reports {
        let Some(dispatched) = report.dispatched_at.filter(|d| d.year() == year) else {
            continue;
        };
        let Some(s) = series.iter_mut().find(|s| s.emergency_type == report.emergency_type) else {
            continue;
        };
        let month = dispatched.month0() as usize;
        s.counts[month] += 1;
        total_dispatches[month] += 1;
    }

    MonthlyDispatchStats {
        months: MONTH_LABELS.to_vec(),
        emergency_types: series,
        total_dispatches,
        year,
    }
}

// ─── Heatmap headline numbers ───────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub emergency_type: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatmapSummary {
    pub total: u32,
    pub active: u32,
    pub resolved: u32,
    pub today: u32,
    pub type_distribution: Vec<TypeCount>,
    /// Located reports from the last 24 hours, newest first.
    pub recent: Vec<IncidentReport>,
}

/// Headline counts over reports that carry a usable fix.
pub fn heatmap_summary(reports: &[IncidentReport], now: NaiveDateTime) -> HeatmapSummary {
    let located: Vec<&IncidentReport> = reports.iter().filter(|r| r.has_coordinates()).collect();
    let today = now.date();
    let since = now - TimeDelta::hours(24);

    let mut recent: Vec<IncidentReport> = located
        .iter()
        .filter(|r| r.created_at >= since)
        .map(|r| (*r).clone())
        .collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(RECENT_LIMIT);

    HeatmapSummary {
        total: located.len() as u32,
        active: located.iter().filter(|r| r.status.is_active()).count() as u32,
        resolved: located.iter().filter(|r| r.status == ReportStatus::Resolved).count() as u32,
        today: located.iter().filter(|r| r.created_at.date() == today).count() as u32,
        type_distribution: type_distribution(located.iter().copied()),
        recent,
    }
}

/// Report counts per emergency type, busiest first; ties keep first-seen order.
pub fn type_distribution<'r>(reports: impl Iterator<Item = &'r IncidentReport>) -> Vec<TypeCount> {
    let mut rows: Vec<TypeCount> = Vec::new();
    for report in reports {
        match rows.iter_mut().find(|t| t.emergency_type == report.emergency_type) {
            Some(row) => row.count += 1,
            None => rows.push(TypeCount { emergency_type: report.emergency_type.clone(), count: 1 }),
        }
    }
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

// ─── Chart shapes ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<u32>,
}

/// Labels plus one or more aligned data series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartSeries {
    fn single(labels: Vec<String>, label: &str, data: Vec<u32>) -> Self {
        Self {
            labels,
            datasets: vec![Dataset { label: label.to_string(), data }],
        }
    }
}

/// Reports per calendar day, oldest first.
pub fn daily_totals(reports: &[IncidentReport]) -> ChartSeries {
    let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for report in reports {
        *per_day.entry(report.created_at.date()).or_default() += 1;
    }
    let labels = per_day.keys().map(|d| d.format("%Y-%m-%d").to_string()).collect();
    ChartSeries::single(labels, "Total Reports", per_day.into_values().collect())
}

/// Reports per emergency type in first-seen order, labels title-cased.
pub fn type_totals(reports: &[IncidentReport]) -> ChartSeries {
    let mut types: Vec<(String, u32)> = Vec::new();
    for report in reports {
        match types.iter_mut().find(|(t, _)| *t == report.emergency_type) {
            Some((_, n)) => *n += 1,
            None => types.push((report.emergency_type.clone(), 1)),
        }
    }
    let labels = types.iter().map(|(t, _)| title_case(t)).collect();
    let data = types.into_iter().map(|(_, n)| n).collect();
    ChartSeries::single(labels, "Emergency Types", data)
}

/// The first `n` rows of a zone distribution as a bar series.
pub fn top_zones(distribution: &[ZoneCount], n: usize) -> ChartSeries {
    let rows = &distribution[..n.min(distribution.len())];
    ChartSeries::single(
        rows.iter().map(|r| r.barangay.clone()).collect(),
        "Emergency Reports by Barangay",
        rows.iter().map(|r| r.count).collect(),
    )
}

/// Total line plus one series per emergency type.
pub fn monthly_dispatch_chart(stats: &MonthlyDispatchStats) -> ChartSeries {
    let mut datasets = vec![Dataset {
        label: "Total Dispatches".into(),
        data: stats.total_dispatches.clone(),
    }];
    datasets.extend(stats.emergency_types.iter().map(|s| Dataset {
        label: title_case(&s.emergency_type),
        data: s.counts.clone(),
    }));
    ChartSeries {
        labels: stats.months.iter().map(|m| m.to_string()).collect(),
        datasets,
    }
}

/// Years that have at least one report, newest first.
pub fn available_years(reports: &[IncidentReport]) -> Vec<i32> {
    let years: BTreeSet<i32> = reports.iter().map(|r| r.created_at.year()).collect();
    years.into_iter().rev().collect()
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Everything the admin dashboard charts in one payload.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardCharts {
    pub line_chart: ChartSeries,
    pub bar_chart: ChartSeries,
    pub brgy_chart: ChartSeries,
    pub monthly_chart: ChartSeries,
    pub monthly_brgy_chart: MonthlyZoneStats,
    pub available_years: Vec<i32>,
}

/// `rule` drives the bar chart. The monthly barangay chart always matches on
/// names and aliases only, as the month-by-month query always has.
pub fn dashboard_charts(
    reports: &[IncidentReport],
    year: i32,
    catalog: &ZoneCatalog,
    rule: MatchRule,
) -> DashboardCharts {
    let distribution = zone_distribution(reports, catalog, rule);
    DashboardCharts {
        line_chart: daily_totals(reports),
        bar_chart: type_totals(reports),
        brgy_chart: top_zones(&distribution, TOP_ZONES),
        monthly_chart: monthly_dispatch_chart(&monthly_dispatch_stats(reports, year)),
        monthly_brgy_chart: monthly_zone_stats(reports, year, catalog, MatchRule::NameOnly),
        available_years: available_years(reports),
    }
}
