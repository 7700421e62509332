use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::dispatch::{DispatchOutcome, ReportAssessment};
use crate::eta::ArrivalEstimate;
use crate::geo::{Coordinate, RawDegrees};
use crate::report::IncidentReport;
use crate::stats::{self, DashboardCharts, HeatmapSummary, ZoneHeatPoint};
use crate::zones::MatchRule;

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(rejection.status(), rejection.body_text())
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

// ─── GET /api/eta ────────────────────────────────────────────────

/// Degrees arrive as text so "", "0" and junk reach the estimator as-is.
#[derive(Deserialize)]
pub struct EtaQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

#[derive(Serialize)]
pub struct EtaResponse {
    pub estimated_arrival: &'static str,
    pub estimate: ArrivalEstimate,
    pub origin: Coordinate,
    pub average_speed_kmh: f64,
}

pub async fn eta(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EtaQuery>,
) -> Json<EtaResponse> {
    let estimator = state.dispatcher.estimator();
    let lat = params.lat.as_deref().map(RawDegrees::from);
    let lng = params.lng.as_deref().map(RawDegrees::from);
    let estimate = estimator.estimate_raw(lat.as_ref(), lng.as_ref());

    tracing::info!(
        lat = params.lat.as_deref().unwrap_or(""),
        lng = params.lng.as_deref().unwrap_or(""),
        eta = estimate.label(),
        "GET /api/eta"
    );

    Json(EtaResponse {
        estimated_arrival: estimate.label(),
        estimate,
        origin: estimator.origin,
        average_speed_kmh: estimator.average_speed_kmh,
    })
}

// ─── GET /api/zone ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ZoneQuery {
    pub location: Option<String>,
    pub rule: Option<String>,
}

#[derive(Serialize)]
pub struct ZoneResponse {
    pub location: Option<String>,
    pub barangay: Option<String>,
    pub matched: bool,
    pub rule: MatchRule,
}

pub async fn zone(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ZoneQuery>,
) -> Result<Json<ZoneResponse>, ApiError> {
    let rule = parse_rule(params.rule.as_deref(), state.dispatcher.rule())?;
    let bucket = state
        .dispatcher
        .catalog()
        .bucket(params.location.as_deref(), rule);
    let barangay = bucket.name().map(str::to_string);

    tracing::info!(
        location = params.location.as_deref().unwrap_or(""),
        barangay = barangay.as_deref().unwrap_or("-"),
        %rule,
        "GET /api/zone"
    );

    Ok(Json(ZoneResponse {
        matched: barangay.is_some(),
        location: params.location,
        barangay,
        rule,
    }))
}

// ─── GET /api/zones ──────────────────────────────────────────────

#[derive(Serialize)]
pub struct ZoneInfo {
    pub name: String,
    pub aliases: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// False when the zone is drawn at the catalog's fallback point.
    pub has_point: bool,
}

pub async fn zone_list(State(state): State<Arc<AppState>>) -> Json<Vec<ZoneInfo>> {
    let catalog = state.dispatcher.catalog();
    let zones = catalog
        .zones()
        .iter()
        .map(|z| {
            let point = catalog.zone_coordinates(&z.name);
            ZoneInfo {
                name: z.name.clone(),
                aliases: z.aliases.clone(),
                latitude: point.lat,
                longitude: point.lng,
                has_point: catalog.has_point(&z.name),
            }
        })
        .collect();
    Json(zones)
}

// ─── POST /api/stats ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct StatsRequest {
    pub reports: Vec<IncidentReport>,
    pub year: Option<i32>,
    pub rule: Option<MatchRule>,
}

pub async fn stats(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StatsRequest>, JsonRejection>,
) -> Result<Json<DashboardCharts>, ApiError> {
    let start = Instant::now();
    let Json(req) = payload?;

    let d = &state.dispatcher;
    let year = req.year.unwrap_or_else(|| d.now_local().year());
    let rule = req.rule.unwrap_or(d.rule());
    let charts = stats::dashboard_charts(&req.reports, year, d.catalog(), rule);

    tracing::info!(
        reports = req.reports.len(),
        year,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "POST /api/stats"
    );

    Ok(Json(charts))
}

// ─── POST /api/heatmap ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct HeatmapRequest {
    pub reports: Vec<IncidentReport>,
    pub rule: Option<MatchRule>,
}

#[derive(Serialize)]
pub struct HeatmapResponse {
    pub summary: HeatmapSummary,
    pub zones: Vec<ZoneHeatPoint>,
    /// ETA and zone for each recent report.
    pub recent: Vec<ReportAssessment>,
}

pub async fn heatmap(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<HeatmapRequest>, JsonRejection>,
) -> Result<Json<HeatmapResponse>, ApiError> {
    let Json(req) = payload?;

    let d = &state.dispatcher;
    let rule = req.rule.unwrap_or(d.rule());
    let summary = stats::heatmap_summary(&req.reports, d.now_local());
    let zones = stats::zone_heatmap(&req.reports, d.catalog(), rule);
    let recent = summary.recent.iter().map(|r| d.assess(r)).collect();

    tracing::info!(
        reports = req.reports.len(),
        located = summary.total,
        zones = zones.len(),
        "POST /api/heatmap"
    );

    Ok(Json(HeatmapResponse { summary, zones, recent }))
}

// ─── POST /api/dispatch ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct DispatchRequest {
    pub report: IncidentReport,
    pub response_type: String,
    pub notes: Option<String>,
}

pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DispatchRequest>, JsonRejection>,
) -> Result<Json<DispatchOutcome>, ApiError> {
    let Json(req) = payload?;

    let response_type = req.response_type.trim();
    if response_type.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Response type is required"));
    }

    let d = &state.dispatcher;
    let outcome = d.dispatch(&req.report, response_type, req.notes.as_deref(), d.now_local());
    Ok(Json(outcome))
}

// ─── Helpers ─────────────────────────────────────────────────────

fn parse_rule(s: Option<&str>, fallback: MatchRule) -> Result<MatchRule, ApiError> {
    match s {
        None | Some("") => Ok(fallback),
        Some(other) => other
            .parse()
            .map_err(|e: String| api_error(StatusCode::BAD_REQUEST, e)),
    }
}
