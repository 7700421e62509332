//! HTTP API over the dispatch desk: ETA lookups, zone bucketing, dashboard
//! aggregations and dispatching, all JSON.

mod handlers;
mod state;

pub use state::AppState;

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/eta", get(handlers::eta))
        .route("/api/zone", get(handlers::zone))
        .route("/api/zones", get(handlers::zone_list))
        .route("/api/stats", post(handlers::stats))
        .route("/api/heatmap", post(handlers::heatmap))
        .route("/api/dispatch", post(handlers::dispatch))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

pub async fn start(state: AppState, host: &str, port: u16) -> std::io::Result<()> {
    let app = build_router(state);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, "dispatch API listening");
    eprintln!("  Tigbauan dispatch API listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app).await
}
