use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::SecondsFormat;
use grinder_advisor::recommendation::{recommendation_router, ArtifactSource, PredictionService};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

pub(crate) fn with_service_routes<S>(service: Arc<PredictionService<S>>) -> Router
where
    S: ArtifactSource + 'static,
{
    recommendation_router(service)
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if !state.readiness.load(Ordering::Relaxed) {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "initializing" })),
        );
    }

    let loaded_at = state
        .model
        .loaded_at()
        .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true));

    (
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "model": state.model.state().label(),
            "model_loaded_at": loaded_at,
        })),
    )
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
