use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::error;

use super::explain::Rule;
use super::model::ArtifactSource;
use super::questionnaire::{Answers, QuestionnaireRequest};
use super::service::{HealthReport, HealthStatus, PredictionService};
use crate::error::AppError;

/// Body returned by a successful `/predict` call.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    pub product: String,
    pub rules: Vec<Rule>,
    pub answers: Answers,
}

/// Router builder exposing the prediction and health endpoints.
pub fn recommendation_router<S>(service: Arc<PredictionService<S>>) -> Router
where
    S: ArtifactSource + 'static,
{
    Router::new()
        .route("/predict", post(predict_handler::<S>))
        .route("/health", get(health_handler::<S>))
        .with_state(service)
}

pub(crate) async fn predict_handler<S>(
    State(service): State<Arc<PredictionService<S>>>,
    body: Bytes,
) -> Result<Json<PredictResponse>, AppError>
where
    S: ArtifactSource + 'static,
{
    let answers = QuestionnaireRequest::from_body(&body)?.into_answers()?;

    // The first request may still have to read the artifacts from disk.
    let (prediction, answers) = tokio::task::spawn_blocking(move || {
        let prediction = service.predict(&answers);
        (prediction, answers)
    })
    .await
    .map_err(|err| AppError::Server(axum::Error::new(err)))?;

    let prediction = prediction.map_err(|err| {
        error!(error = %err, "prediction failed");
        AppError::from(err)
    })?;

    Ok(Json(PredictResponse {
        success: true,
        product: prediction.product,
        rules: prediction.rules,
        answers,
    }))
}

pub(crate) async fn health_handler<S>(State(service): State<Arc<PredictionService<S>>>) -> Response
where
    S: ArtifactSource + 'static,
{
    let report = tokio::task::spawn_blocking(move || service.health())
        .await
        .unwrap_or_else(|err| HealthReport {
            status: HealthStatus::Error,
            message: format!("health check did not complete: {err}"),
        });
    let status = match report.status {
        HealthStatus::Ok => StatusCode::OK,
        HealthStatus::Error => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(report)).into_response()
}
