use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use grinder_advisor::config::AppConfig;
use grinder_advisor::error::AppError;
use grinder_advisor::recommendation::{FileArtifacts, PredictionService};
use grinder_advisor::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    args.model.apply(&mut config.model);

    telemetry::init(&config.telemetry)?;

    let service = Arc::new(PredictionService::new(FileArtifacts::from_config(
        &config.model,
    )));
    match service.warm_up() {
        Ok(()) => info!(
            tree = %config.model.tree_path.display(),
            "model loaded at startup"
        ),
        Err(err) => warn!(
            error = %err,
            "model will be loaded on first request"
        ),
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        model: service.clone(),
    };

    let app = with_service_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "grinder recommendation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
