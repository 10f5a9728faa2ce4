use crate::cli::ServeArgs;
use crate::infra::{standard_rubric, AppState, InMemoryAnalysisRepository};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use inspector_ai::config::AppConfig;
use inspector_ai::error::AppError;
use inspector_ai::telemetry;
use inspector_ai::workflows::analysis::{InspectionAnalysisService, OpenAiGenerator};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let generator = Arc::new(OpenAiGenerator::new(config.generator.clone())?);
    let repository = Arc::new(InMemoryAnalysisRepository::default());
    let analysis_service = Arc::new(InspectionAnalysisService::new(
        generator,
        repository,
        standard_rubric(),
    ));

    let app = with_service_routes(analysis_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "inspection analysis service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
