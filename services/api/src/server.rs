use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryRatingCache};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use care_quality::assessment::FacilityAssessmentService;
use care_quality::config::AppConfig;
use care_quality::error::AppError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut config: AppConfig, mut args: ServeArgs) -> Result<(), AppError> {
    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let base_rate = config.engine.pricing.base_monthly_rate;
    let assessment_service = Arc::new(FacilityAssessmentService::new(
        config.engine.clone(),
        Arc::new(InMemoryRatingCache::default()),
    ));

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, base_rate, "childcare quality engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
