use crate::cli::ServeArgs;
use crate::infra::{default_lending_policy, AppState, InMemoryDossierRepository, InMemoryNotifier};
use crate::routes::with_dossier_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use feasibility_engine::config::AppConfig;
use feasibility_engine::dossier::FeasibilityService;
use feasibility_engine::error::AppError;
use feasibility_engine::telemetry;
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

    let repository = Arc::new(InMemoryDossierRepository::default());
    let notifier = Arc::new(InMemoryNotifier::default());
    let feasibility_service = Arc::new(FeasibilityService::new(
        repository,
        notifier,
        default_lending_policy(),
    ));

    let app = with_dossier_routes(feasibility_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "mortgage feasibility service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
