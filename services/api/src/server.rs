use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_card_routes;
use agent_card::analytics::TracingAnalytics;
use agent_card::config::AppConfig;
use agent_card::contacts::ContactDirectory;
use agent_card::error::AppError;
use agent_card::telemetry;
use agent_card::workflows::leads::{LeadCaptureService, SmtpMailer};
use agent_card::workflows::qualification::{QualificationService, StepCatalog};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
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

    telemetry::init(&config.telemetry)?;

    if let Err(err) = config.mail.resolve() {
        warn!(error = %err, "lead notifications will fail until SMTP is configured");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let directory = Arc::new(ContactDirectory::standard());
    let app_state = AppState::new(
        readiness_flag.clone(),
        prometheus_handle,
        directory.clone(),
        config.assets.public_dir.clone(),
    );

    let analytics = Arc::new(TracingAnalytics);
    let qualification_service = Arc::new(QualificationService::new(
        directory,
        Arc::new(StepCatalog::standard()),
        analytics.clone(),
    ));
    let lead_service = Arc::new(LeadCaptureService::new(Arc::new(SmtpMailer::new(
        config.mail.clone(),
    ))));

    let app = with_card_routes(qualification_service, lead_service, analytics)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        public_dir = %config.assets.public_dir.display(),
        "agent card service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
