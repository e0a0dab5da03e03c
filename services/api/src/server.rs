use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryListingStore, InMemoryPhotoStore, InMemoryVisitBook,
    LoggingInterestPublisher,
};
use crate::routes::marketplace_router;
use arriendo::assistant::RuleBasedAssistant;
use arriendo::config::AppConfig;
use arriendo::error::AppError;
use arriendo::listings::{ListingGallery, ListingService};
use arriendo::telemetry;
use arriendo::visits::VisitDesk;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
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

    let store = Arc::new(InMemoryListingStore::default());
    let interest = Arc::new(LoggingInterestPublisher::default());
    let catalog = Arc::new(ListingService::new(store, interest));
    let desk = Arc::new(VisitDesk::new(Arc::new(InMemoryVisitBook::default())));
    let assistant = Arc::new(RuleBasedAssistant::new(catalog.clone()));
    let billing = Arc::new(config.billing.clone());
    let gallery = Arc::new(ListingGallery::new(Box::new(InMemoryPhotoStore::default())));

    let app = marketplace_router(catalog, desk, assistant, billing, gallery)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "rental marketplace service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
