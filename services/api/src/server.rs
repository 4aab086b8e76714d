use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use propstack::bookings::BookingService;
use propstack::config::AppConfig;
use propstack::enquiries::EnquiryService;
use propstack::error::AppError;
use propstack::notify::Notifier;
use propstack::properties::ListingService;
use propstack::telemetry;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{
    AppState, CityDirectory, InMemoryBookingStore, InMemoryEnquiryStore, InMemoryPropertyStore,
    LocalMediaGateway, LoggingEmail, LoggingSms,
};
use crate::routes::with_api_routes;

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

    let properties = Arc::new(InMemoryPropertyStore::default());
    let bookings = Arc::new(InMemoryBookingStore::default());
    let enquiries = Arc::new(InMemoryEnquiryStore::default());
    let cities = Arc::new(CityDirectory::seeded());
    let media = Arc::new(LocalMediaGateway::new(&config.media));
    let notifier = Arc::new(Notifier::new(
        config.contact.clone(),
        Box::new(LoggingSms),
        Box::new(LoggingEmail),
    ));

    let listing_service = Arc::new(ListingService::new(properties.clone(), cities.clone(), media));
    let booking_service = Arc::new(BookingService::new(bookings, properties, notifier.clone()));
    let enquiry_service = Arc::new(EnquiryService::new(enquiries, notifier));

    let app = with_api_routes(listing_service, booking_service, enquiry_service, cities)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "propstack api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
