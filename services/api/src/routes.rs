use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde_json::json;

use propstack::bookings::{booking_router, BookingService, BookingStore};
use propstack::directory::{self, CityStore};
use propstack::enquiries::{enquiry_router, EnquiryService, EnquiryStore};
use propstack::properties::media::MediaGateway;
use propstack::properties::repository::PropertyStore;
use propstack::properties::{property_router, ListingService};

use crate::infra::AppState;

/// One router for the whole platform: every domain surface plus the
/// operational endpoints.
pub(crate) fn with_api_routes<S, C, M, B, E>(
    listings: Arc<ListingService<S, C, M>>,
    bookings: Arc<BookingService<B, S>>,
    enquiries: Arc<EnquiryService<E>>,
    cities: Arc<C>,
) -> axum::Router
where
    S: PropertyStore + 'static,
    C: CityStore + 'static,
    M: MediaGateway + 'static,
    B: BookingStore + 'static,
    E: EnquiryStore + 'static,
{
    property_router(listings)
        .merge(booking_router(bookings))
        .merge(enquiry_router(enquiries))
        .merge(directory::router(cities))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
