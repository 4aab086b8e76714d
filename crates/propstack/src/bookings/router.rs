use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::RequireActor;
use crate::properties::repository::PropertyStore;
use crate::storage::StoreError;

use super::domain::{BookingId, BookingStatus};
use super::repository::{BookingQuery, BookingStore};
use super::service::{BookingError, BookingRequest, BookingService};

/// Router builder exposing the booking endpoints.
pub fn booking_router<B, P>(service: Arc<BookingService<B, P>>) -> Router
where
    B: BookingStore + 'static,
    P: PropertyStore + 'static,
{
    Router::new()
        .route(
            "/api/bookings",
            get(list_handler::<B, P>).post(create_handler::<B, P>),
        )
        .route(
            "/api/bookings/status-counts",
            get(status_counts_handler::<B, P>),
        )
        .route("/api/bookings/revenue", get(revenue_handler::<B, P>))
        .route("/api/bookings/:id", delete(delete_handler::<B, P>))
        .route("/api/bookings/:id/status", patch(status_handler::<B, P>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusRequest {
    status: BookingStatus,
}

pub(crate) async fn create_handler<B, P>(
    State(service): State<Arc<BookingService<B, P>>>,
    RequireActor(actor): RequireActor,
    axum::Json(request): axum::Json<BookingRequest>,
) -> Response
where
    B: BookingStore + 'static,
    P: PropertyStore + 'static,
{
    match service.create(&actor, request) {
        Ok(booking) => (
            StatusCode::CREATED,
            axum::Json(json!({
                "success": true,
                "message": "Property booked successfully",
                "data": booking,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<B, P>(
    State(service): State<Arc<BookingService<B, P>>>,
    RequireActor(actor): RequireActor,
    Query(query): Query<BookingQuery>,
) -> Response
where
    B: BookingStore + 'static,
    P: PropertyStore + 'static,
{
    match service.list(&actor, &query) {
        Ok(page) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "message": "Bookings fetched successfully",
                "data": page,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_counts_handler<B, P>(
    State(service): State<Arc<BookingService<B, P>>>,
    RequireActor(actor): RequireActor,
) -> Response
where
    B: BookingStore + 'static,
    P: PropertyStore + 'static,
{
    match service.status_counts(&actor) {
        Ok(counts) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "message": "Booking status counts fetched",
                "data": counts,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<B, P>(
    State(service): State<Arc<BookingService<B, P>>>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
    axum::Json(request): axum::Json<StatusRequest>,
) -> Response
where
    B: BookingStore + 'static,
    P: PropertyStore + 'static,
{
    match service.set_status(&actor, &BookingId(id), request.status) {
        Ok(booking) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "message": "Booking status updated successfully",
                "data": booking,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<B, P>(
    State(service): State<Arc<BookingService<B, P>>>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Response
where
    B: BookingStore + 'static,
    P: PropertyStore + 'static,
{
    match service.delete(&actor, &BookingId(id)) {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "message": "Booking deleted successfully",
                "data": serde_json::Value::Null,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn revenue_handler<B, P>(
    State(service): State<Arc<BookingService<B, P>>>,
    RequireActor(actor): RequireActor,
) -> Response
where
    B: BookingStore + 'static,
    P: PropertyStore + 'static,
{
    match service.monthly_revenue(&actor) {
        Ok(rows) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "message": "Revenue fetched successfully",
                "data": rows,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: BookingError) -> Response {
    let status = match &error {
        BookingError::NotFound | BookingError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        BookingError::Forbidden(_) => StatusCode::FORBIDDEN,
        BookingError::Validation(_) => StatusCode::BAD_REQUEST,
        BookingError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
    };

    (
        status,
        axum::Json(json!({
            "success": false,
            "message": error.to_string(),
        })),
    )
        .into_response()
}
