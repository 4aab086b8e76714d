use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Router,
};
use serde_json::json;

use crate::auth::RequireActor;
use crate::storage::StoreError;

use super::domain::EnquiryId;
use super::repository::{EnquiryQuery, EnquiryStore};
use super::service::{EnquiryError, EnquiryRequest, EnquiryService};

/// Router builder exposing the enquiry endpoints. Creation is the public
/// contact form; reading and removal are staff operations.
pub fn enquiry_router<E>(service: Arc<EnquiryService<E>>) -> Router
where
    E: EnquiryStore + 'static,
{
    Router::new()
        .route(
            "/api/enquiries",
            get(list_handler::<E>).post(create_handler::<E>),
        )
        .route("/api/enquiries/:id", delete(delete_handler::<E>))
        .with_state(service)
}

pub(crate) async fn create_handler<E>(
    State(service): State<Arc<EnquiryService<E>>>,
    axum::Json(request): axum::Json<EnquiryRequest>,
) -> Response
where
    E: EnquiryStore + 'static,
{
    match service.create(request) {
        Ok(enquiry) => (
            StatusCode::CREATED,
            axum::Json(json!({
                "success": true,
                "message": "Enquiry submitted successfully",
                "data": enquiry,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<E>(
    State(service): State<Arc<EnquiryService<E>>>,
    RequireActor(actor): RequireActor,
    Query(query): Query<EnquiryQuery>,
) -> Response
where
    E: EnquiryStore + 'static,
{
    match service.list(&actor, &query) {
        Ok(page) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "message": "Enquiries fetched successfully",
                "data": page,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<E>(
    State(service): State<Arc<EnquiryService<E>>>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Response
where
    E: EnquiryStore + 'static,
{
    match service.delete(&actor, &EnquiryId(id)) {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "message": "Enquiry deleted successfully",
                "data": serde_json::Value::Null,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: EnquiryError) -> Response {
    let status = match &error {
        EnquiryError::NotFound | EnquiryError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
        EnquiryError::Forbidden(_) => StatusCode::FORBIDDEN,
        EnquiryError::Validation(_) => StatusCode::BAD_REQUEST,
        EnquiryError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
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
