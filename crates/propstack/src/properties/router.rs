use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{MaybeActor, RequireActor};
use crate::directory::CityStore;

use super::domain::{ApprovalStatus, CityId, ListingAttributes, PropertyId, PropertyPatch};
use super::filter::ListingQuery;
use super::media::MediaGateway;
use super::repository::{PropertyStore, StoreError};
use super::service::{ListingService, ServiceError};

/// Router builder exposing the property endpoints.
pub fn property_router<S, C, M>(service: Arc<ListingService<S, C, M>>) -> Router
where
    S: PropertyStore + 'static,
    C: CityStore + 'static,
    M: MediaGateway + 'static,
{
    Router::new()
        .route(
            "/api/properties",
            get(list_handler::<S, C, M>).post(create_handler::<S, C, M>),
        )
        .route(
            "/api/properties/:id",
            get(get_handler::<S, C, M>)
                .patch(update_handler::<S, C, M>)
                .delete(delete_handler::<S, C, M>),
        )
        .route(
            "/api/properties/:id/approval",
            patch(approval_handler::<S, C, M>),
        )
        .route(
            "/api/properties/localities/:city_id",
            get(localities_handler::<S, C, M>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApprovalRequest {
    approval_status: ApprovalStatus,
}

pub(crate) async fn create_handler<S, C, M>(
    State(service): State<Arc<ListingService<S, C, M>>>,
    RequireActor(actor): RequireActor,
    axum::Json(draft): axum::Json<ListingAttributes>,
) -> Response
where
    S: PropertyStore + 'static,
    C: CityStore + 'static,
    M: MediaGateway + 'static,
{
    match service.create(&actor, draft) {
        Ok(view) => (
            StatusCode::CREATED,
            axum::Json(json!({
                "success": true,
                "message": "Property created successfully",
                "data": view,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<S, C, M>(
    State(service): State<Arc<ListingService<S, C, M>>>,
    MaybeActor(viewer): MaybeActor,
    Query(query): Query<ListingQuery>,
) -> Response
where
    S: PropertyStore + 'static,
    C: CityStore + 'static,
    M: MediaGateway + 'static,
{
    match service.list(viewer.as_ref(), &query) {
        Ok(page) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "message": "Properties fetched successfully",
                "data": page,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<S, C, M>(
    State(service): State<Arc<ListingService<S, C, M>>>,
    MaybeActor(viewer): MaybeActor,
    Path(id): Path<String>,
) -> Response
where
    S: PropertyStore + 'static,
    C: CityStore + 'static,
    M: MediaGateway + 'static,
{
    match service.get(viewer.as_ref(), &PropertyId(id)) {
        Ok(view) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "message": "Property fetched successfully",
                "data": view,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<S, C, M>(
    State(service): State<Arc<ListingService<S, C, M>>>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
    axum::Json(patch): axum::Json<PropertyPatch>,
) -> Response
where
    S: PropertyStore + 'static,
    C: CityStore + 'static,
    M: MediaGateway + 'static,
{
    match service.update(&actor, &PropertyId(id), patch) {
        Ok(view) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "message": "Property updated successfully",
                "data": view,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn approval_handler<S, C, M>(
    State(service): State<Arc<ListingService<S, C, M>>>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
    axum::Json(request): axum::Json<ApprovalRequest>,
) -> Response
where
    S: PropertyStore + 'static,
    C: CityStore + 'static,
    M: MediaGateway + 'static,
{
    match service.set_approval(&actor, &PropertyId(id), request.approval_status) {
        Ok(receipt) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "message": format!("Property {} successfully", receipt.approval_status.label()),
                "data": receipt,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<S, C, M>(
    State(service): State<Arc<ListingService<S, C, M>>>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Response
where
    S: PropertyStore + 'static,
    C: CityStore + 'static,
    M: MediaGateway + 'static,
{
    match service.delete(&actor, &PropertyId(id)) {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "message": "Property deleted successfully",
                "data": serde_json::Value::Null,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn localities_handler<S, C, M>(
    State(service): State<Arc<ListingService<S, C, M>>>,
    Path(city_id): Path<String>,
) -> Response
where
    S: PropertyStore + 'static,
    C: CityStore + 'static,
    M: MediaGateway + 'static,
{
    match service.localities_in_city(&CityId(city_id)) {
        Ok(localities) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "message": "Localities fetched successfully",
                "data": localities,
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::NotFound | ServiceError::Store(StoreError::NotFound) => {
            StatusCode::NOT_FOUND
        }
        ServiceError::Forbidden(_) | ServiceError::Denied(_) => StatusCode::FORBIDDEN,
        ServiceError::InvalidTransition | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::Store(_) | ServiceError::Directory(_) => StatusCode::SERVICE_UNAVAILABLE,
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
