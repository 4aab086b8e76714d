//! Request actor extraction.
//!
//! Authentication itself is a collaborator concern: an upstream gateway
//! verifies the session and forwards the caller's identity in trusted
//! headers. These extractors read those headers; they never see credentials.
//! An unrecognized role string is treated as no actor at all, so a stale or
//! tampered claim falls back to the public, approved-only view.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::properties::domain::{Actor, Role, UserId};

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Extractor for endpoints that demand an authenticated caller. Rejects with
/// 401 when the gateway headers are missing or unusable.
pub struct RequireActor(pub Actor);

/// Extractor for endpoints that serve both visitors and signed-in users.
pub struct MaybeActor(pub Option<Actor>);

fn actor_from_parts(parts: &Parts) -> Option<Actor> {
    let id = parts
        .headers
        .get(ACTOR_ID_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .to_string();
    if id.is_empty() {
        return None;
    }

    let role = parts.headers.get(ACTOR_ROLE_HEADER)?.to_str().ok()?;
    let role = Role::parse(role)?;

    Some(Actor {
        id: UserId(id),
        role,
    })
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequireActor
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match actor_from_parts(parts) {
            Some(actor) => Ok(RequireActor(actor)),
            None => Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "success": false,
                    "message": "authentication required",
                })),
            )
                .into_response()),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeActor
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeActor(actor_from_parts(parts)))
    }
}
