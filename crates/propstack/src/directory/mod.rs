//! City reference data: the closed list of serviced cities that listings and
//! locality roll-ups hang off. Read-only at runtime; refreshed by reseeding.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::properties::domain::CityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: CityId,
    pub name: String,
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default = "default_country")]
    pub country: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

fn default_state() -> String {
    "Madhya Pradesh".to_string()
}

fn default_country() -> String {
    "India".to_string()
}

#[derive(Debug, Error, PartialEq)]
pub enum DirectoryError {
    #[error("city directory unavailable: {0}")]
    Unavailable(String),
}

pub trait CityStore: Send + Sync {
    fn list(&self) -> Result<Vec<City>, DirectoryError>;

    fn get(&self, id: &CityId) -> Result<Option<City>, DirectoryError>;
}

/// The launch-market city list. Ids are stable slugs so seeded environments
/// agree on them.
pub fn seed_cities() -> Vec<City> {
    let coords = [
        ("indore", "Indore", "22.7196", "75.8577"),
        ("bhopal", "Bhopal", "23.2599", "77.4126"),
        ("ujjain", "Ujjain", "23.1765", "75.7885"),
        ("satna", "Satna", "24.5820", "80.8310"),
        ("dewas", "Dewas", "22.9676", "76.0534"),
        ("ratlam", "Ratlam", "23.3342", "75.0374"),
        ("chhindwara", "Chhindwara", "22.0574", "78.9382"),
        ("vidisha", "Vidisha", "23.5260", "77.8104"),
        ("sehore", "Sehore", "23.2038", "77.0844"),
        ("chhatarpur", "Chhatarpur", "24.9150", "79.5877"),
        ("pithampur", "Pithampur", "22.6053", "75.6961"),
    ];

    coords
        .into_iter()
        .map(|(id, name, latitude, longitude)| City {
            id: CityId(id.to_string()),
            name: name.to_string(),
            state: default_state(),
            country: default_country(),
            latitude: Some(latitude.to_string()),
            longitude: Some(longitude.to_string()),
        })
        .collect()
}

pub fn router<C>(cities: Arc<C>) -> Router
where
    C: CityStore + 'static,
{
    Router::new()
        .route("/api/cities", get(list_cities::<C>))
        .with_state(cities)
}

async fn list_cities<C>(State(cities): State<Arc<C>>) -> impl IntoResponse
where
    C: CityStore,
{
    match cities.list() {
        Ok(records) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Cities fetched successfully",
                "data": records,
            })),
        ),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "message": err.to_string(),
            })),
        ),
    }
}
