use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::directory::{seed_cities, City, CityStore, DirectoryError};
use crate::properties::domain::{
    Actor, ApprovalStatus, Availability, CityId, ImageRef, ListingAttributes, ListingType,
    Locality, NewProperty, Property, PropertyDetails, PropertyFeatures, PropertyId,
    PropertyLocation, PropertyType, Role,
};
use crate::properties::filter::FilterExpr;
use crate::properties::media::{MediaError, MediaGateway};
use crate::properties::repository::{
    LocalitySummary, PageRequest, PropertyStore, StoreError,
};
use crate::properties::router::property_router;
use crate::properties::service::ListingService;

pub(super) fn buyer() -> Actor {
    Actor::new("buyer-1", Role::Buyer)
}

pub(super) fn seller() -> Actor {
    Actor::new("seller-1", Role::Seller)
}

pub(super) fn other_seller() -> Actor {
    Actor::new("seller-2", Role::Seller)
}

pub(super) fn admin() -> Actor {
    Actor::new("admin-1", Role::Admin)
}

pub(super) fn other_admin() -> Actor {
    Actor::new("admin-2", Role::Admin)
}

pub(super) fn super_admin() -> Actor {
    Actor::new("root-1", Role::SuperAdmin)
}

pub(super) fn draft(title: &str, city: &str, locality: &str) -> ListingAttributes {
    ListingAttributes {
        title: title.to_string(),
        description: None,
        price: Some(4_500_000),
        listing_type: ListingType::Sale,
        property_type: PropertyType::House,
        details: PropertyDetails::default(),
        location: PropertyLocation {
            city_id: CityId(city.to_string()),
            locality: Locality {
                name: locality.to_string(),
                latitude: Some("22.7196".to_string()),
                longitude: Some("75.8577".to_string()),
            },
        },
        sale_out_date: None,
        images: vec![ImageRef(format!("img-{title}"))],
        category: "Residential".to_string(),
        listing_code: format!("PS-{title}"),
        features: PropertyFeatures::default(),
        amenities: Vec::new(),
        owner: None,
        availability: Availability::default(),
    }
}

/// A stored record built directly, bypassing the service, for pure policy
/// and filter tests.
pub(super) fn stored(
    id: &str,
    creator: &Actor,
    status: ApprovalStatus,
    approver: Option<&Actor>,
) -> Property {
    let now = Utc
        .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    Property {
        id: PropertyId(id.to_string()),
        listing: draft(id, "indore", "Vijay Nagar"),
        created_by: creator.id.clone(),
        created_by_role: creator.role,
        approval_status: status,
        approved_by: approver.map(|actor| actor.id.clone()),
        posted_at: now,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
pub(super) struct MemoryPropertyStore {
    records: Mutex<Vec<Property>>,
    sequence: AtomicU64,
}

impl MemoryPropertyStore {
    /// Store a record as-is, keeping its preset id.
    pub(super) fn seed(&self, property: Property) {
        self.records
            .lock()
            .expect("property store mutex poisoned")
            .push(property);
    }
}

impl PropertyStore for MemoryPropertyStore {
    fn insert(&self, draft: NewProperty) -> Result<Property, StoreError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let property = draft.into_property(PropertyId(format!("prop-{id:04}")));
        self.records
            .lock()
            .expect("property store mutex poisoned")
            .push(property.clone());
        Ok(property)
    }

    fn update(&self, property: Property) -> Result<Property, StoreError> {
        let mut guard = self.records.lock().expect("property store mutex poisoned");
        match guard.iter_mut().find(|record| record.id == property.id) {
            Some(slot) => {
                *slot = property.clone();
                Ok(property)
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn get(&self, id: &PropertyId) -> Result<Option<Property>, StoreError> {
        let guard = self.records.lock().expect("property store mutex poisoned");
        Ok(guard.iter().find(|record| record.id == *id).cloned())
    }

    fn delete(&self, id: &PropertyId) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("property store mutex poisoned");
        let before = guard.len();
        guard.retain(|record| record.id != *id);
        if guard.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn find(&self, filter: &FilterExpr, page: PageRequest) -> Result<Vec<Property>, StoreError> {
        let guard = self.records.lock().expect("property store mutex poisoned");
        let mut matches: Vec<Property> = guard
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        // Newest first; insertion order breaks creation-time ties.
        matches.reverse();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.limit as usize)
            .collect())
    }

    fn count(&self, filter: &FilterExpr) -> Result<u64, StoreError> {
        let guard = self.records.lock().expect("property store mutex poisoned");
        Ok(guard.iter().filter(|record| filter.matches(record)).count() as u64)
    }

    fn group_localities(&self, filter: &FilterExpr) -> Result<Vec<LocalitySummary>, StoreError> {
        let guard = self.records.lock().expect("property store mutex poisoned");
        let mut groups: BTreeMap<String, LocalitySummary> = BTreeMap::new();
        for record in guard.iter().filter(|record| filter.matches(record)) {
            let locality = &record.listing.location.locality;
            groups
                .entry(locality.name.clone())
                .and_modify(|summary| summary.property_count += 1)
                .or_insert_with(|| LocalitySummary {
                    name: locality.name.clone(),
                    latitude: locality.latitude.clone(),
                    longitude: locality.longitude.clone(),
                    property_count: 1,
                });
        }
        Ok(groups.into_values().collect())
    }
}

pub(super) struct UnavailableStore;

impl PropertyStore for UnavailableStore {
    fn insert(&self, _draft: NewProperty) -> Result<Property, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _property: Property) -> Result<Property, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn get(&self, _id: &PropertyId) -> Result<Option<Property>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &PropertyId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn find(&self, _filter: &FilterExpr, _page: PageRequest) -> Result<Vec<Property>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn count(&self, _filter: &FilterExpr) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn group_localities(&self, _filter: &FilterExpr) -> Result<Vec<LocalitySummary>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct StaticCities {
    cities: Vec<City>,
}

impl Default for StaticCities {
    fn default() -> Self {
        Self {
            cities: seed_cities(),
        }
    }
}

impl CityStore for StaticCities {
    fn list(&self) -> Result<Vec<City>, DirectoryError> {
        Ok(self.cities.clone())
    }

    fn get(&self, id: &CityId) -> Result<Option<City>, DirectoryError> {
        Ok(self.cities.iter().find(|city| city.id == *id).cloned())
    }
}

#[derive(Default)]
pub(super) struct RecordingMedia {
    deleted: Mutex<Vec<ImageRef>>,
    pub(super) fail_deletes: bool,
}

impl RecordingMedia {
    pub(super) fn failing() -> Self {
        Self {
            deleted: Mutex::new(Vec::new()),
            fail_deletes: true,
        }
    }

    pub(super) fn deleted(&self) -> Vec<ImageRef> {
        self.deleted.lock().expect("media mutex poisoned").clone()
    }
}

impl MediaGateway for RecordingMedia {
    fn public_url(&self, image: &ImageRef) -> String {
        format!("https://media.test/{}", image.0)
    }

    fn delete(&self, image: &ImageRef) -> Result<(), MediaError> {
        if self.fail_deletes {
            return Err(MediaError::Backend("storage offline".to_string()));
        }
        self.deleted
            .lock()
            .expect("media mutex poisoned")
            .push(image.clone());
        Ok(())
    }
}

pub(super) type TestService = ListingService<MemoryPropertyStore, StaticCities, RecordingMedia>;

pub(super) fn build_service() -> (TestService, Arc<MemoryPropertyStore>, Arc<RecordingMedia>) {
    let store = Arc::new(MemoryPropertyStore::default());
    let cities = Arc::new(StaticCities::default());
    let media = Arc::new(RecordingMedia::default());
    let service = ListingService::new(store.clone(), cities.clone(), media.clone());
    (service, store, media)
}

pub(super) fn property_router_with_service(service: TestService) -> axum::Router {
    property_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
