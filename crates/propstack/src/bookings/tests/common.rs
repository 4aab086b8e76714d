use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::bookings::domain::{Booking, BookingId, BookingStatus, NewBooking};
use crate::bookings::repository::{BookingFilter, BookingStore, StatusCounts};
use crate::bookings::router::booking_router;
use crate::bookings::service::{BookingRequest, BookingService};
use crate::config::ContactConfig;
use crate::notify::{EmailSender, Notifier, NotifyError, SmsSender};
use crate::properties::domain::{
    Actor, ApprovalStatus, Availability, CityId, ImageRef, ListingAttributes, ListingType,
    Locality, NewProperty, Property, PropertyDetails, PropertyFeatures, PropertyId,
    PropertyLocation, PropertyType, Role, UserId,
};
use crate::properties::filter::FilterExpr;
use crate::properties::repository::{LocalitySummary, PropertyStore};
use crate::storage::{PageRequest, StoreError};

pub(super) fn buyer() -> Actor {
    Actor::new("buyer-1", Role::Buyer)
}

pub(super) fn seller() -> Actor {
    Actor::new("seller-1", Role::Seller)
}

pub(super) fn admin() -> Actor {
    Actor::new("admin-1", Role::Admin)
}

pub(super) fn super_admin() -> Actor {
    Actor::new("root-1", Role::SuperAdmin)
}

pub(super) fn booking_request(property_id: &str) -> BookingRequest {
    BookingRequest {
        name: "Asha Verma".to_string(),
        mobile: "+919876501234".to_string(),
        property_id: PropertyId(property_id.to_string()),
        message: Some("Weekend site visit".to_string()),
    }
}

/// A stored booking built directly, bypassing the service, for list and
/// aggregation tests.
pub(super) fn stored_booking(
    id: &str,
    name: &str,
    property_id: &str,
    status: BookingStatus,
    year: i32,
    month: u32,
) -> Booking {
    Booking {
        id: BookingId(id.to_string()),
        name: name.to_string(),
        mobile: "+911234567890".to_string(),
        property_id: PropertyId(property_id.to_string()),
        user_id: Some(UserId("buyer-1".to_string())),
        message: None,
        status,
        created_at: Utc
            .with_ymd_and_hms(year, month, 10, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

/// An approved listing a booking can point at.
pub(super) fn listing(id: &str, price: Option<u64>) -> Property {
    let now = Utc
        .with_ymd_and_hms(2025, 5, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp");
    Property {
        id: PropertyId(id.to_string()),
        listing: ListingAttributes {
            title: format!("Listing {id}"),
            description: None,
            price,
            listing_type: ListingType::Sale,
            property_type: PropertyType::House,
            details: PropertyDetails::default(),
            location: PropertyLocation {
                city_id: CityId("indore".to_string()),
                locality: Locality {
                    name: "Palasia".to_string(),
                    latitude: None,
                    longitude: None,
                },
            },
            sale_out_date: None,
            images: vec![ImageRef(format!("img-{id}"))],
            category: "Residential".to_string(),
            listing_code: format!("PS-{id}"),
            features: PropertyFeatures::default(),
            amenities: Vec::new(),
            owner: None,
            availability: Availability::default(),
        },
        created_by: UserId("seller-1".to_string()),
        created_by_role: Role::Seller,
        approval_status: ApprovalStatus::Approved,
        approved_by: Some(UserId("admin-1".to_string())),
        posted_at: now,
        created_at: now,
        updated_at: now,
    }
}

#[derive(Default)]
pub(super) struct MemoryBookingStore {
    records: Mutex<Vec<Booking>>,
    sequence: AtomicU64,
}

impl MemoryBookingStore {
    pub(super) fn seed(&self, booking: Booking) {
        self.records
            .lock()
            .expect("booking store mutex poisoned")
            .push(booking);
    }
}

impl BookingStore for MemoryBookingStore {
    fn insert(&self, draft: NewBooking) -> Result<Booking, StoreError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let booking = draft.into_booking(BookingId(format!("book-{id:04}")));
        self.records
            .lock()
            .expect("booking store mutex poisoned")
            .push(booking.clone());
        Ok(booking)
    }

    fn update(&self, booking: Booking) -> Result<Booking, StoreError> {
        let mut guard = self.records.lock().expect("booking store mutex poisoned");
        match guard.iter_mut().find(|record| record.id == booking.id) {
            Some(slot) => {
                *slot = booking.clone();
                Ok(booking)
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn get(&self, id: &BookingId) -> Result<Option<Booking>, StoreError> {
        let guard = self.records.lock().expect("booking store mutex poisoned");
        Ok(guard.iter().find(|record| record.id == *id).cloned())
    }

    fn delete(&self, id: &BookingId) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("booking store mutex poisoned");
        let before = guard.len();
        guard.retain(|record| record.id != *id);
        if guard.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn find(&self, filter: &BookingFilter, page: PageRequest) -> Result<Vec<Booking>, StoreError> {
        Ok(self
            .all(filter)?
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.limit as usize)
            .collect())
    }

    fn all(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError> {
        let guard = self.records.lock().expect("booking store mutex poisoned");
        let mut matches: Vec<Booking> = guard
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        // Newest first; insertion order breaks creation-time ties.
        matches.reverse();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    fn count(&self, filter: &BookingFilter) -> Result<u64, StoreError> {
        let guard = self.records.lock().expect("booking store mutex poisoned");
        Ok(guard.iter().filter(|record| filter.matches(record)).count() as u64)
    }

    fn status_counts(&self) -> Result<StatusCounts, StoreError> {
        let guard = self.records.lock().expect("booking store mutex poisoned");
        let mut counts = StatusCounts::default();
        for booking in guard.iter() {
            match booking.status {
                BookingStatus::Pending => counts.pending += 1,
                BookingStatus::Confirmed => counts.confirmed += 1,
                BookingStatus::Cancelled => counts.cancelled += 1,
            }
        }
        Ok(counts)
    }
}

pub(super) struct UnavailableBookings;

impl BookingStore for UnavailableBookings {
    fn insert(&self, _draft: NewBooking) -> Result<Booking, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _booking: Booking) -> Result<Booking, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn get(&self, _id: &BookingId) -> Result<Option<Booking>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &BookingId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn find(&self, _filter: &BookingFilter, _page: PageRequest) -> Result<Vec<Booking>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn all(&self, _filter: &BookingFilter) -> Result<Vec<Booking>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn count(&self, _filter: &BookingFilter) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn status_counts(&self) -> Result<StatusCounts, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Property store stub carrying pre-seeded listings. Booking flows only look
/// records up, but the trait is honored in full.
#[derive(Default)]
pub(super) struct SeededListings {
    records: Mutex<Vec<Property>>,
}

impl SeededListings {
    pub(super) fn with(records: Vec<Property>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl PropertyStore for SeededListings {
    fn insert(&self, draft: NewProperty) -> Result<Property, StoreError> {
        let mut guard = self.records.lock().expect("listing store mutex poisoned");
        let property = draft.into_property(PropertyId(format!("listing-{}", guard.len() + 1)));
        guard.push(property.clone());
        Ok(property)
    }

    fn update(&self, property: Property) -> Result<Property, StoreError> {
        let mut guard = self.records.lock().expect("listing store mutex poisoned");
        match guard.iter_mut().find(|record| record.id == property.id) {
            Some(slot) => {
                *slot = property.clone();
                Ok(property)
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn get(&self, id: &PropertyId) -> Result<Option<Property>, StoreError> {
        let guard = self.records.lock().expect("listing store mutex poisoned");
        Ok(guard.iter().find(|record| record.id == *id).cloned())
    }

    fn delete(&self, id: &PropertyId) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("listing store mutex poisoned");
        let before = guard.len();
        guard.retain(|record| record.id != *id);
        if guard.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn find(&self, filter: &FilterExpr, page: PageRequest) -> Result<Vec<Property>, StoreError> {
        let guard = self.records.lock().expect("listing store mutex poisoned");
        let mut matches: Vec<Property> = guard
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.limit as usize)
            .collect())
    }

    fn count(&self, filter: &FilterExpr) -> Result<u64, StoreError> {
        let guard = self.records.lock().expect("listing store mutex poisoned");
        Ok(guard.iter().filter(|record| filter.matches(record)).count() as u64)
    }

    fn group_localities(&self, filter: &FilterExpr) -> Result<Vec<LocalitySummary>, StoreError> {
        let guard = self.records.lock().expect("listing store mutex poisoned");
        let mut rows: Vec<LocalitySummary> = Vec::new();
        for record in guard.iter().filter(|record| filter.matches(record)) {
            let locality = &record.listing.location.locality;
            match rows.iter_mut().find(|row| row.name == locality.name) {
                Some(row) => row.property_count += 1,
                None => rows.push(LocalitySummary {
                    name: locality.name.clone(),
                    latitude: locality.latitude.clone(),
                    longitude: locality.longitude.clone(),
                    property_count: 1,
                }),
            }
        }
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }
}

#[derive(Debug, Default)]
pub(super) struct RecordingSms {
    pub(super) sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl SmsSender for RecordingSms {
    fn send(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("sms mutex poisoned")
            .push((to.to_string(), body.to_string()));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(super) struct RecordingEmail {
    pub(super) sent: Arc<Mutex<Vec<(String, String, String)>>>,
}

impl EmailSender for RecordingEmail {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("email mutex poisoned")
            .push((to.to_string(), subject.to_string(), html_body.to_string()));
        Ok(())
    }
}

#[derive(Debug)]
pub(super) struct FailingSms;

impl SmsSender for FailingSms {
    fn send(&self, _to: &str, _body: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Sms("provider quota exhausted".to_string()))
    }
}

#[derive(Debug)]
pub(super) struct FailingEmail;

impl EmailSender for FailingEmail {
    fn send(&self, _to: &str, _subject: &str, _html_body: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Email("relay refused connection".to_string()))
    }
}

pub(super) fn contact() -> ContactConfig {
    ContactConfig {
        admin_email: "desk@propstack.test".to_string(),
        admin_mobile: "+911112223334".to_string(),
    }
}

pub(super) type EmailOutbox = Arc<Mutex<Vec<(String, String, String)>>>;

pub(super) fn build_notifier() -> (Arc<Notifier>, EmailOutbox) {
    let email = RecordingEmail::default();
    let outbox = Arc::clone(&email.sent);
    let notifier = Notifier::new(
        contact(),
        Box::new(RecordingSms::default()),
        Box::new(email),
    );
    (Arc::new(notifier), outbox)
}

pub(super) fn failing_notifier() -> Arc<Notifier> {
    Arc::new(Notifier::new(
        contact(),
        Box::new(FailingSms),
        Box::new(FailingEmail),
    ))
}

pub(super) type BookingTestService = BookingService<MemoryBookingStore, SeededListings>;

pub(super) fn build_booking_service(
    listings: Vec<Property>,
) -> (BookingTestService, Arc<MemoryBookingStore>, EmailOutbox) {
    let bookings = Arc::new(MemoryBookingStore::default());
    let properties = Arc::new(SeededListings::with(listings));
    let (notifier, outbox) = build_notifier();
    let service = BookingService::new(bookings.clone(), properties, notifier);
    (service, bookings, outbox)
}

pub(super) fn booking_router_with_service(service: BookingTestService) -> axum::Router {
    booking_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
