use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use propstack::bookings::{
    Booking, BookingFilter, BookingId, BookingStatus, BookingStore, NewBooking, StatusCounts,
};
use propstack::config::MediaConfig;
use propstack::directory::{seed_cities, City, CityStore, DirectoryError};
use propstack::enquiries::{Enquiry, EnquiryFilter, EnquiryId, EnquiryStore, NewEnquiry};
use propstack::notify::{EmailSender, NotifyError, SmsSender};
use propstack::properties::domain::{CityId, ImageRef, NewProperty, Property, PropertyId};
use propstack::properties::filter::FilterExpr;
use propstack::properties::media::{MediaError, MediaGateway};
use propstack::properties::repository::{LocalitySummary, PageRequest, PropertyStore, StoreError};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Vec-backed property store. Filters are evaluated with
/// `FilterExpr::matches` before skip/limit, so page totals agree with page
/// contents; insertion order breaks creation-time ties.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPropertyStore {
    records: Arc<Mutex<Vec<Property>>>,
    sequence: Arc<AtomicU64>,
}

impl PropertyStore for InMemoryPropertyStore {
    fn insert(&self, draft: NewProperty) -> Result<Property, StoreError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let property = draft.into_property(PropertyId(format!("prop-{id:04}")));
        let mut guard = self.records.lock().expect("property store mutex poisoned");
        guard.push(property.clone());
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryBookingStore {
    records: Arc<Mutex<Vec<Booking>>>,
    sequence: Arc<AtomicU64>,
}

impl BookingStore for InMemoryBookingStore {
    fn insert(&self, draft: NewBooking) -> Result<Booking, StoreError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let booking = draft.into_booking(BookingId(format!("book-{id:04}")));
        let mut guard = self.records.lock().expect("booking store mutex poisoned");
        guard.push(booking.clone());
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
        for record in guard.iter() {
            match record.status {
                BookingStatus::Pending => counts.pending += 1,
                BookingStatus::Confirmed => counts.confirmed += 1,
                BookingStatus::Cancelled => counts.cancelled += 1,
            }
        }
        Ok(counts)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEnquiryStore {
    records: Arc<Mutex<Vec<Enquiry>>>,
    sequence: Arc<AtomicU64>,
}

impl EnquiryStore for InMemoryEnquiryStore {
    fn insert(&self, draft: NewEnquiry) -> Result<Enquiry, StoreError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let enquiry = draft.into_enquiry(EnquiryId(format!("enq-{id:04}")));
        let mut guard = self.records.lock().expect("enquiry store mutex poisoned");
        guard.push(enquiry.clone());
        Ok(enquiry)
    }

    fn get(&self, id: &EnquiryId) -> Result<Option<Enquiry>, StoreError> {
        let guard = self.records.lock().expect("enquiry store mutex poisoned");
        Ok(guard.iter().find(|record| record.id == *id).cloned())
    }

    fn delete(&self, id: &EnquiryId) -> Result<(), StoreError> {
        let mut guard = self.records.lock().expect("enquiry store mutex poisoned");
        let before = guard.len();
        guard.retain(|record| record.id != *id);
        if guard.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    fn find(&self, filter: &EnquiryFilter, page: PageRequest) -> Result<Vec<Enquiry>, StoreError> {
        let guard = self.records.lock().expect("enquiry store mutex poisoned");
        let mut matches: Vec<Enquiry> = guard
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        matches.reverse();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches
            .into_iter()
            .skip(page.skip() as usize)
            .take(page.limit as usize)
            .collect())
    }

    fn count(&self, filter: &EnquiryFilter) -> Result<u64, StoreError> {
        let guard = self.records.lock().expect("enquiry store mutex poisoned");
        Ok(guard.iter().filter(|record| filter.matches(record)).count() as u64)
    }
}

/// Read-only city directory hydrated from the seed list at startup.
pub(crate) struct CityDirectory {
    cities: Vec<City>,
}

impl CityDirectory {
    pub(crate) fn seeded() -> Self {
        Self {
            cities: seed_cities(),
        }
    }
}

impl CityStore for CityDirectory {
    fn list(&self) -> Result<Vec<City>, DirectoryError> {
        Ok(self.cities.clone())
    }

    fn get(&self, id: &CityId) -> Result<Option<City>, DirectoryError> {
        Ok(self.cities.iter().find(|city| city.id == *id).cloned())
    }
}

/// Media gateway serving image handles off a static base URL. Deletion has
/// nothing to release for URL-only handles.
pub(crate) struct LocalMediaGateway {
    base_url: String,
}

impl LocalMediaGateway {
    pub(crate) fn new(config: &MediaConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl MediaGateway for LocalMediaGateway {
    fn public_url(&self, image: &ImageRef) -> String {
        format!("{}/{}", self.base_url, image.0)
    }

    fn delete(&self, image: &ImageRef) -> Result<(), MediaError> {
        tracing::debug!(image = %image.0, "released media handle");
        Ok(())
    }
}

/// Outbound senders for deployments without provider credentials: the alert
/// lands in the service log instead of a phone or mailbox.
#[derive(Debug, Default)]
pub(crate) struct LoggingSms;

impl SmsSender for LoggingSms {
    fn send(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        tracing::info!(%to, %body, "sms dispatch (log only)");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(crate) struct LoggingEmail;

impl EmailSender for LoggingEmail {
    fn send(&self, to: &str, subject: &str, _html_body: &str) -> Result<(), NotifyError> {
        tracing::info!(%to, %subject, "email dispatch (log only)");
        Ok(())
    }
}
