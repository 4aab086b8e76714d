use serde::{Deserialize, Serialize};

use super::domain::{Booking, BookingId, BookingStatus, NewBooking};
use crate::storage::{PageRequest, StoreError};

/// Narrowing for booking lookups. Name matching is a case-insensitive
/// substring test, mirroring the dashboard search box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub name_contains: Option<String>,
}

impl BookingFilter {
    pub fn status(status: BookingStatus) -> Self {
        Self {
            status: Some(status),
            name_contains: None,
        }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        if let Some(status) = self.status {
            if booking.status != status {
                return false;
            }
        }
        if let Some(needle) = &self.name_contains {
            if !booking
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

/// Wire query for the bookings index.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingQuery {
    pub page: u32,
    pub limit: u32,
    pub status: Option<BookingStatus>,
    pub name: Option<String>,
}

impl Default for BookingQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            status: None,
            name: None,
        }
    }
}

impl BookingQuery {
    /// Store filter for this query. Blank name terms are ignored.
    pub fn filter(&self) -> BookingFilter {
        let name_contains = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_string);
        BookingFilter {
            status: self.status,
            name_contains,
        }
    }
}

/// Booking totals per lifecycle state, fetched in one pass for dashboards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: u64,
    pub confirmed: u64,
    pub cancelled: u64,
}

/// Storage abstraction for booking records.
///
/// Filters run inside the store, before skip/limit, so page totals stay
/// consistent with page contents.
pub trait BookingStore: Send + Sync {
    /// Persist a draft, assigning its id. Returns the stored record.
    fn insert(&self, draft: NewBooking) -> Result<Booking, StoreError>;

    /// Replace the stored record with this one. `NotFound` if the id is
    /// unknown.
    fn update(&self, booking: Booking) -> Result<Booking, StoreError>;

    fn get(&self, id: &BookingId) -> Result<Option<Booking>, StoreError>;

    fn delete(&self, id: &BookingId) -> Result<(), StoreError>;

    /// Matching records, newest first by creation time, then skip/limit.
    fn find(&self, filter: &BookingFilter, page: PageRequest) -> Result<Vec<Booking>, StoreError>;

    /// Every matching record, newest first, without pagination.
    fn all(&self, filter: &BookingFilter) -> Result<Vec<Booking>, StoreError>;

    /// How many records match, ignoring pagination.
    fn count(&self, filter: &BookingFilter) -> Result<u64, StoreError>;

    /// Totals per status across every record.
    fn status_counts(&self) -> Result<StatusCounts, StoreError>;
}
