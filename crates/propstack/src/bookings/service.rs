use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notify::Notifier;
use crate::properties::domain::{Actor, PropertyId, Role};
use crate::properties::repository::PropertyStore;
use crate::storage::{Page, PageRequest, StoreError};

use super::domain::{Booking, BookingId, BookingStatus, NewBooking};
use super::repository::{BookingFilter, BookingQuery, BookingStore, StatusCounts};

/// Body for booking creation. The booking account comes from the session,
/// never from the body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub name: String,
    pub mobile: String,
    pub property_id: PropertyId,
    #[serde(default)]
    pub message: Option<String>,
}

/// Confirmed-booking revenue for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueRow {
    pub year: i32,
    pub month: u32,
    pub total_revenue: u64,
}

/// Service composing the booking store, the property store (existence checks
/// and revenue joins), and the admin notifier.
pub struct BookingService<B, P> {
    bookings: Arc<B>,
    properties: Arc<P>,
    notifier: Arc<Notifier>,
}

impl<B, P> BookingService<B, P>
where
    B: BookingStore + 'static,
    P: PropertyStore + 'static,
{
    pub fn new(bookings: Arc<B>, properties: Arc<P>, notifier: Arc<Notifier>) -> Self {
        Self {
            bookings,
            properties,
            notifier,
        }
    }

    /// Record a visit request against a listing and alert the admin desk.
    /// Any signed-in account may book; a failed alert never unwinds the
    /// stored booking.
    pub fn create(&self, actor: &Actor, request: BookingRequest) -> Result<Booking, BookingError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(BookingError::Validation("name is required".to_string()));
        }
        let mobile = request.mobile.trim().to_string();
        if mobile.is_empty() {
            return Err(BookingError::Validation("mobile is required".to_string()));
        }
        if self.properties.get(&request.property_id)?.is_none() {
            return Err(BookingError::Validation(
                "propertyId does not reference a known listing".to_string(),
            ));
        }

        let booking = self.bookings.insert(NewBooking {
            name,
            mobile,
            property_id: request.property_id,
            user_id: Some(actor.id.clone()),
            message: request.message,
            status: BookingStatus::default(),
            created_at: Utc::now(),
        })?;

        self.notifier.booking_received(
            &booking.name,
            &booking.mobile,
            &booking.property_id.0,
            booking.message.as_deref(),
        );

        Ok(booking)
    }

    /// Page through bookings, optionally narrowed by status or customer name.
    pub fn list(&self, actor: &Actor, query: &BookingQuery) -> Result<Page<Booking>, BookingError> {
        if !can_view_bookings(actor.role) {
            return Err(BookingError::Forbidden("buyers cannot view bookings"));
        }
        let filter = query.filter();
        let page = PageRequest::new(query.page, query.limit);
        let records = self.bookings.find(&filter, page)?;
        let total = self.bookings.count(&filter)?;
        Ok(Page::assemble(records, total, page))
    }

    /// Booking totals per lifecycle state.
    pub fn status_counts(&self, actor: &Actor) -> Result<StatusCounts, BookingError> {
        if !can_view_bookings(actor.role) {
            return Err(BookingError::Forbidden("buyers cannot view bookings"));
        }
        Ok(self.bookings.status_counts()?)
    }

    /// Move a booking through its lifecycle.
    pub fn set_status(
        &self,
        actor: &Actor,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<Booking, BookingError> {
        if !can_update_status(actor.role) {
            return Err(BookingError::Forbidden(
                "only admins may update booking status",
            ));
        }
        let mut booking = self.bookings.get(id)?.ok_or(BookingError::NotFound)?;
        booking.status = status;
        Ok(self.bookings.update(booking)?)
    }

    pub fn delete(&self, actor: &Actor, id: &BookingId) -> Result<(), BookingError> {
        if actor.role != Role::SuperAdmin {
            return Err(BookingError::Forbidden(
                "only a super admin may remove bookings",
            ));
        }
        self.bookings.get(id)?.ok_or(BookingError::NotFound)?;
        self.bookings.delete(id)?;
        Ok(())
    }

    /// Month-by-month revenue across confirmed bookings: each booking
    /// contributes its listing's price in the month it was created. Bookings
    /// whose listing has since been removed are skipped.
    pub fn monthly_revenue(&self, actor: &Actor) -> Result<Vec<RevenueRow>, BookingError> {
        if actor.role != Role::SuperAdmin {
            return Err(BookingError::Forbidden(
                "only a super admin may view revenue",
            ));
        }

        let confirmed = self
            .bookings
            .all(&BookingFilter::status(BookingStatus::Confirmed))?;

        let mut months: BTreeMap<(i32, u32), u64> = BTreeMap::new();
        for booking in confirmed {
            if let Some(property) = self.properties.get(&booking.property_id)? {
                let price = property.listing.price.unwrap_or(0);
                let key = (booking.created_at.year(), booking.created_at.month());
                *months.entry(key).or_insert(0) += price;
            }
        }

        Ok(months
            .into_iter()
            .map(|((year, month), total_revenue)| RevenueRow {
                year,
                month,
                total_revenue,
            })
            .collect())
    }
}

fn can_view_bookings(role: Role) -> bool {
    matches!(role, Role::Seller | Role::Admin | Role::SuperAdmin)
}

fn can_update_status(role: Role) -> bool {
    matches!(role, Role::Admin | Role::SuperAdmin)
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("booking not found")]
    NotFound,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
