//! Visit bookings raised by customers against listings.
//!
//! Creation is open to any signed-in account and emails the admin desk;
//! everything else is staff tooling: paginated search, status lifecycle,
//! per-status counts, and the confirmed-revenue roll-up.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{Booking, BookingId, BookingStatus, NewBooking};
pub use repository::{BookingFilter, BookingQuery, BookingStore, StatusCounts};
pub use router::booking_router;
pub use service::{BookingError, BookingRequest, BookingService, RevenueRow};
