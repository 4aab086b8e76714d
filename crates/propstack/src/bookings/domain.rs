use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::properties::domain::{PropertyId, UserId};

/// Identifier wrapper for booking records, assigned by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub String);

/// Lifecycle of a booking. New requests start pending; staff later confirm
/// or cancel them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

/// A visit request a customer raised against a listing. `user_id` links the
/// account that was signed in when the request came through the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub name: String,
    pub mobile: String,
    pub property_id: PropertyId,
    pub user_id: Option<UserId>,
    pub message: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Booking draft ahead of id assignment. Built by the service, which stamps
/// the requesting account and the creation time.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub name: String,
    pub mobile: String,
    pub property_id: PropertyId,
    pub user_id: Option<UserId>,
    pub message: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl NewBooking {
    pub fn into_booking(self, id: BookingId) -> Booking {
        Booking {
            id,
            name: self.name,
            mobile: self.mobile,
            property_id: self.property_id,
            user_id: self.user_id,
            message: self.message,
            status: self.status,
            created_at: self.created_at,
        }
    }
}
