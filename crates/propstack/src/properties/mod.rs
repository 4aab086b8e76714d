//! Property listings and the visibility/approval workflow around them.
//!
//! `policy` holds the pure rules: who sees a record, who may review it, and
//! what a submission or edit does to its review state. `filter` expresses the
//! same visibility rule as a declarative storage predicate so listing queries
//! can page correctly. `service` composes both with the store, city
//! directory, and media gateway; `router` exposes the HTTP surface.

pub mod domain;
pub mod filter;
pub mod media;
pub mod policy;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Actor, Amenity, ApprovalStatus, Availability, CityId, ImageRef, ListingAttributes,
    ListingType, Locality, NewProperty, Property, PropertyDetails, PropertyFeatures, PropertyId,
    PropertyLocation, PropertyPatch, PropertyType, Role, UserId,
};
pub use filter::{listing_filter, visibility_filter, FilterExpr, ListingQuery};
pub use media::{MediaError, MediaGateway};
pub use policy::TransitionDenied;
pub use repository::{LocalitySummary, Page, PageRequest, PropertyStore, StoreError};
pub use router::property_router;
pub use service::{ApprovalReceipt, ListingService, PropertyView, ServiceError};
