//! Domain library for the propstack listing platform. Listings move through
//! an approval lifecycle gated by role; bookings and enquiries hang off the
//! approved inventory. HTTP routers live beside each domain so the API
//! service only wires stores and serves.

pub mod auth;
pub mod bookings;
pub mod config;
pub mod directory;
pub mod enquiries;
pub mod error;
pub mod notify;
pub mod properties;
pub mod storage;
pub mod telemetry;
