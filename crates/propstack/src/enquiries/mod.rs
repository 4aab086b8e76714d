//! Contact-form enquiries.
//!
//! The form itself is public and texts the admin desk on every submission;
//! browsing and cleanup are staff operations.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{Enquiry, EnquiryId, NewEnquiry};
pub use repository::{EnquiryFilter, EnquiryQuery, EnquiryStore};
pub use router::enquiry_router;
pub use service::{EnquiryError, EnquiryRequest, EnquiryService};
