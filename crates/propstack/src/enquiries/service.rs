use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

use crate::notify::Notifier;
use crate::properties::domain::{Actor, Role};
use crate::storage::{Page, PageRequest, StoreError};

use super::domain::{Enquiry, EnquiryId, NewEnquiry};
use super::repository::{EnquiryQuery, EnquiryStore};

/// Body for the public contact form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnquiryRequest {
    pub fullname: String,
    pub email: String,
    pub mobile: String,
    pub message: String,
}

/// Service composing the enquiry store and the admin notifier.
pub struct EnquiryService<E> {
    enquiries: Arc<E>,
    notifier: Arc<Notifier>,
}

impl<E> EnquiryService<E>
where
    E: EnquiryStore + 'static,
{
    pub fn new(enquiries: Arc<E>, notifier: Arc<Notifier>) -> Self {
        Self {
            enquiries,
            notifier,
        }
    }

    /// Record a contact-form enquiry and text the admin desk. The form is
    /// public; no account is required. A failed text never unwinds the
    /// stored enquiry.
    pub fn create(&self, request: EnquiryRequest) -> Result<Enquiry, EnquiryError> {
        let fullname = request.fullname.trim().to_string();
        if fullname.is_empty() {
            return Err(EnquiryError::Validation("fullname is required".to_string()));
        }
        let email = request.email.trim().to_string();
        if !is_plausible_email(&email) {
            return Err(EnquiryError::Validation(
                "a valid email address is required".to_string(),
            ));
        }
        let mobile = request.mobile.trim().to_string();
        if mobile.len() != 10 || !mobile.chars().all(|c| c.is_ascii_digit()) {
            return Err(EnquiryError::Validation(
                "mobile must be exactly 10 digits".to_string(),
            ));
        }
        let message = request.message.trim().to_string();
        if message.chars().count() < 10 {
            return Err(EnquiryError::Validation(
                "message must be at least 10 characters".to_string(),
            ));
        }

        let enquiry = self.enquiries.insert(NewEnquiry {
            fullname,
            email,
            mobile,
            message,
            created_at: Utc::now(),
        })?;

        self.notifier
            .enquiry_received(&enquiry.fullname, &enquiry.mobile, &enquiry.message);

        Ok(enquiry)
    }

    /// Page through enquiries, optionally narrowed by a free-text search
    /// over fullname or email.
    pub fn list(&self, actor: &Actor, query: &EnquiryQuery) -> Result<Page<Enquiry>, EnquiryError> {
        if !can_view_enquiries(actor.role) {
            return Err(EnquiryError::Forbidden("buyers cannot view enquiries"));
        }
        let filter = query.filter();
        let page = PageRequest::new(query.page, query.limit);
        let records = self.enquiries.find(&filter, page)?;
        let total = self.enquiries.count(&filter)?;
        Ok(Page::assemble(records, total, page))
    }

    pub fn delete(&self, actor: &Actor, id: &EnquiryId) -> Result<(), EnquiryError> {
        if actor.role != Role::SuperAdmin {
            return Err(EnquiryError::Forbidden(
                "only a super admin may remove enquiries",
            ));
        }
        self.enquiries.get(id)?.ok_or(EnquiryError::NotFound)?;
        self.enquiries.delete(id)?;
        Ok(())
    }
}

fn can_view_enquiries(role: Role) -> bool {
    matches!(role, Role::Seller | Role::Admin | Role::SuperAdmin)
}

fn is_plausible_email(raw: &str) -> bool {
    match raw.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[derive(Debug, Error)]
pub enum EnquiryError {
    #[error("enquiry not found")]
    NotFound,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
