use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::config::ContactConfig;
use crate::enquiries::domain::{Enquiry, EnquiryId, NewEnquiry};
use crate::enquiries::repository::{EnquiryFilter, EnquiryStore};
use crate::enquiries::router::enquiry_router;
use crate::enquiries::service::{EnquiryRequest, EnquiryService};
use crate::notify::{EmailSender, Notifier, NotifyError, SmsSender};
use crate::properties::domain::{Actor, Role};
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

pub(super) fn enquiry_request() -> EnquiryRequest {
    EnquiryRequest {
        fullname: "Ravi Jain".to_string(),
        email: "ravi@example.in".to_string(),
        mobile: "9876501234".to_string(),
        message: "Is the corner plot still available?".to_string(),
    }
}

/// A stored enquiry built directly, bypassing the service, for list tests.
pub(super) fn stored_enquiry(id: &str, fullname: &str, email: &str, day: u32) -> Enquiry {
    Enquiry {
        id: EnquiryId(id.to_string()),
        fullname: fullname.to_string(),
        email: email.to_string(),
        mobile: "9876501234".to_string(),
        message: "Looking for a site visit this week.".to_string(),
        created_at: Utc
            .with_ymd_and_hms(2025, 6, day, 10, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

#[derive(Default)]
pub(super) struct MemoryEnquiryStore {
    records: Mutex<Vec<Enquiry>>,
    sequence: AtomicU64,
}

impl MemoryEnquiryStore {
    pub(super) fn seed(&self, enquiry: Enquiry) {
        self.records
            .lock()
            .expect("enquiry store mutex poisoned")
            .push(enquiry);
    }
}

impl EnquiryStore for MemoryEnquiryStore {
    fn insert(&self, draft: NewEnquiry) -> Result<Enquiry, StoreError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let enquiry = draft.into_enquiry(EnquiryId(format!("enq-{id:04}")));
        self.records
            .lock()
            .expect("enquiry store mutex poisoned")
            .push(enquiry.clone());
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
        // Newest first; insertion order breaks creation-time ties.
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
pub(super) struct DiscardingEmail;

impl EmailSender for DiscardingEmail {
    fn send(&self, _to: &str, _subject: &str, _html_body: &str) -> Result<(), NotifyError> {
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

pub(super) fn contact() -> ContactConfig {
    ContactConfig {
        admin_email: "desk@propstack.test".to_string(),
        admin_mobile: "+911112223334".to_string(),
    }
}

pub(super) type SmsOutbox = Arc<Mutex<Vec<(String, String)>>>;

pub(super) type EnquiryTestService = EnquiryService<MemoryEnquiryStore>;

pub(super) fn build_enquiry_service() -> (
    EnquiryTestService,
    Arc<MemoryEnquiryStore>,
    SmsOutbox,
) {
    let enquiries = Arc::new(MemoryEnquiryStore::default());
    let sms = RecordingSms::default();
    let outbox = Arc::clone(&sms.sent);
    let notifier = Arc::new(Notifier::new(
        contact(),
        Box::new(sms),
        Box::new(DiscardingEmail),
    ));
    let service = EnquiryService::new(enquiries.clone(), notifier);
    (service, enquiries, outbox)
}

pub(super) fn silent_service() -> (EnquiryTestService, Arc<MemoryEnquiryStore>) {
    let enquiries = Arc::new(MemoryEnquiryStore::default());
    let notifier = Arc::new(Notifier::new(
        contact(),
        Box::new(FailingSms),
        Box::new(DiscardingEmail),
    ));
    let service = EnquiryService::new(enquiries.clone(), notifier);
    (service, enquiries)
}

pub(super) fn enquiry_router_with_service(service: EnquiryTestService) -> axum::Router {
    enquiry_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
