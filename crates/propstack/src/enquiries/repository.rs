use serde::Deserialize;

use super::domain::{Enquiry, EnquiryId, NewEnquiry};
use crate::storage::{PageRequest, StoreError};

/// Narrowing for enquiry lookups: one free-text term matched against
/// fullname or email, case-insensitively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnquiryFilter {
    pub search: Option<String>,
}

impl EnquiryFilter {
    pub fn matches(&self, enquiry: &Enquiry) -> bool {
        match &self.search {
            Some(term) => {
                let needle = term.to_lowercase();
                enquiry.fullname.to_lowercase().contains(&needle)
                    || enquiry.email.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }
}

/// Wire query for the enquiries index.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnquiryQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
}

impl Default for EnquiryQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: None,
        }
    }
}

impl EnquiryQuery {
    /// Store filter for this query. Blank search terms are ignored.
    pub fn filter(&self) -> EnquiryFilter {
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_string);
        EnquiryFilter { search }
    }
}

/// Storage abstraction for enquiry records. Enquiries are never updated, so
/// the surface is insert, lookup, page, and delete.
pub trait EnquiryStore: Send + Sync {
    /// Persist a draft, assigning its id. Returns the stored record.
    fn insert(&self, draft: NewEnquiry) -> Result<Enquiry, StoreError>;

    fn get(&self, id: &EnquiryId) -> Result<Option<Enquiry>, StoreError>;

    fn delete(&self, id: &EnquiryId) -> Result<(), StoreError>;

    /// Matching records, newest first by creation time, then skip/limit.
    fn find(&self, filter: &EnquiryFilter, page: PageRequest) -> Result<Vec<Enquiry>, StoreError>;

    /// How many records match, ignoring pagination.
    fn count(&self, filter: &EnquiryFilter) -> Result<u64, StoreError>;
}
