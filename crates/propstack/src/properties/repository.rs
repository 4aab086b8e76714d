use serde::{Deserialize, Serialize};

use super::domain::{NewProperty, Property, PropertyId};
use super::filter::FilterExpr;

pub use crate::storage::{Page, PageRequest, StoreError};

/// One locality row in the city roll-up: distinct locality name, the
/// coordinates of the first record seen for it, and how many matching
/// properties sit there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalitySummary {
    pub name: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub property_count: u64,
}

/// Storage abstraction for property records.
///
/// Filters run inside the store, before skip/limit, so page totals stay
/// consistent with page contents. Implementations must evaluate `FilterExpr`
/// exactly as `FilterExpr::matches` does.
pub trait PropertyStore: Send + Sync {
    /// Persist a draft, assigning its id. Returns the stored record.
    fn insert(&self, draft: NewProperty) -> Result<Property, StoreError>;

    /// Replace the stored record with this one. `NotFound` if the id is
    /// unknown.
    fn update(&self, property: Property) -> Result<Property, StoreError>;

    fn get(&self, id: &PropertyId) -> Result<Option<Property>, StoreError>;

    fn delete(&self, id: &PropertyId) -> Result<(), StoreError>;

    /// Matching records, newest first by creation time, then skip/limit.
    fn find(&self, filter: &FilterExpr, page: PageRequest) -> Result<Vec<Property>, StoreError>;

    /// How many records match, ignoring pagination.
    fn count(&self, filter: &FilterExpr) -> Result<u64, StoreError>;

    /// Group matching records by locality name, ascending by name.
    fn group_localities(&self, filter: &FilterExpr) -> Result<Vec<LocalitySummary>, StoreError>;
}
