//! Persistence primitives shared by every record store in the crate.

use serde::Serialize;
use thiserror::Error;

/// One page worth of records to fetch. Page numbers are 1-based; zero values
/// from the wire are clamped up rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Records to skip before this page starts.
    pub fn skip(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// A page of records plus the bookkeeping clients page through.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total_count: u64,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl<T> Page<T> {
    /// Derive the page bookkeeping from the filtered total, not the slice
    /// length: a short final page still reports the full total.
    pub fn assemble(records: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        let limit = u64::from(request.limit);
        let total_pages = ((total_count + limit - 1) / limit) as u32;
        Self {
            records,
            total_count,
            current_page: request.page,
            total_pages,
            has_next_page: u64::from(request.page) * limit < total_count,
            has_prev_page: request.page > 1,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            records: self.records.into_iter().map(f).collect(),
            total_count: self.total_count,
            current_page: self.current_page,
            total_pages: self.total_pages,
            has_next_page: self.has_next_page,
            has_prev_page: self.has_prev_page,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
