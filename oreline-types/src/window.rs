//! Pagination window mirroring the server's page/limit/total triple.

use crate::Error;
use serde::{Deserialize, Serialize};

/// The page currently held locally, plus the server-side total.
///
/// `total` counts records across all pages on the server. It is adjusted
/// locally only by confirmed creates and deletes (and broadcast inserts),
/// never by updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaginationWindow {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl PaginationWindow {
    /// Creates a window, validating `page >= 1` and `limit > 0`.
    pub fn new(page: u32, limit: u32, total: u64) -> Result<Self, Error> {
        if page == 0 || limit == 0 {
            return Err(Error::InvalidWindow { page, limit });
        }
        Ok(Self { page, limit, total })
    }

    /// An empty first page with the given limit (a zero limit is raised to 1).
    #[must_use]
    pub fn first_page(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            total: 0,
        }
    }

    /// Number of pages the server holds at this limit.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        self.total.div_ceil(u64::from(self.limit))
    }

    pub fn increment_total(&mut self) {
        self.total = self.total.saturating_add(1);
    }

    pub fn decrement_total(&mut self) {
        self.total = self.total.saturating_sub(1);
    }
}

impl Default for PaginationWindow {
    fn default() -> Self {
        Self::first_page(10)
    }
}
