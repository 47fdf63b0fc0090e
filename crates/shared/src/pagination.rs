//! Offset-based pagination utilities.

use serde::{Deserialize, Serialize};

/// Default page size when the client does not send one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound on the page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters for paginated list endpoints (`?page=&limit=`).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PaginationParams {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    /// 1-based page number, clamped to at least 1.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() as i64 - 1) * self.limit() as i64
    }

    /// Builds the response metadata for a result set of `total` rows.
    pub fn meta(&self, total: i64) -> Pagination {
        let limit = self.limit();
        let total = total.max(0);
        let total_pages = if total == 0 {
            0
        } else {
            ((total + limit as i64 - 1) / limit as i64) as u32
        };
        Pagination {
            page: self.page(),
            limit,
            total,
            total_pages,
        }
    }
}

/// Pagination metadata returned alongside list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub total_pages: u32,
}
