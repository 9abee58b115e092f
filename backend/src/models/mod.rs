//! Data models shared across database access and API handlers.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub mod exchange;
pub mod session;
pub mod transaction;
pub mod user;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters for page-numbered listings.
#[derive(Debug, Clone, Copy, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-indexed page number (default: 1).
    #[serde(default = "default_page")]
    #[validate(range(min = 1, code = "page_out_of_range"))]
    pub page: i64,
    /// Items per page (default: 10, range: 1..=100).
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, code = "page_size_out_of_range"))]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl PageQuery {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// Number of rows to skip for this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// Plain acknowledgement body, e.g. `{"message": "OK"}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Wrapper for paginated API responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T: Serialize> {
    /// Page that was returned.
    pub page: i64,
    /// Requested page size.
    pub page_size: i64,
    /// Total number of records across all pages.
    pub total: i64,
    /// The data items for the current page.
    pub items: Vec<T>,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(page: PageQuery, total: i64, items: Vec<T>) -> Self {
        Self {
            page: page.page,
            page_size: page.page_size,
            total,
            items,
        }
    }
}
