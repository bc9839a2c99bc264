//! Pagination types for list-style responses
//!
//! Pagination is opt-in: a response is paginated only when the request carries
//! a valid `page` or `page_size`; otherwise the full list is returned.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::PaginationConfig;
use crate::error::ApiError;

/// Pagination query parameters
///
/// Kept as raw strings so that malformed values fall back to defaults instead
/// of rejecting the request.
#[derive(Debug, Default, Deserialize, IntoParams, Clone)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// 1-based page number
    #[param(value_type = Option<u32>, example = 1, minimum = 1)]
    pub page: Option<String>,

    /// Entries per page
    #[param(value_type = Option<u32>, example = 30, minimum = 1)]
    pub page_size: Option<String>,
}

/// Pagination metadata attached to a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationInfo {
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

/// One page of results plus the total count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: usize,
    pub results: Vec<T>,
    pub pagination: PaginationInfo,
}

fn positive(value: Option<&String>) -> Option<u32> {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
}

impl PaginationParams {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.map(|p| p.to_string()),
            page_size: page_size.map(|s| s.to_string()),
        }
    }

    /// Whether the request asked for a paginated response.
    pub fn is_requested(&self) -> bool {
        positive(self.page.as_ref()).is_some() || positive(self.page_size.as_ref()).is_some()
    }

    /// Get the page number (defaults to 1)
    pub fn page(&self) -> u32 {
        positive(self.page.as_ref()).unwrap_or(1)
    }

    /// Get the page size (defaults to the configured size, clamped to the maximum)
    pub fn page_size(&self, config: &PaginationConfig) -> u32 {
        positive(self.page_size.as_ref())
            .unwrap_or(config.default_page_size)
            .min(config.max_page_size)
            .max(1)
    }

    /// Calculate total pages given a total count (at least 1)
    pub fn total_pages(total_count: usize, page_size: u32) -> u32 {
        let page_size = page_size.max(1) as usize;
        let pages = total_count.div_ceil(page_size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Copy the requested page out of `items`.
    ///
    /// Returns `Ok(None)` when pagination was not requested.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for a page past the last one.
    pub fn paginate<T: Clone>(&self, items: &[T], config: &PaginationConfig) -> Result<Option<Page<T>>, ApiError> {
        if !self.is_requested() {
            return Ok(None);
        }

        let page = self.page();
        let page_size = self.page_size(config);
        let count = items.len();
        let total_pages = Self::total_pages(count, page_size);

        if page > total_pages {
            return Err(ApiError::not_found(format!(
                "Invalid page {page}: there are {total_pages} page(s)"
            )));
        }

        let offset = (page as usize - 1).saturating_mul(page_size as usize);
        let results = items.iter().skip(offset).take(page_size as usize).cloned().collect();

        Ok(Some(Page {
            count,
            results,
            pagination: PaginationInfo {
                page,
                page_size,
                total_pages,
                has_next: page < total_pages,
                has_previous: page > 1,
            },
        }))
    }
}
