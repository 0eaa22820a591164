//! Pagination types for list endpoints.

use serde::Serialize;

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Resolved pagination plan: 1-indexed page plus a capped page size.
///
/// Non-positive or absent inputs fall back to the defaults rather
/// than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    pub page: u64,
    pub limit: u64,
}

impl PagePlan {
    /// Clamp raw query inputs into a usable plan.
    pub fn from_request(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p > 0 => p as u64,
            _ => DEFAULT_PAGE_NUMBER,
        };
        let limit = match limit {
            Some(l) if l > 0 => (l as u64).min(MAX_PAGE_SIZE),
            _ => DEFAULT_PAGE_SIZE,
        };
        Self { page, limit }
    }

    /// Number of records to skip before the requested page.
    pub fn skip(&self) -> u64 {
        (self.page - 1) * self.limit
    }

    /// Total pages for a given match count (`ceil(total / limit)`).
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

impl Default for PagePlan {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Paginated list response. Flat shape, matching the public wire
/// format: `{success, count, data, total, totalPages, page, limit}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T: Serialize> {
    pub success: bool,
    /// Number of items on this page
    pub count: usize,
    pub data: Vec<T>,
    /// Number of records matching the query, ignoring pagination
    pub total: u64,
    pub total_pages: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(data: Vec<T>, plan: PagePlan, total: u64) -> Self {
        Self {
            success: true,
            count: data.len(),
            total_pages: plan.total_pages(total),
            data,
            total,
            page: plan.page,
            limit: plan.limit,
        }
    }

    /// Convert the page items, keeping the pagination envelope.
    pub fn map<U: Serialize>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            success: self.success,
            count: self.count,
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            total_pages: self.total_pages,
            page: self.page,
            limit: self.limit,
        }
    }
}
