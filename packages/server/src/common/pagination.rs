//! Offset pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Raw limit/skip arguments from a request.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageArgs {
    pub limit: Option<i64>,
    pub skip: Option<i64>,
}

impl PageArgs {
    /// Apply defaults (limit 25) and bounds (limit 1-100, skip >= 0).
    pub fn validate(self) -> ValidatedPageArgs {
        ValidatedPageArgs {
            limit: self.limit.unwrap_or(25).clamp(1, 100),
            skip: self.skip.unwrap_or(0).max(0),
        }
    }
}

/// Validated and normalized pagination arguments.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedPageArgs {
    pub limit: i64,
    pub skip: i64,
}

/// One page of results plus the total unfiltered document count.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: i64) -> Self {
        Self { items, total_count }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }
}
