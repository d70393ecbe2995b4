//! Pagination request and result values
//!
//! Pagination is caller-driven and stateless: every [`PageResult`] carries the
//! cursor needed to continue, and replaying an old cursor is safe.

use serde::{Deserialize, Serialize};

/// One page worth of a paginated query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Requested item count; oversized values are clamped by the engine
    pub count: u32,
    /// Continuation cursor from the previous page, if any
    pub cursor: Option<String>,
}

impl PageRequest {
    /// First page with the given count
    pub fn first(count: u32) -> Self {
        Self {
            count,
            cursor: None,
        }
    }

    /// Continuation page with the given count and cursor
    pub fn after(count: u32, cursor: impl Into<String>) -> Self {
        Self {
            count,
            cursor: Some(cursor.into()),
        }
    }
}

/// Unwrapped payload of one page plus the continuation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// The resource object found at the descriptor's result path
    pub payload: serde_json::Value,
    /// Cursor for the next page, when the server reported one
    pub next_cursor: Option<String>,
    /// Whether the server reported more pages
    pub has_next: bool,
}

impl PageResult {
    /// Build the request continuing this page with the same count.
    ///
    /// Returns `None` once the server reported no further pages.
    pub fn next_request(&self, count: u32) -> Option<PageRequest> {
        if !self.has_next {
            return None;
        }
        self.next_cursor
            .as_ref()
            .map(|cursor| PageRequest::after(count, cursor))
    }
}
