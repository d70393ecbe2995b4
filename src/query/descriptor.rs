//! Query descriptors
//!
//! A descriptor is the immutable data describing one resource: which query
//! hash (or fixed path) serves it, which variables it requires, where in the
//! response envelope its payload sits and how its pages are sized. The engine
//! is entirely driven by these values.

use serde_json::{Map, Value};
use tracing::warn;

/// Hard ceiling the server enforces on page sizes
pub const MAX_PAGE_SIZE: u32 = 50;

/// Which of the two response shapes a resource answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{status, data}` wrapper that must be validated before unwrapping
    Enveloped,
    /// Bare JSON object with the payload at a fixed path
    Direct,
}

/// Immutable description of one queryable resource
#[derive(Debug, Clone, PartialEq)]
pub struct QueryDescriptor {
    /// Opaque query hash (or empty for direct fetches)
    pub id: String,
    /// Response shape to validate against
    pub shape: ResponseShape,
    /// Variables always sent for this resource
    pub required_variables: Map<String, Value>,
    /// Keys to descend through the response to reach the payload
    pub result_path: Vec<String>,
    /// Keys (relative to the payload) to the conventional pagination object
    pub page_info_path: Vec<String>,
    /// Variable name carrying the page size
    pub count_variable: String,
    /// Variable name carrying the continuation cursor
    pub cursor_variable: String,
    /// Page size used when the caller does not choose, and the fallback for
    /// oversized requests
    pub default_page_size: u32,
    /// Largest count the server accepts
    pub max_page_size: u32,
}

impl QueryDescriptor {
    /// New enveloped descriptor for the given query hash with conventional
    /// defaults
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            shape: ResponseShape::Enveloped,
            required_variables: Map::new(),
            result_path: Vec::new(),
            page_info_path: Vec::new(),
            count_variable: "first".to_string(),
            cursor_variable: "after".to_string(),
            default_page_size: 12,
            max_page_size: MAX_PAGE_SIZE,
        }
    }

    /// New direct descriptor (bare JSON or embedded-config fetch)
    pub fn direct() -> Self {
        let mut descriptor = Self::new("");
        descriptor.shape = ResponseShape::Direct;
        descriptor
    }

    /// Add a variable always sent for this resource
    pub fn required_variable(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.required_variables.insert(key.into(), value.into());
        self
    }

    /// Set the payload path inside the response
    pub fn result_path(mut self, path: &[&str]) -> Self {
        self.result_path = path.iter().map(ToString::to_string).collect();
        self
    }

    /// Set the pagination object path relative to the payload
    pub fn page_info_path(mut self, path: &[&str]) -> Self {
        self.page_info_path = path.iter().map(ToString::to_string).collect();
        self
    }

    /// Override the page size variable name
    pub fn count_variable(mut self, name: impl Into<String>) -> Self {
        self.count_variable = name.into();
        self
    }

    /// Override the cursor variable name
    pub fn cursor_variable(mut self, name: impl Into<String>) -> Self {
        self.cursor_variable = name.into();
        self
    }

    /// Set the default page size
    pub fn default_page_size(mut self, count: u32) -> Self {
        self.default_page_size = count;
        self
    }

    /// Clamp a requested count against this descriptor's limits.
    ///
    /// Oversized requests fall back to the conservative default page size,
    /// not the ceiling; this mirrors the upstream behavior and is flagged as
    /// an open product question rather than silently changed.
    pub fn effective_count(&self, requested: u32) -> u32 {
        if requested > self.max_page_size {
            warn!(
                requested,
                default = self.default_page_size,
                query = %self.id,
                "Requested count above maximum, falling back to default page size"
            );
            self.default_page_size
        } else {
            requested
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oversized_count_falls_back_to_default() {
        let descriptor = QueryDescriptor::new("abc").default_page_size(12);

        let effective = descriptor.effective_count(51);
        assert_eq!(effective, 12);
        assert_ne!(effective, descriptor.max_page_size);
        assert_ne!(effective, 51);
    }

    #[test]
    fn test_count_at_limit_passes_through() {
        let descriptor = QueryDescriptor::new("abc").default_page_size(12);
        assert_eq!(descriptor.effective_count(50), 50);
        assert_eq!(descriptor.effective_count(1), 1);
    }

    #[test]
    fn test_builder_defaults() {
        let descriptor = QueryDescriptor::new("abc");
        assert_eq!(descriptor.count_variable, "first");
        assert_eq!(descriptor.cursor_variable, "after");
        assert_eq!(descriptor.max_page_size, 50);
        assert_eq!(descriptor.shape, ResponseShape::Enveloped);
    }

    #[test]
    fn test_direct_descriptor_shape() {
        let descriptor = QueryDescriptor::direct().result_path(&["graphql", "user"]);
        assert_eq!(descriptor.shape, ResponseShape::Direct);
        assert_eq!(descriptor.result_path, vec!["graphql", "user"]);
    }
}
