//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    /// Calculates the row offset passed to the stored functions.
    #[must_use]
    pub fn offset(&self) -> i32 {
        let offset = u64::from(self.page.saturating_sub(1)) * u64::from(self.limit);
        i32::try_from(offset).unwrap_or(i32::MAX)
    }

    /// Returns the row limit passed to the stored functions.
    #[must_use]
    pub fn limit(&self) -> i32 {
        i32::try_from(self.limit).unwrap_or(i32::MAX)
    }
}

/// Pagination metadata returned alongside a page of rows.
///
/// The stored functions do not report a total count, so `has_more` is
/// inferred from a full page: `row_count == limit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub limit: u32,
    /// Whether another page may exist.
    pub has_more: bool,
}

impl PageMeta {
    /// Builds metadata from the request and the number of rows returned.
    #[must_use]
    pub fn new(request: &PageRequest, row_count: usize) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            has_more: row_count == request.limit as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = PageRequest::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, 50);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_offset_math() {
        let request = PageRequest { page: 3, limit: 50 };
        assert_eq!(request.offset(), 100);
        assert_eq!(request.limit(), 50);
    }

    #[test]
    fn test_offset_page_zero_clamps() {
        let request = PageRequest { page: 0, limit: 50 };
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_offset_saturates() {
        let request = PageRequest {
            page: u32::MAX,
            limit: u32::MAX,
        };
        assert_eq!(request.offset(), i32::MAX);
    }

    #[test]
    fn test_has_more_on_full_page() {
        let request = PageRequest { page: 1, limit: 50 };
        assert!(PageMeta::new(&request, 50).has_more);
        assert!(!PageMeta::new(&request, 49).has_more);
        assert!(!PageMeta::new(&request, 0).has_more);
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let request = PageRequest { page: 2, limit: 10 };
        let json = serde_json::to_value(PageMeta::new(&request, 10)).expect("serializes");
        assert_eq!(json["page"], 2);
        assert_eq!(json["limit"], 10);
        assert_eq!(json["hasMore"], true);
    }

    #[test]
    fn test_query_deserialization_applies_defaults() {
        let request: PageRequest = serde_json::from_str("{}").expect("defaults apply");
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, 50);
    }
}
