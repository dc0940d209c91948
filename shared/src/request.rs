//! Query-string types shared by list endpoints

use serde::{Deserialize, Serialize};

/// Pagination query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationQuery {
    /// Page number (1-based, default: 1)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Items per page (default: 20, max: 100)
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

pub(crate) fn default_page() -> u32 {
    1
}

pub(crate) fn default_per_page() -> u32 {
    20
}

impl PaginationQuery {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Row offset for `OFFSET`
    pub fn offset(&self) -> i64 {
        self.page.max(1).saturating_sub(1) as i64 * self.limit()
    }

    /// Page size for `LIMIT`, clamped to 1..=100
    pub fn limit(&self) -> i64 {
        self.per_page.clamp(1, 100) as i64
    }
}

/// Pagination plus a free-text search keyword
///
/// Fields are kept flat: `serde(flatten)` does not survive urlencoded
/// numbers.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default)]
    pub search: Option<String>,
}

impl ListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.per_page)
    }

    /// Trimmed, non-empty search keyword
    pub fn keyword(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, query: &PaginationQuery) -> Self {
        Self {
            items,
            total,
            page: query.page.max(1),
            per_page: query.limit() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit() {
        let q = PaginationQuery::new(3, 25);
        assert_eq!(q.offset(), 50);
        assert_eq!(q.limit(), 25);

        let q = PaginationQuery::new(0, 500);
        assert_eq!(q.offset(), 0);
        assert_eq!(q.limit(), 100);

        assert_eq!(PaginationQuery::new(1, 0).limit(), 1);
    }

    #[test]
    fn test_list_query_defaults() {
        let q: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.page, 1);
        assert_eq!(q.per_page, 20);
        assert!(q.keyword().is_none());
    }

    #[test]
    fn test_keyword_trimmed() {
        let q = ListQuery {
            page: 1,
            per_page: 20,
            search: Some("  smith ".into()),
        };
        assert_eq!(q.keyword(), Some("smith"));

        let blank = ListQuery {
            search: Some("   ".into()),
            ..q
        };
        assert!(blank.keyword().is_none());
    }
}
