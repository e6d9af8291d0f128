use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// PAGINATION
// =============================================================================

/// Pagination block returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Page number (1-indexed)
    pub current_page: i64,
    /// Total number of pages for the active filter
    pub total_pages: i64,
    /// Total number of items for the active filter
    pub total_items: i64,
    /// Page size used for this listing
    pub items_per_page: i64,
}

impl Pagination {
    pub fn new(current_page: i64, items_per_page: i64, total_items: i64) -> Self {
        Self {
            current_page,
            total_pages: total_pages(total_items, items_per_page),
            total_items,
            items_per_page,
        }
    }
}

/// `ceil(total / per_page)`; zero items means zero pages.
pub fn total_pages(total_items: i64, items_per_page: i64) -> i64 {
    let per_page = items_per_page.max(1);
    (total_items + per_page - 1) / per_page
}

/// SQL OFFSET for a 1-indexed page.
pub fn page_offset(page: i64, items_per_page: i64) -> i64 {
    (page.max(1) - 1) * items_per_page.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 50), 0);
        assert_eq!(total_pages(1, 50), 1);
        assert_eq!(total_pages(50, 50), 1);
        assert_eq!(total_pages(51, 50), 2);
        assert_eq!(total_pages(101, 50), 3);
    }

    #[test]
    fn page_offset_is_zero_based() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(2, 10), 10);
        assert_eq!(page_offset(3, 10), 20);
        // Pages below 1 floor to the first page
        assert_eq!(page_offset(0, 10), 0);
        assert_eq!(page_offset(-3, 10), 0);
    }

    #[test]
    fn pagination_serializes_camel_case() {
        let value = serde_json::to_value(Pagination::new(2, 10, 25)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "currentPage": 2,
                "totalPages": 3,
                "totalItems": 25,
                "itemsPerPage": 10,
            })
        );
    }
}
