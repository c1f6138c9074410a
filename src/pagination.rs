//! Page computation for list endpoints
//!
//! Pure: turns a requested page number and a total item count into a
//! bounded window over an id-ordered fetch, plus navigation links. The
//! last page is floored at one, so an empty listing resolves to page 1
//! with offset 0 rather than a zero page and a negative offset.

use serde::Serialize;

/// Rows per page on every paginated listing.
pub const PAGE_SIZE: i64 = 10;

/// Bounded window over an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Clamped 1-based page number
    pub page: i64,
    /// Last page number, at least 1
    pub last_page: i64,
    /// Offset into the id-ordered fetch
    pub offset: i64,
    pub total_count: i64,
}

impl PageWindow {
    /// Clamp a requested page against a total count.
    ///
    /// Requested pages below 1 become 1; pages past the end become the
    /// last page. The clamped page always lies in [1, last_page] and the
    /// offset is never negative.
    pub fn clamp(requested: i64, total_count: i64) -> Self {
        let last_page = ((total_count + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
        let page = requested.clamp(1, last_page);

        Self {
            page,
            last_page,
            offset: (page - 1) * PAGE_SIZE,
            total_count,
        }
    }
}

/// Parse the `page` query parameter. Absent or malformed means page 1.
pub fn requested_page(query: Option<&str>) -> i64 {
    query
        .and_then(|q| {
            q.split('&')
                .find_map(|pair| pair.strip_prefix("page="))
        })
        .and_then(|value| value.parse::<i64>().ok())
        .unwrap_or(1)
}

/// Navigation links for a page window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_page: Option<String>,
}

impl PageLinks {
    /// Build navigation links for a window, rooted at the collection path.
    ///
    /// Forward links exist only before the last page; backward links only
    /// after the first.
    pub fn for_window(base: &str, window: &PageWindow) -> Self {
        let mut links = Self::default();

        if window.page < window.last_page {
            links.next_page = Some(format!("{base}?page={}", window.page + 1));
            links.last_page = Some(format!("{base}?page={}", window.last_page));
        }
        if window.page > 1 {
            links.prev_page = Some(format!("{base}?page={}", window.page - 1));
            links.first_page = Some(format!("{base}?page=1"));
        }

        links
    }
}

/// One serialized page of items with navigation metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    pub items: Vec<T>,
    pub page_number: i64,
    pub total_pages: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub links: PageLinks,
}

impl<T> PageEnvelope<T> {
    pub fn new(items: Vec<T>, window: &PageWindow, base: &str) -> Self {
        Self {
            items,
            page_number: window.page,
            total_pages: window.last_page,
            page_size: PAGE_SIZE,
            total_count: window.total_count,
            links: PageLinks::for_window(base, window),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_full_page() {
        // 25 items, page 3: last page, five rows remain at offset 20
        let window = PageWindow::clamp(3, 25);
        assert_eq!(window.page, 3);
        assert_eq!(window.last_page, 3);
        assert_eq!(window.offset, 20);
    }

    #[test]
    fn test_page_past_end_clamps_to_last() {
        // 25 items, requested page 10 resolves identically to page 3
        let window = PageWindow::clamp(10, 25);
        assert_eq!(window, PageWindow::clamp(3, 25));
    }

    #[test]
    fn test_page_below_one_clamps_to_first() {
        let window = PageWindow::clamp(0, 25);
        assert_eq!(window.page, 1);
        assert_eq!(window.offset, 0);

        let window = PageWindow::clamp(-4, 25);
        assert_eq!(window.page, 1);
    }

    #[test]
    fn test_empty_listing_resolves_to_page_one() {
        // Zero items: the last page floors at 1, never a negative offset
        let window = PageWindow::clamp(1, 0);
        assert_eq!(window.page, 1);
        assert_eq!(window.last_page, 1);
        assert_eq!(window.offset, 0);

        // Even with an out-of-range request
        let window = PageWindow::clamp(99, 0);
        assert_eq!(window.page, 1);
        assert_eq!(window.offset, 0);
    }

    #[test]
    fn test_window_invariants_hold_across_inputs() {
        for total in [0, 1, 9, 10, 11, 25, 100, 101] {
            for requested in [-10, 0, 1, 2, 3, 11, 1000] {
                let window = PageWindow::clamp(requested, total);
                let expected_last = ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
                assert!(window.page >= 1);
                assert!(window.page <= expected_last);
                assert!(window.offset >= 0);
                assert_eq!(window.offset, (window.page - 1) * PAGE_SIZE);
            }
        }
    }

    #[test]
    fn test_exact_multiple_has_no_partial_page() {
        let window = PageWindow::clamp(2, 20);
        assert_eq!(window.last_page, 2);
        assert_eq!(window.offset, 10);
    }

    #[test]
    fn test_links_on_last_page() {
        // 25 items, page 3: backward links only
        let window = PageWindow::clamp(3, 25);
        let links = PageLinks::for_window("/recipes", &window);
        assert_eq!(links.prev_page.as_deref(), Some("/recipes?page=2"));
        assert_eq!(links.first_page.as_deref(), Some("/recipes?page=1"));
        assert!(links.next_page.is_none());
        assert!(links.last_page.is_none());
    }

    #[test]
    fn test_links_on_first_of_many() {
        let window = PageWindow::clamp(1, 25);
        let links = PageLinks::for_window("/recipes", &window);
        assert_eq!(links.next_page.as_deref(), Some("/recipes?page=2"));
        assert_eq!(links.last_page.as_deref(), Some("/recipes?page=3"));
        assert!(links.prev_page.is_none());
        assert!(links.first_page.is_none());
    }

    #[test]
    fn test_links_on_middle_page() {
        let window = PageWindow::clamp(2, 25);
        let links = PageLinks::for_window("/reviews", &window);
        assert_eq!(links.next_page.as_deref(), Some("/reviews?page=3"));
        assert_eq!(links.prev_page.as_deref(), Some("/reviews?page=1"));
    }

    #[test]
    fn test_single_page_has_no_links() {
        let window = PageWindow::clamp(1, 5);
        let links = PageLinks::for_window("/recipes", &window);
        assert_eq!(links, PageLinks::default());
    }

    #[test]
    fn test_requested_page_parsing() {
        assert_eq!(requested_page(Some("page=3")), 3);
        assert_eq!(requested_page(Some("sort=title&page=7")), 7);
        assert_eq!(requested_page(Some("page=abc")), 1);
        assert_eq!(requested_page(Some("")), 1);
        assert_eq!(requested_page(None), 1);
        // Negative values parse and are left for the clamp to fix
        assert_eq!(requested_page(Some("page=-2")), -2);
    }

    #[test]
    fn test_envelope_serialization_shape() {
        let window = PageWindow::clamp(1, 12);
        let envelope = PageEnvelope::new(vec![1, 2, 3], &window, "/recipes");
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["pageNumber"], 1);
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["totalCount"], 12);
        assert_eq!(json["links"]["nextPage"], "/recipes?page=2");
        // Absent links are omitted, not null
        assert!(json["links"].get("prevPage").is_none());
    }
}
