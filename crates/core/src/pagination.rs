//! Offset pagination.

use serde::{Deserialize, Serialize, Serializer, ser::SerializeStruct};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;
/// Highest page whose offset still binds as a signed 64-bit integer.
const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;

/// Requested page, as sent in `?page=&limit=`.
///
/// Out-of-range values are clamped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

const fn default_page() -> i64 {
    DEFAULT_PAGE
}

const fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

impl PageRequest {
    #[must_use]
    pub const fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    /// 1-based page number, at most `i64::MAX / 100`.
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page.clamp(1, MAX_PAGE).unsigned_abs()
    }

    /// Page size, between 1 and 100.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, MAX_LIMIT).unsigned_abs()
    }

    /// Rows to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

/// Field names a paged listing is rendered under.
pub trait Paged {
    /// Key of the item array.
    const ITEMS: &'static str;
    /// Key of the total count.
    const TOTAL: &'static str;
}

/// One page of results plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Number of items across all pages.
    pub total: u64,
    /// 1-based page number.
    pub page: u64,
    /// Page size.
    pub limit: u64,
}

impl<T> Page<T> {
    /// Wrap one page of items fetched for `request`.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            limit: request.limit(),
        }
    }

    /// Number of pages; an empty listing still has one.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.limit.max(1)).max(1)
    }

    /// 1-based position of the first item on this page.
    #[must_use]
    pub fn paging_counter(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .saturating_add(1)
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub fn has_prev_page(&self) -> bool {
        self.page > 1
    }

    /// Whether a later page exists.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Previous page number, if any.
    #[must_use]
    pub fn prev_page(&self) -> Option<u64> {
        self.has_prev_page().then(|| self.page - 1)
    }

    /// Next page number, if any.
    #[must_use]
    pub fn next_page(&self) -> Option<u64> {
        self.has_next_page().then(|| self.page + 1)
    }

    /// Transform the items, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

impl<T: Serialize + Paged> Serialize for Page<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Page", 10)?;
        state.serialize_field(T::ITEMS, &self.items)?;
        state.serialize_field(T::TOTAL, &self.total)?;
        state.serialize_field("limit", &self.limit)?;
        state.serialize_field("page", &self.page)?;
        state.serialize_field("totalPages", &self.total_pages())?;
        state.serialize_field("pagingCounter", &self.paging_counter())?;
        state.serialize_field("hasPrevPage", &self.has_prev_page())?;
        state.serialize_field("hasNextPage", &self.has_next_page())?;
        state.serialize_field("prevPage", &self.prev_page())?;
        state.serialize_field("nextPage", &self.next_page())?;
        state.end()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Item(u32);

    impl Paged for Item {
        const ITEMS: &'static str = "items";
        const TOTAL: &'static str = "totalItems";
    }

    #[test]
    fn test_request_defaults_and_clamping() {
        let request: PageRequest = serde_json::from_str("{}").unwrap();
        assert_eq!((request.page(), request.limit()), (1, 20));

        let request = PageRequest::new(0, 500);
        assert_eq!((request.page(), request.limit()), (1, 100));

        let request = PageRequest::new(-3, 0);
        assert_eq!((request.page(), request.limit()), (1, 1));
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageRequest::new(1, 20).offset(), 0);
        assert_eq!(PageRequest::new(2, 20).offset(), 20);
        assert_eq!(PageRequest::new(3, 7).offset(), 14);
    }

    #[test]
    fn test_huge_page_is_clamped() {
        let request = PageRequest::new(i64::MAX, 100);

        assert_eq!(request.page(), (i64::MAX / 100).unsigned_abs());
        assert!(request.offset() <= i64::MAX.unsigned_abs());
        assert!(i64::try_from(request.offset()).is_ok());

        let page: Page<u32> = Page::new(vec![], 0, request);
        assert_eq!(page.paging_counter(), request.offset() + 1);
        assert_eq!(page.prev_page(), Some(request.page() - 1));
        assert!(!page.has_next_page());
    }

    #[test]
    fn test_paging_counter_saturates() {
        let page: Page<u32> = Page {
            items: vec![],
            total: 0,
            page: u64::MAX,
            limit: 100,
        };
        assert_eq!(page.paging_counter(), u64::MAX);
    }

    #[test]
    fn test_second_page_of_twenty_five() {
        let items: Vec<u32> = (21..=25).collect();
        let page = Page::new(items, 25, PageRequest::new(2, 20));

        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total_pages(), 2);
        assert_eq!(page.paging_counter(), 21);
        assert_eq!(page.prev_page(), Some(1));
        assert_eq!(page.next_page(), None);
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let page: Page<u32> = Page::new(vec![], 0, PageRequest::default());

        assert_eq!(page.total_pages(), 1);
        assert!(!page.has_next_page());
        assert!(!page.has_prev_page());
    }

    #[test]
    fn test_serialize_uses_item_labels() {
        let page = Page::new(vec![Item(1), Item(2)], 2, PageRequest::default());
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["items"], serde_json::json!([1, 2]));
        assert_eq!(json["totalItems"], 2);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["pagingCounter"], 1);
        assert_eq!(json["prevPage"], serde_json::Value::Null);
        assert_eq!(json["hasNextPage"], false);
    }
}
