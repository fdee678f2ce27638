//! Collection query parameters and page results

/// Query parameters for a paginated collection listing
///
/// `filters` maps filter names to raw text values; values that are empty
/// after trimming are dropped before the request is built, so an empty
/// search box never reaches the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number
    pub page: u32,

    /// Number of items requested per page
    pub page_size: u32,

    /// Filter name/value pairs, in insertion order
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    /// Query for the first page with no filters
    #[must_use]
    pub const fn first_page(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            filters: Vec::new(),
        }
    }

    /// Add or replace a filter value
    #[must_use]
    pub fn with_filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.filters.retain(|(n, _)| *n != name);
        self.filters.push((name, value.into()));
        self
    }

    /// Move to a different page, keeping size and filters
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// The key/value pairs that belong on the wire: paging first, then
    /// every filter whose trimmed value is non-empty.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("limit".to_string(), self.page_size.to_string()),
            ("page".to_string(), self.page.to_string()),
        ];

        for (name, value) in &self.filters {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                pairs.push((name.clone(), trimmed.to_string()));
            }
        }

        pairs
    }
}

/// One page of a remote collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in server-determined order
    pub items: Vec<T>,

    /// Whether a further page is indicated
    pub has_more: bool,

    /// Total item count across all pages, when the endpoint reports one
    pub total: Option<u64>,
}

impl<T> Page<T> {
    /// Build a page from an endpoint that reports no total: a further page
    /// is inferred exactly when the server filled this one.
    #[must_use]
    pub fn from_len_inference(items: Vec<T>, page_size: u32) -> Self {
        let has_more = items.len() == page_size as usize;
        Self {
            items,
            has_more,
            total: None,
        }
    }

    /// Build a page from an endpoint that reports an explicit total.
    #[must_use]
    pub fn from_total(items: Vec<T>, total: u64, page: u32, page_size: u32) -> Self {
        let has_more = u64::from(page) * u64::from(page_size) < total;
        Self {
            items,
            has_more,
            total: Some(total),
        }
    }

    /// Number of items on this page
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the page holds no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
#[allow(clippy::unwrap_used, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_blank_filters_are_omitted() {
        let query = ListQuery::first_page(10)
            .with_filter("title", "  ")
            .with_filter("category", "")
            .with_filter("author", "\t\n");
        let pairs = query.query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("limit".to_string(), "10".to_string()),
                ("page".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_values_are_trimmed() {
        let query = ListQuery::first_page(10).with_filter("title", "  hadisə  ");
        let pairs = query.query_pairs();
        assert!(pairs.contains(&("title".to_string(), "hadisə".to_string())));
    }

    #[test]
    fn test_with_filter_replaces_existing_value() {
        let query = ListQuery::first_page(10)
            .with_filter("title", "a")
            .with_filter("title", "ab");
        let values: Vec<_> = query
            .filters
            .iter()
            .filter(|(n, _)| n == "title")
            .collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].1, "ab");
    }

    #[test]
    fn test_page_is_clamped_to_one() {
        let query = ListQuery::first_page(10).with_page(0);
        assert_eq!(query.page, 1);
    }

    #[rstest]
    #[case(10, 10, true)]
    #[case(7, 10, false)]
    #[case(0, 10, false)]
    fn test_has_more_inference(#[case] len: usize, #[case] page_size: u32, #[case] expected: bool) {
        let page = Page::from_len_inference(vec![0_u8; len], page_size);
        assert_eq!(page.has_more, expected);
        assert_eq!(page.total, None);
    }

    #[rstest]
    #[case(1, 10, 25, true)]
    #[case(2, 10, 25, true)]
    #[case(3, 10, 25, false)]
    #[case(1, 10, 10, false)]
    #[case(1, 10, 0, false)]
    fn test_has_more_from_total(
        #[case] page: u32,
        #[case] page_size: u32,
        #[case] total: u64,
        #[case] expected: bool,
    ) {
        let page = Page::from_total(Vec::<u8>::new(), total, page, page_size);
        assert_eq!(page.has_more, expected);
        assert_eq!(page.total, Some(total));
    }
}
