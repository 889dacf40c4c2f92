//! Limit/offset pagination primitives shared by YamDB list endpoints.
//!
//! A [`PageRequest`] describes the window a client asked for, a [`Page`]
//! carries one window of results plus the total number of matches, and
//! [`Paginated`] is the JSON envelope returned to HTTP clients:
//!
//! ```json
//! {"count": 42, "next": "https://host/v1/titles/?limit=10&offset=20",
//!  "previous": "https://host/v1/titles/?limit=10", "results": []}
//! ```

use serde::Serialize;
use url::Url;

/// Number of items returned when the client omits `limit`.
pub const DEFAULT_LIMIT: u32 = 10;

/// Upper bound applied to client-supplied limits.
pub const MAX_LIMIT: u32 = 100;

/// Errors raised while interpreting pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The client asked for an empty window.
    #[error("limit must be a positive integer")]
    ZeroLimit,
}

/// A validated limit/offset window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: u32,
    offset: u64,
}

impl PageRequest {
    /// Build a window from optional query parameters.
    ///
    /// Missing limits fall back to [`DEFAULT_LIMIT`]; larger limits are
    /// clamped to [`MAX_LIMIT`]. A missing offset starts at the first item.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroLimit`] when `limit` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{PageRequest, MAX_LIMIT};
    ///
    /// let request = PageRequest::new(Some(500), Some(20)).expect("valid window");
    /// assert_eq!(request.limit(), MAX_LIMIT);
    /// assert_eq!(request.offset(), 20);
    /// ```
    pub fn new(limit: Option<u32>, offset: Option<u64>) -> Result<Self, PaginationError> {
        let window = match limit {
            None => DEFAULT_LIMIT,
            Some(0) => return Err(PaginationError::ZeroLimit),
            Some(requested) => requested.min(MAX_LIMIT),
        };
        Ok(Self {
            limit: window,
            offset: offset.unwrap_or(0),
        })
    }

    /// The first window with the default limit.
    #[must_use]
    pub const fn first() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }

    /// Maximum number of items in the window.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Number of items skipped before the window starts.
    #[must_use]
    pub const fn offset(self) -> u64 {
        self.offset
    }

    /// Keep only the items that fall inside this window.
    #[must_use]
    pub fn apply<T>(self, items: Vec<T>) -> Vec<T> {
        let skip = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(self.limit).unwrap_or(usize::MAX);
        items.into_iter().skip(skip).take(take).collect()
    }
}

/// One window of results together with the total number of matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
}

impl<T> Page<T> {
    /// Wrap an already windowed result set.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// Window a complete result set held in memory.
    #[must_use]
    pub fn from_all(all: Vec<T>, request: PageRequest) -> Self {
        let total = u64::try_from(all.len()).unwrap_or(u64::MAX);
        Self {
            items: request.apply(all),
            total,
        }
    }

    /// Items inside the window.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Total number of matches across all windows.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Consume the page, returning the windowed items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Convert every item while keeping the total.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }

    /// Fallible variant of [`Page::map`].
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_map<U, E, F>(self, f: F) -> Result<Page<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        let items = self.items.into_iter().map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(Page {
            items,
            total: self.total,
        })
    }
}

/// JSON envelope returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
    /// Total number of matches across all windows.
    pub count: u64,
    /// Absolute link to the following window, if any.
    pub next: Option<String>,
    /// Absolute link to the preceding window, if any.
    pub previous: Option<String>,
    /// Items inside the current window.
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Wrap a page, deriving navigation links from the current request URL.
    ///
    /// Query parameters other than `limit` and `offset` are preserved in the
    /// generated links.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{Page, PageRequest, Paginated};
    /// use url::Url;
    ///
    /// let current = Url::parse("http://localhost/v1/genres/?search=rock").expect("valid url");
    /// let request = PageRequest::new(Some(2), None).expect("valid window");
    /// let body = Paginated::from_page(Page::new(vec![1, 2], 3), request, &current);
    /// assert_eq!(
    ///     body.next.as_deref(),
    ///     Some("http://localhost/v1/genres/?search=rock&limit=2&offset=2")
    /// );
    /// assert!(body.previous.is_none());
    /// ```
    #[must_use]
    pub fn from_page(page: Page<T>, request: PageRequest, current: &Url) -> Self {
        let step = u64::from(request.limit);
        let next_offset = request.offset.saturating_add(step);
        let next = (next_offset < page.total).then(|| link(current, request.limit, Some(next_offset)));
        let previous = (request.offset > 0).then(|| {
            let back = request.offset.saturating_sub(step);
            link(current, request.limit, (back > 0).then_some(back))
        });
        Self {
            count: page.total,
            next,
            previous,
            results: page.items,
        }
    }
}

fn link(current: &Url, limit: u32, offset: Option<u64>) -> String {
    let retained: Vec<(String, String)> = current
        .query_pairs()
        .filter(|(key, _)| key != "limit" && key != "offset")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    let mut target = current.clone();
    {
        let mut pairs = target.query_pairs_mut();
        pairs.clear();
        pairs.extend_pairs(retained);
        pairs.append_pair("limit", &limit.to_string());
        if let Some(value) = offset {
            pairs.append_pair("offset", &value.to_string());
        }
    }
    target.into()
}

#[cfg(test)]
mod tests {
    //! Window arithmetic and link generation.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn titles_url() -> Url {
        Url::parse("http://testserver/v1/titles/?genre=drama&offset=5").expect("fixture url")
    }

    #[rstest]
    #[case(None, DEFAULT_LIMIT)]
    #[case(Some(3), 3)]
    #[case(Some(MAX_LIMIT + 1), MAX_LIMIT)]
    fn limit_defaults_and_clamps(#[case] requested: Option<u32>, #[case] expected: u32) {
        let request = PageRequest::new(requested, None).expect("valid window");
        assert_eq!(request.limit(), expected);
        assert_eq!(request.offset(), 0);
    }

    #[rstest]
    fn zero_limit_is_rejected() {
        assert_eq!(
            PageRequest::new(Some(0), None),
            Err(PaginationError::ZeroLimit)
        );
    }

    #[rstest]
    fn apply_skips_and_takes() {
        let request = PageRequest::new(Some(2), Some(1)).expect("valid window");
        assert_eq!(request.apply(vec![1, 2, 3, 4]), vec![2, 3]);
    }

    #[rstest]
    fn apply_past_the_end_is_empty() {
        let request = PageRequest::new(Some(2), Some(10)).expect("valid window");
        assert!(request.apply(vec![1, 2, 3]).is_empty());
    }

    #[rstest]
    fn from_all_counts_every_item() {
        let page = Page::from_all(vec!["a", "b", "c"], PageRequest::new(Some(1), None).expect("window"));
        assert_eq!(page.total(), 3);
        assert_eq!(page.items(), &["a"]);
    }

    #[rstest]
    fn middle_window_links_both_ways(titles_url: Url) {
        let request = PageRequest::new(Some(5), Some(5)).expect("valid window");
        let body = Paginated::from_page(Page::new(vec![0; 5], 20), request, &titles_url);

        assert_eq!(body.count, 20);
        assert_eq!(
            body.next.as_deref(),
            Some("http://testserver/v1/titles/?genre=drama&limit=5&offset=10")
        );
        assert_eq!(
            body.previous.as_deref(),
            Some("http://testserver/v1/titles/?genre=drama&limit=5")
        );
    }

    #[rstest]
    fn last_window_has_no_next(titles_url: Url) {
        let request = PageRequest::new(Some(10), Some(15)).expect("valid window");
        let body = Paginated::from_page(Page::new(vec![1, 2], 17), request, &titles_url);

        assert!(body.next.is_none());
        assert_eq!(
            body.previous.as_deref(),
            Some("http://testserver/v1/titles/?genre=drama&limit=10&offset=5")
        );
    }

    #[rstest]
    fn envelope_serialises_with_null_links(titles_url: Url) {
        let body = Paginated::from_page(Page::new(vec!["x"], 1), PageRequest::first(), &titles_url);
        let json = serde_json::to_value(&body).expect("serialise envelope");
        assert_eq!(
            json,
            serde_json::json!({"count": 1, "next": null, "previous": null, "results": ["x"]})
        );
    }

    #[rstest]
    fn try_map_stops_at_first_error() {
        let page = Page::new(vec![1, 2, 3], 3);
        let result: Result<Page<i32>, &str> =
            page.try_map(|value| if value == 2 { Err("two") } else { Ok(value) });
        assert_eq!(result, Err("two"));
    }
}
