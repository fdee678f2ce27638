//! Paging and filter state machine shared by every collection view
//!
//! The controller is pure: events go in, [`Effect`]s come out, and the
//! async driver in [`crate::service`] owns the actual timers and network
//! calls. All state transitions are explicit, so every invariant the views
//! rely on (debounced filters, page resets, stale-response discards) is
//! testable without a runtime.

use newsdesk_client::{ListQuery, Page};

/// How a view presents successive pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Classic pager: each fetch replaces the visible page
    Replace,
    /// Infinite "load more": pages past the first append to the list
    Append,
}

/// Fetch lifecycle phase of a list view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing in flight
    Idle,
    /// The latest issued fetch has not resolved yet
    Loading,
    /// The latest issued fetch failed; previous items stay visible
    Error,
}

/// A fetch the driver must issue on the controller's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Generation number; only the completion carrying the latest
    /// generation may commit (last-request-wins)
    pub generation: u64,

    /// Query to send
    pub query: ListQuery,
}

/// Side effect requested by a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Nothing to do
    None,
    /// Issue this fetch now
    Fetch(FetchRequest),
    /// Start (or restart) the debounce timer; deliver the token back via
    /// [`ListController::debounce_elapsed`] when the quiet period ends
    Debounce {
        /// Token identifying this timer arm; stale tokens are ignored
        token: u64,
    },
}

/// Paging, filter and item state for one collection view
#[derive(Debug)]
pub struct ListController<T> {
    page_size: u32,
    mode: DisplayMode,

    page: u32,
    items: Vec<T>,
    has_more: bool,
    total: Option<u64>,
    phase: Phase,
    last_error: Option<String>,

    /// Filter text exactly as typed, updated on every keystroke
    raw_filters: Vec<(String, String)>,
    /// The debounced snapshot actually used for fetching
    applied_filters: Vec<(String, String)>,

    latest_generation: u64,
    debounce_token: u64,
    debounce_armed: bool,
}

impl<T> ListController<T> {
    /// Create a controller for a view with the given page size and mode
    #[must_use]
    pub const fn new(page_size: u32, mode: DisplayMode) -> Self {
        Self {
            page_size,
            mode,
            page: 1,
            items: Vec::new(),
            has_more: false,
            total: None,
            phase: Phase::Idle,
            last_error: None,
            raw_filters: Vec::new(),
            applied_filters: Vec::new(),
            latest_generation: 0,
            debounce_token: 0,
            debounce_armed: false,
        }
    }

    /// Initial fetch on view mount: page 1, no filters
    pub fn start(&mut self) -> Effect {
        self.page = 1;
        self.issue_fetch()
    }

    /// A filter input changed; the raw text updates immediately, the
    /// fetch waits for the quiet period
    pub fn filter_edited(&mut self, name: impl Into<String>, value: impl Into<String>) -> Effect {
        let name = name.into();
        let value = value.into();
        set_filter(&mut self.raw_filters, name, value);

        self.debounce_token = self.debounce_token.wrapping_add(1);
        self.debounce_armed = true;
        Effect::Debounce {
            token: self.debounce_token,
        }
    }

    /// The quiet period for `token` elapsed
    ///
    /// Only the most recently armed token has any effect, and a fetch is
    /// issued only when the debounced text actually differs from the
    /// filters already applied (typing a character and deleting it again
    /// within the window is not a filter change).
    pub fn debounce_elapsed(&mut self, token: u64) -> Effect {
        if !self.debounce_armed || token != self.debounce_token {
            return Effect::None;
        }
        self.debounce_armed = false;

        if normalized(&self.raw_filters) == normalized(&self.applied_filters) {
            return Effect::None;
        }

        self.applied_filters = self.raw_filters.clone();
        self.page = 1;
        self.issue_fetch()
    }

    /// A discrete filter control changed (a select, not a text box)
    ///
    /// Unlike keystrokes this is a complete user decision, so it applies
    /// immediately: page resets to 1 and the fetch fires without any quiet
    /// period. Raw text typed but not yet debounced is applied along with
    /// it rather than silently dropped.
    pub fn filter_selected(&mut self, name: impl Into<String>, value: impl Into<String>) -> Effect {
        set_filter(&mut self.raw_filters, name.into(), value.into());
        self.debounce_armed = false;
        self.applied_filters = self.raw_filters.clone();
        self.page = 1;
        self.issue_fetch()
    }

    /// Clear every filter and fetch page 1 immediately
    ///
    /// This is a discrete action, not a keystroke, so it bypasses the
    /// debounce entirely; any pending quiet period is cancelled.
    pub fn clear_filters(&mut self) -> Effect {
        self.debounce_armed = false;
        self.raw_filters.clear();
        self.applied_filters.clear();
        self.page = 1;
        self.issue_fetch()
    }

    /// Move to the next page, when one is indicated
    pub fn next_page(&mut self) -> Effect {
        if !self.has_more {
            return Effect::None;
        }
        self.page = self.page.saturating_add(1);
        self.issue_fetch()
    }

    /// Move to the previous page, when not already on the first
    pub fn prev_page(&mut self) -> Effect {
        if self.page <= 1 {
            return Effect::None;
        }
        self.page -= 1;
        self.issue_fetch()
    }

    /// Append the next page in load-more style
    pub fn load_more(&mut self) -> Effect {
        if !self.has_more || self.phase == Phase::Loading {
            return Effect::None;
        }
        self.page = self.page.saturating_add(1);
        self.issue_fetch()
    }

    /// Re-fetch the current page with the applied filters
    pub fn refresh(&mut self) -> Effect {
        if self.mode == DisplayMode::Append {
            // A load-more list cannot re-request a single page; start over
            // from the first one.
            self.page = 1;
        }
        self.issue_fetch()
    }

    /// A fetch resolved; returns `true` when the result was committed
    ///
    /// Completions carrying any generation but the latest are discarded
    /// wholesale, success or failure: a newer request has been issued
    /// since, and its result is the only one allowed to win.
    pub fn fetch_completed(
        &mut self,
        generation: u64,
        result: Result<Page<T>, String>,
    ) -> bool {
        if generation != self.latest_generation {
            return false;
        }

        match result {
            Ok(page) => {
                if self.mode == DisplayMode::Append && self.page > 1 {
                    self.items.extend(page.items);
                } else {
                    self.items = page.items;
                }
                self.has_more = page.has_more;
                self.total = page.total;
                self.phase = Phase::Idle;
                self.last_error = None;
            }
            Err(message) => {
                // Previous items and page stay visible; no destructive clear.
                self.phase = Phase::Error;
                self.last_error = Some(message);
            }
        }
        true
    }

    /// Remove every item matching the predicate (local delete, no refetch)
    pub fn remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !pred(item));
        before - self.items.len()
    }

    /// Replace the first item matching the predicate (in-place patch)
    pub fn replace_where(&mut self, mut pred: impl FnMut(&T) -> bool, replacement: T) -> bool {
        if let Some(slot) = self.items.iter_mut().find(|item| pred(item)) {
            *slot = replacement;
            return true;
        }
        false
    }

    fn issue_fetch(&mut self) -> Effect {
        self.phase = Phase::Loading;
        self.latest_generation = self.latest_generation.wrapping_add(1);

        let mut query = ListQuery::first_page(self.page_size).with_page(self.page);
        for (name, value) in &self.applied_filters {
            query = query.with_filter(name.clone(), value.clone());
        }

        Effect::Fetch(FetchRequest {
            generation: self.latest_generation,
            query,
        })
    }

    /// Items currently held by the view
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Current 1-based page number
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Current fetch phase
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// True while the latest fetch is in flight
    #[must_use]
    pub fn loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Whether a further page is indicated
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Total item count, when the endpoint reports one
    #[must_use]
    pub const fn total(&self) -> Option<u64> {
        self.total
    }

    /// Message of the most recent failed fetch, until one succeeds
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Raw (un-debounced) value of a filter, as currently typed
    #[must_use]
    pub fn raw_filter(&self, name: &str) -> &str {
        get_filter(&self.raw_filters, name)
    }

    /// Raw filter pairs, as currently typed
    #[must_use]
    pub fn raw_filters(&self) -> &[(String, String)] {
        &self.raw_filters
    }

    /// The debounced filter snapshot used for fetching
    #[must_use]
    pub fn applied_filters(&self) -> &[(String, String)] {
        &self.applied_filters
    }

    /// True when any raw filter holds non-blank text
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        self.raw_filters.iter().any(|(_, v)| !v.trim().is_empty())
    }

    /// Display mode this controller was built with
    #[must_use]
    pub const fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Page size every fetch requests
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }
}

fn set_filter(filters: &mut Vec<(String, String)>, name: String, value: String) {
    if let Some(slot) = filters.iter_mut().find(|(n, _)| *n == name) {
        slot.1 = value;
    } else {
        filters.push((name, value));
    }
}

fn get_filter<'a>(filters: &'a [(String, String)], name: &str) -> &'a str {
    filters
        .iter()
        .find(|(n, _)| n == name)
        .map_or("", |(_, v)| v.as_str())
}

/// Filter comparison ignores blank values and ordering: an empty `title`
/// entry and a missing one are the same filter state.
fn normalized(filters: &[(String, String)]) -> Vec<(&str, &str)> {
    let mut pairs: Vec<(&str, &str)> = filters
        .iter()
        .filter(|(_, v)| !v.trim().is_empty())
        .map(|(n, v)| (n.as_str(), v.trim()))
        .collect();
    pairs.sort_unstable();
    pairs
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
#[allow(clippy::unwrap_used, clippy::uninlined_format_args, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(items: Vec<&str>, has_more: bool) -> Page<String> {
        Page {
            items: items.into_iter().map(String::from).collect(),
            has_more,
            total: None,
        }
    }

    fn fetch_of(effect: Effect) -> FetchRequest {
        match effect {
            Effect::Fetch(request) => request,
            other => panic!("expected a fetch effect, got {other:?}"),
        }
    }

    fn token_of(effect: Effect) -> u64 {
        match effect {
            Effect::Debounce { token } => token,
            other => panic!("expected a debounce effect, got {other:?}"),
        }
    }

    #[test]
    fn mount_fetches_first_page_unfiltered() {
        let mut ctl = ListController::<String>::new(10, DisplayMode::Replace);
        let request = fetch_of(ctl.start());
        assert_eq!(request.query.page, 1);
        assert_eq!(request.query.query_pairs().len(), 2); // limit + page only
        assert!(ctl.loading());
    }

    #[test]
    fn typing_burst_yields_single_fetch_with_final_value() {
        let mut ctl = ListController::<String>::new(10, DisplayMode::Replace);
        ctl.start();

        let t1 = token_of(ctl.filter_edited("title", "a"));
        let t2 = token_of(ctl.filter_edited("title", "ab"));
        let t3 = token_of(ctl.filter_edited("title", "abc"));

        // The two earlier timers fire late; both are stale.
        assert_eq!(ctl.debounce_elapsed(t1), Effect::None);
        assert_eq!(ctl.debounce_elapsed(t2), Effect::None);

        let request = fetch_of(ctl.debounce_elapsed(t3));
        assert!(
            request
                .query
                .query_pairs()
                .contains(&("title".to_string(), "abc".to_string()))
        );
        assert_eq!(request.query.page, 1);
    }

    #[test]
    fn raw_text_is_visible_before_the_quiet_period_ends() {
        let mut ctl = ListController::<String>::new(10, DisplayMode::Replace);
        ctl.start();
        ctl.filter_edited("title", "ab");
        assert_eq!(ctl.raw_filter("title"), "ab");
        assert!(ctl.applied_filters().is_empty());
    }

    #[test]
    fn type_and_revert_within_window_is_not_a_change() {
        let mut ctl = ListController::<String>::new(10, DisplayMode::Replace);
        ctl.start();
        ctl.filter_edited("title", "a");
        let token = token_of(ctl.filter_edited("title", ""));
        assert_eq!(ctl.debounce_elapsed(token), Effect::None);
    }

    #[test]
    fn page_change_uses_applied_filters_not_raw_text() {
        let mut ctl = ListController::<String>::new(10, DisplayMode::Replace);
        let first = fetch_of(ctl.start());
        let token = token_of(ctl.filter_edited("title", "abc"));
        let second = fetch_of(ctl.debounce_elapsed(token));
        ctl.fetch_completed(second.generation, Ok(page(vec!["x"; 10], true)));

        // New keystrokes arrive but have not debounced yet.
        ctl.filter_edited("title", "abcdef");

        let request = fetch_of(ctl.next_page());
        assert_eq!(request.query.page, 2);
        assert!(
            request
                .query
                .query_pairs()
                .contains(&("title".to_string(), "abc".to_string()))
        );
        assert!(first.generation < request.generation);
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut ctl = ListController::<String>::new(10, DisplayMode::Replace);
        let a = fetch_of(ctl.start());
        let b = fetch_of(ctl.next_page_unchecked());

        // B resolves first and commits; A resolves later and must lose.
        assert!(ctl.fetch_completed(b.generation, Ok(page(vec!["new"], false))));
        assert!(!ctl.fetch_completed(a.generation, Ok(page(vec!["old"], false))));
        assert_eq!(ctl.items(), &["new".to_string()]);
    }

    #[test]
    fn stale_failure_does_not_disturb_a_committed_result() {
        let mut ctl = ListController::<String>::new(10, DisplayMode::Replace);
        let a = fetch_of(ctl.start());
        let b = fetch_of(ctl.refresh());

        assert!(ctl.fetch_completed(b.generation, Ok(page(vec!["kept"], false))));
        assert!(!ctl.fetch_completed(a.generation, Err("late failure".to_string())));
        assert_eq!(ctl.phase(), Phase::Idle);
        assert_eq!(ctl.items(), &["kept".to_string()]);
    }

    #[test]
    fn failed_fetch_keeps_previous_items_visible() {
        let mut ctl = ListController::<String>::new(10, DisplayMode::Replace);
        let a = fetch_of(ctl.start());
        ctl.fetch_completed(a.generation, Ok(page(vec!["one", "two"], false)));

        let b = fetch_of(ctl.refresh());
        ctl.fetch_completed(b.generation, Err("boom".to_string()));

        assert_eq!(ctl.phase(), Phase::Error);
        assert_eq!(ctl.last_error(), Some("boom"));
        assert_eq!(ctl.items().len(), 2);
        assert!(!ctl.loading());
    }

    #[test]
    fn clearing_filters_resets_page_and_fetches_immediately() {
        let mut ctl = ListController::<String>::new(10, DisplayMode::Replace);
        let a = fetch_of(ctl.start());
        let token = token_of(ctl.filter_edited("category", "Dünya"));
        let b = fetch_of(ctl.debounce_elapsed(token));
        ctl.fetch_completed(b.generation, Ok(page(vec!["x"; 10], true)));
        fetch_of(ctl.next_page());
        assert_eq!(ctl.page(), 2);

        // A pending keystroke burst must not resurrect the cleared filter.
        let stale = token_of(ctl.filter_edited("category", "Siyasət"));

        let request = fetch_of(ctl.clear_filters());
        assert_eq!(ctl.page(), 1);
        assert_eq!(request.query.query_pairs().len(), 2);
        assert_eq!(ctl.debounce_elapsed(stale), Effect::None);
        assert!(a.generation < request.generation);
    }

    #[test]
    fn select_style_filter_applies_without_debounce() {
        let mut ctl = ListController::<String>::new(10, DisplayMode::Replace);
        let a = fetch_of(ctl.start());
        ctl.fetch_completed(a.generation, Ok(page(vec!["x"; 10], true)));
        fetch_of(ctl.next_page());

        // A half-typed text filter is pending when the select changes.
        let stale = token_of(ctl.filter_edited("title", "zəf"));

        let request = fetch_of(ctl.filter_selected("isRead", "true"));
        assert_eq!(request.query.page, 1);
        let pairs = request.query.query_pairs();
        assert!(pairs.contains(&("isRead".to_string(), "true".to_string())));
        assert!(pairs.contains(&("title".to_string(), "zəf".to_string())));
        assert_eq!(ctl.debounce_elapsed(stale), Effect::None);
    }

    #[test]
    fn append_mode_extends_items_past_page_one() {
        let mut ctl = ListController::<String>::new(2, DisplayMode::Append);
        let a = fetch_of(ctl.start());
        ctl.fetch_completed(a.generation, Ok(page(vec!["1", "2"], true)));

        let b = fetch_of(ctl.load_more());
        ctl.fetch_completed(b.generation, Ok(page(vec!["3"], false)));

        assert_eq!(ctl.items().len(), 3);
        assert!(!ctl.has_more());
    }

    #[test]
    fn append_mode_filter_change_replaces_from_page_one() {
        let mut ctl = ListController::<String>::new(2, DisplayMode::Append);
        let a = fetch_of(ctl.start());
        ctl.fetch_completed(a.generation, Ok(page(vec!["1", "2"], true)));
        let b = fetch_of(ctl.load_more());
        ctl.fetch_completed(b.generation, Ok(page(vec!["3", "4"], true)));

        let token = token_of(ctl.filter_edited("title", "zəfər"));
        let c = fetch_of(ctl.debounce_elapsed(token));
        assert_eq!(c.query.page, 1);
        ctl.fetch_completed(c.generation, Ok(page(vec!["z"], false)));
        assert_eq!(ctl.items(), &["z".to_string()]);
    }

    #[test]
    fn load_more_is_ignored_while_loading_or_exhausted() {
        let mut ctl = ListController::<String>::new(2, DisplayMode::Append);
        let a = fetch_of(ctl.start());
        assert_eq!(ctl.load_more(), Effect::None); // still loading
        ctl.fetch_completed(a.generation, Ok(page(vec!["1"], false)));
        assert_eq!(ctl.load_more(), Effect::None); // nothing more
    }

    #[test]
    fn prev_is_ignored_on_first_page_next_without_more() {
        let mut ctl = ListController::<String>::new(10, DisplayMode::Replace);
        let a = fetch_of(ctl.start());
        ctl.fetch_completed(a.generation, Ok(page(vec!["only"], false)));
        assert_eq!(ctl.prev_page(), Effect::None);
        assert_eq!(ctl.next_page(), Effect::None);
    }

    #[test]
    fn same_query_twice_commits_identical_items() {
        let mut ctl = ListController::<String>::new(10, DisplayMode::Replace);
        let a = fetch_of(ctl.start());
        ctl.fetch_completed(a.generation, Ok(page(vec!["a", "b"], false)));
        let first = ctl.items().to_vec();

        let b = fetch_of(ctl.refresh());
        assert_eq!(a.query, b.query);
        ctl.fetch_completed(b.generation, Ok(page(vec!["a", "b"], false)));
        assert_eq!(ctl.items(), first.as_slice());
    }

    #[test]
    fn local_removal_and_patch() {
        let mut ctl = ListController::<String>::new(10, DisplayMode::Replace);
        let a = fetch_of(ctl.start());
        ctl.fetch_completed(a.generation, Ok(page(vec!["a", "b", "c"], false)));

        assert_eq!(ctl.remove_where(|item| item == "b"), 1);
        assert!(ctl.replace_where(|item| item == "c", "c2".to_string()));
        assert_eq!(ctl.items(), &["a".to_string(), "c2".to_string()]);
        assert!(!ctl.replace_where(|item| item == "missing", "x".to_string()));
    }

    impl ListController<String> {
        /// Test helper: force a next-page fetch regardless of `has_more`,
        /// to build overlapping in-flight requests.
        fn next_page_unchecked(&mut self) -> Effect {
            self.page += 1;
            self.issue_fetch()
        }
    }
}
