//! Async driver for the list controller
//!
//! One service task per collection view: it owns the debounce timer and
//! the in-flight fetches, feeds completions back into the pure
//! [`ListController`], and publishes immutable snapshots for the
//! presentation layer to render. The presentation side only ever sends
//! [`ListEvent`]s; it never touches list state directly.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::time::{Duration, Instant, sleep_until};
use tracing::{debug, warn};

use newsdesk_client::Page;
use newsdesk_core::types::RecordId;

use crate::collection::Collection;
use crate::controller::{DisplayMode, Effect, ListController, Phase};

/// Intent dispatched by the presentation layer
#[derive(Debug)]
pub enum ListEvent<T> {
    /// A filter input changed (raw keystroke; fetch is debounced)
    FilterEdited {
        /// Wire filter name
        name: String,
        /// Text as currently typed
        value: String,
    },
    /// A discrete filter control changed; applies immediately, no debounce
    FilterSelected {
        /// Wire filter name
        name: String,
        /// Selected value (empty clears the filter)
        value: String,
    },
    /// Clear every filter and fetch immediately
    ClearFilters,
    /// Classic pager: next page
    NextPage,
    /// Classic pager: previous page
    PrevPage,
    /// Load-more pager: append the next page
    LoadMore,
    /// Re-fetch with current page and applied filters
    Refresh,
    /// Remove an item locally after a confirmed delete succeeded
    RemoveItem(RecordId),
    /// Patch an item in place after an update succeeded
    ReplaceItem(T),
}

/// Immutable render state published after every transition
#[derive(Debug, Clone)]
pub struct ListSnapshot<T> {
    /// Fetch lifecycle phase
    pub phase: Phase,
    /// Items currently held (full pages; presentation may narrow further)
    pub items: Vec<T>,
    /// Current 1-based page
    pub page: u32,
    /// Whether a further page is indicated
    pub has_more: bool,
    /// Total count, when the endpoint reports one
    pub total: Option<u64>,
    /// Filter text exactly as typed
    pub raw_filters: Vec<(String, String)>,
    /// True when any filter holds non-blank text
    pub has_active_filters: bool,
    /// Message of the most recent failed fetch
    pub error: Option<String>,
    /// Display mode of the view
    pub mode: DisplayMode,
    /// Page size every fetch requests
    pub page_size: u32,
}

impl<T> ListSnapshot<T> {
    /// Total page count, when the endpoint reports a total
    #[must_use]
    pub fn total_pages(&self) -> Option<u64> {
        self.total
            .map(|total| total.div_ceil(u64::from(self.page_size.max(1))).max(1))
    }

    fn initial(mode: DisplayMode, page_size: u32) -> Self {
        Self {
            phase: Phase::Idle,
            items: Vec::new(),
            page: 1,
            has_more: false,
            total: None,
            raw_filters: Vec::new(),
            has_active_filters: false,
            error: None,
            mode,
            page_size,
        }
    }
}

/// Errors surfaced to the presentation layer
#[derive(Debug, Error)]
pub enum PanelError {
    /// The service task is gone; the view should shut down
    #[error("panel service is no longer running")]
    ServiceStopped,
}

/// Handle for one spawned panel service
#[derive(Debug)]
pub struct PanelHandle<T> {
    events: mpsc::UnboundedSender<ListEvent<T>>,
    snapshots: watch::Receiver<ListSnapshot<T>>,
}

impl<T> Clone for PanelHandle<T> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
            snapshots: self.snapshots.clone(),
        }
    }
}

impl<T: Clone> PanelHandle<T> {
    /// Dispatch an event to the service
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::ServiceStopped`] when the service task has
    /// exited.
    pub fn send(&self, event: ListEvent<T>) -> Result<(), PanelError> {
        self.events
            .send(event)
            .map_err(|_| PanelError::ServiceStopped)
    }

    /// The latest published snapshot
    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot<T> {
        self.snapshots.borrow().clone()
    }

    /// Wait until a new snapshot is published
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::ServiceStopped`] when the service task has
    /// exited.
    pub async fn changed(&mut self) -> Result<(), PanelError> {
        self.snapshots
            .changed()
            .await
            .map_err(|_| PanelError::ServiceStopped)
    }
}

/// Completion of one spawned fetch
#[derive(Debug)]
struct FetchOutcome<T> {
    generation: u64,
    result: Result<Page<T>, String>,
}

/// Service task driving one collection view
#[derive(Debug)]
pub struct PanelService<C: Collection> {
    collection: Arc<C>,
    controller: ListController<C::Item>,
    debounce: Duration,
    events_rx: mpsc::UnboundedReceiver<ListEvent<C::Item>>,
    completions_tx: mpsc::UnboundedSender<FetchOutcome<C::Item>>,
    completions_rx: mpsc::UnboundedReceiver<FetchOutcome<C::Item>>,
    snapshots_tx: watch::Sender<ListSnapshot<C::Item>>,
    /// Armed debounce timer: when it fires, which token to deliver
    debounce_deadline: Option<(Instant, u64)>,
}

impl<C: Collection> PanelService<C> {
    /// Spawn the service for a collection and return its handle
    ///
    /// The mount fetch (page 1, no filters) is issued immediately.
    pub fn spawn(collection: C, page_size: u32, debounce: Duration) -> PanelHandle<C::Item> {
        let mode = collection.display_mode();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (snapshots_tx, snapshots_rx) = watch::channel(ListSnapshot::initial(mode, page_size));

        let service = Self {
            collection: Arc::new(collection),
            controller: ListController::new(page_size, mode),
            debounce,
            events_rx,
            completions_tx,
            completions_rx,
            snapshots_tx,
            debounce_deadline: None,
        };
        tokio::spawn(service.run());

        PanelHandle {
            events: events_tx,
            snapshots: snapshots_rx,
        }
    }

    async fn run(mut self) {
        debug!(collection = self.collection.name(), "panel service started");
        let effect = self.controller.start();
        self.apply(effect);
        self.publish();

        loop {
            let deadline = self.debounce_deadline;
            tokio::select! {
                maybe_event = self.events_rx.recv() => {
                    match maybe_event {
                        Some(event) => self.on_event(event),
                        // Every handle is gone; the view unmounted.
                        None => break,
                    }
                }
                Some(outcome) = self.completions_rx.recv() => self.on_completion(outcome),
                () = wait_deadline(deadline) => self.on_debounce(),
            }
            self.publish();
        }

        debug!(collection = self.collection.name(), "panel service stopped");
    }

    fn on_event(&mut self, event: ListEvent<C::Item>) {
        let effect = match event {
            ListEvent::FilterEdited { name, value } => self.controller.filter_edited(name, value),
            ListEvent::FilterSelected { name, value } => {
                self.debounce_deadline = None;
                self.controller.filter_selected(name, value)
            }
            ListEvent::ClearFilters => {
                self.debounce_deadline = None;
                self.controller.clear_filters()
            }
            ListEvent::NextPage => self.controller.next_page(),
            ListEvent::PrevPage => self.controller.prev_page(),
            ListEvent::LoadMore => self.controller.load_more(),
            ListEvent::Refresh => self.controller.refresh(),
            ListEvent::RemoveItem(id) => {
                let collection = Arc::clone(&self.collection);
                let removed = self
                    .controller
                    .remove_where(move |item| collection.id_of(item) == id);
                debug!(
                    collection = self.collection.name(),
                    removed, "removed items locally"
                );
                Effect::None
            }
            ListEvent::ReplaceItem(item) => {
                let collection = Arc::clone(&self.collection);
                let id = collection.id_of(&item).to_string();
                self.controller
                    .replace_where(move |existing| collection.id_of(existing) == id, item);
                Effect::None
            }
        };
        self.apply(effect);
    }

    fn on_debounce(&mut self) {
        if let Some((_, token)) = self.debounce_deadline.take() {
            let effect = self.controller.debounce_elapsed(token);
            self.apply(effect);
        }
    }

    fn on_completion(&mut self, outcome: FetchOutcome<C::Item>) {
        if let Err(message) = &outcome.result {
            warn!(
                collection = self.collection.name(),
                generation = outcome.generation,
                %message,
                "fetch failed"
            );
        }

        let committed = self
            .controller
            .fetch_completed(outcome.generation, outcome.result);
        if !committed {
            debug!(
                collection = self.collection.name(),
                generation = outcome.generation,
                "discarded stale fetch completion"
            );
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Debounce { token } => {
                self.debounce_deadline = Some((Instant::now() + self.debounce, token));
            }
            Effect::Fetch(request) => {
                let collection = Arc::clone(&self.collection);
                let completions = self.completions_tx.clone();
                debug!(
                    collection = collection.name(),
                    generation = request.generation,
                    page = request.query.page,
                    "issuing fetch"
                );
                tokio::spawn(async move {
                    let result = collection
                        .fetch_page(&request.query)
                        .await
                        .map_err(|e| e.to_string());
                    // The service may have stopped; nothing to do then.
                    let _ = completions.send(FetchOutcome {
                        generation: request.generation,
                        result,
                    });
                });
            }
        }
    }

    fn publish(&self) {
        let snapshot = ListSnapshot {
            phase: self.controller.phase(),
            items: self.controller.items().to_vec(),
            page: self.controller.page(),
            has_more: self.controller.has_more(),
            total: self.controller.total(),
            raw_filters: self.controller.raw_filters().to_vec(),
            has_active_filters: self.controller.has_active_filters(),
            error: self.controller.last_error().map(String::from),
            mode: self.controller.mode(),
            page_size: self.controller.page_size(),
        };
        let _ = self.snapshots_tx.send(snapshot);
    }
}

async fn wait_deadline(deadline: Option<(Instant, u64)>) {
    match deadline {
        Some((at, _)) => sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
#[allow(clippy::unwrap_used, clippy::uninlined_format_args, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use newsdesk_client::ListQuery;
    use newsdesk_core::{Error, Result as CoreResult};
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Row {
        id: String,
        label: String,
    }

    fn row(id: &str) -> Row {
        Row {
            id: id.to_string(),
            label: id.to_uppercase(),
        }
    }

    fn full_page(ids: &[&str]) -> Page<Row> {
        Page {
            items: ids.iter().map(|id| row(id)).collect(),
            has_more: true,
            total: None,
        }
    }

    fn last_page(ids: &[&str]) -> Page<Row> {
        Page {
            items: ids.iter().map(|id| row(id)).collect(),
            has_more: false,
            total: None,
        }
    }

    /// Test double: answers fetches from a script of (delay, result)
    /// entries and records every query it saw.
    #[derive(Debug)]
    struct Scripted {
        mode: DisplayMode,
        calls: Mutex<Vec<ListQuery>>,
        script: Mutex<VecDeque<(Duration, Result<Page<Row>, String>)>>,
    }

    impl Scripted {
        fn new(mode: DisplayMode) -> Arc<Self> {
            Arc::new(Self {
                mode,
                calls: Mutex::new(Vec::new()),
                script: Mutex::new(VecDeque::new()),
            })
        }

        fn push(&self, delay_ms: u64, result: Result<Page<Row>, String>) {
            self.script
                .lock()
                .unwrap()
                .push_back((Duration::from_millis(delay_ms), result));
        }

        fn calls(&self) -> Vec<ListQuery> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Collection for Arc<Scripted> {
        type Item = Row;

        fn name(&self) -> &'static str {
            "scripted"
        }

        fn display_mode(&self) -> DisplayMode {
            self.mode
        }

        fn filter_names(&self) -> &'static [&'static str] {
            &["title", "category"]
        }

        async fn fetch_page(&self, query: &ListQuery) -> CoreResult<Page<Self::Item>> {
            self.calls.lock().unwrap().push(query.clone());
            let entry = self.script.lock().unwrap().pop_front();
            let (delay, result) = entry.unwrap_or((Duration::ZERO, Ok(last_page(&[]))));
            tokio::time::sleep(delay).await;
            result.map_err(|message| Error::Network { message })
        }

        fn id_of(&self, item: &Self::Item) -> &str {
            &item.id
        }
    }

    fn filter_pairs(query: &ListQuery) -> Vec<(String, String)> {
        query.query_pairs()
    }

    #[tokio::test(start_paused = true)]
    async fn mount_issues_one_unfiltered_first_page_fetch() {
        let scripted = Scripted::new(DisplayMode::Replace);
        scripted.push(0, Ok(last_page(&["a"])));

        let handle = PanelService::spawn(Arc::clone(&scripted), 10, Duration::from_millis(400));
        tokio::time::sleep(Duration::from_millis(50)).await;

        let calls = scripted.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].page, 1);
        assert_eq!(filter_pairs(&calls[0]).len(), 2); // limit + page only

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.items, vec![row("a")]);
    }

    #[tokio::test(start_paused = true)]
    async fn keystroke_burst_debounces_to_one_fetch_with_final_text() {
        let scripted = Scripted::new(DisplayMode::Replace);
        scripted.push(0, Ok(last_page(&["a"])));
        scripted.push(0, Ok(last_page(&["abc-match"])));

        let handle = PanelService::spawn(Arc::clone(&scripted), 10, Duration::from_millis(400));
        tokio::time::sleep(Duration::from_millis(50)).await;

        for text in ["a", "ab", "abc"] {
            handle
                .send(ListEvent::FilterEdited {
                    name: "title".to_string(),
                    value: text.to_string(),
                })
                .unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(1000)).await;

        let calls = scripted.calls();
        assert_eq!(calls.len(), 2, "three keystrokes must yield one fetch");
        assert!(
            filter_pairs(&calls[1]).contains(&("title".to_string(), "abc".to_string())),
            "the fetch must use the final text"
        );
        assert_eq!(calls[1].page, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_older_fetch_cannot_overwrite_newer_result() {
        let scripted = Scripted::new(DisplayMode::Replace);
        scripted.push(0, Ok(full_page(&["first"])));
        scripted.push(500, Ok(last_page(&["old"])));
        scripted.push(50, Ok(last_page(&["new"])));

        let handle = PanelService::spawn(Arc::clone(&scripted), 10, Duration::from_millis(400));
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Slow fetch for page 2, then an immediate unfiltered refetch that
        // resolves long before the page-2 response arrives.
        handle.send(ListEvent::NextPage).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.send(ListEvent::ClearFilters).unwrap();
        tokio::time::sleep(Duration::from_millis(2000)).await;

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.items, vec![row("new")]);
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(scripted.calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_filters_fetches_immediately_and_cancels_debounce() {
        let scripted = Scripted::new(DisplayMode::Replace);
        scripted.push(0, Ok(last_page(&["a"])));
        scripted.push(0, Ok(last_page(&["unfiltered"])));

        let handle = PanelService::spawn(Arc::clone(&scripted), 10, Duration::from_millis(400));
        tokio::time::sleep(Duration::from_millis(20)).await;

        handle
            .send(ListEvent::FilterEdited {
                name: "category".to_string(),
                value: "Dünya".to_string(),
            })
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        handle.send(ListEvent::ClearFilters).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        // The clear fetch fired well inside the quiet period.
        let calls = scripted.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].page, 1);
        assert_eq!(filter_pairs(&calls[1]).len(), 2);

        // And the pending keystroke never produces a third fetch.
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(scripted.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_refresh_keeps_previous_items_visible() {
        let scripted = Scripted::new(DisplayMode::Replace);
        scripted.push(0, Ok(last_page(&["keep-me"])));
        scripted.push(0, Err("connection reset".to_string()));

        let handle = PanelService::spawn(Arc::clone(&scripted), 10, Duration::from_millis(400));
        tokio::time::sleep(Duration::from_millis(20)).await;

        handle.send(ListEvent::Refresh).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.phase, Phase::Error);
        assert_eq!(snapshot.items, vec![row("keep-me")]);
        assert!(snapshot.error.as_deref().is_some_and(|m| m.contains("connection reset")));
    }

    #[tokio::test(start_paused = true)]
    async fn load_more_appends_in_append_mode() {
        let scripted = Scripted::new(DisplayMode::Append);
        scripted.push(0, Ok(full_page(&["one", "two"])));
        scripted.push(0, Ok(last_page(&["three"])));

        let handle = PanelService::spawn(Arc::clone(&scripted), 2, Duration::from_millis(400));
        tokio::time::sleep(Duration::from_millis(20)).await;

        handle.send(ListEvent::LoadMore).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.items.len(), 3);
        assert!(!snapshot.has_more);
        assert_eq!(scripted.calls()[1].page, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn local_mutations_need_no_refetch() {
        let scripted = Scripted::new(DisplayMode::Replace);
        scripted.push(0, Ok(last_page(&["a", "b", "c"])));

        let handle = PanelService::spawn(Arc::clone(&scripted), 10, Duration::from_millis(400));
        tokio::time::sleep(Duration::from_millis(20)).await;

        handle.send(ListEvent::RemoveItem("b".to_string())).unwrap();
        handle
            .send(ListEvent::ReplaceItem(Row {
                id: "c".to_string(),
                label: "patched".to_string(),
            }))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let snapshot = handle.snapshot();
        assert_eq!(
            snapshot.items,
            vec![
                row("a"),
                Row {
                    id: "c".to_string(),
                    label: "patched".to_string()
                }
            ]
        );
        // No fetch beyond the mount one.
        assert_eq!(scripted.calls().len(), 1);
    }
}
