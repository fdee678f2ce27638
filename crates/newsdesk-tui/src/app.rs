//! Application state and event handling
//!
//! The UI loop is synchronous (poll, draw, drain feedback) in the style of
//! a renderer thread; every network call runs as a tokio task and reports
//! back through a channel. List state never lives here — the panel
//! services own it and the app only dispatches [`ListEvent`]s.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::{info, warn};

use newsdesk_client::{ApiClient, Session, SessionStore};
use newsdesk_core::Config;
use newsdesk_core::types::{
    ArticleDraft, Author, Category, Contact, NewsArticle, NewsSummary, RecordId, Subscriber,
};
use newsdesk_panel::{
    ContactsCollection, DeleteConfirmation, DisplayMode, Editor, EditorEffect, ListEvent,
    NewsCollection, PanelHandle, PanelService, SubscribersCollection,
};

/// Collection tabs of the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// News articles
    News,
    /// Contact-form submissions
    Contacts,
    /// Newsletter subscribers
    Subscribers,
}

impl Tab {
    /// Tab titles, in display order
    pub const TITLES: [&'static str; 3] = ["News", "Contacts", "Subscribers"];

    /// Index into [`Self::TITLES`]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::News => 0,
            Self::Contacts => 1,
            Self::Subscribers => 2,
        }
    }

    #[must_use]
    const fn next(self) -> Self {
        match self {
            Self::News => Self::Contacts,
            Self::Contacts => Self::Subscribers,
            Self::Subscribers => Self::News,
        }
    }

    #[must_use]
    const fn prev(self) -> Self {
        match self {
            Self::News => Self::Subscribers,
            Self::Contacts => Self::News,
            Self::Subscribers => Self::Contacts,
        }
    }
}

/// Read-state filter cycle for the contacts view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFilter {
    /// No filter
    All,
    /// Only read messages
    Read,
    /// Only unread messages
    Unread,
}

impl ReadFilter {
    #[must_use]
    const fn cycle(self) -> Self {
        match self {
            Self::All => Self::Unread,
            Self::Unread => Self::Read,
            Self::Read => Self::All,
        }
    }

    /// Value sent on the wire; empty clears the filter
    #[must_use]
    pub const fn wire_value(self) -> &'static str {
        match self {
            Self::All => "",
            Self::Read => "true",
            Self::Unread => "false",
        }
    }

    /// Label for the filter bar
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Read => "read",
            Self::Unread => "unread",
        }
    }
}

/// Active-state filter cycle for the subscribers view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveFilter {
    /// No filter
    All,
    /// Only active subscriptions
    Active,
    /// Only cancelled subscriptions
    Inactive,
}

impl ActiveFilter {
    #[must_use]
    const fn cycle(self) -> Self {
        match self {
            Self::All => Self::Active,
            Self::Active => Self::Inactive,
            Self::Inactive => Self::All,
        }
    }

    /// Value sent on the wire; empty clears the filter
    #[must_use]
    pub const fn wire_value(self) -> &'static str {
        match self {
            Self::All => "",
            Self::Active => "true",
            Self::Inactive => "false",
        }
    }

    /// Label for the filter bar
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// Editor form fields, in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    /// Article title
    Title,
    /// Teaser description
    Description,
    /// Publication date
    Date,
    /// Category selection
    Category,
    /// Author selection
    Author,
    /// Article body
    Body,
}

impl EditorField {
    #[must_use]
    const fn next(self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::Date,
            Self::Date => Self::Category,
            Self::Category => Self::Author,
            Self::Author => Self::Body,
            Self::Body => Self::Title,
        }
    }

    #[must_use]
    const fn prev(self) -> Self {
        match self {
            Self::Title => Self::Body,
            Self::Description => Self::Title,
            Self::Date => Self::Description,
            Self::Category => Self::Date,
            Self::Author => Self::Category,
            Self::Body => Self::Author,
        }
    }
}

/// Results of async calls, routed back into the UI loop
#[derive(Debug)]
pub enum Feedback {
    /// Login call finished
    LoginFinished(Result<Session, String>),
    /// Full article record fetch finished
    ArticleLoaded(Result<NewsArticle, String>),
    /// Create/update call finished
    SubmitFinished {
        /// Target article, `None` for a create
        id: Option<RecordId>,
        /// Draft that was submitted
        draft: ArticleDraft,
        /// Call outcome
        result: Result<(), String>,
    },
    /// Delete call finished
    DeleteFinished {
        /// Tab the delete belongs to
        tab: Tab,
        /// Deleted record
        id: RecordId,
        /// Call outcome
        result: Result<(), String>,
    },
    /// Mark-as-read call finished
    MarkReadFinished {
        /// Call outcome
        result: Result<(), String>,
    },
    /// Success display delay of the editor elapsed
    EditorCloseElapsed,
}

/// Login screen state
#[derive(Debug, Default)]
pub struct LoginView {
    /// Username input
    pub username: String,
    /// Password input
    pub password: String,
    /// Whether the password field has focus
    pub focus_password: bool,
    /// Login failure message
    pub error: Option<String>,
    /// Login call in flight
    pub submitting: bool,
}

/// Per-tab view state around one panel handle
#[derive(Debug)]
pub struct Pane<T> {
    /// Handle to the panel service owning the list state
    pub handle: PanelHandle<T>,
    /// Armed delete intent
    pub confirm: DeleteConfirmation,
    /// Selected row
    pub selected: usize,
    /// Wire filter inputs shadowing the raw controller text
    pub inputs: Vec<(&'static str, String)>,
    /// Page-local quick filter (never sent to the wire)
    pub quick_filter: String,
    /// Whether keystrokes go to the filter bar
    pub filter_focused: bool,
    /// Focused filter field index
    pub filter_field: usize,
}

impl<T> Pane<T> {
    fn new(handle: PanelHandle<T>, inputs: &[&'static str]) -> Self {
        Self {
            handle,
            confirm: DeleteConfirmation::new(),
            selected: 0,
            inputs: inputs.iter().map(|name| (*name, String::new())).collect(),
            quick_filter: String::new(),
            filter_focused: false,
            filter_field: 0,
        }
    }

    fn clear_inputs(&mut self) {
        for (_, value) in &mut self.inputs {
            value.clear();
        }
        self.quick_filter.clear();
    }
}

/// Authenticated workspace with the three collection views
#[derive(Debug)]
pub struct Workspace {
    /// Authenticated session
    pub session: Session,
    /// Authenticated API client
    pub client: ApiClient,
    /// Active tab
    pub tab: Tab,
    /// News pane (load-more pager)
    pub news: Pane<NewsSummary>,
    /// Contacts pane (classic pager)
    pub contacts: Pane<Contact>,
    /// Subscribers pane (classic pager)
    pub subscribers: Pane<Subscriber>,
    /// Article editor modal
    pub editor: Editor,
    /// Focused editor field
    pub editor_field: EditorField,
    /// Contacts read-state filter
    pub read_filter: ReadFilter,
    /// Subscribers active-state filter
    pub active_filter: ActiveFilter,
}

impl Workspace {
    /// Contacts visible under the page-local quick filter
    #[must_use]
    pub fn visible_contacts(&self) -> Vec<Contact> {
        let needle = self.contacts.quick_filter.trim().to_lowercase();
        let items = self.contacts.handle.snapshot().items;
        if needle.is_empty() {
            return items;
        }
        items
            .into_iter()
            .filter(|c| {
                c.name.to_lowercase().contains(&needle)
                    || c.email.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Subscribers visible under the page-local quick filter
    #[must_use]
    pub fn visible_subscribers(&self) -> Vec<Subscriber> {
        let needle = self.subscribers.quick_filter.trim().to_lowercase();
        let items = self.subscribers.handle.snapshot().items;
        if needle.is_empty() {
            return items;
        }
        items
            .into_iter()
            .filter(|s| s.email.to_lowercase().contains(&needle))
            .collect()
    }

    fn visible_len(&self) -> usize {
        match self.tab {
            Tab::News => self.news.handle.snapshot().items.len(),
            Tab::Contacts => self.visible_contacts().len(),
            Tab::Subscribers => self.visible_subscribers().len(),
        }
    }

    fn pane_selected(&self) -> usize {
        match self.tab {
            Tab::News => self.news.selected,
            Tab::Contacts => self.contacts.selected,
            Tab::Subscribers => self.subscribers.selected,
        }
    }

    fn set_pane_selected(&mut self, selected: usize) {
        match self.tab {
            Tab::News => self.news.selected = selected,
            Tab::Contacts => self.contacts.selected = selected,
            Tab::Subscribers => self.subscribers.selected = selected,
        }
    }

    fn confirm_mut(&mut self) -> &mut DeleteConfirmation {
        match self.tab {
            Tab::News => &mut self.news.confirm,
            Tab::Contacts => &mut self.contacts.confirm,
            Tab::Subscribers => &mut self.subscribers.confirm,
        }
    }

    fn selected_id(&self) -> Option<RecordId> {
        let index = self.pane_selected();
        match self.tab {
            Tab::News => {
                let items = self.news.handle.snapshot().items;
                let index = index.min(items.len().saturating_sub(1));
                items.get(index).map(|item| item.id.clone())
            }
            Tab::Contacts => {
                let items = self.visible_contacts();
                let index = index.min(items.len().saturating_sub(1));
                items.get(index).map(|c| c.id.clone())
            }
            Tab::Subscribers => {
                let items = self.visible_subscribers();
                let index = index.min(items.len().saturating_sub(1));
                items.get(index).map(|s| s.id.clone())
            }
        }
    }
}

/// Current top-level screen
#[derive(Debug)]
pub enum Screen {
    /// Credential prompt
    Login(LoginView),
    /// Authenticated workspace
    Workspace(Box<Workspace>),
}

/// Transient status line at the bottom of the screen
#[derive(Debug)]
pub struct StatusLine {
    /// Message text
    pub text: String,
    /// Render as an error
    pub is_error: bool,
    shown_at: Instant,
}

impl StatusLine {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
            shown_at: Instant::now(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
            shown_at: Instant::now(),
        }
    }
}

const STATUS_TTL: Duration = Duration::from_secs(4);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Top-level application state
#[derive(Debug)]
pub struct App {
    config: Config,
    base_client: ApiClient,
    store: SessionStore,
    rt: tokio::runtime::Handle,
    feedback_tx: Sender<Feedback>,
    feedback_rx: Receiver<Feedback>,
    /// Current screen
    pub screen: Screen,
    /// Transient status message
    pub status: Option<StatusLine>,
    should_quit: bool,
}

impl App {
    /// Build the application, resuming a persisted session when one exists
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: Config, rt: tokio::runtime::Handle) -> newsdesk_core::Result<Self> {
        let base_client = ApiClient::from_config(&config.api)?;
        let store = SessionStore::new(config.session.file.clone());

        let session = match store.load() {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "could not read persisted session; starting signed out");
                None
            }
        };

        let (feedback_tx, feedback_rx) = mpsc::channel();
        let mut app = Self {
            config,
            base_client,
            store,
            rt,
            feedback_tx,
            feedback_rx,
            screen: Screen::Login(LoginView::default()),
            status: None,
            should_quit: false,
        };

        if let Some(session) = session {
            info!(username = %session.username, "resuming persisted session");
            app.enter_workspace(session);
        }
        Ok(app)
    }

    /// Drive the UI until the user quits
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be drawn or polled.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> std::io::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| crate::views::render(frame, self))?;

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.on_key(key);
                    }
                }
            }

            while let Ok(feedback) = self.feedback_rx.try_recv() {
                self.on_feedback(feedback);
            }

            if let Some(status) = &self.status {
                if status.shown_at.elapsed() > STATUS_TTL {
                    self.status = None;
                }
            }
        }
        Ok(())
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if matches!(self.screen, Screen::Login(_)) {
            self.on_login_key(key);
        } else {
            self.on_workspace_key(key);
        }
    }

    // ── Login screen ────────────────────────────────────────────────

    fn on_login_key(&mut self, key: KeyEvent) {
        let Screen::Login(login) = &mut self.screen else {
            return;
        };
        if login.submitting {
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                login.focus_password = !login.focus_password;
            }
            KeyCode::Backspace => {
                let field = if login.focus_password {
                    &mut login.password
                } else {
                    &mut login.username
                };
                field.pop();
            }
            KeyCode::Char(c) => {
                let field = if login.focus_password {
                    &mut login.password
                } else {
                    &mut login.username
                };
                field.push(c);
            }
            KeyCode::Enter => {
                if login.username.trim().is_empty() || login.password.is_empty() {
                    login.error = Some("Username and password are required".to_string());
                    return;
                }
                login.submitting = true;
                login.error = None;

                let client = self.base_client.clone();
                let tx = self.feedback_tx.clone();
                let username = login.username.trim().to_string();
                let password = login.password.clone();
                self.rt.spawn(async move {
                    let result = client
                        .login(&username, &password)
                        .await
                        .map_err(|e| e.to_string());
                    let _ = tx.send(Feedback::LoginFinished(result));
                });
            }
            _ => {}
        }
    }

    fn enter_workspace(&mut self, session: Session) {
        let client = self.base_client.clone().with_session(&session);
        let page_size = self.config.api.page_size;
        let debounce = Duration::from_millis(self.config.console.debounce_ms);

        // Panel services are tokio tasks; make sure a runtime context is
        // current even when we arrive here from the blocking UI loop.
        let guard = self.rt.clone();
        let _guard = guard.enter();

        let news = PanelService::spawn(
            NewsCollection::new(client.clone(), DisplayMode::Append),
            page_size,
            debounce,
        );
        let contacts =
            PanelService::spawn(ContactsCollection::new(client.clone()), page_size, debounce);
        let subscribers = PanelService::spawn(
            SubscribersCollection::new(client.clone()),
            page_size,
            debounce,
        );

        self.screen = Screen::Workspace(Box::new(Workspace {
            session,
            client,
            tab: Tab::News,
            news: Pane::new(news, &["title", "category"]),
            contacts: Pane::new(contacts, &[]),
            subscribers: Pane::new(subscribers, &[]),
            editor: Editor::new(),
            editor_field: EditorField::Title,
            read_filter: ReadFilter::All,
            active_filter: ActiveFilter::All,
        }));
    }

    // ── Workspace keys ──────────────────────────────────────────────

    fn on_workspace_key(&mut self, key: KeyEvent) {
        let editor_open = match &self.screen {
            Screen::Workspace(ws) => ws.editor.is_open(),
            Screen::Login(_) => false,
        };
        if editor_open {
            self.on_editor_key(key);
            return;
        }

        let confirm_armed = match &mut self.screen {
            Screen::Workspace(ws) => ws.confirm_mut().is_armed(),
            Screen::Login(_) => false,
        };
        if confirm_armed {
            self.on_confirm_key(key);
            return;
        }

        let filter_focused = match &self.screen {
            Screen::Workspace(ws) => match ws.tab {
                Tab::News => ws.news.filter_focused,
                Tab::Contacts => ws.contacts.filter_focused,
                Tab::Subscribers => ws.subscribers.filter_focused,
            },
            Screen::Login(_) => false,
        };
        if filter_focused {
            self.on_filter_key(key);
            return;
        }

        self.on_table_key(key);
    }

    #[allow(clippy::too_many_lines)]
    fn on_table_key(&mut self, key: KeyEvent) {
        let Screen::Workspace(ws) = &mut self.screen else {
            return;
        };

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => ws.tab = ws.tab.next(),
            KeyCode::BackTab => ws.tab = ws.tab.prev(),
            KeyCode::Char('1') => ws.tab = Tab::News,
            KeyCode::Char('2') => ws.tab = Tab::Contacts,
            KeyCode::Char('3') => ws.tab = Tab::Subscribers,
            KeyCode::Up => {
                let selected = ws.pane_selected().saturating_sub(1);
                ws.set_pane_selected(selected);
            }
            KeyCode::Down => {
                let len = ws.visible_len();
                let selected = (ws.pane_selected() + 1).min(len.saturating_sub(1));
                ws.set_pane_selected(selected);
            }
            KeyCode::Char('/') => match ws.tab {
                Tab::News => {
                    ws.news.filter_focused = true;
                    ws.news.filter_field = 0;
                }
                Tab::Contacts => ws.contacts.filter_focused = true,
                Tab::Subscribers => ws.subscribers.filter_focused = true,
            },
            KeyCode::Char('r') => {
                let _ = match ws.tab {
                    Tab::News => ws.news.handle.send(ListEvent::Refresh),
                    Tab::Contacts => ws.contacts.handle.send(ListEvent::Refresh),
                    Tab::Subscribers => ws.subscribers.handle.send(ListEvent::Refresh),
                };
            }
            KeyCode::Char('x') => match ws.tab {
                Tab::News => {
                    ws.news.clear_inputs();
                    let _ = ws.news.handle.send(ListEvent::ClearFilters);
                }
                Tab::Contacts => {
                    ws.contacts.clear_inputs();
                    ws.read_filter = ReadFilter::All;
                    let _ = ws.contacts.handle.send(ListEvent::ClearFilters);
                }
                Tab::Subscribers => {
                    ws.subscribers.clear_inputs();
                    ws.active_filter = ActiveFilter::All;
                    let _ = ws.subscribers.handle.send(ListEvent::ClearFilters);
                }
            },
            KeyCode::Char('d') => {
                if let Some(id) = ws.selected_id() {
                    ws.confirm_mut().arm(id);
                }
            }
            KeyCode::Left => {
                if ws.tab != Tab::News {
                    let _ = match ws.tab {
                        Tab::Contacts => ws.contacts.handle.send(ListEvent::PrevPage),
                        Tab::Subscribers => ws.subscribers.handle.send(ListEvent::PrevPage),
                        Tab::News => Ok(()),
                    };
                }
            }
            KeyCode::Right => {
                if ws.tab != Tab::News {
                    let _ = match ws.tab {
                        Tab::Contacts => ws.contacts.handle.send(ListEvent::NextPage),
                        Tab::Subscribers => ws.subscribers.handle.send(ListEvent::NextPage),
                        Tab::News => Ok(()),
                    };
                }
            }
            KeyCode::Char('m') => match ws.tab {
                // Load-more pager on the news view.
                Tab::News => {
                    let _ = ws.news.handle.send(ListEvent::LoadMore);
                }
                // Mark-as-read, offered only for unread messages.
                Tab::Contacts => {
                    let index = ws.contacts.selected;
                    let target = ws
                        .visible_contacts()
                        .get(index)
                        .filter(|c| !c.is_read)
                        .map(|c| c.id.clone());
                    if let Some(id) = target {
                        let client = ws.client.clone();
                        let tx = self.feedback_tx.clone();
                        self.rt.spawn(async move {
                            let result = client
                                .mark_contact_read(&id)
                                .await
                                .map_err(|e| e.to_string());
                            let _ = tx.send(Feedback::MarkReadFinished { result });
                        });
                    }
                }
                Tab::Subscribers => {}
            },
            KeyCode::Char('f') => match ws.tab {
                Tab::News => {}
                Tab::Contacts => {
                    ws.read_filter = ws.read_filter.cycle();
                    let _ = ws.contacts.handle.send(ListEvent::FilterSelected {
                        name: "isRead".to_string(),
                        value: ws.read_filter.wire_value().to_string(),
                    });
                    ws.contacts.selected = 0;
                }
                Tab::Subscribers => {
                    ws.active_filter = ws.active_filter.cycle();
                    let _ = ws.subscribers.handle.send(ListEvent::FilterSelected {
                        name: "isActive".to_string(),
                        value: ws.active_filter.wire_value().to_string(),
                    });
                    ws.subscribers.selected = 0;
                }
            },
            KeyCode::Char('e') => {
                if ws.tab == Tab::News {
                    if let Some(id) = ws.selected_id() {
                        ws.editor_field = EditorField::Title;
                        if let EditorEffect::FetchArticle(id) = ws.editor.open_for(id) {
                            let client = ws.client.clone();
                            let tx = self.feedback_tx.clone();
                            self.rt.spawn(async move {
                                let result =
                                    client.get_news(&id).await.map_err(|e| e.to_string());
                                let _ = tx.send(Feedback::ArticleLoaded(result));
                            });
                        }
                    }
                }
            }
            KeyCode::Char('a') => {
                if ws.tab == Tab::News {
                    ws.editor_field = EditorField::Title;
                    let _ = ws.editor.open_blank();
                }
            }
            _ => {}
        }
    }

    fn on_confirm_key(&mut self, key: KeyEvent) {
        let Screen::Workspace(ws) = &mut self.screen else {
            return;
        };

        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                let tab = ws.tab;
                // The only path to a DELETE: confirming a previously armed id.
                if let Some(id) = ws.confirm_mut().confirm() {
                    let client = ws.client.clone();
                    let tx = self.feedback_tx.clone();
                    let task_id = id.clone();
                    self.rt.spawn(async move {
                        let result = match tab {
                            Tab::News => client.delete_news(&task_id).await,
                            Tab::Contacts => client.delete_contact(&task_id).await,
                            Tab::Subscribers => client.delete_subscriber(&task_id).await,
                        }
                        .map_err(|e| e.to_string());
                        let _ = tx.send(Feedback::DeleteFinished {
                            tab,
                            id: task_id,
                            result,
                        });
                    });
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => ws.confirm_mut().cancel(),
            _ => {}
        }
    }

    fn on_filter_key(&mut self, key: KeyEvent) {
        let Screen::Workspace(ws) = &mut self.screen else {
            return;
        };

        match ws.tab {
            Tab::News => match key.code {
                KeyCode::Esc | KeyCode::Enter => ws.news.filter_focused = false,
                KeyCode::Tab | KeyCode::BackTab => {
                    ws.news.filter_field = (ws.news.filter_field + 1) % ws.news.inputs.len().max(1);
                }
                KeyCode::Backspace => {
                    if let Some((name, value)) = ws.news.inputs.get_mut(ws.news.filter_field) {
                        value.pop();
                        let _ = ws.news.handle.send(ListEvent::FilterEdited {
                            name: (*name).to_string(),
                            value: value.clone(),
                        });
                    }
                }
                KeyCode::Char(c) => {
                    if let Some((name, value)) = ws.news.inputs.get_mut(ws.news.filter_field) {
                        value.push(c);
                        let _ = ws.news.handle.send(ListEvent::FilterEdited {
                            name: (*name).to_string(),
                            value: value.clone(),
                        });
                    }
                }
                _ => {}
            },
            Tab::Contacts => match key.code {
                KeyCode::Esc | KeyCode::Enter => ws.contacts.filter_focused = false,
                KeyCode::Backspace => {
                    ws.contacts.quick_filter.pop();
                    ws.contacts.selected = 0;
                }
                KeyCode::Char(c) => {
                    ws.contacts.quick_filter.push(c);
                    ws.contacts.selected = 0;
                }
                _ => {}
            },
            Tab::Subscribers => match key.code {
                KeyCode::Esc | KeyCode::Enter => ws.subscribers.filter_focused = false,
                KeyCode::Backspace => {
                    ws.subscribers.quick_filter.pop();
                    ws.subscribers.selected = 0;
                }
                KeyCode::Char(c) => {
                    ws.subscribers.quick_filter.push(c);
                    ws.subscribers.selected = 0;
                }
                _ => {}
            },
        }
    }

    fn on_editor_key(&mut self, key: KeyEvent) {
        let Screen::Workspace(ws) = &mut self.screen else {
            return;
        };

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            let effect = ws.editor.submit();
            if let EditorEffect::Submit { id, draft } = effect {
                let client = ws.client.clone();
                let tx = self.feedback_tx.clone();
                let task_id = id.clone();
                let task_draft = draft.clone();
                self.rt.spawn(async move {
                    let result = match &task_id {
                        Some(id) => client.update_news(id, &task_draft).await,
                        None => client.create_news(&task_draft).await,
                    }
                    .map_err(|e| e.to_string());
                    let _ = tx.send(Feedback::SubmitFinished {
                        id: task_id,
                        draft: task_draft,
                        result,
                    });
                });
            }
            return;
        }

        match key.code {
            KeyCode::Esc => ws.editor.close(),
            KeyCode::Tab | KeyCode::Down => ws.editor_field = ws.editor_field.next(),
            KeyCode::BackTab | KeyCode::Up => ws.editor_field = ws.editor_field.prev(),
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                let field = ws.editor_field;
                if let Some(form) = ws.editor.form_mut() {
                    match field {
                        EditorField::Category => {
                            form.category = cycle_category(form.category, forward);
                        }
                        EditorField::Author => {
                            form.author = cycle_author(form.author, forward);
                        }
                        _ => {}
                    }
                }
            }
            KeyCode::Enter => {
                let field = ws.editor_field;
                if field == EditorField::Body {
                    if let Some(form) = ws.editor.form_mut() {
                        form.body.push('\n');
                    }
                } else {
                    ws.editor_field = ws.editor_field.next();
                }
            }
            KeyCode::Backspace => {
                let field = ws.editor_field;
                if let Some(form) = ws.editor.form_mut() {
                    if let Some(buffer) = text_field_mut(form, field) {
                        buffer.pop();
                    }
                }
            }
            KeyCode::Char(c) => {
                let field = ws.editor_field;
                if let Some(form) = ws.editor.form_mut() {
                    if let Some(buffer) = text_field_mut(form, field) {
                        buffer.push(c);
                    }
                }
            }
            _ => {}
        }
    }

    // ── Feedback ────────────────────────────────────────────────────

    fn on_feedback(&mut self, feedback: Feedback) {
        match feedback {
            Feedback::LoginFinished(Ok(session)) => {
                if let Err(err) = self.store.save(&session) {
                    warn!(error = %err, "could not persist session");
                }
                self.status = Some(StatusLine::info(format!(
                    "Signed in as {}",
                    session.username
                )));
                self.enter_workspace(session);
            }
            Feedback::LoginFinished(Err(message)) => {
                if let Screen::Login(login) = &mut self.screen {
                    login.submitting = false;
                    login.password.clear();
                    login.error = Some(message);
                }
            }
            Feedback::ArticleLoaded(result) => {
                let Screen::Workspace(ws) = &mut self.screen else {
                    return;
                };
                match result {
                    Ok(article) => ws.editor.record_loaded(&article),
                    Err(message) => ws.editor.load_failed(message),
                }
            }
            Feedback::SubmitFinished { id, draft, result } => {
                self.on_submit_finished(id, draft, result);
            }
            Feedback::DeleteFinished { tab, id, result } => {
                let Screen::Workspace(ws) = &mut self.screen else {
                    return;
                };
                match result {
                    Ok(()) => {
                        // Local removal; no full refetch.
                        let _ = match tab {
                            Tab::News => ws.news.handle.send(ListEvent::RemoveItem(id)),
                            Tab::Contacts => ws.contacts.handle.send(ListEvent::RemoveItem(id)),
                            Tab::Subscribers => {
                                ws.subscribers.handle.send(ListEvent::RemoveItem(id))
                            }
                        };
                        self.status = Some(StatusLine::info("Deleted"));
                    }
                    Err(message) => {
                        // The list is left untouched.
                        self.status = Some(StatusLine::error(format!("Delete failed: {message}")));
                    }
                }
            }
            Feedback::MarkReadFinished { result } => {
                let Screen::Workspace(ws) = &mut self.screen else {
                    return;
                };
                match result {
                    Ok(()) => {
                        // Fire-and-confirm: simply refetch the current page.
                        let _ = ws.contacts.handle.send(ListEvent::Refresh);
                        self.status = Some(StatusLine::info("Marked as read"));
                    }
                    Err(message) => {
                        self.status =
                            Some(StatusLine::error(format!("Mark read failed: {message}")));
                    }
                }
            }
            Feedback::EditorCloseElapsed => {
                if let Screen::Workspace(ws) = &mut self.screen {
                    ws.editor.close_elapsed();
                }
            }
        }
    }

    fn on_submit_finished(
        &mut self,
        id: Option<RecordId>,
        draft: ArticleDraft,
        result: Result<(), String>,
    ) {
        let Screen::Workspace(ws) = &mut self.screen else {
            return;
        };

        match result {
            Ok(()) => {
                if let EditorEffect::ScheduleClose = ws.editor.submit_succeeded() {
                    let tx = self.feedback_tx.clone();
                    let delay = Duration::from_millis(self.config.console.success_display_ms);
                    self.rt.spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(Feedback::EditorCloseElapsed);
                    });
                }

                match id {
                    Some(id) => {
                        // Patch the summary row in place; the cover image is
                        // not part of the form, so keep the one we had.
                        let image = ws
                            .news
                            .handle
                            .snapshot()
                            .items
                            .iter()
                            .find(|item| item.id == id)
                            .and_then(|item| item.image.clone());
                        let patched = NewsSummary {
                            id,
                            title: draft.title,
                            category: draft.category.as_str().to_string(),
                            date: draft
                                .date
                                .and_hms_opt(0, 0, 0)
                                .map_or_else(chrono::Utc::now, |dt| dt.and_utc()),
                            image,
                        };
                        let _ = ws.news.handle.send(ListEvent::ReplaceItem(patched));
                        self.status = Some(StatusLine::info("Article updated"));
                    }
                    None => {
                        // A created article belongs on page 1; refetch.
                        let _ = ws.news.handle.send(ListEvent::Refresh);
                        self.status = Some(StatusLine::info("Article created"));
                    }
                }
            }
            Err(message) => ws.editor.submit_failed(message),
        }
    }
}

fn cycle_category(current: Option<Category>, forward: bool) -> Option<Category> {
    let roster = Category::ALL;
    let index = current.and_then(|c| roster.iter().position(|r| *r == c));
    step_roster(&roster, index, forward)
}

fn cycle_author(current: Option<Author>, forward: bool) -> Option<Author> {
    let roster = Author::ALL;
    let index = current.and_then(|a| roster.iter().position(|r| *r == a));
    step_roster(&roster, index, forward)
}

fn step_roster<T: Copy>(roster: &[T], index: Option<usize>, forward: bool) -> Option<T> {
    let len = roster.len();
    if len == 0 {
        return None;
    }
    let next = match (index, forward) {
        (None, true) => 0,
        (None, false) => len - 1,
        (Some(i), true) => (i + 1) % len,
        (Some(i), false) => (i + len - 1) % len,
    };
    roster.get(next).copied()
}

fn text_field_mut(
    form: &mut newsdesk_panel::ArticleForm,
    field: EditorField,
) -> Option<&mut String> {
    match field {
        EditorField::Title => Some(&mut form.title),
        EditorField::Description => Some(&mut form.description),
        EditorField::Date => Some(&mut form.date),
        EditorField::Body => Some(&mut form.body),
        EditorField::Category | EditorField::Author => None,
    }
}
