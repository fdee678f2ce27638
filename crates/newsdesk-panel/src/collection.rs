//! Per-entity adapters binding the generic list machinery to an endpoint
//!
//! Each collection view differs only in what it fetches, which filters it
//! understands, and how its endpoint signals pagination; everything else
//! is shared. An adapter captures exactly those differences.

use async_trait::async_trait;
use newsdesk_client::{ApiClient, ListQuery, Page};
use newsdesk_core::Result;
use newsdesk_core::types::{Contact, NewsSummary, Subscriber};

use crate::controller::DisplayMode;

/// Adapter for one remote collection
#[async_trait]
pub trait Collection: Send + Sync + 'static {
    /// Item type the endpoint returns
    type Item: Clone + std::fmt::Debug + Send + Sync + 'static;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// How successive pages are presented
    fn display_mode(&self) -> DisplayMode;

    /// Wire filter names this endpoint understands
    fn filter_names(&self) -> &'static [&'static str];

    /// Fetch one page
    async fn fetch_page(&self, query: &ListQuery) -> Result<Page<Self::Item>>;

    /// Identifier of an item, for local removal and patching
    fn id_of(&self, item: &Self::Item) -> &str;
}

/// News articles: free-text title and category filters; the endpoint
/// reports no total, so a further page is inferred from a full one
#[derive(Debug, Clone)]
pub struct NewsCollection {
    client: ApiClient,
    mode: DisplayMode,
}

impl NewsCollection {
    /// Adapter over the news endpoint in the given display mode
    ///
    /// Both modes are legitimate for this endpoint: the browse view pages
    /// with Previous/Next, the editor picker appends with load-more.
    #[must_use]
    pub const fn new(client: ApiClient, mode: DisplayMode) -> Self {
        Self { client, mode }
    }
}

#[async_trait]
impl Collection for NewsCollection {
    type Item = NewsSummary;

    fn name(&self) -> &'static str {
        "news"
    }

    fn display_mode(&self) -> DisplayMode {
        self.mode
    }

    fn filter_names(&self) -> &'static [&'static str] {
        &["title", "category"]
    }

    async fn fetch_page(&self, query: &ListQuery) -> Result<Page<Self::Item>> {
        self.client.list_news(query).await
    }

    fn id_of(&self, item: &Self::Item) -> &str {
        &item.id
    }
}

/// Contact-form submissions: read-state filter, explicit total
#[derive(Debug, Clone)]
pub struct ContactsCollection {
    client: ApiClient,
}

impl ContactsCollection {
    /// Adapter over the contacts endpoint
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Collection for ContactsCollection {
    type Item = Contact;

    fn name(&self) -> &'static str {
        "contacts"
    }

    fn display_mode(&self) -> DisplayMode {
        DisplayMode::Replace
    }

    fn filter_names(&self) -> &'static [&'static str] {
        &["isRead"]
    }

    async fn fetch_page(&self, query: &ListQuery) -> Result<Page<Self::Item>> {
        self.client.list_contacts(query).await
    }

    fn id_of(&self, item: &Self::Item) -> &str {
        &item.id
    }
}

/// Newsletter subscribers: active-state filter, explicit total
#[derive(Debug, Clone)]
pub struct SubscribersCollection {
    client: ApiClient,
}

impl SubscribersCollection {
    /// Adapter over the subscribers endpoint
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Collection for SubscribersCollection {
    type Item = Subscriber;

    fn name(&self) -> &'static str {
        "subscribers"
    }

    fn display_mode(&self) -> DisplayMode {
        DisplayMode::Replace
    }

    fn filter_names(&self) -> &'static [&'static str] {
        &["isActive"]
    }

    async fn fetch_page(&self, query: &ListQuery) -> Result<Page<Self::Item>> {
        self.client.list_subscribers(query).await
    }

    fn id_of(&self, item: &Self::Item) -> &str {
        &item.id
    }
}
