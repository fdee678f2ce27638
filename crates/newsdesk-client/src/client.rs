//! HTTP client for communicating with the publishing backend

use crate::query::{ListQuery, Page};
use crate::session::Session;
use newsdesk_core::config::ApiConfig;
use newsdesk_core::types::{ArticleDraft, Contact, NewsArticle, NewsSummary, Subscriber};
use newsdesk_core::{Error, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// API client for making HTTP requests to the publishing backend
///
/// Cheap to clone; holds the base URL and the session token it was
/// constructed with. No call mutates client state, and no call has side
/// effects beyond the network request itself.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

/// Envelope for endpoints that answer `{status: "OK", ...}`
#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsListEnvelope {
    status: String,
    #[serde(default)]
    news: Vec<NewsSummary>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsItemEnvelope {
    status: String,
    #[serde(default)]
    news: Option<NewsArticle>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContactsEnvelope {
    contacts: Vec<Contact>,
    total: u64,
}

#[derive(Debug, Deserialize)]
struct SubscribersEnvelope {
    subscribers: Vec<Subscriber>,
    total: u64,
}

#[derive(Debug, Deserialize)]
struct LoginEnvelope {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl ApiClient {
    /// Create a new API client
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: normalize_base_url(base_url.into()),
            token: None,
        }
    }

    /// Create a client from the API section of the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Configuration {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: normalize_base_url(config.base_url.clone()),
            token: None,
        })
    }

    /// Attach an authenticated session to the client
    #[must_use]
    pub fn with_session(mut self, session: &Session) -> Self {
        self.token = Some(session.token.clone());
        self
    }

    /// Whether the client carries an auth token
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.token.is_some()
    }

    /// The base URL this client talks to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Authenticate against the backend and obtain a session token
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] when the backend rejects the
    /// credentials, [`Error::Network`] when the request never completes,
    /// and [`Error::MalformedResponse`] when a success reply carries no
    /// token.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let url = format!("{}/admin/login", self.base_url);
        debug!(%url, username, "logging in");

        let response = self
            .send(self.client.post(&url).json(&serde_json::json!({
                "username": username,
                "password": password,
            })))
            .await?;

        let status = response.status();
        let body = response.text().await.map_err(|e| Error::Network {
            message: e.to_string(),
        })?;
        let envelope: LoginEnvelope = serde_json::from_str(&body).unwrap_or(LoginEnvelope {
            token: None,
            message: None,
        });

        if !status.is_success() {
            return Err(Error::Authentication(envelope.message.unwrap_or_else(
                || "Invalid username or password".to_string(),
            )));
        }

        envelope.token.map_or_else(
            || {
                Err(Error::MalformedResponse {
                    message: "login succeeded but no token was returned".to_string(),
                })
            },
            |token| Ok(Session::new(token, username)),
        )
    }

    /// Get a page of news articles with optional filtering
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot
    /// be parsed.
    pub async fn list_news(&self, query: &ListQuery) -> Result<Page<NewsSummary>> {
        let url = self.collection_url("/news", query);
        debug!(%url, "fetching news page");

        let response = self.send(self.authorized(self.client.get(&url))).await?;
        let envelope: NewsListEnvelope = Self::decode(response).await?;
        check_status(&envelope.status, envelope.message)?;

        // The news endpoint reports no total; a full page implies more.
        Ok(Page::from_len_inference(envelope.news, query.page_size))
    }

    /// Get the full record for a single news article
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id, otherwise the usual
    /// request/decode errors.
    pub async fn get_news(&self, id: &str) -> Result<NewsArticle> {
        let url = format!("{}/news/{id}", self.base_url);
        debug!(%url, "fetching news record");

        let response = self.send(self.authorized(self.client.get(&url))).await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                resource: format!("news/{id}"),
            });
        }

        let envelope: NewsItemEnvelope = Self::decode(response).await?;
        check_status(&envelope.status, envelope.message)?;
        envelope.news.ok_or_else(|| Error::MalformedResponse {
            message: "envelope is OK but carries no news record".to_string(),
        })
    }

    /// Create a news article
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the backend rejects
    /// the draft.
    pub async fn create_news(&self, draft: &ArticleDraft) -> Result<()> {
        let url = format!("{}/news", self.base_url);
        debug!(%url, title = %draft.title, "creating news article");

        let response = self
            .send(self.authorized(self.client.post(&url)).form(&draft_form(draft)))
            .await?;
        let envelope: StatusEnvelope = Self::decode(response).await?;
        check_status(&envelope.status, envelope.message)
    }

    /// Update a news article in place
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the backend rejects
    /// the update.
    pub async fn update_news(&self, id: &str, draft: &ArticleDraft) -> Result<()> {
        let url = format!("{}/news/edit/{id}", self.base_url);
        debug!(%url, "updating news article");

        let response = self
            .send(self.authorized(self.client.put(&url)).form(&draft_form(draft)))
            .await?;
        let envelope: StatusEnvelope = Self::decode(response).await?;
        check_status(&envelope.status, envelope.message)
    }

    /// Delete a news article
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the backend refuses
    /// the deletion.
    pub async fn delete_news(&self, id: &str) -> Result<()> {
        let url = format!("{}/news/delete/{id}", self.base_url);
        debug!(%url, "deleting news article");

        let response = self.send(self.authorized(self.client.delete(&url))).await?;
        let envelope: StatusEnvelope = Self::decode(response).await?;
        check_status(&envelope.status, envelope.message)
    }

    /// Get a page of contact-form submissions
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot
    /// be parsed.
    pub async fn list_contacts(&self, query: &ListQuery) -> Result<Page<Contact>> {
        let url = self.collection_url("/contacts", query);
        debug!(%url, "fetching contacts page");

        let response = self.send(self.authorized(self.client.get(&url))).await?;
        let envelope: ContactsEnvelope = Self::decode(response).await?;
        Ok(Page::from_total(
            envelope.contacts,
            envelope.total,
            query.page,
            query.page_size,
        ))
    }

    /// Mark a contact-form submission as read
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the backend rejects
    /// the update.
    pub async fn mark_contact_read(&self, id: &str) -> Result<()> {
        let url = format!("{}/contact/{id}/read", self.base_url);
        debug!(%url, "marking contact as read");

        let response = self.send(self.authorized(self.client.put(&url))).await?;
        Self::expect_success(response).await
    }

    /// Delete a contact-form submission
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the backend refuses
    /// the deletion.
    pub async fn delete_contact(&self, id: &str) -> Result<()> {
        let url = format!("{}/contact/{id}", self.base_url);
        debug!(%url, "deleting contact");

        let response = self.send(self.authorized(self.client.delete(&url))).await?;
        Self::expect_success(response).await
    }

    /// Get a page of newsletter subscribers
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the response cannot
    /// be parsed.
    pub async fn list_subscribers(&self, query: &ListQuery) -> Result<Page<Subscriber>> {
        let url = self.collection_url("/subscribers", query);
        debug!(%url, "fetching subscribers page");

        let response = self.send(self.authorized(self.client.get(&url))).await?;
        let envelope: SubscribersEnvelope = Self::decode(response).await?;
        Ok(Page::from_total(
            envelope.subscribers,
            envelope.total,
            query.page,
            query.page_size,
        ))
    }

    /// Delete a newsletter subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails or the backend refuses
    /// the deletion.
    pub async fn delete_subscriber(&self, id: &str) -> Result<()> {
        let url = format!("{}/subscribers/{id}", self.base_url);
        debug!(%url, "deleting subscriber");

        let response = self.send(self.authorized(self.client.delete(&url))).await?;
        Self::expect_success(response).await
    }

    /// Build a collection URL with paging and non-blank filter parameters
    fn collection_url(&self, path: &str, query: &ListQuery) -> String {
        let mut url = format!("{}{path}", self.base_url);
        let pairs = query.query_pairs();

        if !pairs.is_empty() {
            let encoded: Vec<String> = pairs
                .iter()
                .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
                .collect();
            url.push('?');
            url.push_str(&encoded.join("&"));
        }

        url
    }

    /// Attach the bearer token, when the client carries one
    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    /// Issue the request, mapping transport failures to [`Error::Network`]
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        request.send().await.map_err(|e| Error::Network {
            message: e.to_string(),
        })
    }

    /// Decode a JSON payload, turning a non-2xx reply into
    /// [`Error::Server`] with whatever message the body offers
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Server {
                status: status.as_u16(),
                message: failure_message(status, response).await,
            });
        }

        let body = response.text().await.map_err(|e| Error::Network {
            message: e.to_string(),
        })?;
        serde_json::from_str(&body).map_err(|e| Error::MalformedResponse {
            message: e.to_string(),
        })
    }

    /// Accept any 2xx reply; mutations on the contacts/subscribers side
    /// answer with plain success bodies rather than a status envelope
    async fn expect_success(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(Error::Server {
            status: status.as_u16(),
            message: failure_message(status, response).await,
        })
    }
}

/// Best-effort extraction of a `message` field from a failure body
async fn failure_message(status: reqwest::StatusCode, response: reqwest::Response) -> String {
    let fallback = || {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    };

    match response.text().await {
        Ok(body) => serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(fallback),
        Err(_) => fallback(),
    }
}

/// Map an OK envelope through, or surface the backend's message
fn check_status(status: &str, message: Option<String>) -> Result<()> {
    if status == "OK" {
        return Ok(());
    }

    Err(Error::Server {
        status: 200,
        message: message.unwrap_or_else(|| format!("unexpected envelope status: {status}")),
    })
}

/// The form-encoded field set for create/update calls
fn draft_form(draft: &ArticleDraft) -> [(&'static str, String); 6] {
    [
        ("title", draft.title.clone()),
        ("body", draft.body.clone()),
        ("category", draft.category.as_str().to_string()),
        ("author", draft.author.as_str().to_string()),
        ("date", draft.date.format("%Y-%m-%d").to_string()),
        ("description", draft.description.clone()),
    ]
}

/// Trailing slashes would double up when paths are appended
fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
#[allow(clippy::unwrap_used, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use newsdesk_core::types::{Author, Category};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collection_url_omits_blank_filters() {
        let client = ApiClient::new("http://localhost:3000/api/v1");
        let query = ListQuery::first_page(10)
            .with_filter("title", "  ")
            .with_filter("category", "");
        assert_eq!(
            client.collection_url("/news", &query),
            "http://localhost:3000/api/v1/news?limit=10&page=1"
        );
    }

    #[test]
    fn test_collection_url_encodes_filter_values() {
        let client = ApiClient::new("http://localhost:3000/api/v1/");
        let query = ListQuery::first_page(10).with_filter("title", "yeni il");
        assert_eq!(
            client.collection_url("/news", &query),
            "http://localhost:3000/api/v1/news?limit=10&page=1&title=yeni%20il"
        );
    }

    #[test]
    fn test_check_status_maps_failure_message() {
        let err = check_status("ERROR", Some("Xəbər tapılmadı".to_string()));
        match err {
            Err(Error::Server { status, message }) => {
                assert_eq!(status, 200);
                assert_eq!(message, "Xəbər tapılmadı");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_draft_form_field_set() {
        let draft = ArticleDraft {
            title: "Başlıq".to_string(),
            description: "Qısa təsvir".to_string(),
            body: "<p>Mətn</p>".to_string(),
            category: Category::World,
            author: Author::Safarov,
            date: chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        };
        let form = draft_form(&draft);
        assert_eq!(form[2], ("category", "Dünya".to_string()));
        assert_eq!(form[4], ("date", "2025-06-01".to_string()));
    }
}
