//! Core data types for the NewsDesk admin console

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record identifier type (opaque backend id)
pub type RecordId = String;

/// News category enumeration
///
/// The backend accepts exactly these values; the wire strings are the
/// publication's own (Azerbaijani) labels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    /// Politics
    #[serde(rename = "Siyasət")]
    Politics,
    /// World news
    #[serde(rename = "Dünya")]
    World,
    /// Society
    #[serde(rename = "Cəmiyyət")]
    Society,
    /// Economy
    #[serde(rename = "İqtisadiyyat")]
    Economy,
    /// Long-form articles
    #[serde(rename = "Məqalələr")]
    Articles,
    /// Technology
    #[serde(rename = "Texnalogiya")]
    Technology,
}

impl Category {
    /// All categories the backend accepts, in display order
    pub const ALL: [Self; 6] = [
        Self::Politics,
        Self::World,
        Self::Society,
        Self::Economy,
        Self::Articles,
        Self::Technology,
    ];

    /// The wire value for this category
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Politics => "Siyasət",
            Self::World => "Dünya",
            Self::Society => "Cəmiyyət",
            Self::Economy => "İqtisadiyyat",
            Self::Articles => "Məqalələr",
            Self::Technology => "Texnalogiya",
        }
    }

    /// Parse a wire value back into a category
    #[must_use]
    pub fn from_str_opt(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Staff author enumeration
///
/// The editorial staff roster; article authorship is restricted to these
/// names.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Author {
    /// Yamin Savalanlı
    #[serde(rename = "Yamin Savalanlı")]
    Savalanli,
    /// Vilayat Safarov
    #[serde(rename = "Vilayat Safarov")]
    Safarov,
    /// Leyla Aşina
    #[serde(rename = "Leyla Aşina")]
    Asina,
}

impl Author {
    /// All authors the backend accepts, in display order
    pub const ALL: [Self; 3] = [Self::Savalanli, Self::Safarov, Self::Asina];

    /// The wire value for this author
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Savalanli => "Yamin Savalanlı",
            Self::Safarov => "Vilayat Safarov",
            Self::Asina => "Leyla Aşina",
        }
    }

    /// Parse a wire value back into an author
    #[must_use]
    pub fn from_str_opt(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == value)
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Summary projection of a news article, as returned by the list endpoint
///
/// Categories arrive as plain strings here: the list view only displays
/// them, and older records may predate the current [`Category`] roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsSummary {
    /// Article identifier
    #[serde(rename = "_id")]
    pub id: RecordId,

    /// Article title
    pub title: String,

    /// Category label
    pub category: String,

    /// Publication date
    pub date: DateTime<Utc>,

    /// Cover image URL, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Full news article record, as returned by the single-item endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsArticle {
    /// Article identifier
    #[serde(rename = "_id")]
    pub id: RecordId,

    /// Article title
    pub title: String,

    /// Short description shown in teasers
    #[serde(default)]
    pub description: String,

    /// Rich-content body (opaque markup)
    #[serde(default)]
    pub body: String,

    /// Category label
    pub category: String,

    /// Author name
    #[serde(default)]
    pub author: String,

    /// Publication date
    pub date: DateTime<Utc>,

    /// Cover image URL, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Validated article payload ready to be sent to the backend
///
/// Built from the editor form once every local check has passed; category
/// and author are typed here, so an invalid selection cannot reach the
/// wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleDraft {
    /// Article title
    pub title: String,

    /// Short description shown in teasers
    pub description: String,

    /// Rich-content body (opaque markup)
    pub body: String,

    /// Category selection
    pub category: Category,

    /// Author selection
    pub author: Author,

    /// Publication date
    pub date: chrono::NaiveDate,
}

/// Contact-form submission record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    /// Submission identifier
    #[serde(rename = "_id")]
    pub id: RecordId,

    /// Sender name
    pub name: String,

    /// Sender email address
    pub email: String,

    /// Message body
    pub message: String,

    /// Whether staff already read the message
    #[serde(rename = "isRead")]
    pub is_read: bool,

    /// Submission timestamp
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Newsletter subscriber record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscriber {
    /// Subscriber identifier
    #[serde(rename = "_id")]
    pub id: RecordId,

    /// Subscriber email address
    pub email: String,

    /// Whether the subscription is currently active
    #[serde(rename = "isActive")]
    pub is_active: bool,

    /// Subscription timestamp
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
#[allow(clippy::unwrap_used, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_category_wire_roundtrip() {
        for category in Category::ALL {
            let wire = serde_json::to_string(&category).unwrap();
            let back: Category = serde_json::from_str(&wire).unwrap();
            assert_eq!(back, category);
            assert_eq!(Category::from_str_opt(category.as_str()), Some(category));
        }
    }

    #[test]
    fn test_author_rejects_unknown_name() {
        assert_eq!(Author::from_str_opt("Nobody Special"), None);
        let parsed: std::result::Result<Author, _> = serde_json::from_str(r#""Nobody""#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_news_summary_deserializes_backend_shape() {
        let json = r#"{
            "_id": "66f0a1b2c3d4e5f601234567",
            "title": "Yeni xəbər",
            "category": "Dünya",
            "date": "2025-06-01T08:30:00.000Z"
        }"#;
        let summary: NewsSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.id, "66f0a1b2c3d4e5f601234567");
        assert_eq!(summary.category, "Dünya");
        assert_eq!(summary.image, None);
    }

    #[test]
    fn test_contact_field_renames() {
        let json = r#"{
            "_id": "abc",
            "name": "Aysel",
            "email": "aysel@example.org",
            "message": "Salam",
            "isRead": false,
            "createdAt": "2025-05-20T12:00:00Z"
        }"#;
        let contact: Contact = serde_json::from_str(json).unwrap();
        assert!(!contact.is_read);
        assert_eq!(contact.email, "aysel@example.org");
    }

    #[test]
    fn test_article_defaults_for_optional_body_fields() {
        let json = r#"{
            "_id": "abc",
            "title": "Başlıq",
            "category": "Siyasət",
            "date": "2025-05-20T12:00:00Z"
        }"#;
        let article: NewsArticle = serde_json::from_str(json).unwrap();
        assert_eq!(article.body, "");
        assert_eq!(article.description, "");
        assert_eq!(article.author, "");
    }
}
