//! Article editor form, local validation, and the editor state machine
//!
//! Validation runs entirely locally and gates the network call: a draft
//! that fails any field check never leaves the process. Category and
//! author come from fixed enumerations, so the form holds selections, not
//! free text.

use chrono::NaiveDate;
use newsdesk_core::types::{ArticleDraft, Author, Category, NewsArticle, RecordId};
use validator::{Validate, ValidationError, ValidationErrors};

/// A single failed field check, named for inline display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field the check failed on
    pub field: String,
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Buffered editor state for creating or updating an article
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct ArticleForm {
    /// Article title
    #[validate(custom(function = "validate_not_blank"))]
    pub title: String,

    /// Teaser description
    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,

    /// Rich-content body (opaque markup)
    #[validate(custom(function = "validate_rich_text"))]
    pub body: String,

    /// Category selection from the fixed roster
    #[validate(required)]
    pub category: Option<Category>,

    /// Author selection from the fixed roster
    #[validate(required)]
    pub author: Option<Author>,

    /// Publication date as `YYYY-MM-DD` text
    #[validate(custom(function = "validate_date_text"))]
    pub date: String,
}

impl ArticleForm {
    /// Blank form for creating a new article, dated today
    #[must_use]
    pub fn blank() -> Self {
        Self {
            date: chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string(),
            ..Self::default()
        }
    }

    /// Seed the form from a fetched article record
    ///
    /// Unknown category or author values (legacy records) simply leave the
    /// selection empty; the user must pick a current one before saving.
    #[must_use]
    pub fn from_article(article: &NewsArticle) -> Self {
        Self {
            title: article.title.clone(),
            description: article.description.clone(),
            body: article.body.clone(),
            category: Category::from_str_opt(&article.category),
            author: Author::from_str_opt(&article.author),
            date: article.date.format("%Y-%m-%d").to_string(),
        }
    }

    /// Run every local field check
    #[must_use]
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => flatten_errors(&errors),
        }
    }

    /// Validate and convert into a wire-ready draft
    ///
    /// # Errors
    ///
    /// Returns every failed field check; the draft is only produced when
    /// the list is empty.
    pub fn to_draft(&self) -> Result<ArticleDraft, Vec<FieldError>> {
        let errors = self.field_errors();
        if !errors.is_empty() {
            return Err(errors);
        }

        let category = self
            .category
            .ok_or_else(|| vec![FieldError::new("category", "is required")])?;
        let author = self
            .author
            .ok_or_else(|| vec![FieldError::new("author", "is required")])?;
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| vec![FieldError::new("date", "must be YYYY-MM-DD")])?;

        Ok(ArticleDraft {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            body: self.body.clone(),
            category,
            author,
            date,
        })
    }
}

/// Rich-text editors emit placeholder markup for an empty document; treat
/// it the same as no content at all.
fn is_blank_markup(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == "<p><br></p>" || trimmed == "<p></p>"
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be empty".into());
        return Err(error);
    }
    Ok(())
}

fn validate_rich_text(value: &str) -> Result<(), ValidationError> {
    if is_blank_markup(value) {
        let mut error = ValidationError::new("blank");
        error.message = Some("article content is required".into());
        return Err(error);
    }
    Ok(())
}

fn validate_date_text(value: &str) -> Result<(), ValidationError> {
    if NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").is_err() {
        let mut error = ValidationError::new("date_format");
        error.message = Some("must be a date in YYYY-MM-DD form".into());
        return Err(error);
    }
    Ok(())
}

fn flatten_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(|error| {
                let message = error.message.as_ref().map_or_else(
                    || match error.code.as_ref() {
                        "required" => "is required".to_string(),
                        code => format!("failed check: {code}"),
                    },
                    std::string::ToString::to_string,
                );
                FieldError::new(*field, message)
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

/// Lifecycle of the article editor modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    /// No editor open
    Closed,
    /// Waiting for the full record of the article being edited
    Loading {
        /// Article being fetched
        id: RecordId,
    },
    /// Form open for editing; `id` is `None` when creating
    Editing {
        /// Target article, or `None` for a new one
        id: Option<RecordId>,
        /// Buffered form fields
        form: ArticleForm,
        /// Field checks failed on the last submit attempt
        field_errors: Vec<FieldError>,
        /// Transient error from a failed fetch or submit
        error: Option<String>,
    },
    /// Submission in flight
    Submitting {
        /// Target article, or `None` for a new one
        id: Option<RecordId>,
        /// Form as submitted, kept for a failure round-trip
        form: ArticleForm,
    },
    /// Saved; the editor closes after a short success display
    Succeeded {
        /// Target article, or `None` for a created one
        id: Option<RecordId>,
    },
}

/// Side effect requested by an editor transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEffect {
    /// Nothing to do
    None,
    /// Fetch the full article record
    FetchArticle(RecordId),
    /// Issue the create/update call with this validated draft
    Submit {
        /// Target article, or `None` to create
        id: Option<RecordId>,
        /// Wire-ready payload
        draft: ArticleDraft,
    },
    /// Start the success-display timer, then call
    /// [`Editor::close_elapsed`]
    ScheduleClose,
}

/// Editor modal state machine
///
/// Single-item fetch and submit are user-serialized (one editor at a
/// time), so unlike the list controller no generation bookkeeping is
/// needed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    state: EditorState,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// New, closed editor
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: EditorState::Closed,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &EditorState {
        &self.state
    }

    /// True whenever the editor occupies the screen
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self.state, EditorState::Closed)
    }

    /// Open a blank form for a new article
    pub fn open_blank(&mut self) -> EditorEffect {
        self.state = EditorState::Editing {
            id: None,
            form: ArticleForm::blank(),
            field_errors: Vec::new(),
            error: None,
        };
        EditorEffect::None
    }

    /// Open the editor for an existing article; the list row only holds a
    /// summary, so the full record must be fetched first
    pub fn open_for(&mut self, id: impl Into<RecordId>) -> EditorEffect {
        let id = id.into();
        self.state = EditorState::Loading { id: id.clone() };
        EditorEffect::FetchArticle(id)
    }

    /// The full record arrived
    pub fn record_loaded(&mut self, article: &NewsArticle) {
        if let EditorState::Loading { id } = &self.state {
            if *id == article.id {
                self.state = EditorState::Editing {
                    id: Some(article.id.clone()),
                    form: ArticleForm::from_article(article),
                    field_errors: Vec::new(),
                    error: None,
                };
            }
        }
    }

    /// The record fetch failed; the editor stays open with the message
    pub fn load_failed(&mut self, message: impl Into<String>) {
        if let EditorState::Loading { id } = &self.state {
            self.state = EditorState::Editing {
                id: Some(id.clone()),
                form: ArticleForm::default(),
                field_errors: Vec::new(),
                error: Some(message.into()),
            };
        }
    }

    /// Mutable access to the form while editing
    pub fn form_mut(&mut self) -> Option<&mut ArticleForm> {
        match &mut self.state {
            EditorState::Editing { form, .. } => Some(form),
            _ => None,
        }
    }

    /// Attempt submission: field checks first, the wire call only when
    /// every one of them passes
    pub fn submit(&mut self) -> EditorEffect {
        let EditorState::Editing { id, form, .. } = &self.state else {
            return EditorEffect::None;
        };
        let id = id.clone();
        let form = form.clone();

        match form.to_draft() {
            Ok(draft) => {
                self.state = EditorState::Submitting {
                    id: id.clone(),
                    form,
                };
                EditorEffect::Submit { id, draft }
            }
            Err(field_errors) => {
                self.state = EditorState::Editing {
                    id,
                    form,
                    field_errors,
                    error: None,
                };
                EditorEffect::None
            }
        }
    }

    /// The create/update call succeeded
    pub fn submit_succeeded(&mut self) -> EditorEffect {
        if let EditorState::Submitting { id, .. } = &self.state {
            self.state = EditorState::Succeeded { id: id.clone() };
            return EditorEffect::ScheduleClose;
        }
        EditorEffect::None
    }

    /// The create/update call failed; the form and its contents survive
    pub fn submit_failed(&mut self, message: impl Into<String>) {
        if let EditorState::Submitting { id, form } = &self.state {
            self.state = EditorState::Editing {
                id: id.clone(),
                form: form.clone(),
                field_errors: Vec::new(),
                error: Some(message.into()),
            };
        }
    }

    /// The success-display delay elapsed
    pub fn close_elapsed(&mut self) {
        if matches!(self.state, EditorState::Succeeded { .. }) {
            self.state = EditorState::Closed;
        }
    }

    /// Dismiss the editor (not while a submission is in flight)
    pub fn close(&mut self) {
        if !matches!(self.state, EditorState::Submitting { .. }) {
            self.state = EditorState::Closed;
        }
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
#[allow(clippy::unwrap_used, clippy::uninlined_format_args, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_form() -> ArticleForm {
        ArticleForm {
            title: "Yeni başlıq".to_string(),
            description: "Qısa təsvir".to_string(),
            body: "<p>Mətn</p>".to_string(),
            category: Some(Category::World),
            author: Some(Author::Savalanli),
            date: "2025-06-01".to_string(),
        }
    }

    fn article() -> NewsArticle {
        NewsArticle {
            id: "a1".to_string(),
            title: "Köhnə başlıq".to_string(),
            description: "Təsvir".to_string(),
            body: "<p>Köhnə mətn</p>".to_string(),
            category: "Dünya".to_string(),
            author: "Leyla Aşina".to_string(),
            date: chrono::DateTime::parse_from_rfc3339("2025-05-01T10:00:00Z")
                .unwrap()
                .with_timezone(&chrono::Utc),
            image: None,
        }
    }

    #[test]
    fn empty_title_blocks_submission_and_names_the_field() {
        let mut form = valid_form();
        form.title = "   ".to_string();
        let errors = form.to_draft().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "title"));
    }

    #[test]
    fn placeholder_markup_counts_as_empty_body() {
        let mut form = valid_form();
        form.body = "<p><br></p>".to_string();
        let errors = form.to_draft().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "body"));
    }

    #[test]
    fn missing_selections_are_reported_per_field() {
        let mut form = valid_form();
        form.category = None;
        form.author = None;
        let errors = form.to_draft().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"category"));
        assert!(fields.contains(&"author"));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut form = valid_form();
        form.date = "01.06.2025".to_string();
        let errors = form.to_draft().unwrap_err();
        assert!(errors.iter().any(|e| e.field == "date"));
    }

    #[test]
    fn valid_form_produces_a_trimmed_draft() {
        let mut form = valid_form();
        form.title = "  Yeni başlıq  ".to_string();
        let draft = form.to_draft().unwrap();
        assert_eq!(draft.title, "Yeni başlıq");
        assert_eq!(draft.category, Category::World);
        assert_eq!(
            draft.date,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
    }

    #[test]
    fn from_article_seeds_selections_and_date() {
        let form = ArticleForm::from_article(&article());
        assert_eq!(form.category, Some(Category::World));
        assert_eq!(form.author, Some(Author::Asina));
        assert_eq!(form.date, "2025-05-01");
    }

    #[test]
    fn unknown_roster_values_leave_selection_empty() {
        let mut legacy = article();
        legacy.author = "Keçmiş Müəllif".to_string();
        let form = ArticleForm::from_article(&legacy);
        assert_eq!(form.author, None);
    }

    #[test]
    fn open_for_fetches_the_full_record() {
        let mut editor = Editor::new();
        let effect = editor.open_for("a1");
        assert_eq!(effect, EditorEffect::FetchArticle("a1".to_string()));
        assert!(matches!(editor.state(), EditorState::Loading { .. }));

        editor.record_loaded(&article());
        match editor.state() {
            EditorState::Editing { id, form, .. } => {
                assert_eq!(id.as_deref(), Some("a1"));
                assert_eq!(form.title, "Köhnə başlıq");
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn record_for_a_different_id_is_ignored() {
        let mut editor = Editor::new();
        editor.open_for("other");
        editor.record_loaded(&article());
        assert!(matches!(editor.state(), EditorState::Loading { .. }));
    }

    #[test]
    fn invalid_submit_never_produces_a_wire_effect() {
        let mut editor = Editor::new();
        editor.open_blank();
        if let Some(form) = editor.form_mut() {
            *form = valid_form();
            form.title = String::new();
        }
        assert_eq!(editor.submit(), EditorEffect::None);
        match editor.state() {
            EditorState::Editing { field_errors, .. } => {
                assert!(field_errors.iter().any(|e| e.field == "title"));
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn valid_submit_flows_to_succeeded_and_schedules_close() {
        let mut editor = Editor::new();
        editor.open_for("a1");
        editor.record_loaded(&article());

        let effect = editor.submit();
        match effect {
            EditorEffect::Submit { id, draft } => {
                assert_eq!(id.as_deref(), Some("a1"));
                assert_eq!(draft.title, "Köhnə başlıq");
            }
            other => panic!("unexpected effect: {other:?}"),
        }
        assert!(matches!(editor.state(), EditorState::Submitting { .. }));

        assert_eq!(editor.submit_succeeded(), EditorEffect::ScheduleClose);
        editor.close_elapsed();
        assert_eq!(editor.state(), &EditorState::Closed);
    }

    #[test]
    fn failed_submit_keeps_the_editor_open_with_the_form() {
        let mut editor = Editor::new();
        editor.open_for("a1");
        editor.record_loaded(&article());
        editor.submit();
        editor.submit_failed("Xəbər yenilənmədi");

        match editor.state() {
            EditorState::Editing { form, error, .. } => {
                assert_eq!(form.title, "Köhnə başlıq");
                assert_eq!(error.as_deref(), Some("Xəbər yenilənmədi"));
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn close_is_ignored_mid_submission() {
        let mut editor = Editor::new();
        editor.open_for("a1");
        editor.record_loaded(&article());
        editor.submit();
        editor.close();
        assert!(matches!(editor.state(), EditorState::Submitting { .. }));
    }

    #[test]
    fn blank_editor_submits_a_create() {
        let mut editor = Editor::new();
        editor.open_blank();
        if let Some(form) = editor.form_mut() {
            *form = valid_form();
        }
        match editor.submit() {
            EditorEffect::Submit { id, .. } => assert_eq!(id, None),
            other => panic!("unexpected effect: {other:?}"),
        }
    }
}
