//! List controllers, forms and mutation flows for the NewsDesk admin console
//!
//! The same list-and-mutation workflow backs every collection view (news,
//! contacts, subscribers): a paginated, filterable listing with debounced
//! search, last-request-wins fetch discipline, and confirmation-gated
//! destructive actions. This crate implements that workflow once, as a pure
//! state machine plus an async driver, specialized per entity through a
//! small [`Collection`] adapter.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod collection;
pub mod confirm;
pub mod controller;
pub mod forms;
pub mod service;

pub use collection::{Collection, ContactsCollection, NewsCollection, SubscribersCollection};
pub use confirm::DeleteConfirmation;
pub use controller::{DisplayMode, Effect, FetchRequest, ListController, Phase};
pub use forms::{ArticleForm, Editor, EditorEffect, EditorState, FieldError};
pub use service::{ListEvent, ListSnapshot, PanelError, PanelHandle, PanelService};
