//! Terminal interface for the NewsDesk admin console
//!
//! Renders the three collection views (news, contacts, subscribers) with a
//! filter bar, a table, pagination controls, and modal overlays for delete
//! confirmation and the article editor. All list state lives in the panel
//! services; this crate only dispatches events and renders snapshots.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod app;
pub mod views;
pub mod widgets;

pub use app::App;
