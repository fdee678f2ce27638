//! HTTP client for the NewsDesk publishing backend
//!
//! Wraps every REST endpoint the admin console consumes: paginated
//! collection listings, single-record fetches, and the mutation calls.
//! The auth token is an explicit [`Session`] value threaded through the
//! client at construction time, never ambient state.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod client;
pub mod query;
pub mod session;

pub use client::ApiClient;
pub use query::{ListQuery, Page};
pub use session::{Session, SessionStore};
