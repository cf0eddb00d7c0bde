//! Books API - read-only HTTP catalog of books, authors, languages and subjects
//!
//! The store is a pre-populated SQLite catalog. Every route is a GET that
//! reads it through [`db::Session`] and answers JSON; failures are rendered
//! by [`error::ApiError`] as a uniform `{error, status_code}` envelope.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;

pub use app::{AppState, build_app};
