//! Query-string and path extraction with validation
//!
//! Binding failures and out-of-range pagination are reported as
//! [`ApiError::Validation`] before any handler touches the store.

use axum::extract::{FromRequestParts, Path, Query};
use serde::{Deserialize, Deserializer};

use crate::db::{BookFilter, PageRequest};
use crate::db::query::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};
use crate::error::ApiError;

/// `Query<T>` whose rejection is the API error envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// `Path<T>` whose rejection is the API error envelope
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Accepts true/false, 1/0, yes/no and on/off, case-insensitively.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(serde::de::Error::custom(format!(
            "invalid boolean value '{}'",
            raw
        ))),
    }
}

/// Check page/limit bounds: `page >= 1`, `limit <= 100`.
pub fn page_request(page: i64, limit: i64) -> Result<PageRequest, ApiError> {
    if page < 1 {
        return Err(ApiError::validation("page must be greater than 0"));
    }
    if limit > MAX_LIMIT {
        return Err(ApiError::validation(format!(
            "limit must be less than or equal to {}",
            MAX_LIMIT
        )));
    }
    Ok(PageRequest::new(page, limit))
}

/// Query parameters for `/books/`
#[derive(Debug, Deserialize)]
pub struct BooksQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub title: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub sort_by_downloads: bool,
}

impl BooksQuery {
    pub fn page_request(&self) -> Result<PageRequest, ApiError> {
        page_request(self.page, self.limit)
    }

    pub fn filter(self) -> BookFilter {
        BookFilter {
            title: self.title,
            author: self.author,
            language: self.language,
            subject: self.subject,
            sort_by_downloads: self.sort_by_downloads,
        }
    }
}

/// Query parameters for lists filtered by name (`/authors/`, `/subjects/`)
#[derive(Debug, Deserialize)]
pub struct NameQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub name: Option<String>,
}

impl NameQuery {
    pub fn page_request(&self) -> Result<PageRequest, ApiError> {
        page_request(self.page, self.limit)
    }
}
