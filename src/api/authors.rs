//! Author endpoints

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use super::params::{ApiQuery, NameQuery};
use crate::app::AppState;
use crate::db::{AuthorRecord, Page};
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct AuthorResponse {
    pub id: i64,
    pub name: String,
    pub birth_year: Option<i64>,
    pub death_year: Option<i64>,
    pub book_count: i64,
}

#[derive(Debug, Serialize)]
pub struct AuthorsResponse {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub authors: Vec<AuthorResponse>,
}

impl From<AuthorRecord> for AuthorResponse {
    fn from(author: AuthorRecord) -> Self {
        Self {
            id: author.id,
            name: author.name,
            birth_year: author.birth_year,
            death_year: author.death_year,
            book_count: author.book_count,
        }
    }
}

impl From<Page<AuthorRecord>> for AuthorsResponse {
    fn from(page: Page<AuthorRecord>) -> Self {
        let page = page.map(AuthorResponse::from);
        Self {
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            authors: page.items,
        }
    }
}

/// List authors with an optional name filter
async fn list_authors(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NameQuery>,
) -> Result<Json<AuthorsResponse>, ApiError> {
    let page = query.page_request()?;

    let mut session = state.db.session().await?;
    let found = session.authors().list(query.name.as_deref(), page).await?;

    Ok(Json(found.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/authors", get(list_authors))
        .route("/authors/", get(list_authors))
}
