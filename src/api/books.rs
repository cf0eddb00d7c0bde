//! Book endpoints

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use super::params::{ApiPath, ApiQuery, BooksQuery};
use crate::app::AppState;
use crate::db::{BookAuthor, BookWithRelations, FormatRecord, Page};
use crate::error::ApiError;

/// Author as embedded in a book listing
#[derive(Debug, Serialize)]
pub struct AuthorSummary {
    pub name: String,
    pub birth_year: Option<i64>,
}

/// Author as embedded in a single book
#[derive(Debug, Serialize)]
pub struct AuthorDetail {
    pub name: String,
    pub birth_year: Option<i64>,
    pub death_year: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct BookSummary {
    pub id: i64,
    pub title: String,
    pub download_count: Option<i64>,
    pub authors: Vec<AuthorSummary>,
    pub languages: Vec<String>,
    pub subjects: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BookDetail {
    pub id: i64,
    pub title: String,
    pub download_count: Option<i64>,
    pub authors: Vec<AuthorDetail>,
    pub languages: Vec<String>,
    pub subjects: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BooksResponse {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub books: Vec<BookSummary>,
}

#[derive(Debug, Serialize)]
pub struct FormatResponse {
    pub mime_type: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct BookFormatsResponse {
    pub book_id: i64,
    pub formats: Vec<FormatResponse>,
}

impl From<BookAuthor> for AuthorSummary {
    fn from(author: BookAuthor) -> Self {
        Self {
            name: author.name,
            birth_year: author.birth_year,
        }
    }
}

impl From<BookAuthor> for AuthorDetail {
    fn from(author: BookAuthor) -> Self {
        Self {
            name: author.name,
            birth_year: author.birth_year,
            death_year: author.death_year,
        }
    }
}

impl From<BookWithRelations> for BookSummary {
    fn from(found: BookWithRelations) -> Self {
        Self {
            id: found.book.id,
            title: found.book.title,
            download_count: found.book.download_count,
            authors: found.authors.into_iter().map(Into::into).collect(),
            languages: found.languages,
            subjects: found.subjects,
        }
    }
}

impl From<BookWithRelations> for BookDetail {
    fn from(found: BookWithRelations) -> Self {
        Self {
            id: found.book.id,
            title: found.book.title,
            download_count: found.book.download_count,
            authors: found.authors.into_iter().map(Into::into).collect(),
            languages: found.languages,
            subjects: found.subjects,
        }
    }
}

impl From<Page<BookWithRelations>> for BooksResponse {
    fn from(page: Page<BookWithRelations>) -> Self {
        let page = page.map(BookSummary::from);
        Self {
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            books: page.items,
        }
    }
}

impl From<FormatRecord> for FormatResponse {
    fn from(format: FormatRecord) -> Self {
        Self {
            mime_type: format.mime_type,
            url: format.url,
        }
    }
}

/// List books with optional filters and pagination
async fn list_books(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<BooksQuery>,
) -> Result<Json<BooksResponse>, ApiError> {
    let page = query.page_request()?;
    let filter = query.filter();
    tracing::debug!(?filter, ?page, "Listing books");

    let mut session = state.db.session().await?;
    let found = session.books().list(&filter, page).await?;

    Ok(Json(found.into()))
}

/// Get a single book by ID
async fn get_book(
    State(state): State<AppState>,
    ApiPath(book_id): ApiPath<i64>,
) -> Result<Json<BookDetail>, ApiError> {
    let mut session = state.db.session().await?;
    let book = session
        .books()
        .get_by_id(book_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Book not found"))?;

    Ok(Json(book.into()))
}

/// Get the downloadable formats of a book
async fn get_book_formats(
    State(state): State<AppState>,
    ApiPath(book_id): ApiPath<i64>,
) -> Result<Json<BookFormatsResponse>, ApiError> {
    let mut session = state.db.session().await?;
    let formats = session
        .books()
        .formats(book_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Book not found"))?;

    Ok(Json(BookFormatsResponse {
        book_id,
        formats: formats.into_iter().map(Into::into).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/books", get(list_books))
        .route("/books/", get(list_books))
        .route("/books/{book_id}", get(get_book))
        .route("/books/{book_id}/formats", get(get_book_formats))
}
