//! Language endpoints
//!
//! Unlike the other lists this one takes no parameters at all: any page or
//! limit in the query string is ignored and the full set is returned.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::app::AppState;
use crate::db::LanguageRecord;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct LanguageResponse {
    pub code: String,
    pub book_count: i64,
}

#[derive(Debug, Serialize)]
pub struct LanguagesResponse {
    pub total: usize,
    pub languages: Vec<LanguageResponse>,
}

impl From<LanguageRecord> for LanguageResponse {
    fn from(language: LanguageRecord) -> Self {
        Self {
            code: language.code,
            book_count: language.book_count,
        }
    }
}

/// List every language with its book count
async fn list_languages(State(state): State<AppState>) -> Result<Json<LanguagesResponse>, ApiError> {
    let mut session = state.db.session().await?;
    let languages = session.languages().list_all().await?;

    Ok(Json(LanguagesResponse {
        total: languages.len(),
        languages: languages.into_iter().map(Into::into).collect(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/languages", get(list_languages))
        .route("/languages/", get(list_languages))
}
