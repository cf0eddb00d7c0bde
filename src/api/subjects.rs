//! Subject endpoints

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use super::params::{ApiQuery, NameQuery};
use crate::app::AppState;
use crate::db::{Page, SubjectRecord};
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct SubjectResponse {
    pub id: i64,
    pub name: String,
    pub book_count: i64,
}

#[derive(Debug, Serialize)]
pub struct SubjectsResponse {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub subjects: Vec<SubjectResponse>,
}

impl From<SubjectRecord> for SubjectResponse {
    fn from(subject: SubjectRecord) -> Self {
        Self {
            id: subject.id,
            name: subject.name,
            book_count: subject.book_count,
        }
    }
}

impl From<Page<SubjectRecord>> for SubjectsResponse {
    fn from(page: Page<SubjectRecord>) -> Self {
        let page = page.map(SubjectResponse::from);
        Self {
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            subjects: page.items,
        }
    }
}

/// List subjects with an optional name filter
async fn list_subjects(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NameQuery>,
) -> Result<Json<SubjectsResponse>, ApiError> {
    let page = query.page_request()?;

    let mut session = state.db.session().await?;
    let found = session.subjects().list(query.name.as_deref(), page).await?;

    Ok(Json(found.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/subjects", get(list_subjects))
        .route("/subjects/", get(list_subjects))
}
