//! Service index

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::app::AppState;

pub const ENDPOINTS: &[&str] = &[
    "/books",
    "/books/{book_id}",
    "/authors",
    "/languages",
    "/subjects",
];

#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: &'static [&'static str],
}

/// API information
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Welcome to the Books API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(root))
}
