//! Shared helpers for driving the router in-process

#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use books_api::db::{Database, connect_options};
use books_api::{AppState, build_app};

pub const SCHEMA: &str = include_str!("../fixtures/schema.sql");
pub const SEED: &str = include_str!("../fixtures/seed.sql");
pub const UNICODE: &str = include_str!("../fixtures/unicode.sql");

/// App over an in-memory store initialised with `scripts`, in order
pub async fn app_with(scripts: &[&str]) -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(connect_options("sqlite::memory:").expect("memory url"))
        .await
        .expect("in-memory sqlite");

    for script in scripts {
        sqlx::raw_sql(script).execute(&pool).await.expect("fixture sql");
    }

    build_app(AppState::new(Database::new(pool)))
}

/// App whose pool has already been closed, so every acquire fails
pub async fn closed_store_app() -> Router {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options("sqlite::memory:").expect("memory url"))
        .await
        .expect("in-memory sqlite");
    pool.close().await;

    build_app(AppState::new(Database::new(pool)))
}

pub async fn seeded_app() -> Router {
    app_with(&[SCHEMA, SEED]).await
}

pub async fn request(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    request(app, Method::GET, uri).await
}

/// `id` of every element of `body[key]`
pub fn ids(body: &Value, key: &str) -> Vec<i64> {
    body[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}
