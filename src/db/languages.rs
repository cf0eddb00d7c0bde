//! Language database operations
//!
//! Languages are few and always listed in full, so there is no pagination.

use anyhow::Result;
use sqlx::SqliteConnection;

use super::query::CatalogQuery;
use super::schema::LanguageRecord;

/// Language repository for database operations
pub struct LanguageRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> LanguageRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Every language with its book count
    pub async fn list_all(&mut self) -> Result<Vec<LanguageRecord>> {
        let languages = CatalogQuery::<LanguageRecord>::new()
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(languages)
    }
}
