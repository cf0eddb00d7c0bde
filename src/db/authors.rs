//! Author database operations

use anyhow::Result;
use sqlx::SqliteConnection;

use super::query::{CatalogQuery, Page, PageRequest, TextMatch};
use super::schema::AuthorRecord;

/// Author repository for database operations
pub struct AuthorRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> AuthorRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// List authors whose name contains `name`, with their book counts
    pub async fn list(&mut self, name: Option<&str>, page: PageRequest) -> Result<Page<AuthorRecord>> {
        let found = CatalogQuery::<AuthorRecord>::new()
            .where_text("name", TextMatch::contains(name))
            .fetch_page(&mut *self.conn, page)
            .await?;

        Ok(found)
    }
}
