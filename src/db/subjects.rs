//! Subject database operations

use anyhow::Result;
use sqlx::SqliteConnection;

use super::query::{CatalogQuery, Page, PageRequest, TextMatch};
use super::schema::SubjectRecord;

/// Subject repository for database operations
pub struct SubjectRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> SubjectRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// List subjects whose name contains `name`, with their book counts
    pub async fn list(&mut self, name: Option<&str>, page: PageRequest) -> Result<Page<SubjectRecord>> {
        let found = CatalogQuery::<SubjectRecord>::new()
            .where_text("name", TextMatch::contains(name))
            .fetch_page(&mut *self.conn, page)
            .await?;

        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::seeded_database;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_list_subjects_by_name() {
        let db = seeded_database().await;
        let mut session = db.session().await.unwrap();
        let page = session
            .subjects()
            .list(Some("fiction"), PageRequest::default())
            .await
            .unwrap();

        assert_eq!(page.total, 3);
        let found: Vec<(i64, &str, i64)> = page
            .items
            .iter()
            .map(|s| (s.id, s.name.as_str(), s.book_count))
            .collect();
        assert_eq!(
            found,
            vec![
                (3, "Whaling -- Fiction", 1),
                (7, "Historical fiction", 2),
                (8, "France -- History -- Fiction", 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_limit_caps_rows_not_total() {
        let db = seeded_database().await;
        let mut session = db.session().await.unwrap();
        let page = session
            .subjects()
            .list(None, PageRequest::new(2, 4))
            .await
            .unwrap();

        assert_eq!(page.total, 9);
        assert_eq!(page.items.len(), 4);
        assert_eq!(page.items[0].id, 5);
    }

    #[tokio::test]
    async fn test_zero_limit_returns_no_rows() {
        let db = seeded_database().await;
        let mut session = db.session().await.unwrap();
        let page = session
            .subjects()
            .list(None, PageRequest::new(1, 0))
            .await
            .unwrap();

        assert_eq!(page.total, 9);
        assert!(page.items.is_empty());
    }
}
