//! Book database operations
//!
//! Lists books by title/author/language/subject, looks them up by id and
//! resolves their authors, languages, subjects and formats.

use std::collections::HashMap;

use anyhow::Result;
use sqlx::SqliteConnection;

use super::query::{CatalogQuery, Page, PageRequest, TextMatch};
use super::schema::{
    Association, BOOK_AUTHORS, BOOK_LANGUAGES, BOOK_SUBJECTS, BookAuthor, BookRecord,
    BookWithRelations, FORMATS, FormatRecord,
};

/// Filter options for listing books
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    /// Substring of the title
    pub title: Option<String>,
    /// Substring of any author's name
    pub author: Option<String>,
    /// Exact language code (e.g. "en")
    pub language: Option<String>,
    /// Substring of any subject name
    pub subject: Option<String>,
    /// Most downloaded first
    pub sort_by_downloads: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct AuthorLink {
    book_id: i64,
    name: String,
    birth_year: Option<i64>,
    death_year: Option<i64>,
}

#[derive(Debug, sqlx::FromRow)]
struct NameLink {
    book_id: i64,
    name: String,
}

/// Book repository for database operations
pub struct BookRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> BookRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    fn filtered(filter: &BookFilter) -> CatalogQuery<BookRecord> {
        let query = CatalogQuery::<BookRecord>::new()
            .where_text("title", TextMatch::contains(filter.title.as_deref()))
            .where_related(
                BOOK_AUTHORS,
                "name",
                TextMatch::contains(filter.author.as_deref()),
            )
            .where_related(
                BOOK_LANGUAGES,
                "code",
                TextMatch::exact(filter.language.as_deref()),
            )
            .where_related(
                BOOK_SUBJECTS,
                "name",
                TextMatch::contains(filter.subject.as_deref()),
            );

        if filter.sort_by_downloads {
            query.order_by_desc("download_count")
        } else {
            query
        }
    }

    /// List books matching the filter, one page at a time
    pub async fn list(
        &mut self,
        filter: &BookFilter,
        page: PageRequest,
    ) -> Result<Page<BookWithRelations>> {
        let found = Self::filtered(filter)
            .fetch_page(&mut *self.conn, page)
            .await?;

        let total = found.total;
        let items = self.with_relations(found.items).await?;

        Ok(Page {
            total,
            page: found.page,
            per_page: found.per_page,
            items,
        })
    }

    /// Get a single book by ID
    pub async fn get_by_id(&mut self, id: i64) -> Result<Option<BookWithRelations>> {
        let Some(book) = CatalogQuery::<BookRecord>::new()
            .where_id(id)
            .fetch_optional(&mut *self.conn)
            .await?
        else {
            return Ok(None);
        };

        Ok(self.with_relations(vec![book]).await?.pop())
    }

    /// Get the formats of a book, or `None` if the book does not exist
    pub async fn formats(&mut self, id: i64) -> Result<Option<Vec<FormatRecord>>> {
        let exists = CatalogQuery::<BookRecord>::new()
            .where_id(id)
            .count(&mut *self.conn)
            .await?
            > 0;
        if !exists {
            return Ok(None);
        }

        let sql = format!(
            "SELECT id, book_id, mime_type, url FROM {} WHERE book_id = ? ORDER BY id",
            FORMATS
        );
        let formats = sqlx::query_as::<_, FormatRecord>(&sql)
            .bind(id)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(Some(formats))
    }

    /// Resolve relations for a set of books with one query per relation
    async fn with_relations(&mut self, books: Vec<BookRecord>) -> Result<Vec<BookWithRelations>> {
        if books.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = books.iter().map(|b| b.id).collect();
        let index: HashMap<i64, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let mut resolved: Vec<BookWithRelations> =
            books.into_iter().map(BookWithRelations::new).collect();

        for link in self.author_links(&ids).await? {
            if let Some(&i) = index.get(&link.book_id) {
                resolved[i].authors.push(BookAuthor {
                    name: link.name,
                    birth_year: link.birth_year,
                    death_year: link.death_year,
                });
            }
        }

        for link in self.name_links(BOOK_LANGUAGES, "code", &ids).await? {
            if let Some(&i) = index.get(&link.book_id) {
                resolved[i].languages.push(link.name);
            }
        }

        for link in self.name_links(BOOK_SUBJECTS, "name", &ids).await? {
            if let Some(&i) = index.get(&link.book_id) {
                resolved[i].subjects.push(link.name);
            }
        }

        Ok(resolved)
    }

    async fn author_links(&mut self, ids: &[i64]) -> Result<Vec<AuthorLink>> {
        let sql = format!(
            "SELECT j.{book_key} AS book_id, t.name, t.birth_year, t.death_year \
             FROM {table} j JOIN {target} t ON t.id = j.{target_key} \
             WHERE j.{book_key} IN ({ids}) ORDER BY j.{book_key}, t.id",
            book_key = BOOK_AUTHORS.book_key,
            table = BOOK_AUTHORS.table,
            target = BOOK_AUTHORS.target,
            target_key = BOOK_AUTHORS.target_key,
            ids = placeholders(ids.len()),
        );
        tracing::debug!(sql = %sql, "Loading book authors");

        let mut query = sqlx::query_as::<_, AuthorLink>(&sql);
        for id in ids {
            query = query.bind(*id);
        }

        Ok(query.fetch_all(&mut *self.conn).await?)
    }

    async fn name_links(
        &mut self,
        association: Association,
        column: &str,
        ids: &[i64],
    ) -> Result<Vec<NameLink>> {
        let sql = format!(
            "SELECT j.{book_key} AS book_id, t.{column} AS name \
             FROM {table} j JOIN {target} t ON t.id = j.{target_key} \
             WHERE j.{book_key} IN ({ids}) ORDER BY j.{book_key}, t.id",
            book_key = association.book_key,
            column = column,
            table = association.table,
            target = association.target,
            target_key = association.target_key,
            ids = placeholders(ids.len()),
        );
        tracing::debug!(sql = %sql, table = association.table, "Loading book relation");

        let mut query = sqlx::query_as::<_, NameLink>(&sql);
        for id in ids {
            query = query.bind(*id);
        }

        Ok(query.fetch_all(&mut *self.conn).await?)
    }
}

/// `?, ?, ?` for an IN list of `n` values
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
