//! Catalog schema: table names, association relations and row records
//!
//! The store is populated by an external loader; this module only describes
//! what the service reads. Every many-to-many relation is an explicit
//! association table with one column per side.

pub const BOOKS: &str = "books_book";
pub const AUTHORS: &str = "books_author";
pub const LANGUAGES: &str = "books_language";
pub const SUBJECTS: &str = "books_subject";
pub const FORMATS: &str = "books_format";

/// A book ↔ X association table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Association {
    /// Association table name
    pub table: &'static str,
    /// Column referencing `books_book.id`
    pub book_key: &'static str,
    /// Target table the other side points at
    pub target: &'static str,
    /// Column referencing the target's `id`
    pub target_key: &'static str,
}

pub const BOOK_AUTHORS: Association = Association {
    table: "books_book_authors",
    book_key: "book_id",
    target: AUTHORS,
    target_key: "author_id",
};

pub const BOOK_LANGUAGES: Association = Association {
    table: "books_book_languages",
    book_key: "book_id",
    target: LANGUAGES,
    target_key: "language_id",
};

pub const BOOK_SUBJECTS: Association = Association {
    table: "books_book_subjects",
    book_key: "book_id",
    target: SUBJECTS,
    target_key: "subject_id",
};

impl Association {
    /// Correlated count of books linked to a target row aliased `alias`.
    pub fn book_count_sql(&self, alias: &str) -> String {
        format!(
            "(SELECT COUNT(*) FROM {} j WHERE j.{} = {}.id)",
            self.table, self.target_key, alias
        )
    }
}

/// Metadata about a table the query builder can select from.
pub trait CatalogEntity: Sized + Send + Unpin {
    /// The SQL table name
    const TABLE_NAME: &'static str;

    /// Alias used for the table in generated SQL
    const ALIAS: &'static str;

    /// Column list for the SELECT, qualified with [`Self::ALIAS`]
    fn select_columns() -> String;

    /// Build the SELECT prefix for this entity
    fn select_sql() -> String {
        format!(
            "SELECT {} FROM {} {}",
            Self::select_columns(),
            Self::TABLE_NAME,
            Self::ALIAS
        )
    }

    /// Build the COUNT prefix for this entity
    fn count_sql() -> String {
        format!("SELECT COUNT(*) FROM {} {}", Self::TABLE_NAME, Self::ALIAS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct BookRecord {
    pub id: i64,
    pub title: String,
    pub download_count: Option<i64>,
}

impl CatalogEntity for BookRecord {
    const TABLE_NAME: &'static str = BOOKS;
    const ALIAS: &'static str = "b";

    fn select_columns() -> String {
        "b.id, b.title, b.download_count".to_string()
    }
}

/// An author, with the number of books linked through `books_book_authors`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AuthorRecord {
    pub id: i64,
    pub name: String,
    pub birth_year: Option<i64>,
    pub death_year: Option<i64>,
    pub book_count: i64,
}

impl CatalogEntity for AuthorRecord {
    const TABLE_NAME: &'static str = AUTHORS;
    const ALIAS: &'static str = "a";

    fn select_columns() -> String {
        format!(
            "a.id, a.name, a.birth_year, a.death_year, {} AS book_count",
            BOOK_AUTHORS.book_count_sql("a")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct LanguageRecord {
    pub id: i64,
    pub code: String,
    pub book_count: i64,
}

impl CatalogEntity for LanguageRecord {
    const TABLE_NAME: &'static str = LANGUAGES;
    const ALIAS: &'static str = "l";

    fn select_columns() -> String {
        format!(
            "l.id, l.code, {} AS book_count",
            BOOK_LANGUAGES.book_count_sql("l")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SubjectRecord {
    pub id: i64,
    pub name: String,
    pub book_count: i64,
}

impl CatalogEntity for SubjectRecord {
    const TABLE_NAME: &'static str = SUBJECTS;
    const ALIAS: &'static str = "s";

    fn select_columns() -> String {
        format!(
            "s.id, s.name, {} AS book_count",
            BOOK_SUBJECTS.book_count_sql("s")
        )
    }
}

/// A downloadable rendition of a book.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FormatRecord {
    pub id: i64,
    pub book_id: i64,
    pub mime_type: String,
    pub url: String,
}

/// Author fields embedded in a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookAuthor {
    pub name: String,
    pub birth_year: Option<i64>,
    pub death_year: Option<i64>,
}

/// A book with its authors, language codes and subject names resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookWithRelations {
    pub book: BookRecord,
    pub authors: Vec<BookAuthor>,
    pub languages: Vec<String>,
    pub subjects: Vec<String>,
}

impl BookWithRelations {
    pub fn new(book: BookRecord) -> Self {
        Self {
            book,
            authors: Vec::new(),
            languages: Vec::new(),
            subjects: Vec::new(),
        }
    }
}
