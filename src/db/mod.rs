//! Database connection and operations
//!
//! Every request works through its own [`Session`]: one pooled connection,
//! acquired when the handler starts and handed back to the pool when the
//! session is dropped, whichever way the handler exits.

pub mod authors;
pub mod books;
pub mod languages;
pub mod query;
pub mod schema;
pub mod subjects;

#[cfg(test)]
pub(crate) mod testing;

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::Sqlite;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub use authors::AuthorRepository;
pub use books::{BookFilter, BookRepository};
pub use languages::LanguageRepository;
pub use query::{Page, PageRequest};
pub use schema::{
    AuthorRecord, BookAuthor, BookRecord, BookWithRelations, FormatRecord, LanguageRecord,
    SubjectRecord,
};
pub use subjects::SubjectRepository;

/// Options for every catalog connection. Registers `REGEXP`, which the
/// case-insensitive text filters are built on.
pub fn connect_options(url: &str) -> Result<SqliteConnectOptions> {
    let options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("invalid database url {}", url))?;

    Ok(options.with_regexp())
}

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Wrap an existing pool. Its connections must come from
    /// [`connect_options`] for text filters to work.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new database connection pool
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options(url)?)
            .await
            .with_context(|| format!("failed to connect to database at {}", url))?;

        Ok(Self { pool })
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Acquire a connection for the duration of one request
    pub async fn session(&self) -> Result<Session> {
        let conn = self
            .pool
            .acquire()
            .await
            .context("failed to acquire database connection")?;

        Ok(Session { conn })
    }

    /// Check the store answers a trivial query
    pub async fn ping(&self) -> bool {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Database ping failed");
                false
            }
        }
    }
}

/// A single pooled connection, released on drop
pub struct Session {
    conn: PoolConnection<Sqlite>,
}

impl Session {
    /// Get a book repository
    pub fn books(&mut self) -> BookRepository<'_> {
        BookRepository::new(&mut self.conn)
    }

    /// Get an author repository
    pub fn authors(&mut self) -> AuthorRepository<'_> {
        AuthorRepository::new(&mut self.conn)
    }

    /// Get a language repository
    pub fn languages(&mut self) -> LanguageRepository<'_> {
        LanguageRepository::new(&mut self.conn)
    }

    /// Get a subject repository
    pub fn subjects(&mut self) -> SubjectRepository<'_> {
        SubjectRepository::new(&mut self.conn)
    }
}
