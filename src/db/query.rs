//! SQL query builder for catalog listings
//!
//! Builds parameterized SELECT and COUNT statements over a [`CatalogEntity`]
//! from optional filters, an optional sort and a page request. The COUNT and
//! the page fetch share the same WHERE clause, so `total` always describes the
//! filtered set rather than the returned page.

use std::marker::PhantomData;

use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Sqlite, SqliteConnection};

use super::schema::{Association, CatalogEntity};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 25;
pub const MAX_LIMIT: i64 = 100;

/// Offset pagination parameters as received from the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> Self {
        Self { page, limit }
    }

    /// Rows to skip: `(page - 1) * limit`, never negative.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit).max(0)
    }

    /// Row cap handed to SQL. SQLite treats a negative LIMIT as unbounded,
    /// so negative requests are pinned to an empty page.
    fn sql_limit(&self) -> i64 {
        self.limit.max(0)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

/// One page of results together with the size of the filtered set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
}

impl SqlValue {
    pub fn bind_to_query<'q, O>(
        &'q self,
        query: sqlx::query::QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    ) -> sqlx::query::QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
        match self {
            SqlValue::Text(s) => query.bind(s.as_str()),
            SqlValue::Int(i) => query.bind(*i),
        }
    }

    pub fn bind_to_scalar<'q, O>(
        &'q self,
        query: sqlx::query::QueryScalar<'q, Sqlite, O, SqliteArguments<'q>>,
    ) -> sqlx::query::QueryScalar<'q, Sqlite, O, SqliteArguments<'q>> {
        match self {
            SqlValue::Text(s) => query.bind(s.as_str()),
            SqlValue::Int(i) => query.bind(*i),
        }
    }
}

/// How a text column is compared against a client-supplied value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextMatch {
    /// Case-insensitive substring
    Contains(String),
    /// Exact equality
    Exact(String),
}

impl TextMatch {
    /// Substring match, or `None` when the filter was not supplied or is empty.
    pub fn contains(text: Option<&str>) -> Option<Self> {
        text.filter(|t| !t.is_empty())
            .map(|t| TextMatch::Contains(t.to_string()))
    }

    /// Exact match, or `None` when the filter was not supplied or is empty.
    pub fn exact(text: Option<&str>) -> Option<Self> {
        text.filter(|t| !t.is_empty())
            .map(|t| TextMatch::Exact(t.to_string()))
    }

    fn to_condition(&self, column: &str) -> (String, SqlValue) {
        match self {
            TextMatch::Contains(text) => (
                format!("{} REGEXP ?", column),
                SqlValue::Text(contains_pattern(text)),
            ),
            TextMatch::Exact(text) => (format!("{} = ?", column), SqlValue::Text(text.clone())),
        }
    }
}

/// Case-insensitive substring pattern for `REGEXP`.
///
/// The client's text is escaped so it matches literally, and `(?i)` folds
/// case over all of Unicode, not just ASCII: `émile` finds "Émile".
/// Needs connections opened through [`super::connect_options`].
pub fn contains_pattern(text: &str) -> String {
    format!("(?i){}", regex::escape(text))
}

/// A query over one catalog table.
pub struct CatalogQuery<E: CatalogEntity> {
    _phantom: PhantomData<E>,
    where_clauses: Vec<String>,
    values: Vec<SqlValue>,
    order_by: Vec<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl<E> CatalogQuery<E>
where
    E: CatalogEntity + for<'r> sqlx::FromRow<'r, SqliteRow>,
{
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
            where_clauses: Vec::new(),
            values: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    fn column(name: &str) -> String {
        format!("{}.{}", E::ALIAS, name)
    }

    /// Constrain a column of the entity itself. `None` leaves the query as is.
    pub fn where_text(mut self, column: &str, filter: Option<TextMatch>) -> Self {
        if let Some(filter) = filter {
            let (condition, value) = filter.to_condition(&Self::column(column));
            self.where_clauses.push(condition);
            self.values.push(value);
        }
        self
    }

    /// Match by primary key.
    pub fn where_id(mut self, id: i64) -> Self {
        self.where_clauses.push(format!("{} = ?", Self::column("id")));
        self.values.push(SqlValue::Int(id));
        self
    }

    /// Require at least one associated row whose `column` matches.
    ///
    /// Written as a correlated EXISTS so a row with several matches is still
    /// returned, and counted, once.
    pub fn where_related(
        mut self,
        association: Association,
        column: &str,
        filter: Option<TextMatch>,
    ) -> Self {
        if let Some(filter) = filter {
            let (condition, value) = filter.to_condition(&format!("t.{}", column));
            self.where_clauses.push(format!(
                "EXISTS (SELECT 1 FROM {} j JOIN {} t ON t.id = j.{} WHERE j.{} = {} AND {})",
                association.table,
                association.target,
                association.target_key,
                association.book_key,
                Self::column("id"),
                condition
            ));
            self.values.push(value);
        }
        self
    }

    /// Sort descending on `column`; NULLs go last.
    pub fn order_by_desc(mut self, column: &str) -> Self {
        self.order_by
            .push(format!("{} DESC NULLS LAST", Self::column(column)));
        self
    }

    pub fn paginate(mut self, page: PageRequest) -> Self {
        self.limit = Some(page.sql_limit());
        self.offset = Some(page.offset());
        self
    }

    fn where_sql(&self) -> String {
        if self.where_clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.where_clauses.join(" AND "))
        }
    }

    /// Build the SELECT statement.
    fn build_sql(&self) -> String {
        let mut sql = E::select_sql();
        sql.push_str(&self.where_sql());

        // Primary key last so pages are stable across requests
        let mut order = self.order_by.clone();
        order.push(format!("{} ASC", Self::column("id")));
        sql.push_str(" ORDER BY ");
        sql.push_str(&order.join(", "));

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = self.offset
            && offset > 0
        {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        sql
    }

    /// Build the COUNT statement over the same predicate.
    fn build_count_sql(&self) -> String {
        let mut sql = E::count_sql();
        sql.push_str(&self.where_sql());
        sql
    }

    /// Count rows matching the filters, ignoring pagination.
    pub async fn count(&self, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
        let sql = self.build_count_sql();
        tracing::debug!(sql = %sql, "Executing count query");

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for value in &self.values {
            query = value.bind_to_scalar(query);
        }

        query.fetch_one(&mut *conn).await
    }

    pub async fn fetch_all(self, conn: &mut SqliteConnection) -> Result<Vec<E>, sqlx::Error> {
        let sql = self.build_sql();
        tracing::debug!(sql = %sql, "Executing catalog query");

        let mut query = sqlx::query_as::<_, E>(&sql);
        for value in &self.values {
            query = value.bind_to_query(query);
        }

        query.fetch_all(&mut *conn).await
    }

    pub async fn fetch_optional(
        self,
        conn: &mut SqliteConnection,
    ) -> Result<Option<E>, sqlx::Error> {
        let sql = self.build_sql();
        tracing::debug!(sql = %sql, "Executing catalog query (one)");

        let mut query = sqlx::query_as::<_, E>(&sql);
        for value in &self.values {
            query = value.bind_to_query(query);
        }

        query.fetch_optional(&mut *conn).await
    }

    /// Count the filtered set, then fetch the requested page of it.
    pub async fn fetch_page(
        self,
        conn: &mut SqliteConnection,
        page: PageRequest,
    ) -> Result<Page<E>, sqlx::Error> {
        let total = self.count(conn).await?;
        let items = self.paginate(page).fetch_all(conn).await?;

        Ok(Page {
            total,
            page: page.page,
            per_page: page.limit,
            items,
        })
    }
}

impl<E> Default for CatalogQuery<E>
where
    E: CatalogEntity + for<'r> sqlx::FromRow<'r, SqliteRow>,
{
    fn default() -> Self {
        Self::new()
    }
}
