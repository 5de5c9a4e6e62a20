//! Database connection and query execution.

use crate::{Row, StoreError, Value};
use rusqlite::{params_from_iter, Connection, Transaction};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite database connection.
///
/// The connection sits behind a mutex so the handle can be shared across
/// tasks. Every call holds the lock for the duration of one statement (or
/// one transaction).
pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    /// Open (or create) a database file.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let db = Db::open("data/shelf.db")?;
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Unavailable(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let unavailable = |e: rusqlite::Error| {
            StoreError::Unavailable(format!("cannot open {}: {}", path.display(), e))
        };
        let conn = Connection::open(path).map_err(unavailable)?;
        // SQLite opens lazily; touch the file so a bad path fails here.
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(unavailable)?;

        tracing::debug!(path = %path.display(), "opened sqlite database");
        Ok(Self::from_connection(conn))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("database connection lock poisoned".to_string()))
    }

    /// Execute several statements separated by semicolons.
    ///
    /// Used for schema setup.
    pub fn execute_batch(&self, sql: &str) -> Result<(), StoreError> {
        self.lock()?
            .execute_batch(sql)
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    /// Execute a SQL statement that doesn't return rows.
    ///
    /// Returns the number of rows changed.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// db.execute(
    ///     "UPDATE listings SET sold = ? WHERE url = ?",
    ///     params![12, "https://shop/item"]
    /// )?;
    /// ```
    pub fn execute(&self, sql: &str, params: &[Value]) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        execute_on(&conn, sql, params)
    }

    /// Execute a SQL query and return its rows.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let rows = db.query("SELECT * FROM listings WHERE sold > ?", params![100])?;
    /// for row in &rows {
    ///     println!("{:?}", row.opt_text("title"));
    /// }
    /// ```
    pub fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StoreError> {
        let conn = self.lock()?;
        tracing::debug!(sql, params = params.len(), "query");

        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query(params_from_iter(params.iter()))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let values = (0..columns.len())
                .map(|i| row.get_ref(i).map(Value::from))
                .collect::<Result<Vec<_>, _>>()?;
            out.push(Row::new(columns.clone(), values));
        }
        Ok(out)
    }

    /// Execute a SQL query and return an optional single row.
    pub fn query_optional(&self, sql: &str, params: &[Value]) -> Result<Option<Row>, StoreError> {
        Ok(self.query(sql, params)?.into_iter().next())
    }

    /// Execute a query whose first column of the first row is an integer,
    /// such as `SELECT COUNT(*)`.
    pub fn query_scalar(&self, sql: &str, params: &[Value]) -> Result<i64, StoreError> {
        let conn = self.lock()?;
        tracing::debug!(sql, params = params.len(), "query scalar");
        Ok(conn.query_row(sql, params_from_iter(params.iter()), |row| row.get(0))?)
    }

    /// Run `f` inside a transaction. Commits when `f` succeeds, rolls back
    /// when it fails.
    pub fn transaction<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, StoreError>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }
}

/// Execute one statement on a connection or transaction.
pub(crate) fn execute_on(conn: &Connection, sql: &str, params: &[Value]) -> Result<usize, StoreError> {
    tracing::debug!(sql, params = params.len(), "execute");
    Ok(conn.execute(sql, params_from_iter(params.iter()))?)
}
