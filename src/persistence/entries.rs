//! Entry statements against a request's connection.

use sqlx::Connection;
use sqlx::sqlite::SqliteConnection;

use super::models::{Entry, NewEntry};
use crate::error::BlogError;

/// Entry store bound to one borrowed connection.
///
/// Holds no state of its own; it lives only as long as the handler that
/// borrowed the request's connection.
#[derive(Debug)]
pub struct EntryStore<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> EntryStore<'c> {
    /// Wraps a live connection.
    #[must_use]
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Loads every entry, newest (highest `id`) first.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Store`] on database failure.
    pub async fn list(&mut self) -> Result<Vec<Entry>, BlogError> {
        let rows = sqlx::query_as::<_, (i64, String, String)>(
            "SELECT id, title, text FROM entries ORDER BY id DESC",
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, title, text)| Entry { id, title, text })
            .collect())
    }

    /// Inserts one entry and commits before returning its new `id`.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Store`] on database failure; nothing is written
    /// in that case.
    pub async fn insert(&mut self, entry: &NewEntry) -> Result<i64, BlogError> {
        let mut tx = self.conn.begin().await?;
        let result = sqlx::query("INSERT INTO entries (title, text) VALUES (?, ?)")
            .bind(entry.title())
            .bind(entry.text())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(result.last_insert_rowid())
    }

    /// Counts stored entries.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Store`] on database failure.
    pub async fn count(&mut self) -> Result<i64, BlogError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM entries")
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(count)
    }
}
