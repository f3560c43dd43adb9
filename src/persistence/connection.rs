//! Per-request SQLite connections.
//!
//! Every request opens its own connection through [`Database::acquire`]
//! and gives it back through [`LeasedConnection::release`]. Connections are
//! never pooled or shared. A lease that is dropped without an explicit
//! release (a panicking handler, a cancelled request) is released by its
//! destructor instead, so each acquired connection is released exactly once.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};

use super::schema;
use crate::error::BlogError;

/// Counters for opened and closed connections.
#[derive(Debug, Default)]
pub struct ConnectionStats {
    acquired: AtomicU64,
    released: AtomicU64,
}

impl ConnectionStats {
    /// Total connections opened.
    #[must_use]
    pub fn acquired(&self) -> u64 {
        self.acquired.load(Ordering::SeqCst)
    }

    /// Total connections released.
    #[must_use]
    pub fn released(&self) -> u64 {
        self.released.load(Ordering::SeqCst)
    }

    /// Connections currently leased out.
    #[must_use]
    pub fn open(&self) -> u64 {
        self.acquired().saturating_sub(self.released())
    }
}

/// Connection factory for the entry store.
#[derive(Debug, Clone)]
pub struct Database {
    options: SqliteConnectOptions,
    stats: Arc<ConnectionStats>,
}

impl Database {
    /// Creates a factory from explicit connect options.
    #[must_use]
    pub fn new(options: SqliteConnectOptions) -> Self {
        Self {
            options,
            stats: Arc::new(ConnectionStats::default()),
        }
    }

    /// Creates a factory from a `sqlite:` URL. The database file is created
    /// on first connect if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Connection`] if the URL cannot be parsed.
    pub fn from_url(url: &str) -> Result<Self, BlogError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(BlogError::Connection)?
            .create_if_missing(true);
        Ok(Self::new(options))
    }

    /// Creates a factory for the database file at `path`.
    #[must_use]
    pub fn open(path: impl AsRef<Path>) -> Self {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        Self::new(options)
    }

    /// Returns the shared acquire/release counters.
    #[must_use]
    pub fn stats(&self) -> &Arc<ConnectionStats> {
        &self.stats
    }

    /// Opens a fresh connection.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Connection`] if the store is unreachable.
    pub async fn acquire(&self) -> Result<LeasedConnection, BlogError> {
        let conn = self
            .options
            .connect()
            .await
            .map_err(BlogError::Connection)?;
        self.stats.acquired.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("database connection acquired");
        Ok(LeasedConnection {
            conn: Some(conn),
            stats: Arc::clone(&self.stats),
        })
    }

    /// Creates the `entries` table if it does not exist.
    ///
    /// Administrative action: not meant to run alongside live traffic.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Connection`] if the store is unreachable, or
    /// [`BlogError::Store`] if the schema cannot be applied.
    pub async fn initialize(&self) -> Result<(), BlogError> {
        let mut lease = self.acquire().await?;
        let result = schema::init_db(lease.get_mut()?).await;
        lease.release().await;
        result
    }
}

/// A connection owned by exactly one request.
#[derive(Debug)]
pub struct LeasedConnection {
    conn: Option<SqliteConnection>,
    stats: Arc<ConnectionStats>,
}

impl LeasedConnection {
    /// Borrows the live connection.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Internal`] if the lease was already released.
    pub fn get_mut(&mut self) -> Result<&mut SqliteConnection, BlogError> {
        self.conn
            .as_mut()
            .ok_or_else(|| BlogError::Internal("database connection already released".into()))
    }

    /// Closes the connection. Close failures are logged and swallowed.
    pub async fn release(mut self) {
        if let Some(conn) = self.conn.take() {
            self.stats.released.fetch_add(1, Ordering::SeqCst);
            if let Err(err) = conn.close().await {
                tracing::warn!(error = %err, "failed to close database connection");
            } else {
                tracing::debug!("database connection released");
            }
        }
    }
}

impl Drop for LeasedConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.stats.released.fetch_add(1, Ordering::SeqCst);
            tracing::debug!("database connection released on drop");
            drop(conn);
        }
    }
}
