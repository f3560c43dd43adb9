//! Entry store schema.

use sqlx::Connection;
use sqlx::sqlite::SqliteConnection;

use crate::error::BlogError;

/// DDL for the `entries` table, shipped as `schema.sql` at the crate root.
pub const SCHEMA: &str = include_str!("../../schema.sql");

/// Applies [`SCHEMA`] inside a transaction and commits it.
///
/// Safe to run more than once; the table is only created if missing.
///
/// # Errors
///
/// Returns [`BlogError::Store`] if the statement or the commit fails.
pub async fn init_db(conn: &mut SqliteConnection) -> Result<(), BlogError> {
    let mut tx = conn.begin().await?;
    sqlx::raw_sql(SCHEMA).execute(&mut *tx).await?;
    tx.commit().await?;
    tracing::info!("entries table ready");
    Ok(())
}
