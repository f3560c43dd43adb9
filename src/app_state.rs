//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::Credentials;
use crate::persistence::Database;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
///
/// Holds the connection factory, not a connection: each request opens its
/// own connection in the connection-scope middleware.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Factory for per-request entry store connections.
    pub database: Database,
    /// Credentials accepted by the login form.
    pub credentials: Arc<Credentials>,
}

impl AppState {
    /// Creates the application state.
    #[must_use]
    pub fn new(database: Database, credentials: Credentials) -> Self {
        Self {
            database,
            credentials: Arc::new(credentials),
        }
    }
}
