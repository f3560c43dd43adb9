//! Request-scoped connection middleware.
//!
//! [`connection_scope`] runs around every routed handler: it opens the
//! request's connection before the handler, binds it to the request as a
//! [`RequestConnection`], and releases it once the handler's response is
//! built. If the store is unreachable the handler never runs.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::{Mutex, MutexGuard};

use crate::app_state::AppState;
use crate::error::BlogError;
use crate::persistence::LeasedConnection;

/// The current request's connection, extracted by handlers.
#[derive(Debug, Clone)]
pub struct RequestConnection(Arc<Mutex<LeasedConnection>>);

impl RequestConnection {
    fn new(lease: LeasedConnection) -> Self {
        Self(Arc::new(Mutex::new(lease)))
    }

    /// Locks the connection for the duration of a statement batch.
    pub async fn lock(&self) -> MutexGuard<'_, LeasedConnection> {
        self.0.lock().await
    }

    async fn release(self) {
        match Arc::try_unwrap(self.0) {
            Ok(lease) => lease.into_inner().release().await,
            // the last holder's drop releases it
            Err(_) => tracing::warn!("request connection still shared after handler"),
        }
    }
}

impl<S> FromRequestParts<S> for RequestConnection
where
    S: Send + Sync,
{
    type Rejection = BlogError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| BlogError::Internal("no database connection bound to request".into()))
    }
}

/// Acquires a connection, runs the handler, then releases the connection.
///
/// # Errors
///
/// Returns [`BlogError::Connection`] when the store cannot be opened; the
/// handler is not invoked in that case.
pub async fn connection_scope(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, BlogError> {
    let conn = RequestConnection::new(state.database.acquire().await?);
    request.extensions_mut().insert(conn.clone());

    let response = next.run(request).await;

    conn.release().await;
    Ok(response)
}
