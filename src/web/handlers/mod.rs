//! HTTP endpoint handlers organized by resource.

pub mod entries;
pub mod login;
pub mod system;

use axum::Router;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use crate::app_state::AppState;

/// Composes all page and system routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(entries::routes())
        .merge(login::routes())
        .merge(system::routes())
}

/// `302 Found` back to the entry list.
pub(crate) fn redirect_to_entries() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}
