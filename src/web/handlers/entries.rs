//! Entry handlers: list and add.

use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use tower_sessions::Session;

use super::redirect_to_entries;
use crate::app_state::AppState;
use crate::auth;
use crate::error::BlogError;
use crate::persistence::{EntryStore, NewEntry};
use crate::web::forms::AddEntryForm;
use crate::web::middleware::RequestConnection;
use crate::web::templates::{HtmlTemplate, ShowEntriesTemplate};

/// `GET /` — Show all entries, newest first.
///
/// # Errors
///
/// Returns [`BlogError`] if the store or session cannot be read.
#[utoipa::path(
    get,
    path = "/",
    tag = "Entries",
    summary = "List entries",
    description = "Renders every entry ordered by id descending. Logged-in authors also get the add form.",
    responses(
        (status = 200, description = "Rendered entry list", content_type = "text/html", body = String),
        (status = 503, description = "Entry store unavailable"),
    )
)]
pub async fn show_entries(
    session: Session,
    db: RequestConnection,
) -> Result<impl IntoResponse, BlogError> {
    let entries = {
        let mut lease = db.lock().await;
        EntryStore::new(lease.get_mut()?).list().await?
    };
    let logged_in = auth::is_logged_in(&session).await?;
    let flashes = auth::take_flashes(&session).await?;

    Ok(HtmlTemplate(ShowEntriesTemplate {
        entries,
        logged_in,
        flashes,
    }))
}

/// `POST /add` — Post a new entry.
///
/// The login check runs before the body is looked at, so an anonymous
/// caller always gets 401 regardless of what was submitted.
///
/// # Errors
///
/// Returns [`BlogError::Unauthorized`] without a login,
/// [`BlogError::Validation`] for a missing title or text,
/// [`BlogError::PayloadTooLarge`] if a body limit rejects the form, and
/// [`BlogError::Store`] if the insert fails.
#[utoipa::path(
    post,
    path = "/add",
    tag = "Entries",
    summary = "Add an entry",
    description = "Inserts one entry and commits it. Requires a logged-in session.",
    request_body(content = AddEntryForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Entry stored; redirect to the list"),
        (status = 400, description = "Title or text missing"),
        (status = 401, description = "Not logged in"),
        (status = 413, description = "Body rejected by a size limit"),
    )
)]
pub async fn add_entry(
    session: Session,
    db: RequestConnection,
    form: Result<Form<AddEntryForm>, FormRejection>,
) -> Result<Response, BlogError> {
    if !auth::is_logged_in(&session).await? {
        tracing::warn!("entry rejected: session not logged in");
        return Err(BlogError::Unauthorized);
    }

    let Form(form) = form.map_err(form_rejection)?;
    let entry = NewEntry::new(form.title, form.text)?;

    let id = {
        let mut lease = db.lock().await;
        EntryStore::new(lease.get_mut()?).insert(&entry).await?
    };
    tracing::info!(id, "entry added");

    auth::flash(&session, "New entry was successfully posted").await?;
    Ok(redirect_to_entries())
}

/// Maps a rejected form body: an over-limit body is 413, anything else 400.
fn form_rejection(rejection: FormRejection) -> BlogError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        BlogError::PayloadTooLarge
    } else {
        BlogError::Validation(rejection.body_text())
    }
}

/// Entry routes. Entry text has no length cap, so `/add` lifts the
/// default body limit.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(show_entries))
        .route("/add", post(add_entry).layer(DefaultBodyLimit::disable()))
}
