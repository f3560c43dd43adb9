//! Login and logout handlers.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Router};
use tower_sessions::Session;

use super::redirect_to_entries;
use crate::app_state::AppState;
use crate::auth;
use crate::error::BlogError;
use crate::web::forms::LoginForm;
use crate::web::templates::{HtmlTemplate, LoginTemplate};

/// `GET /login` — Show the login form.
///
/// # Errors
///
/// Returns [`BlogError::Session`] if the session cannot be read.
#[utoipa::path(
    get,
    path = "/login",
    tag = "Auth",
    summary = "Login form",
    responses(
        (status = 200, description = "Rendered login form", content_type = "text/html", body = String),
    )
)]
pub async fn login_form(session: Session) -> Result<impl IntoResponse, BlogError> {
    render_login(&session, None).await
}

/// `POST /login` — Check credentials and log the session in.
///
/// On a mismatch the form is rendered again with `Invalid username` or
/// `Invalid password`.
///
/// # Errors
///
/// Returns [`BlogError::Session`] if the session cannot be updated.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    summary = "Log in",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Logged in; redirect to the list"),
        (status = 200, description = "Credentials rejected; form with error", content_type = "text/html", body = String),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, BlogError> {
    match state
        .credentials
        .verify(form.username.as_deref(), form.password.as_deref())
    {
        Ok(()) => {
            auth::log_in(&session).await?;
            auth::flash(&session, "You were logged in").await?;
            tracing::info!(username = state.credentials.username(), "author logged in");
            Ok(redirect_to_entries())
        }
        Err(err) => {
            tracing::warn!(reason = %err, "login refused");
            Ok(render_login(&session, Some(err.to_string()))
                .await?
                .into_response())
        }
    }
}

/// `GET /logout` — Clear the login flag.
///
/// # Errors
///
/// Returns [`BlogError::Session`] if the session cannot be updated.
#[utoipa::path(
    get,
    path = "/logout",
    tag = "Auth",
    summary = "Log out",
    responses(
        (status = 302, description = "Logged out; redirect to the list"),
    )
)]
pub async fn logout(session: Session) -> Result<Response, BlogError> {
    auth::log_out(&session).await?;
    auth::flash(&session, "You were logged out").await?;
    tracing::info!("author logged out");
    Ok(redirect_to_entries())
}

async fn render_login(
    session: &Session,
    error: Option<String>,
) -> Result<HtmlTemplate<LoginTemplate>, BlogError> {
    Ok(HtmlTemplate(LoginTemplate {
        error,
        logged_in: auth::is_logged_in(session).await?,
        flashes: auth::take_flashes(session).await?,
    }))
}

/// Login routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}
