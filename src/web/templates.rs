//! Askama page templates.

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use crate::error::BlogError;
use crate::persistence::Entry;

/// Entry list, newest first, with the add form for the logged-in author.
#[derive(Debug, Template)]
#[template(path = "show_entries.html")]
pub struct ShowEntriesTemplate {
    /// Entries in display order.
    pub entries: Vec<Entry>,
    /// Whether the viewer is logged in.
    pub logged_in: bool,
    /// Pending flash messages.
    pub flashes: Vec<String>,
}

/// Login form with an optional error line.
#[derive(Debug, Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    /// Reason the last attempt failed.
    pub error: Option<String>,
    /// Whether the viewer is logged in.
    pub logged_in: bool,
    /// Pending flash messages.
    pub flashes: Vec<String>,
}

/// Wrapper to render Askama templates as Axum responses.
#[derive(Debug)]
pub struct HtmlTemplate<T>(pub T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(rendered) => Html(rendered).into_response(),
            Err(err) => BlogError::from(err).into_response(),
        }
    }
}
