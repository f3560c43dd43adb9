//! Submitted HTML form bodies.
//!
//! Fields are optional so that missing values reach the handlers and are
//! reported as validation or login errors rather than extractor rejections.

use std::fmt;

use serde::Deserialize;
use utoipa::ToSchema;

/// `POST /add` form body.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AddEntryForm {
    /// Entry title.
    pub title: Option<String>,
    /// Entry body.
    pub text: Option<String>,
}

/// `POST /login` form body.
#[derive(Clone, Default, Deserialize, ToSchema)]
pub struct LoginForm {
    /// Submitted username.
    pub username: Option<String>,
    /// Submitted password.
    pub password: Option<String>,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
