//! The configured author's credentials.

use std::fmt;

/// Why a login attempt was refused. The `Display` text is shown on the
/// login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    /// Submitted username does not match.
    #[error("Invalid username")]
    InvalidUsername,
    /// Username matched but the password does not.
    #[error("Invalid password")]
    InvalidPassword,
}

/// Username and password loaded from configuration.
///
/// Compared exactly and case-sensitively. No hashing.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The configured username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Checks a submitted pair. The username is checked first; a missing
    /// field counts as a mismatch.
    ///
    /// # Errors
    ///
    /// Returns the first [`LoginError`] encountered.
    pub fn verify(&self, username: Option<&str>, password: Option<&str>) -> Result<(), LoginError> {
        if username != Some(self.username.as_str()) {
            return Err(LoginError::InvalidUsername);
        }
        if password != Some(self.password.as_str()) {
            return Err(LoginError::InvalidPassword);
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
