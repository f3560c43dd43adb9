//! Blog configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`), read once at process start.

use std::net::{AddrParseError, SocketAddr};

use tower_sessions::cookie::Key;

use crate::auth::Credentials;

/// Minimum length in bytes of `SECRET_KEY`.
pub const MIN_SECRET_KEY_LEN: usize = 64;

/// Configuration errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `LISTEN_ADDR` is set but is not a socket address.
    #[error("invalid LISTEN_ADDR: {0}")]
    InvalidListenAddr(#[from] AddrParseError),

    /// `SECRET_KEY` is set but too short to sign cookies.
    #[error("SECRET_KEY must be at least {MIN_SECRET_KEY_LEN} bytes, got {len}")]
    SecretKeyTooShort {
        /// Length of the supplied key.
        len: usize,
    },
}

/// Session cookie settings handed to the router.
#[derive(Clone)]
pub struct SessionSettings {
    /// Key used to sign the session cookie.
    pub key: Key,
    /// Whether the cookie carries the `Secure` attribute.
    pub secure: bool,
}

impl SessionSettings {
    /// Settings with a freshly generated signing key.
    #[must_use]
    pub fn ephemeral(secure: bool) -> Self {
        Self {
            key: Key::generate(),
            secure,
        }
    }
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

/// Top-level blog configuration.
///
/// Loaded once at startup via [`BlogConfig::from_env`].
#[derive(Clone)]
pub struct BlogConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// SQLite connection string for the entry store.
    pub database_url: String,

    /// Username accepted by the login form.
    pub username: String,

    /// Password accepted by the login form.
    pub password: String,

    /// Session signing secret. Generated per process when unset.
    pub secret_key: Option<String>,

    /// Mark the session cookie `Secure` (HTTPS only).
    pub session_secure_cookie: bool,
}

impl BlogConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidListenAddr`] if `LISTEN_ADDR` is set
    /// but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup, falling back to
    /// defaults for missing keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidListenAddr`] on an unparsable address.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let listen_addr: SocketAddr = lookup("LISTEN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:5000".to_string())
            .parse()?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite:microblog.db".to_string());
        let username = lookup("BLOG_USERNAME").unwrap_or_else(|| "admin".to_string());
        let password = lookup("BLOG_PASSWORD").unwrap_or_else(|| "default".to_string());
        let secret_key = lookup("SECRET_KEY").filter(|k| !k.is_empty());
        let session_secure_cookie = parse_bool(lookup("SESSION_SECURE_COOKIE").as_deref(), false);

        Ok(Self {
            listen_addr,
            database_url,
            username,
            password,
            secret_key,
            session_secure_cookie,
        })
    }

    /// The login credentials.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    /// Session cookie settings derived from `SECRET_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SecretKeyTooShort`] if the key is shorter than
    /// [`MIN_SECRET_KEY_LEN`] bytes.
    pub fn session_settings(&self) -> Result<SessionSettings, ConfigError> {
        let Some(secret) = &self.secret_key else {
            tracing::warn!("SECRET_KEY not set; sessions will not survive a restart");
            return Ok(SessionSettings::ephemeral(self.session_secure_cookie));
        };
        let len = secret.len();
        if len < MIN_SECRET_KEY_LEN {
            return Err(ConfigError::SecretKeyTooShort { len });
        }
        let key =
            Key::try_from(secret.as_bytes()).map_err(|_| ConfigError::SecretKeyTooShort { len })?;
        Ok(SessionSettings {
            key,
            secure: self.session_secure_cookie,
        })
    }
}

impl std::fmt::Debug for BlogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogConfig")
            .field("listen_addr", &self.listen_addr)
            .field("database_url", &self.database_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("session_secure_cookie", &self.session_secure_cookie)
            .finish()
    }
}

/// Parses a boolean setting. Accepts `"true"`, `"1"`, `"false"`, `"0"`
/// (case-insensitive). Returns `default` otherwise.
fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
