//! Session keys for the login flag and one-shot flash messages.
//!
//! The session itself (cookie, signing, storage) belongs to
//! `tower-sessions`; this module only reads and writes two keys.

use tower_sessions::Session;

use crate::error::BlogError;

/// Key of the boolean login flag.
pub const LOGIN_KEY: &str = "login";

/// Key of the pending flash messages.
pub const FLASH_KEY: &str = "_flashes";

/// Returns whether the session carries the login flag.
///
/// # Errors
///
/// Returns [`BlogError::Session`] if the session cannot be loaded.
pub async fn is_logged_in(session: &Session) -> Result<bool, BlogError> {
    Ok(session.get::<bool>(LOGIN_KEY).await?.unwrap_or(false))
}

/// Marks the session as logged in. The session id is rotated first.
///
/// # Errors
///
/// Returns [`BlogError::Session`] if the session cannot be updated.
pub async fn log_in(session: &Session) -> Result<(), BlogError> {
    session.cycle_id().await?;
    session.insert(LOGIN_KEY, true).await?;
    Ok(())
}

/// Clears the login flag. Calling it on a logged-out session is a no-op.
///
/// # Errors
///
/// Returns [`BlogError::Session`] if the session cannot be updated.
pub async fn log_out(session: &Session) -> Result<(), BlogError> {
    session.remove::<bool>(LOGIN_KEY).await?;
    Ok(())
}

/// Queues a message for the next rendered page.
///
/// # Errors
///
/// Returns [`BlogError::Session`] if the session cannot be updated.
pub async fn flash(session: &Session, message: impl Into<String>) -> Result<(), BlogError> {
    let mut messages = session
        .get::<Vec<String>>(FLASH_KEY)
        .await?
        .unwrap_or_default();
    messages.push(message.into());
    session.insert(FLASH_KEY, messages).await?;
    Ok(())
}

/// Drains queued messages, oldest first.
///
/// # Errors
///
/// Returns [`BlogError::Session`] if the session cannot be updated.
pub async fn take_flashes(session: &Session) -> Result<Vec<String>, BlogError> {
    Ok(session
        .remove::<Vec<String>>(FLASH_KEY)
        .await?
        .unwrap_or_default())
}
