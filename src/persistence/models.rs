//! Entry models: stored rows and validated input.

use crate::error::BlogError;

/// A stored row from the `entries` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Store-assigned row ID, strictly increasing in creation order.
    pub id: i64,
    /// Entry title.
    pub title: String,
    /// Entry body.
    pub text: String,
}

/// A validated title/text pair ready to be inserted.
///
/// Both fields are required and must contain something other than
/// whitespace. Values are stored exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    title: String,
    text: String,
}

impl NewEntry {
    /// Validates submitted form fields.
    ///
    /// # Errors
    ///
    /// Returns [`BlogError::Validation`] if either field is missing or blank.
    pub fn new(title: Option<String>, text: Option<String>) -> Result<Self, BlogError> {
        let title = required("title", title)?;
        let text = required("text", text)?;
        Ok(Self { title, text })
    }

    /// Entry title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Entry body.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

fn required(field: &str, value: Option<String>) -> Result<String, BlogError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(BlogError::Validation(format!("{field} is required"))),
    }
}
