//! The prompt record, the only persisted entity

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::markup;

/// Title used when a saved title trims down to nothing
pub const UNTITLED: &str = "Untitled";
/// Content used when saved content trims down to nothing
pub const NO_CONTENT: &str = "No content";

/// A user-authored title and content pair
///
/// Serialized as `{ "id": ..., "title": ..., "content": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// Opaque identifier assigned at creation, never changed afterwards
    pub id: String,
    /// Plain text title used for display and filtering
    pub title: String,
    /// Content with any markup kept verbatim
    pub content: String,
}

impl Prompt {
    /// Create a prompt with a freshly generated id
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            title: title.into(),
            content: content.into(),
        }
    }

    /// Content reduced to plain text, used as the secondary line in lists
    pub fn description(&self) -> String {
        markup::plain_text(&self.content)
    }

    /// First eight characters of the id, enough to address it from the CLI
    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }
}

/// Generate a new opaque prompt id
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Trimmed value, or the placeholder when nothing is left
pub(crate) fn or_placeholder(value: &str, placeholder: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        placeholder.to_string()
    } else {
        trimmed.to_string()
    }
}
