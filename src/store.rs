//! In-memory prompt collection and selection pointer
//!
//! [`PromptStore`] is the source of truth the list and editor render from.
//! It never touches storage on its own; [`PromptStore::load`] and
//! [`PromptStore::persist`] take the adapter explicitly so mutations can be
//! applied first and written afterwards.

use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, warn};

use crate::markup;
use crate::prompt::{generate_id, or_placeholder, Prompt, NO_CONTENT, UNTITLED};
use crate::storage::Storage;

/// Reasons a save is rejected before anything changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("The title cannot be empty.")]
    EmptyTitle,
    #[error("The content cannot be empty.")]
    EmptyContent,
}

/// What a successful [`PromptStore::save`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new prompt was inserted at the front and selected
    Created(String),
    /// The selected prompt was updated in place
    Updated(String),
    /// The selection points at a prompt that no longer exists; nothing changed
    Stale(String),
}

impl SaveOutcome {
    pub fn id(&self) -> &str {
        match self {
            SaveOutcome::Created(id) | SaveOutcome::Updated(id) | SaveOutcome::Stale(id) => id,
        }
    }

    /// True when the collection changed and should be persisted
    pub fn is_mutation(&self) -> bool {
        !matches!(self, SaveOutcome::Stale(_))
    }
}

/// Ordered prompt collection, newest first
#[derive(Debug, Clone, Default)]
pub struct PromptStore {
    prompts: Vec<Prompt>,
    selected: Option<String>,
}

impl PromptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an existing collection
    ///
    /// Later records reusing an id already seen are dropped.
    pub fn from_prompts(prompts: Vec<Prompt>) -> Self {
        let mut seen = HashSet::new();
        let total = prompts.len();
        let prompts: Vec<Prompt> = prompts
            .into_iter()
            .filter(|p| seen.insert(p.id.clone()))
            .collect();

        if prompts.len() != total {
            warn!(
                dropped = total - prompts.len(),
                "Dropped prompts with duplicate ids"
            );
        }

        Self {
            prompts,
            selected: None,
        }
    }

    /// Load the persisted collection
    ///
    /// Missing or unreadable data yields an empty store. Failures are logged,
    /// never returned.
    pub fn load(storage: &Storage) -> Self {
        match storage.load_collection() {
            Ok(prompts) => {
                debug!(count = prompts.len(), "Loaded prompt collection");
                Self::from_prompts(prompts)
            }
            Err(e) => {
                warn!(error = %e, "Could not load prompt collection, starting empty");
                Self::new()
            }
        }
    }

    /// Write the collection; returns false when the write failed
    pub fn persist(&self, storage: &mut Storage) -> bool {
        match storage.save_collection(&self.prompts) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Could not persist prompt collection");
                false
            }
        }
    }

    /// Commit a title and content
    ///
    /// Both the trimmed title and the trimmed plain text of the content must
    /// be non-empty. With a selection the selected prompt is updated, without
    /// one a new prompt is inserted at the front and becomes the selection.
    pub fn save(&mut self, title: &str, content: &str) -> Result<SaveOutcome, ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if markup::is_blank(content) {
            return Err(ValidationError::EmptyContent);
        }

        let title = or_placeholder(title, UNTITLED);
        let content = or_placeholder(content, NO_CONTENT);

        if let Some(selected) = self.selected.clone() {
            return Ok(match self.prompts.iter_mut().find(|p| p.id == selected) {
                Some(existing) => {
                    existing.title = title;
                    existing.content = content;
                    SaveOutcome::Updated(selected)
                }
                None => {
                    debug!(id = %selected, "Save skipped, selection is stale");
                    SaveOutcome::Stale(selected)
                }
            });
        }

        let mut prompt = Prompt::new(title, content);
        while self.contains(&prompt.id) {
            prompt.id = generate_id();
        }

        let id = prompt.id.clone();
        self.prompts.insert(0, prompt);
        self.selected = Some(id.clone());
        Ok(SaveOutcome::Created(id))
    }

    /// Delete the prompt with `id`; true if one was removed
    ///
    /// Removing the selected prompt clears the selection.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.prompts.len();
        self.prompts.retain(|p| p.id != id);

        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.prompts.len() != before
    }

    /// Point the selection at `id` and return the prompt if it exists
    pub fn select(&mut self, id: &str) -> Option<&Prompt> {
        self.selected = Some(id.to_string());
        self.prompts.iter().find(|p| p.id == id)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The selected prompt, `None` without a selection or when it is stale
    pub fn selected(&self) -> Option<&Prompt> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &str) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Find the id for an exact id or an unambiguous id prefix
    pub fn resolve_id(&self, query: &str) -> Option<&str> {
        if let Some(prompt) = self.get(query) {
            return Some(&prompt.id);
        }
        if query.is_empty() {
            return None;
        }

        let mut matches = self.prompts.iter().filter(|p| p.id.starts_with(query));
        match (matches.next(), matches.next()) {
            (Some(prompt), None) => Some(&prompt.id),
            _ => None,
        }
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}
