//! List projection of the prompt collection

use serde::Serialize;

use crate::prompt::Prompt;

/// One line of the prompt list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRow {
    pub id: String,
    /// Title exactly as stored
    pub title: String,
    /// Content reduced to plain text
    pub description: String,
}

impl From<&Prompt> for ListRow {
    fn from(prompt: &Prompt) -> Self {
        Self {
            id: prompt.id.clone(),
            title: prompt.title.clone(),
            description: prompt.description(),
        }
    }
}

/// Rows for every prompt whose title contains `filter_text`
///
/// Matching is case-insensitive against the trimmed filter. Store order is
/// kept, an empty filter returns every prompt.
pub fn render(prompts: &[Prompt], filter_text: &str) -> Vec<ListRow> {
    let needle = filter_text.trim().to_lowercase();
    prompts
        .iter()
        .filter(|p| title_matches(&p.title, &needle))
        .map(ListRow::from)
        .collect()
}

/// `needle` must already be trimmed and lowercased
pub fn title_matches(title: &str, needle: &str) -> bool {
    needle.is_empty() || title.to_lowercase().contains(needle)
}
