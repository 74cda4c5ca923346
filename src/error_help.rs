//! Error helper module for user-friendly error messages
//!
//! Formats command line errors with suggestions so a mistyped id or command
//! points the user at what they probably meant.

use colored::*;
use fuzzy_matcher::{skim::SkimMatcherV2, FuzzyMatcher};

use crate::render::ListRow;

/// Format a "prompt not found" error, suggesting prompts by id or title
pub fn format_prompt_not_found(query: &str, rows: &[ListRow]) -> String {
    let mut message = format!("Error: No prompt with id '{}'\n\n", query)
        .red()
        .to_string();

    let matcher = SkimMatcherV2::default();
    let mut suggestions: Vec<(&ListRow, i64)> = rows
        .iter()
        .filter_map(|row| {
            let by_id = matcher.fuzzy_match(&row.id, query);
            let by_title = matcher.fuzzy_match(&row.title, query);
            by_id.max(by_title).map(|score| (row, score))
        })
        .collect();

    suggestions.sort_by(|a, b| b.1.cmp(&a.1));

    if !suggestions.is_empty() {
        message.push_str(&"Did you mean one of these?\n".yellow().to_string());
        for (row, _) in suggestions.iter().take(3) {
            message.push_str(&format!("  {}  {}\n", short(&row.id).dimmed(), row.title));
        }
        message.push('\n');
    }

    message.push_str(&format!(
        "Try '{}' to see all prompts or '{}' to filter by title.\n",
        "promptpad ls".cyan(),
        format!("promptpad ls {}", query).cyan()
    ));

    message
}

/// Format a command typo error with suggestions
pub fn format_command_typo(command: &str, available_commands: &[&str]) -> String {
    let mut message = format!("Error: Unknown command '{}'\n\n", command)
        .red()
        .to_string();

    let matcher = SkimMatcherV2::default();
    let mut suggestions: Vec<(&str, i64)> = available_commands
        .iter()
        .filter_map(|&cmd| matcher.fuzzy_match(cmd, command).map(|score| (cmd, score)))
        .collect();

    suggestions.sort_by(|a, b| b.1.cmp(&a.1));

    if let Some((best, score)) = suggestions.first() {
        if *score > 20 {
            message.push_str(&format!("Did you mean '{}'?\n\n", best).yellow().to_string());
        }
    }

    message.push_str("Available commands:\n");
    for cmd in available_commands {
        message.push_str(&format!("  {}\n", cmd));
    }

    message.push_str(&format!(
        "\nRun '{}' for more information\n",
        "promptpad --help".cyan()
    ));

    message
}

fn short(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
