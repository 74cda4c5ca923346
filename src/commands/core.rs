// Prompt commands run from the command line: ls, show, new, edit, rm, copy
//
// Every handler drives the same `Command`s the terminal UI dispatches, so
// validation, persistence and notices behave identically in both.

use anyhow::{bail, Result};
use colored::*;
use std::io::Write;

use crate::app::{App, Command};
use crate::error_help;
use crate::markup;
use crate::render::render;

/// Resolve an id or id prefix, or fail with suggestions
fn resolve_id(app: &App, query: &str) -> Result<String> {
    match app.store().resolve_id(query) {
        Some(id) => Ok(id.to_string()),
        None => bail!(error_help::format_prompt_not_found(
            query,
            &render(app.store().prompts(), "")
        )),
    }
}

/// Dispatch a save and turn an error notice into an error
fn commit(app: &mut App) -> Result<String> {
    app.dispatch(Command::Save);
    match app.take_notice() {
        Some(notice) if notice.is_error() => bail!(notice.message),
        _ => Ok(app.store().selected_id().unwrap_or_default().to_string()),
    }
}

pub fn handle_ls(app: &mut App, filter: Option<&str>, json: bool, out: &mut dyn Write) -> Result<()> {
    app.dispatch(Command::SetFilter(filter.unwrap_or_default().to_string()));
    let rows = app.rows();

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
        return Ok(());
    }

    if rows.is_empty() {
        if app.store().is_empty() {
            writeln!(out, "No prompts yet. Create one with 'promptpad new TITLE CONTENT'.")?;
        } else {
            writeln!(out, "No prompt titles match '{}'.", app.filter().trim())?;
        }
        return Ok(());
    }

    for row in rows {
        let short_id = row.id.get(..8).unwrap_or(&row.id);
        let description = row.description.lines().next().unwrap_or_default();
        writeln!(
            out,
            "{}  {:<24} {}",
            short_id.dimmed(),
            row.title.bold(),
            description.dimmed()
        )?;
    }
    Ok(())
}

pub fn handle_show(app: &mut App, id: &str, plain: bool, out: &mut dyn Write) -> Result<()> {
    let id = resolve_id(app, id)?;
    app.dispatch(Command::Select(id));

    let editor = app.editor();
    writeln!(out, "{}", editor.title.text().bold())?;
    writeln!(out)?;
    if plain {
        writeln!(out, "{}", markup::rendered_text(editor.content.text()))?;
    } else {
        writeln!(out, "{}", editor.content.text())?;
    }
    Ok(())
}

pub fn handle_new(app: &mut App, title: &str, content: &str, out: &mut dyn Write) -> Result<()> {
    app.dispatch(Command::New);
    app.dispatch(Command::SetTitle(title.to_string()));
    app.dispatch(Command::SetContent(content.to_string()));

    let id = commit(app)?;
    writeln!(out, "{} Created prompt {}", "✓".green(), id)?;
    Ok(())
}

pub fn handle_edit(
    app: &mut App,
    id: &str,
    title: Option<&str>,
    content: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    if title.is_none() && content.is_none() {
        bail!("Nothing to change. Pass --title and/or --content.");
    }

    let id = resolve_id(app, id)?;
    app.dispatch(Command::Select(id.clone()));
    if let Some(title) = title {
        app.dispatch(Command::SetTitle(title.to_string()));
    }
    if let Some(content) = content {
        app.dispatch(Command::SetContent(content.to_string()));
    }

    commit(app)?;
    writeln!(out, "{} Updated prompt {}", "✓".green(), id)?;
    Ok(())
}

pub fn handle_rm(app: &mut App, id: &str, out: &mut dyn Write) -> Result<()> {
    // Removing an unknown id is a no-op, not an error
    let Some(id) = app.store().resolve_id(id).map(str::to_string) else {
        writeln!(out, "No prompt with id '{}', nothing removed.", id)?;
        return Ok(());
    };

    app.dispatch(Command::Remove(id.clone()));
    writeln!(out, "{} Removed prompt {}", "✓".green(), id)?;
    Ok(())
}

pub fn handle_copy(app: &mut App, id: &str, is_tty: bool, out: &mut dyn Write) -> Result<()> {
    let id = resolve_id(app, id)?;
    app.dispatch(Command::Select(id));

    if !is_tty {
        // Output is piped, write the text instead of touching the clipboard
        write!(out, "{}", markup::rendered_text(app.editor().content.text()))?;
        return Ok(());
    }

    app.dispatch(Command::Copy);
    match app.take_notice() {
        Some(notice) if notice.is_error() => bail!(notice.message),
        Some(notice) => writeln!(out, "{} {}", "✓".green(), notice.message)?,
        None => writeln!(
            out,
            "{}",
            "Clipboard is not available in this session.".yellow()
        )?,
    }
    Ok(())
}
