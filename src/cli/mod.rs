//! Command-line interface definitions and parsing
//!
//! Without a subcommand the terminal UI starts. Subcommands run one action
//! against the stored collection and exit.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "promptpad")]
#[command(version)]
#[command(about = "promptpad - a local notebook for your prompts")]
#[command(after_help = "Run without a command to open the editor.

EXAMPLES:
  promptpad new \"Review\" \"Review the <b>diff</b>\"   # Create a prompt
  promptpad ls rev                                 # Titles containing 'rev'
  promptpad edit 3f2a --title \"Code review\"        # Rename by id prefix
  promptpad copy 3f2a | pbcopy                     # Pipe the plain text")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List prompts, optionally filtered by title
    #[command(aliases = ["l", "list"])]
    Ls {
        /// Case-insensitive text the title must contain
        filter: Option<String>,
        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a prompt
    #[command(alias = "s")]
    Show {
        /// Prompt id or unique id prefix
        id: String,
        /// Print content as plain text instead of raw markup
        #[arg(short = 'p', long)]
        plain: bool,
    },
    /// Create a new prompt
    #[command(alias = "n")]
    New {
        title: String,
        /// Content, markup is kept as written
        content: String,
    },
    /// Update a prompt's title and/or content
    #[command(alias = "e")]
    Edit {
        /// Prompt id or unique id prefix
        id: String,
        #[arg(short = 't', long)]
        title: Option<String>,
        #[arg(short = 'c', long)]
        content: Option<String>,
    },
    /// Delete a prompt
    #[command(aliases = ["d", "delete"])]
    Rm {
        /// Prompt id or unique id prefix
        id: String,
    },
    /// Copy a prompt's content as plain text
    #[command(alias = "c")]
    Copy {
        /// Prompt id or unique id prefix
        id: String,
    },
    /// Open the terminal editor
    #[command(alias = "t")]
    Tui,
}

/// Subcommand names and aliases, for typo suggestions
pub const COMMAND_NAMES: &[&str] = &[
    "ls", "l", "list", "show", "s", "new", "n", "edit", "e", "rm", "d", "delete", "copy", "c",
    "tui", "t",
];
