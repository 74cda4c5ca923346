//! promptpad - a local notebook for short prompts
//!
//! Prompts are small titled notes whose content may carry light markup.
//! The collection is stored as one JSON document, searched by title and
//! edited from a terminal UI or one-shot subcommands.
//!
//! # Quick Start
//!
//! ```no_run
//! use promptpad::{App, Command, MemoryClipboard, Storage};
//!
//! let mut app = App::new(Storage::open("/tmp/promptpad"), MemoryClipboard::new());
//! app.dispatch(Command::SetTitle("Review".into()));
//! app.dispatch(Command::SetContent("Review the <b>diff</b>".into()));
//! app.dispatch(Command::Save);
//!
//! for row in app.rows() {
//!     println!("{}: {}", row.title, row.description);
//! }
//! ```
//!
//! # Modules
//!
//! - [`store`]: the in-memory collection and its selection
//! - [`storage`]: key-value persistence of the collection
//! - [`render`]: filtered list rows
//! - [`app`]: session state and command dispatch
//! - [`tui`]: terminal user interface (feature-gated)

pub mod app;
pub mod cli;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error_help;
pub mod logging;
pub mod markup;
pub mod prompt;
pub mod render;
pub mod sidebar;
pub mod storage;
pub mod store;

#[cfg(feature = "tui")]
pub mod tui;

pub use app::{App, Command, Notice, NoticeLevel};
pub use cli::{Cli, Commands};
pub use clipboard::{Clipboard, ClipboardWriter, MemoryClipboard};
pub use config::Config;
pub use editor::{EditableRegion, EditorFocus, EditorPanel};
pub use logging::{init_logging, LogConfig, LogFormat};
pub use prompt::Prompt;
pub use render::{render, ListRow};
pub use sidebar::{Sidebar, SidebarState};
pub use storage::{FileStore, KeyValueStore, MemoryStore, Storage, StorageError, STORAGE_KEY};
pub use store::{PromptStore, SaveOutcome, ValidationError};
