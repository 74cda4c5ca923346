//! Application state and command dispatch
//!
//! [`App`] owns every piece of session state: the prompt store, the storage
//! adapter, the editor, the sidebar, the list filter and the pending user
//! notice. User actions arrive as [`Command`]s; after any command the list is
//! recomputed from the store with [`App::rows`].

use tracing::{debug, info, warn};

use crate::clipboard::ClipboardWriter;
use crate::editor::{EditorFocus, EditorPanel};
use crate::markup;
use crate::render::{render, ListRow};
use crate::sidebar::Sidebar;
use crate::storage::Storage;
use crate::store::{PromptStore, SaveOutcome};

/// A named user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Commit the editor into the store
    Save,
    /// Start composing an unsaved prompt
    New,
    Remove(String),
    Select(String),
    SetFilter(String),
    SetTitle(String),
    SetContent(String),
    /// Copy the editor content to the clipboard
    Copy,
    OpenSidebar,
    CollapseSidebar,
    /// Flip the sidebar at the given screen width
    ToggleSidebar(u16),
    DismissNotice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Message waiting for the user to acknowledge it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

pub struct App {
    store: PromptStore,
    storage: Storage,
    clipboard: Box<dyn ClipboardWriter>,
    editor: EditorPanel,
    sidebar: Sidebar,
    filter: String,
    notice: Option<Notice>,
}

impl App {
    /// Load the persisted collection and start with an empty editor
    pub fn new(storage: Storage, clipboard: impl ClipboardWriter + 'static) -> Self {
        let store = PromptStore::load(&storage);
        Self {
            store,
            storage,
            clipboard: Box::new(clipboard),
            editor: EditorPanel::new(),
            sidebar: Sidebar::default(),
            filter: String::new(),
            notice: None,
        }
    }

    pub fn with_sidebar(mut self, sidebar: Sidebar) -> Self {
        self.sidebar = sidebar;
        self
    }

    /// Apply one command to the session state
    pub fn dispatch(&mut self, command: Command) {
        debug!(command = ?command, "Dispatching command");

        match command {
            Command::Save => self.save(),
            Command::New => self.new_prompt(),
            Command::Remove(id) => self.remove(&id),
            Command::Select(id) => self.select(&id),
            Command::SetFilter(text) => self.filter = text,
            Command::SetTitle(text) => self.editor.title.set_text(&text),
            Command::SetContent(text) => self.editor.content.set_text(&text),
            Command::Copy => self.copy(),
            Command::OpenSidebar => self.sidebar.open(),
            Command::CollapseSidebar => self.sidebar.collapse(),
            Command::ToggleSidebar(width) => self.sidebar.toggle(width),
            Command::DismissNotice => self.notice = None,
        }
    }

    /// The list as it should be drawn right now
    pub fn rows(&self) -> Vec<ListRow> {
        render(self.store.prompts(), &self.filter)
    }

    fn save(&mut self) {
        let title = self.editor.title.text().to_string();
        let content = self.editor.content.text().to_string();

        match self.store.save(&title, &content) {
            Ok(outcome) => {
                if outcome.is_mutation() {
                    self.store.persist(&mut self.storage);
                }
                match &outcome {
                    SaveOutcome::Created(id) => info!(id = %id, "Prompt created"),
                    SaveOutcome::Updated(id) => info!(id = %id, "Prompt updated"),
                    SaveOutcome::Stale(id) => warn!(id = %id, "Selected prompt no longer exists"),
                }
                // Show what was stored, trimmed
                if let Some(saved) = self.store.get(outcome.id()) {
                    self.editor.load(saved);
                }
                self.notice = Some(match outcome {
                    SaveOutcome::Stale(_) => {
                        Notice::error("This prompt was removed. Start a new one to save it.")
                    }
                    _ => Notice::info("Prompt saved!"),
                });
            }
            Err(e) => {
                debug!(error = %e, "Save rejected");
                self.notice = Some(Notice::error(e.to_string()));
            }
        }
    }

    fn new_prompt(&mut self) {
        self.store.clear_selection();
        self.editor.clear();
        self.editor.set_focus(EditorFocus::Title);
    }

    fn remove(&mut self, id: &str) {
        let was_loaded = self.store.selected_id() == Some(id);
        if self.store.remove(id) {
            info!(id = %id, "Prompt removed");
        }
        self.store.persist(&mut self.storage);
        if was_loaded {
            self.editor.clear();
        }
    }

    fn select(&mut self, id: &str) {
        match self.store.select(id).cloned() {
            Some(prompt) => self.editor.load(&prompt),
            None => {
                debug!(id = %id, "Selected id has no prompt");
                self.editor.clear();
            }
        }
    }

    fn copy(&mut self) {
        if !self.clipboard.is_available() {
            info!("Clipboard is not supported in this session");
            return;
        }

        let text = markup::rendered_text(self.editor.content.text());
        match self.clipboard.write_text(&text) {
            Ok(()) => self.notice = Some(Notice::info("Content copied to clipboard!")),
            Err(e) => {
                warn!(error = %e, "Copy to clipboard failed");
                self.notice = Some(Notice::error("Could not copy to the clipboard."));
            }
        }
    }

    pub fn store(&self) -> &PromptStore {
        &self.store
    }

    pub fn editor(&self) -> &EditorPanel {
        &self.editor
    }

    /// Direct access for keystroke-level edits
    pub fn editor_mut(&mut self) -> &mut EditorPanel {
        &mut self.editor
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Take the pending notice, leaving none
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::sidebar::SidebarState;
    use crate::storage::{MemoryStore, STORAGE_KEY};

    fn app() -> App {
        App::new(Storage::in_memory(), MemoryClipboard::new())
    }

    fn write(app: &mut App, title: &str, content: &str) {
        app.dispatch(Command::SetTitle(title.to_string()));
        app.dispatch(Command::SetContent(content.to_string()));
    }

    fn created(app: &mut App, title: &str, content: &str) -> String {
        app.dispatch(Command::New);
        write(app, title, content);
        app.dispatch(Command::Save);
        app.store().selected_id().unwrap().to_string()
    }

    #[test]
    fn test_save_new_prompt_and_render() {
        let mut app = app();
        write(&mut app, "Hello", "<b>World</b>");
        app.dispatch(Command::Save);

        assert_eq!(app.store().len(), 1);
        assert!(!app.notice().unwrap().is_error());

        let rows = app.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Hello");
        assert_eq!(rows[0].description, "World");
        assert_eq!(app.store().prompts()[0].content, "<b>World</b>");
    }

    #[test]
    fn test_blank_save_reports_and_keeps_collection() {
        let mut app = app();
        let id = created(&mut app, "Hello", "<b>World</b>");
        let before = app.store().prompts().to_vec();

        app.dispatch(Command::Select(id.clone()));
        write(&mut app, "", "");
        app.dispatch(Command::Save);
        assert!(app.notice().unwrap().is_error());
        assert_eq!(app.store().prompts(), before.as_slice());

        app.dispatch(Command::DismissNotice);
        write(&mut app, "Hi", "");
        app.dispatch(Command::Save);
        assert!(app.notice().unwrap().is_error());
        assert_eq!(app.store().prompts(), before.as_slice());
    }

    #[test]
    fn test_save_with_selection_keeps_count() {
        let mut app = app();
        let id = created(&mut app, "one", "1");
        created(&mut app, "two", "2");
        assert_eq!(app.store().len(), 2);

        app.dispatch(Command::Select(id.clone()));
        write(&mut app, "uno", "<i>1</i>");
        app.dispatch(Command::Save);

        assert_eq!(app.store().len(), 2);
        assert_eq!(app.store().get(&id).unwrap().title, "uno");
    }

    #[test]
    fn test_mutations_are_persisted() {
        let mut app = app();
        let id = created(&mut app, "keep", "me");
        let gone = created(&mut app, "drop", "me");
        app.dispatch(Command::Remove(gone));

        let App { storage, store, .. } = app;
        let reloaded = PromptStore::load(&storage);
        assert_eq!(reloaded.prompts(), store.prompts());
        assert_eq!(reloaded.prompts()[0].id, id);
    }

    #[test]
    fn test_select_loads_editor_and_stale_clears_it() {
        let mut app = app();
        let id = created(&mut app, "Hello", "<b>World</b>");
        app.dispatch(Command::New);
        assert_eq!(app.editor().title.text(), "");

        app.dispatch(Command::Select(id));
        assert_eq!(app.editor().title.text(), "Hello");
        assert_eq!(app.editor().content.text(), "<b>World</b>");

        app.dispatch(Command::Select("missing".to_string()));
        assert!(app.editor().title.is_empty());
        assert!(app.editor().content.is_empty());
        assert_eq!(app.store().selected_id(), Some("missing"));
    }

    #[test]
    fn test_new_clears_selection_and_focuses_title() {
        let mut app = app();
        let id = created(&mut app, "Hello", "World");
        app.dispatch(Command::Select(id));
        app.editor_mut().set_focus(EditorFocus::Content);

        app.dispatch(Command::New);
        assert_eq!(app.store().selected_id(), None);
        assert!(app.editor().title.is_empty());
        assert_eq!(app.editor().focus(), EditorFocus::Title);
    }

    #[test]
    fn test_remove_loaded_prompt_clears_editor() {
        let mut app = app();
        let id = created(&mut app, "Hello", "World");
        app.dispatch(Command::Remove(id));

        assert!(app.store().is_empty());
        assert!(app.editor().title.is_empty());
        assert_eq!(app.store().selected_id(), None);

        app.dispatch(Command::Remove("missing".to_string()));
        assert!(app.store().is_empty());
    }

    #[test]
    fn test_filter_applies_to_rows() {
        let mut app = app();
        created(&mut app, "Code review", "a");
        created(&mut app, "Debug", "b");

        app.dispatch(Command::SetFilter("  REV ".to_string()));
        let rows = app.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Code review");

        app.dispatch(Command::SetFilter(String::new()));
        assert_eq!(app.rows().len(), 2);
    }

    #[test]
    fn test_copy_writes_rendered_text() {
        let clipboard = MemoryClipboard::new();
        let mut app = App::new(Storage::in_memory(), clipboard.clone());
        write(&mut app, "t", "first<div>second &amp; third</div>");

        app.dispatch(Command::Copy);
        assert_eq!(clipboard.contents().as_deref(), Some("first\nsecond & third"));
        assert_eq!(
            app.notice().map(|n| n.message.as_str()),
            Some("Content copied to clipboard!")
        );
    }

    #[test]
    fn test_copy_without_clipboard_is_silent() {
        let mut app = App::new(Storage::in_memory(), MemoryClipboard::unavailable());
        write(&mut app, "t", "c");
        app.dispatch(Command::Copy);
        assert!(app.notice().is_none());
    }

    #[test]
    fn test_copy_write_failure_is_reported() {
        let mut app = App::new(Storage::in_memory(), MemoryClipboard::failing());
        write(&mut app, "t", "c");
        app.dispatch(Command::Copy);

        let notice = app.notice().unwrap();
        assert!(notice.is_error());
        assert_eq!(notice.message, "Could not copy to the clipboard.");
    }

    #[test]
    fn test_corrupt_storage_starts_empty() {
        let storage = Storage::with_backend(MemoryStore::with_entry(STORAGE_KEY, "garbage"));
        let mut app = App::new(storage, MemoryClipboard::new());
        assert!(app.rows().is_empty());

        created(&mut app, "fresh", "start");
        assert_eq!(app.store().len(), 1);
    }

    #[test]
    fn test_sidebar_commands() {
        let mut app = app();
        assert_eq!(app.sidebar().state(), SidebarState::Auto);
        app.dispatch(Command::CollapseSidebar);
        assert_eq!(app.sidebar().state(), SidebarState::Collapsed);
        app.dispatch(Command::OpenSidebar);
        assert_eq!(app.sidebar().state(), SidebarState::Open);
        app.dispatch(Command::ToggleSidebar(120));
        assert_eq!(app.sidebar().state(), SidebarState::Collapsed);
    }
}
