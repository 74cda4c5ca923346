//! Editor panel bound to the selected prompt
//!
//! The panel has a single-line title region and a multi-line content region.
//! Each region tracks whether it is visually empty, recomputed after every
//! edit so the UI can show a placeholder hint.

use crate::markup;
use crate::prompt::Prompt;

/// How a region's text is interpreted when deciding emptiness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Single line of plain text
    Line,
    /// Free text that may carry markup
    Markup,
}

/// One editable text region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableRegion {
    text: String,
    kind: RegionKind,
    is_empty: bool,
}

impl EditableRegion {
    pub fn new(kind: RegionKind) -> Self {
        Self {
            text: String::new(),
            kind,
            is_empty: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// True when the trimmed visible text has zero length
    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = match self.kind {
            RegionKind::Line => text.replace(['\r', '\n'], " "),
            RegionKind::Markup => text.to_string(),
        };
        self.refresh();
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_newline();
            return;
        }
        self.text.push(c);
        self.refresh();
    }

    /// Lines only exist in markup regions; title regions ignore this
    pub fn insert_newline(&mut self) {
        if self.kind == RegionKind::Markup {
            self.text.push('\n');
            self.refresh();
        }
    }

    pub fn backspace(&mut self) {
        self.text.pop();
        self.refresh();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.refresh();
    }

    fn refresh(&mut self) {
        self.is_empty = match self.kind {
            RegionKind::Line => self.text.trim().is_empty(),
            RegionKind::Markup => markup::is_blank(&self.text),
        };
    }
}

/// Which region receives typed input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorFocus {
    #[default]
    Title,
    Content,
}

/// Title and content regions plus the input focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorPanel {
    pub title: EditableRegion,
    pub content: EditableRegion,
    focus: EditorFocus,
}

impl Default for EditorPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorPanel {
    pub fn new() -> Self {
        Self {
            title: EditableRegion::new(RegionKind::Line),
            content: EditableRegion::new(RegionKind::Markup),
            focus: EditorFocus::Title,
        }
    }

    /// Replace both regions with a prompt's fields
    pub fn load(&mut self, prompt: &Prompt) {
        self.title.set_text(&prompt.title);
        self.content.set_text(&prompt.content);
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.content.clear();
    }

    pub fn focus(&self) -> EditorFocus {
        self.focus
    }

    pub fn set_focus(&mut self, focus: EditorFocus) {
        self.focus = focus;
    }

    pub fn focused_mut(&mut self) -> &mut EditableRegion {
        match self.focus {
            EditorFocus::Title => &mut self.title,
            EditorFocus::Content => &mut self.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_start_empty() {
        let editor = EditorPanel::new();
        assert!(editor.title.is_empty());
        assert!(editor.content.is_empty());
        assert_eq!(editor.focus(), EditorFocus::Title);
    }

    #[test]
    fn test_empty_state_tracks_edits() {
        let mut region = EditableRegion::new(RegionKind::Line);
        region.insert_char(' ');
        assert!(region.is_empty());
        region.insert_char('a');
        assert!(!region.is_empty());
        region.backspace();
        assert!(region.is_empty());
        assert_eq!(region.text(), " ");
    }

    #[test]
    fn test_markup_region_checks_visible_text() {
        let mut region = EditableRegion::new(RegionKind::Markup);
        region.set_text("<b></b>");
        assert!(region.is_empty());
        region.set_text("<b>x</b>");
        assert!(!region.is_empty());
    }

    #[test]
    fn test_title_is_single_line() {
        let mut region = EditableRegion::new(RegionKind::Line);
        region.insert_newline();
        assert_eq!(region.text(), "");
        region.set_text("two\nlines");
        assert_eq!(region.text(), "two lines");

        let mut content = EditableRegion::new(RegionKind::Markup);
        content.insert_char('a');
        content.insert_char('\n');
        content.insert_char('b');
        assert_eq!(content.text(), "a\nb");
    }

    #[test]
    fn test_load_and_clear() {
        let mut editor = EditorPanel::new();
        editor.load(&Prompt {
            id: "1".to_string(),
            title: "Hello".to_string(),
            content: "<b>World</b>".to_string(),
        });
        assert_eq!(editor.title.text(), "Hello");
        assert_eq!(editor.content.text(), "<b>World</b>");
        assert!(!editor.title.is_empty());
        assert!(!editor.content.is_empty());

        editor.clear();
        assert_eq!(editor.title.text(), "");
        assert!(editor.title.is_empty());
        assert!(editor.content.is_empty());
    }

    #[test]
    fn test_focused_region_receives_input() {
        let mut editor = EditorPanel::new();
        editor.focused_mut().insert_char('t');
        editor.set_focus(EditorFocus::Content);
        editor.focused_mut().insert_char('c');
        assert_eq!(editor.title.text(), "t");
        assert_eq!(editor.content.text(), "c");
    }
}
