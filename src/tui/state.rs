/// Screen areas that can receive keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Search,
    List,
    Title,
    Content,
}

impl Focus {
    /// Next area in tab order, skipping the sidebar when it is hidden
    pub fn next(self, sidebar_visible: bool) -> Self {
        match (self, sidebar_visible) {
            (Focus::Search, _) => Focus::List,
            (Focus::List, _) => Focus::Title,
            (Focus::Title, _) => Focus::Content,
            (Focus::Content, true) => Focus::Search,
            (Focus::Content, false) => Focus::Title,
        }
    }

    /// Previous area in tab order
    pub fn previous(self, sidebar_visible: bool) -> Self {
        match (self, sidebar_visible) {
            (Focus::Search, _) => Focus::Content,
            (Focus::List, _) => Focus::Search,
            (Focus::Title, true) => Focus::List,
            (Focus::Title, false) => Focus::Content,
            (Focus::Content, _) => Focus::Title,
        }
    }

    pub fn in_sidebar(self) -> bool {
        matches!(self, Focus::Search | Focus::List)
    }

    pub fn label(self) -> &'static str {
        match self {
            Focus::Search => "Search",
            Focus::List => "List",
            Focus::Title => "Title",
            Focus::Content => "Content",
        }
    }
}

/// Terminal-only view state layered over the application state
#[derive(Debug, Clone)]
pub struct TuiState {
    pub focus: Focus,
    /// Highlighted row in the filtered list
    pub cursor_position: usize,
    pub help_visible: bool,
    /// Last known terminal width, used for sidebar decisions between frames
    pub width: u16,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            focus: Focus::Title,
            cursor_position: 0,
            help_visible: false,
            width: 0,
        }
    }

    /// Keep the cursor inside a list of `len` rows
    pub fn clamp_cursor(&mut self, len: usize) {
        if len == 0 {
            self.cursor_position = 0;
        } else if self.cursor_position >= len {
            self.cursor_position = len - 1;
        }
    }

    pub fn next_row(&mut self, len: usize) {
        if len > 0 && self.cursor_position + 1 < len {
            self.cursor_position += 1;
        }
    }

    pub fn previous_row(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}
