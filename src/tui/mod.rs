use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{
    io,
    time::{Duration, Instant},
};
use tracing::debug;

use crate::app::{App, Command, NoticeLevel};
use crate::editor::EditorFocus;

pub mod state;

pub use state::*;

const BORDER: Color = Color::Rgb(60, 66, 78);
const BORDER_FOCUSED: Color = Color::Rgb(110, 150, 255);
const MUTED: Color = Color::Rgb(130, 136, 150);

/// Terminal front end for the prompt notebook
pub struct PromptTui {
    app: App,
    pub state: TuiState,
    list_state: ListState,
    status_message: Option<(String, Instant)>,
    should_quit: bool,
}

impl PromptTui {
    pub fn new(app: App) -> Self {
        Self {
            app,
            state: TuiState::new(),
            list_state: ListState::default(),
            status_message: None,
            should_quit: false,
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn run(mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_app(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.ui(f))?;

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }

            if self.should_quit {
                return Ok(());
            }

            // Clear status message after 3 seconds
            if let Some((_, time)) = &self.status_message {
                if time.elapsed() > Duration::from_secs(3) {
                    self.status_message = None;
                }
            }
        }
    }

    fn sidebar_visible(&self) -> bool {
        self.app.sidebar().is_visible(self.state.width)
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    fn set_focus(&mut self, focus: Focus) {
        self.state.focus = focus;
        match focus {
            Focus::Title => self.app.editor_mut().set_focus(EditorFocus::Title),
            Focus::Content => self.app.editor_mut().set_focus(EditorFocus::Content),
            Focus::Search | Focus::List => {}
        }
    }

    /// Leave the sidebar if it just disappeared
    fn fix_focus(&mut self) {
        if self.state.focus.in_sidebar() && !self.sidebar_visible() {
            self.set_focus(Focus::Title);
        }
    }

    /// Put the list cursor on the selected prompt, if it is listed
    fn sync_cursor_to_selection(&mut self) {
        let rows = self.app.rows();
        if let Some(selected) = self.app.store().selected_id() {
            if let Some(index) = rows.iter().position(|row| row.id == selected) {
                self.state.cursor_position = index;
            }
        }
        self.state.clamp_cursor(rows.len());
    }

    fn highlighted_id(&self) -> Option<String> {
        self.app
            .rows()
            .get(self.state.cursor_position)
            .map(|row| row.id.clone())
    }

    /// Apply one key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        // A pending notice or help screen swallows the next key
        if self.app.notice().is_some() {
            self.app.dispatch(Command::DismissNotice);
            return;
        }
        if self.state.help_visible {
            self.state.help_visible = false;
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            self.handle_control_key(key.code);
            return;
        }

        match key.code {
            KeyCode::Tab => {
                let next = self.state.focus.next(self.sidebar_visible());
                self.set_focus(next);
            }
            KeyCode::BackTab => {
                let previous = self.state.focus.previous(self.sidebar_visible());
                self.set_focus(previous);
            }
            KeyCode::F(1) => self.state.help_visible = true,
            _ => match self.state.focus {
                Focus::Search => self.handle_search_key(key.code),
                Focus::List => self.handle_list_key(key.code),
                Focus::Title | Focus::Content => self.handle_editor_key(key.code),
            },
        }
    }

    fn handle_control_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Char('c') => self.should_quit = true,
            KeyCode::Char('s') => {
                self.app.dispatch(Command::Save);
                self.sync_cursor_to_selection();
            }
            KeyCode::Char('n') => {
                self.app.dispatch(Command::New);
                self.set_focus(Focus::Title);
            }
            KeyCode::Char('y') => {
                // A failed write posts a notice, an absent clipboard does not
                self.app.dispatch(Command::Copy);
                if self.app.notice().is_none() {
                    self.set_status("Clipboard not available");
                }
            }
            KeyCode::Char('b') => {
                self.app.dispatch(Command::ToggleSidebar(self.state.width));
                self.fix_focus();
            }
            KeyCode::Char('o') => self.app.dispatch(Command::OpenSidebar),
            KeyCode::Char('w') => {
                self.app.dispatch(Command::CollapseSidebar);
                self.fix_focus();
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, code: KeyCode) {
        let mut filter = self.app.filter().to_string();
        match code {
            KeyCode::Char(c) => filter.push(c),
            KeyCode::Backspace => {
                filter.pop();
            }
            KeyCode::Esc => filter.clear(),
            KeyCode::Enter | KeyCode::Down => {
                self.set_focus(Focus::List);
                return;
            }
            _ => return,
        }

        self.app.dispatch(Command::SetFilter(filter));
        self.state.cursor_position = 0;
        self.state.clamp_cursor(self.app.rows().len());
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        let len = self.app.rows().len();
        match code {
            KeyCode::Char('j') | KeyCode::Down => self.state.next_row(len),
            KeyCode::Char('k') | KeyCode::Up => self.state.previous_row(),
            KeyCode::Char('g') | KeyCode::Home => self.state.cursor_position = 0,
            KeyCode::Char('G') | KeyCode::End => self.state.cursor_position = len.saturating_sub(1),
            KeyCode::Char('/') => self.set_focus(Focus::Search),
            KeyCode::Char('n') => {
                self.app.dispatch(Command::New);
                self.set_focus(Focus::Title);
            }
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Enter | KeyCode::Char('l') => {
                if let Some(id) = self.highlighted_id() {
                    self.app.dispatch(Command::Select(id));
                    self.set_focus(Focus::Title);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.highlighted_id() {
                    debug!(id = %id, "Removing from list");
                    self.app.dispatch(Command::Remove(id));
                    self.state.clamp_cursor(self.app.rows().len());
                    self.set_status("Prompt removed");
                }
            }
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, code: KeyCode) {
        let on_title = self.state.focus == Focus::Title;
        match code {
            KeyCode::Char(c) => self.app.editor_mut().focused_mut().insert_char(c),
            KeyCode::Backspace => self.app.editor_mut().focused_mut().backspace(),
            KeyCode::Enter if on_title => self.set_focus(Focus::Content),
            KeyCode::Enter => self.app.editor_mut().content.insert_newline(),
            KeyCode::Down if on_title => self.set_focus(Focus::Content),
            KeyCode::Up if !on_title => self.set_focus(Focus::Title),
            KeyCode::Esc if self.sidebar_visible() => self.set_focus(Focus::List),
            _ => {}
        }
    }

    pub fn ui(&mut self, f: &mut Frame) {
        let area = f.area();
        self.state.width = area.width;
        self.fix_focus();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        if self.sidebar_visible() {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
                .split(chunks[0]);
            self.draw_sidebar(f, columns[0]);
            self.draw_editor(f, columns[1]);
        } else {
            self.draw_editor(f, chunks[0]);
        }

        self.draw_status_bar(f, chunks[1]);

        if self.state.help_visible {
            self.draw_help_overlay(f);
        }
        self.draw_notice(f);
    }

    fn block(&self, title: String, focus: Focus) -> Block<'static> {
        let color = if self.state.focus == focus {
            BORDER_FOCUSED
        } else {
            BORDER
        };
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(color))
    }

    fn draw_sidebar(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let filter = self.app.filter();
        let search = if filter.is_empty() && self.state.focus != Focus::Search {
            Paragraph::new(Span::styled("Search titles...", Style::default().fg(MUTED)))
        } else {
            Paragraph::new(self.with_caret(filter, Focus::Search))
        };
        f.render_widget(search.block(self.block(" Search ".to_string(), Focus::Search)), chunks[0]);

        let rows = self.app.rows();
        let selected = self.app.store().selected_id();
        let items: Vec<ListItem> = rows
            .iter()
            .map(|row| {
                let marker = if Some(row.id.as_str()) == selected { "● " } else { "  " };
                let description = row.description.lines().next().unwrap_or_default().to_string();
                ListItem::new(vec![
                    Line::from(vec![
                        Span::raw(marker),
                        Span::styled(row.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    ]),
                    Line::from(Span::styled(format!("  {}", description), Style::default().fg(MUTED))),
                ])
            })
            .collect();

        self.state.clamp_cursor(rows.len());
        self.list_state.select(if rows.is_empty() {
            None
        } else {
            Some(self.state.cursor_position)
        });

        let title = format!(" Prompts ({}) ", rows.len());
        let list = List::new(items)
            .block(self.block(title, Focus::List))
            .highlight_style(
                Style::default()
                    .bg(Color::Rgb(45, 50, 59))
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        f.render_stateful_widget(list, chunks[1], &mut self.list_state);
    }

    fn draw_editor(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);

        let editor = self.app.editor();
        let placeholder = Style::default().fg(MUTED).add_modifier(Modifier::ITALIC);

        let title = if editor.title.is_empty() && self.state.focus != Focus::Title {
            Paragraph::new(Span::styled("Prompt title", placeholder))
        } else {
            Paragraph::new(self.with_caret(editor.title.text(), Focus::Title))
        };
        f.render_widget(title.block(self.block(" Title ".to_string(), Focus::Title)), chunks[0]);

        let content = if editor.content.is_empty() && self.state.focus != Focus::Content {
            Paragraph::new(Span::styled("Write your prompt here...", placeholder))
        } else {
            Paragraph::new(Text::from(self.with_caret(editor.content.text(), Focus::Content)))
        };
        f.render_widget(
            content
                .block(self.block(" Content ".to_string(), Focus::Content))
                .wrap(Wrap { trim: false }),
            chunks[1],
        );
    }

    fn with_caret(&self, text: &str, focus: Focus) -> String {
        if self.state.focus == focus {
            format!("{}▏", text)
        } else {
            text.to_string()
        }
    }

    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let selection = match self.app.store().selected() {
            Some(prompt) => format!("editing {}", prompt.short_id()),
            None => "new prompt".to_string(),
        };
        let mut text = format!(
            " {} prompts • {} • {} ",
            self.app.store().len(),
            self.state.focus.label(),
            selection
        );
        if let Some((message, _)) = &self.status_message {
            text.push_str(&format!("• {} ", message));
        }

        let line = Line::from(vec![
            Span::styled(text, Style::default().fg(Color::White)),
            Span::styled(
                "^S save  ^N new  ^Y copy  ^B sidebar  F1 help  ^Q quit",
                Style::default().fg(MUTED),
            ),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }

    fn draw_help_overlay(&self, f: &mut Frame) {
        let area = centered_rect(60, 70, f.area());
        let lines = vec![
            Line::from("Ctrl-S      save the prompt in the editor"),
            Line::from("Ctrl-N      start a new prompt"),
            Line::from("Ctrl-Y      copy content to the clipboard"),
            Line::from("Ctrl-B      toggle the sidebar (Ctrl-O open, Ctrl-W collapse)"),
            Line::from("Tab         move between search, list, title and content"),
            Line::from("/           search titles from the list"),
            Line::from("j/k, arrows move in the list"),
            Line::from("Enter       open the highlighted prompt"),
            Line::from("d, Delete   remove the highlighted prompt"),
            Line::from("Ctrl-Q      quit"),
            Line::from(""),
            Line::from(Span::styled("Press any key to close", Style::default().fg(MUTED))),
        ];

        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title(" Help "))
                .wrap(Wrap { trim: false }),
            area,
        );
    }

    fn draw_notice(&self, f: &mut Frame) {
        let Some(notice) = self.app.notice() else {
            return;
        };

        let (title, color) = match notice.level {
            NoticeLevel::Info => (" Done ", Color::Green),
            NoticeLevel::Error => (" Cannot save ", Color::Red),
        };
        let area = centered_rect(50, 20, f.area());
        let text = vec![
            Line::from(notice.message.clone()),
            Line::from(""),
            Line::from(Span::styled("Press any key", Style::default().fg(MUTED))),
        ];

        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(title)
                        .border_style(Style::default().fg(color)),
                )
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}

/// Rectangle centered in `area`, sized in percent of it
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::sidebar::SidebarState;
    use crate::storage::Storage;
    use ratatui::backend::TestBackend;

    fn tui() -> PromptTui {
        let mut tui = PromptTui::new(App::new(Storage::in_memory(), MemoryClipboard::new()));
        tui.state.width = 120;
        tui
    }

    fn press(tui: &mut PromptTui, code: KeyCode) {
        tui.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(tui: &mut PromptTui, c: char) {
        tui.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_text(tui: &mut PromptTui, text: &str) {
        for c in text.chars() {
            press(tui, KeyCode::Char(c));
        }
    }

    fn create(tui: &mut PromptTui, title: &str, content: &str) {
        ctrl(tui, 'n');
        type_text(tui, title);
        press(tui, KeyCode::Enter);
        type_text(tui, content);
        ctrl(tui, 's');
        press(tui, KeyCode::Esc); // dismiss the notice
    }

    fn screen(tui: &mut PromptTui, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| tui.ui(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_typing_and_saving_creates_prompt() {
        let mut tui = tui();
        create(&mut tui, "Hello", "<b>World</b>");

        let store = tui.app().store();
        assert_eq!(store.len(), 1);
        assert_eq!(store.prompts()[0].title, "Hello");
        assert_eq!(store.prompts()[0].content, "<b>World</b>");
        assert!(tui.app().notice().is_none());
    }

    #[test]
    fn test_blank_save_shows_error_until_key_press() {
        let mut tui = tui();
        ctrl(&mut tui, 's');
        assert!(tui.app().notice().unwrap().is_error());
        assert!(tui.app().store().is_empty());

        press(&mut tui, KeyCode::Char('x'));
        assert!(tui.app().notice().is_none());
        // The dismissing key is not typed into the editor
        assert_eq!(tui.app().editor().title.text(), "");
    }

    #[test]
    fn test_search_and_select_from_list() {
        let mut tui = tui();
        create(&mut tui, "Debug", "explain");
        create(&mut tui, "Review", "diff");

        tui.state.focus = Focus::Search;
        type_text(&mut tui, "deb");
        assert_eq!(tui.app().rows().len(), 1);

        press(&mut tui, KeyCode::Enter);
        assert_eq!(tui.state.focus, Focus::List);
        press(&mut tui, KeyCode::Enter);

        assert_eq!(tui.state.focus, Focus::Title);
        assert_eq!(tui.app().editor().title.text(), "Debug");
        assert_eq!(tui.app().editor().content.text(), "explain");
    }

    #[test]
    fn test_remove_from_list() {
        let mut tui = tui();
        create(&mut tui, "one", "1");
        create(&mut tui, "two", "2");

        tui.state.focus = Focus::List;
        press(&mut tui, KeyCode::Char('j'));
        press(&mut tui, KeyCode::Char('d'));

        let titles: Vec<_> = tui.app().rows().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["two"]);
        assert_eq!(tui.state.cursor_position, 0);
    }

    #[test]
    fn test_collapsing_sidebar_moves_focus() {
        let mut tui = tui();
        tui.state.focus = Focus::List;
        ctrl(&mut tui, 'b');
        assert_eq!(tui.app().sidebar().state(), SidebarState::Collapsed);
        assert_eq!(tui.state.focus, Focus::Title);

        ctrl(&mut tui, 'b');
        assert_eq!(tui.app().sidebar().state(), SidebarState::Open);
    }

    #[test]
    fn test_copy_distinguishes_missing_and_failing_clipboard() {
        let mut tui = PromptTui::new(App::new(Storage::in_memory(), MemoryClipboard::unavailable()));
        type_text(&mut tui, "t");
        ctrl(&mut tui, 'y');
        assert!(tui.app().notice().is_none());
        assert_eq!(
            tui.status_message.as_ref().map(|(m, _)| m.as_str()),
            Some("Clipboard not available")
        );

        let mut tui = PromptTui::new(App::new(Storage::in_memory(), MemoryClipboard::failing()));
        type_text(&mut tui, "t");
        ctrl(&mut tui, 'y');
        assert!(tui.app().notice().unwrap().is_error());
        assert!(tui.status_message.is_none());
    }

    #[test]
    fn test_quit_keys() {
        let mut tui = tui();
        ctrl(&mut tui, 'q');
        assert!(tui.should_quit());
    }

    #[test]
    fn test_draws_list_and_editor() {
        let mut tui = tui();
        create(&mut tui, "Hello", "<b>World</b>");

        let text = screen(&mut tui, 100, 20);
        assert!(text.contains("Prompts (1)"));
        assert!(text.contains("Hello"));
        assert!(text.contains("World"));
        assert!(text.contains("<b>World</b>"));
    }

    #[test]
    fn test_narrow_screen_hides_sidebar() {
        let mut tui = tui();
        create(&mut tui, "Hello", "World");

        let text = screen(&mut tui, 60, 20);
        assert!(!text.contains("Prompts ("));
        assert!(text.contains("Title"));
    }
}
