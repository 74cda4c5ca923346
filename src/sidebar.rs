//! Sidebar visibility
//!
//! The sidebar starts every session in [`SidebarState::Auto`], where it shows
//! only on wide terminals. Explicitly opening or collapsing overrides that
//! until the next start; nothing is persisted.

use serde::{Deserialize, Serialize};

/// Default terminal width at which an `Auto` sidebar is shown
pub const DEFAULT_BREAKPOINT: u16 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarState {
    /// Visible when the screen is wide enough
    #[default]
    Auto,
    Open,
    Collapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sidebar {
    state: SidebarState,
    breakpoint: u16,
}

impl Default for Sidebar {
    fn default() -> Self {
        Self::new(DEFAULT_BREAKPOINT)
    }
}

impl Sidebar {
    pub fn new(breakpoint: u16) -> Self {
        Self {
            state: SidebarState::Auto,
            breakpoint,
        }
    }

    /// Sidebar starting in `state` instead of `Auto`
    pub fn with_state(breakpoint: u16, state: SidebarState) -> Self {
        Self { state, breakpoint }
    }

    pub fn state(&self) -> SidebarState {
        self.state
    }

    pub fn open(&mut self) {
        self.state = SidebarState::Open;
    }

    pub fn collapse(&mut self) {
        self.state = SidebarState::Collapsed;
    }

    /// Flip between open and collapsed based on what is shown at `width`
    pub fn toggle(&mut self, width: u16) {
        if self.is_visible(width) {
            self.collapse();
        } else {
            self.open();
        }
    }

    pub fn is_visible(&self, width: u16) -> bool {
        match self.state {
            SidebarState::Auto => width >= self.breakpoint,
            SidebarState::Open => true,
            SidebarState::Collapsed => false,
        }
    }
}
