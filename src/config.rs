//! Configuration loading
//!
//! Everything lives under one base directory: `PROMPTPAD_BASE_DIR` when set,
//! `~/.promptpad` otherwise. An optional `config.toml` in that directory
//! tunes where prompts are stored, the sidebar and logging.
//!
//! ```toml
//! [storage]
//! data_dir = "~/notes/prompts"
//!
//! [ui]
//! sidebar = "auto"          # auto | open | collapsed
//! sidebar_breakpoint = 80
//!
//! [log]
//! level = "info"
//! format = "compact"
//! dir = "~/.promptpad/logs"
//! ```

use anyhow::{Context, Result};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::sidebar::{Sidebar, SidebarState, DEFAULT_BREAKPOINT};

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the prompt collection, base directory when unset
    pub data_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// State the sidebar starts in on every launch
    pub sidebar: SidebarState,
    /// Minimum terminal width for an `auto` sidebar to show
    pub sidebar_breakpoint: u16,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            sidebar: SidebarState::Auto,
            sidebar_breakpoint: DEFAULT_BREAKPOINT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: Option<String>,
    pub format: Option<String>,
    pub dir: Option<String>,
}

impl Config {
    /// Load `config.toml` from `base_dir`, defaults when the file is absent
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Directory the prompt collection is stored in
    pub fn data_dir(&self, base_dir: &Path) -> PathBuf {
        self.storage
            .data_dir
            .as_deref()
            .map(expand_path)
            .unwrap_or_else(|| base_dir.to_path_buf())
    }

    /// Sidebar in its configured launch state
    pub fn sidebar(&self) -> Sidebar {
        Sidebar::with_state(self.ui.sidebar_breakpoint, self.ui.sidebar)
    }
}

/// Base directory for config, data and logs
pub fn base_dir() -> Result<PathBuf> {
    if let Ok(custom_dir) = env::var("PROMPTPAD_BASE_DIR") {
        return Ok(expand_path(&custom_dir));
    }
    Ok(home_dir()
        .context("Could not find home directory")?
        .join(".promptpad"))
}

/// Expand a leading `~` to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
