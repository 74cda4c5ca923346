//! System clipboard integration
//!
//! Write-only access to the system clipboard. The clipboard is optional: on
//! headless sessions the context cannot be created and every copy becomes a
//! logged no-op.

use anyhow::{Context, Result};
use copypasta::{ClipboardContext, ClipboardProvider};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

/// Something plain text can be copied into
pub trait ClipboardWriter {
    /// Whether a clipboard capability exists at all
    fn is_available(&self) -> bool;
    fn write_text(&mut self, text: &str) -> Result<()>;
}

pub struct Clipboard {
    context: Option<ClipboardContext>,
}

impl Default for Clipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard {
    pub fn new() -> Self {
        // Try to initialize clipboard, but don't fail if it's not available
        let context = match ClipboardContext::new() {
            Ok(context) => Some(context),
            Err(e) => {
                debug!(error = %e, "System clipboard unavailable");
                None
            }
        };
        Self { context }
    }
}

impl ClipboardWriter for Clipboard {
    fn is_available(&self) -> bool {
        self.context.is_some()
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        let ctx = self
            .context
            .as_mut()
            .context("System clipboard is not available")?;
        ctx.set_contents(text.to_string())
            .map_err(|e| anyhow::anyhow!("Failed to copy to clipboard: {}", e))
    }
}

/// Clipboard keeping copied text in memory
///
/// Clones share the same contents, so a test can keep one handle and give
/// the other away.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Rc<RefCell<Option<String>>>,
    unavailable: bool,
    rejects_writes: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard reporting no capability, like a headless session
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Clipboard that exists but refuses every write
    pub fn failing() -> Self {
        Self {
            rejects_writes: true,
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl ClipboardWriter for MemoryClipboard {
    fn is_available(&self) -> bool {
        !self.unavailable
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        if self.unavailable {
            anyhow::bail!("clipboard unavailable");
        }
        if self.rejects_writes {
            anyhow::bail!("clipboard refused the write");
        }
        *self.contents.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}
