//! Page-level state shared by the dialogs.
//!
//! [`PageChrome`] tracks which dialogs are open. The page carries its
//! `modal-open` marker (navigation hidden, scrolling locked) while any dialog
//! is open, and the scroll-to-top button is shown only when no dialog is open
//! and the page has scrolled past a threshold.

use serde::{Deserialize, Serialize};

use enray_site_core::logging::targets;

/// The dialogs that lock the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogKind {
    /// The capability lightbox.
    Lightbox,
    /// The quote request dialog.
    Quote,
}

/// The page side of [`PageChrome`].
pub trait ChromeSurface {
    fn set_modal_open(&mut self, open: bool);
    fn set_scroll_top_visible(&mut self, visible: bool);
    /// Smoothly scroll the page to the top.
    fn scroll_to_top(&mut self);
}

/// Tuning for [`PageChrome`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeConfig {
    /// Scroll offset past which the scroll-to-top button appears.
    pub scroll_top_threshold: f64,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            scroll_top_threshold: 300.0,
        }
    }
}

/// Open dialogs plus the scroll-to-top button.
#[derive(Debug, Default)]
pub struct PageChrome {
    config: ChromeConfig,
    stack: Vec<DialogKind>,
    scroll_y: f64,
    scroll_top_visible: Option<bool>,
}

impl PageChrome {
    pub fn new(config: ChromeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Record a dialog as open. Opening an already-open dialog is a no-op.
    pub fn push_dialog<S: ChromeSurface>(&mut self, surface: &mut S, kind: DialogKind) {
        if self.stack.contains(&kind) {
            return;
        }
        self.stack.push(kind);
        tracing::debug!(target: targets::CHROME, ?kind, open = self.stack.len(), "dialog opened");
        if self.stack.len() == 1 {
            surface.set_modal_open(true);
        }
        self.sync_scroll_top(surface);
    }

    /// Record a dialog as closed.
    ///
    /// Returns `true` if it was open.
    pub fn pop_dialog<S: ChromeSurface>(&mut self, surface: &mut S, kind: DialogKind) -> bool {
        let Some(pos) = self.stack.iter().position(|k| *k == kind) else {
            return false;
        };
        self.stack.remove(pos);
        tracing::debug!(target: targets::CHROME, ?kind, open = self.stack.len(), "dialog closed");
        if self.stack.is_empty() {
            surface.set_modal_open(false);
        }
        self.sync_scroll_top(surface);
        true
    }

    /// Check if any dialog is open.
    pub fn has_dialog(&self) -> bool {
        !self.stack.is_empty()
    }

    /// The most recently opened dialog.
    pub fn active_dialog(&self) -> Option<DialogKind> {
        self.stack.last().copied()
    }

    /// The page scrolled.
    pub fn scrolled<S: ChromeSurface>(&mut self, surface: &mut S, scroll_y: f64) {
        self.scroll_y = scroll_y;
        self.sync_scroll_top(surface);
    }

    /// The scroll-to-top button was clicked.
    pub fn scroll_top_clicked<S: ChromeSurface>(&self, surface: &mut S) {
        surface.scroll_to_top();
    }

    /// Whether the scroll-to-top button should be shown.
    pub fn scroll_top_visible(&self) -> bool {
        !self.has_dialog() && self.scroll_y > self.config.scroll_top_threshold
    }

    fn sync_scroll_top<S: ChromeSurface>(&mut self, surface: &mut S) {
        let visible = self.scroll_top_visible();
        if self.scroll_top_visible != Some(visible) {
            self.scroll_top_visible = Some(visible);
            surface.set_scroll_top_visible(visible);
        }
    }
}
