//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Manifest loads and the file watcher are side effects owned by the event
//! loop; their results re-enter through [`Model::apply_load_outcome`] and
//! [`Message::FileChanged`].

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;
use std::time::Duration;

use crate::watcher::DEFAULT_DEBOUNCE;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    manifest_path: PathBuf,
    watch_enabled: bool,
    watch_debounce: Duration,
    mouse_enabled: bool,
    initial_page: Option<usize>,
}

impl App {
    /// Create a viewer for the manifest at `manifest_path`.
    pub fn new(manifest_path: PathBuf) -> Self {
        Self {
            manifest_path,
            watch_enabled: false,
            watch_debounce: DEFAULT_DEBOUNCE,
            mouse_enabled: true,
            initial_page: None,
        }
    }

    /// Enable or disable manifest watching.
    pub const fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Enable or disable mouse capture (menu, footer clicks, wheel).
    pub const fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }

    /// Open this zero-based page once the manifest loads.
    pub const fn with_initial_page(mut self, page: Option<usize>) -> Self {
        self.initial_page = page;
        self
    }
}
