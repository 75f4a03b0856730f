use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::document::Document;
use crate::navigation::PageStore;
use crate::site::{Configuration, LoadOutcome};
use crate::ui::viewport::Viewport;

const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// The complete application state.
///
/// All state lives here; the event loop owns the only instance.
#[derive(Debug)]
pub struct Model {
    /// Loaded configuration and current page index
    pub store: PageStore,
    /// Rendered markdown of the current page
    pub document: Document,
    /// Scroll position within the current page
    pub viewport: Viewport,
    /// Path of the manifest file
    pub manifest_path: PathBuf,
    /// True until the outstanding manifest load settles
    pub loading: bool,
    /// Whether the page menu overlay is open
    pub menu_open: bool,
    /// Keyboard cursor inside the page menu
    pub menu_selected: usize,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Whether manifest watching is enabled
    pub watch_enabled: bool,
    /// Page to open once the first load settles (zero-based)
    pub pending_page: Option<usize>,
    /// Last known terminal size (width, height)
    pub terminal_size: (u16, u16),
    /// Whether the app should quit
    pub should_quit: bool,
    loaded_once: bool,
    toast: Option<Toast>,
}

impl Model {
    /// Create a model that is waiting for its first manifest load.
    pub fn new(manifest_path: PathBuf, terminal_size: (u16, u16)) -> Self {
        Self {
            store: PageStore::default(),
            document: Document::empty(),
            viewport: Viewport::new(
                terminal_size.0,
                crate::ui::document_rows(terminal_size.1),
                0,
            ),
            manifest_path,
            loading: true,
            menu_open: false,
            menu_selected: 0,
            help_visible: false,
            watch_enabled: false,
            pending_page: None,
            terminal_size,
            should_quit: false,
            loaded_once: false,
            toast: None,
        }
    }

    /// Settle the outstanding load.
    ///
    /// Success installs the new configuration, clamping the current page.
    /// Failure is logged and shown as a toast; the previous configuration
    /// (the empty default on first load) stays in place.
    pub fn apply_load_outcome(&mut self, outcome: LoadOutcome) {
        self.loading = false;
        match outcome {
            Ok(config) => {
                tracing::info!(
                    path = %self.manifest_path.display(),
                    title = %config.title,
                    pages = config.len(),
                    "manifest loaded"
                );
                self.install_configuration(config);
            }
            Err(err) => {
                tracing::error!(path = %self.manifest_path.display(), %err, "manifest load failed");
                self.show_toast(ToastLevel::Error, format!("Load failed: {err}"));
                self.rebuild_document();
            }
        }
    }

    fn install_configuration(&mut self, config: Configuration) {
        let previous_index = self.store.current_index();
        self.store.replace(config);

        if self.loaded_once {
            self.show_toast(ToastLevel::Info, "Reloaded");
        } else if let Some(page) = self.pending_page.take()
            && !self.store.jump_to(page)
            && page >= self.store.len()
        {
            self.show_toast(
                ToastLevel::Warning,
                format!("No page {}; showing page 1", page + 1),
            );
        }
        self.loaded_once = true;
        self.menu_selected = self.menu_selected.min(self.store.len().saturating_sub(1));

        self.rebuild_document();
        if self.store.current_index() != previous_index {
            self.viewport.go_to_top();
        }
    }

    /// Re-render the current page at the current layout width.
    pub fn rebuild_document(&mut self) {
        let width = self.layout_width();
        self.document = match Document::parse_with_layout(self.store.current_content(), width) {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!(%err, "page render failed");
                Document::empty()
            }
        };
        self.viewport.set_total_lines(self.document.line_count());
    }

    /// Rebuild after the current page changed and scroll to its top.
    pub(super) fn page_changed(&mut self) {
        self.rebuild_document();
        self.viewport.go_to_top();
        tracing::debug!(index = self.store.current_index(), "page changed");
    }

    pub(super) fn layout_width(&self) -> u16 {
        crate::ui::document_content_width(self.viewport.width())
    }

    /// Highlight code blocks on and around the visible rows.
    pub fn ensure_highlight_overscan(&mut self) {
        let height = self.viewport.height() as usize;
        let start = self.viewport.offset().saturating_sub(height);
        let end = self.viewport.offset() + height * 2;
        self.document.ensure_highlight_for_range(start..end);
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self::new(PathBuf::from(crate::site::DEFAULT_MANIFEST), (80, 24))
    }
}
