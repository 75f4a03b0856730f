use std::time::Duration;

use crate::app::{Message, Model, ToastLevel};
use crate::site::{ConfigLoader, LoadOutcome};
use crate::watcher::ManifestWatcher;

/// Handles owned by the event loop that the pure model cannot hold.
pub(super) struct Runtime {
    loader: Option<ConfigLoader>,
    watcher: Option<ManifestWatcher>,
    debounce: Duration,
}

impl Runtime {
    /// Kick off the first load and, if requested, start watching.
    pub(super) fn start(model: &mut Model, debounce: Duration) -> Self {
        let mut runtime = Self {
            loader: None,
            watcher: None,
            debounce,
        };
        runtime.spawn_load(model);
        if model.watch_enabled {
            runtime.start_watching(model, false);
        }
        runtime
    }

    pub(super) fn load_pending(&self) -> bool {
        self.loader.as_ref().is_some_and(ConfigLoader::is_pending)
    }

    /// Outcome of the in-flight load, once it has settled.
    pub(super) fn poll_load(&mut self) -> Option<LoadOutcome> {
        let loader = self.loader.as_mut()?;
        let outcome = loader.try_finish()?;
        tracing::debug!(path = %loader.path().display(), ok = outcome.is_ok(), "manifest load settled");
        self.loader = None;
        Some(outcome)
    }

    /// True when the watcher has a settled change to report.
    pub(super) fn take_file_change(&mut self, model: &Model) -> bool {
        model.watch_enabled
            && self
                .watcher
                .as_mut()
                .is_some_and(ManifestWatcher::take_change_ready)
    }

    pub(super) fn handle_message_side_effects(&mut self, model: &mut Model, msg: &Message) {
        match msg {
            Message::Reload | Message::FileChanged => self.spawn_load(model),
            Message::ToggleWatch => {
                if model.watch_enabled {
                    self.start_watching(model, true);
                } else {
                    self.watcher = None;
                    model.show_toast(ToastLevel::Info, "Watch disabled");
                }
            }
            _ => {}
        }
    }

    fn spawn_load(&mut self, model: &mut Model) {
        if self.load_pending() {
            tracing::debug!("load already in flight");
            return;
        }
        model.loading = true;
        self.loader = Some(ConfigLoader::spawn(&model.manifest_path));
    }

    fn start_watching(&mut self, model: &mut Model, announce: bool) {
        match ManifestWatcher::new(&model.manifest_path, self.debounce) {
            Ok(watcher) => {
                tracing::info!(path = %watcher.target_path().display(), "watching manifest");
                self.watcher = Some(watcher);
                if announce {
                    model.show_toast(ToastLevel::Info, "Watching manifest changes");
                }
            }
            Err(err) => {
                tracing::warn!(path = %model.manifest_path.display(), %err, "watcher unavailable");
                model.watch_enabled = false;
                self.watcher = None;
                model.show_toast(ToastLevel::Warning, format!("Watch unavailable: {err}"));
            }
        }
    }
}
