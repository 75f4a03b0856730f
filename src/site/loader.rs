use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use super::{Configuration, LoadError, load_configuration};

/// Result of a settled manifest load.
pub type LoadOutcome = Result<Configuration, LoadError>;

/// A single in-flight manifest load running on a background thread.
///
/// The event loop polls [`ConfigLoader::try_finish`] once per tick; the load
/// is never cancelled and has no timeout.
pub struct ConfigLoader {
    path: PathBuf,
    rx: Option<Receiver<LoadOutcome>>,
}

impl ConfigLoader {
    /// Start loading the manifest at `path`.
    pub fn spawn(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let (tx, rx) = mpsc::channel();
        let worker_path = path.clone();
        thread::spawn(move || {
            let outcome = load_configuration(&worker_path);
            let _ = tx.send(outcome);
        });
        tracing::debug!(path = %path.display(), "manifest load started");
        Self { path, rx: Some(rx) }
    }

    /// The manifest path being loaded.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Take the outcome once the load has settled.
    ///
    /// Returns `None` while the load is still pending, and after the outcome
    /// has already been taken.
    pub fn try_finish(&mut self) -> Option<LoadOutcome> {
        let rx = self.rx.as_ref()?;
        match rx.try_recv() {
            Ok(outcome) => {
                self.rx = None;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                // Worker died without reporting; treat like an unreadable file.
                self.rx = None;
                Some(Err(LoadError::Read {
                    path: self.path.clone(),
                    source: std::io::Error::other("manifest loader stopped unexpectedly"),
                }))
            }
        }
    }

    /// Block until the load settles. Used by non-interactive modes.
    pub fn wait(mut self) -> LoadOutcome {
        let Some(rx) = self.rx.take() else {
            return Err(LoadError::Read {
                path: self.path,
                source: std::io::Error::other("manifest load already finished"),
            });
        };
        rx.recv().unwrap_or_else(|_| {
            Err(LoadError::Read {
                path: self.path.clone(),
                source: std::io::Error::other("manifest loader stopped unexpectedly"),
            })
        })
    }

    /// Returns true while the outcome has not been taken.
    pub const fn is_pending(&self) -> bool {
        self.rx.is_some()
    }
}
