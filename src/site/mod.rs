//! Documentation manifest: the title and ordered pages a deck is built from.
//!
//! The manifest is a TOML file (by default `pages.toml`):
//!
//! ```toml
//! title = "Docs"
//!
//! [[pages]]
//! id = 1
//! title = "Intro"
//! content = "# Hello"
//! ```

mod loader;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use loader::{ConfigLoader, LoadOutcome};

/// Manifest file name used when none is given on the command line.
pub const DEFAULT_MANIFEST: &str = "pages.toml";

/// Title shown before a manifest has loaded, or when it failed to load.
pub const DEFAULT_TITLE: &str = "Documentation";

/// A parsed documentation manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Configuration {
    /// Document title (header bar and terminal window title)
    #[serde(default = "default_title")]
    pub title: String,
    /// Pages in display order
    #[serde(default)]
    pub pages: Vec<Page>,
}

/// One navigable page of markdown content.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Page {
    /// Stable key for the page. Never used for lookup.
    pub id: i64,
    /// Title shown in the menu and the prev/next controls
    pub title: String,
    /// Raw markdown
    pub content: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            title: default_title(),
            pages: Vec::new(),
        }
    }
}

impl Configuration {
    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns true when the manifest has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Get the page at `index`, if any.
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

/// Failure to produce a [`Configuration`] from the manifest.
///
/// Read and parse failures are reported separately but handled the same way
/// by the viewer: the document stays empty.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed manifest: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Parse manifest text into a [`Configuration`].
///
/// # Errors
///
/// Returns [`LoadError::Parse`] if the text is not valid TOML or does not
/// match the manifest shape.
pub fn parse_configuration(text: &str) -> Result<Configuration, LoadError> {
    let config: Configuration = toml::from_str(text)?;
    warn_on_duplicate_ids(&config);
    Ok(config)
}

/// Read and parse the manifest at `path`.
///
/// # Errors
///
/// Returns [`LoadError::Read`] when the file cannot be read and
/// [`LoadError::Parse`] when its contents are malformed.
pub fn load_configuration(path: &Path) -> Result<Configuration, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_configuration(&text)
}

fn warn_on_duplicate_ids(config: &Configuration) {
    let mut seen = HashSet::new();
    for page in &config.pages {
        if !seen.insert(page.id) {
            tracing::warn!(id = page.id, title = %page.title, "duplicate page id in manifest");
        }
    }
}
