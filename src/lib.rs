// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. site::SiteLoader)
    clippy::module_name_repetitions
)]

//! # docdeck
//!
//! A terminal viewer for paged markdown documentation.
//!
//! A TOML manifest names a document title and an ordered list of pages.
//! docdeck shows one page at a time with:
//! - A header with the title and a `≡` page menu
//! - Previous/next affordances in the footer
//! - Styled markdown with syntax-highlighted code blocks
//! - Manifest watching for live preview
//! - Static HTML export of the same pages
//!
//! ## Architecture
//!
//! docdeck uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`site`]: Manifest types and background loading
//! - [`navigation`]: Current page index over a configuration
//! - [`document`]: Markdown parsing and terminal layout
//! - [`ui`]: Terminal UI components and the element style table
//! - [`html`]: HTML rendering and static export
//! - [`app`]: Main application loop and state
//! - [`highlight`]: Syntax highlighting
//! - [`watcher`]: Manifest watching

pub mod app;
pub mod document;
pub mod highlight;
pub mod html;
pub mod navigation;
pub mod site;
pub mod ui;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::{Document, ElementKind};
    pub use crate::navigation::PageStore;
    pub use crate::site::{Configuration, LoadError, Page};
    pub use crate::ui::viewport::Viewport;
}
