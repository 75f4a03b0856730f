//! Markdown page rendering for the terminal.
//!
//! A page's raw markdown is parsed with comrak and laid out as styled
//! [`RenderedLine`]s. Every line and inline span carries an [`ElementKind`]
//! so the UI can look its style up in one table.

mod parser;
mod types;

pub use parser::{markdown_options, parse, parse_with_layout};
pub(crate) use parser::extract_text;
pub use types::{
    Document, ElementKind, InlineColor, InlineSpan, InlineStyle, LineType, RenderedLine,
};
