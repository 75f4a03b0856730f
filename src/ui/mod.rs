//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`style`]: Element style table and chrome colors
//!
//! The screen is a one-row header (menu button and title), the page body,
//! and a one-row footer with the previous/next affordances.

pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod status;

pub use overlays::{menu_index_at, menu_rect, menu_scroll_start};
pub use render::{ChromeLayout, chrome_layout, render};
pub use status::{FooterTargets, footer_targets};

pub const HEADER_ROWS: u16 = 1;
pub const FOOTER_ROWS: u16 = 1;
pub const DOCUMENT_LEFT_PADDING: u16 = 2;
/// Widest the page text is laid out, however wide the terminal is.
pub const MAX_CONTENT_WIDTH: u16 = 100;
/// Columns taken by the `≡` menu button at the left of the header.
pub const MENU_BUTTON_WIDTH: u16 = 3;

/// Rows available to page content for a terminal of `height` rows.
pub const fn document_rows(height: u16) -> u16 {
    height.saturating_sub(HEADER_ROWS + FOOTER_ROWS)
}

/// Columns page text is wrapped to for a terminal of `total_width` columns.
pub fn document_content_width(total_width: u16) -> u16 {
    total_width
        .saturating_sub(DOCUMENT_LEFT_PADDING * 2)
        .clamp(1, MAX_CONTENT_WIDTH)
}
