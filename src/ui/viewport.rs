//! Scroll state for the page body.

use std::ops::Range;

/// The rows of the current page that fit between header and footer.
///
/// `height` counts body rows only; `width` is the full terminal width, which
/// the model narrows to the text column when laying a page out.
///
/// ```
/// use docdeck::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 20, 50);
/// vp.page_down();
/// assert_eq!(vp.visible_range(), 20..40);
/// vp.go_to_bottom();
/// assert_eq!(vp.offset(), 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    /// First visible line.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Lines on screen, never past the end of the page.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.height as usize).min(self.total_lines);
        self.offset.min(end)..end
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n).min(self.max_offset());
    }

    pub const fn page_up(&mut self) {
        self.scroll_up(self.height as usize);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height as usize);
    }

    pub const fn half_page_up(&mut self) {
        self.scroll_up(self.height as usize / 2);
    }

    pub fn half_page_down(&mut self) {
        self.scroll_down(self.height as usize / 2);
    }

    pub const fn go_to_top(&mut self) {
        self.offset = 0;
    }

    pub const fn go_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Whether rows remain below the visible range.
    pub const fn has_more_below(&self) -> bool {
        self.offset < self.max_offset()
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Called whenever the page is re-rendered.
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_page_cannot_scroll() {
        let mut vp = Viewport::new(80, 20, 5);
        vp.scroll_down(3);
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.visible_range(), 0..5);
        assert!(!vp.has_more_below());
    }

    #[test]
    fn test_scroll_down_stops_at_last_screen() {
        let mut vp = Viewport::new(80, 20, 50);
        vp.scroll_down(1000);
        assert_eq!(vp.offset(), 30);
        assert_eq!(vp.visible_range(), 30..50);
    }

    #[test]
    fn test_scroll_up_stops_at_top() {
        let mut vp = Viewport::new(80, 20, 50);
        vp.scroll_down(4);
        vp.scroll_up(10);
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_half_pages() {
        let mut vp = Viewport::new(80, 20, 50);
        vp.half_page_down();
        assert_eq!(vp.offset(), 10);
        vp.half_page_down();
        vp.half_page_up();
        assert_eq!(vp.offset(), 10);
    }

    #[test]
    fn test_page_up_from_bottom() {
        let mut vp = Viewport::new(80, 20, 50);
        vp.go_to_bottom();
        vp.page_up();
        assert_eq!(vp.offset(), 10);
        assert!(vp.has_more_below());
    }

    #[test]
    fn test_growing_viewport_pulls_offset_back() {
        let mut vp = Viewport::new(80, 20, 50);
        vp.go_to_bottom();
        vp.resize(120, 40);
        assert_eq!(vp.offset(), 10);
        assert_eq!(vp.width(), 120);
    }

    #[test]
    fn test_shorter_rerender_clamps_offset() {
        let mut vp = Viewport::new(80, 20, 50);
        vp.go_to_bottom();
        vp.set_total_lines(25);
        assert_eq!(vp.offset(), 5);
        vp.set_total_lines(0);
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.visible_range(), 0..0);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn visible_range_stays_inside_page(
                total_lines in 0..5000usize,
                height in 0..80u16,
                down in 0..5000usize,
                up in 0..5000usize,
            ) {
                let mut vp = Viewport::new(80, height, total_lines);
                vp.scroll_down(down);
                vp.scroll_up(up);

                let range = vp.visible_range();
                prop_assert!(range.start <= range.end);
                prop_assert!(range.end <= total_lines);
                prop_assert!(vp.offset() <= total_lines.saturating_sub(height as usize));
            }
        }
    }
}
