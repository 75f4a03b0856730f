//! Page store and index navigation.
//!
//! [`PageStore`] owns the loaded [`Configuration`] together with the index of
//! the page on screen. Every mutation clamps: the index never wraps and never
//! leaves `0..pages.len()`.

use crate::site::{Configuration, Page};

/// The loaded configuration plus the current page index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageStore {
    config: Configuration,
    current: usize,
}

impl PageStore {
    /// Create a store positioned on the first page.
    pub const fn new(config: Configuration) -> Self {
        Self { config, current: 0 }
    }

    /// The loaded configuration.
    pub const fn config(&self) -> &Configuration {
        &self.config
    }

    /// Document title.
    pub fn title(&self) -> &str {
        &self.config.title
    }

    /// All pages in display order.
    pub fn pages(&self) -> &[Page] {
        &self.config.pages
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.config.len()
    }

    /// Returns true when there are no pages.
    pub fn is_empty(&self) -> bool {
        self.config.is_empty()
    }

    /// Zero-based index of the current page.
    ///
    /// Always 0 for an empty store.
    pub const fn current_index(&self) -> usize {
        self.current
    }

    /// The page on screen, if any.
    pub fn current_page(&self) -> Option<&Page> {
        self.config.page(self.current)
    }

    /// Raw markdown of the current page, or the empty string.
    pub fn current_content(&self) -> &str {
        self.current_page().map_or("", |page| page.content.as_str())
    }

    /// The page before the current one, if any.
    pub fn previous_page(&self) -> Option<&Page> {
        self.current
            .checked_sub(1)
            .and_then(|index| self.config.page(index))
    }

    /// The page after the current one, if any.
    pub fn next_page(&self) -> Option<&Page> {
        self.config.page(self.current + 1)
    }

    /// Advance to the next page. Returns true if the index changed.
    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Go back to the previous page. Returns true if the index changed.
    pub const fn previous(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Move to `index`. Out-of-range indices are ignored.
    ///
    /// Returns true if the index changed.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.len() || index == self.current {
            return false;
        }
        self.current = index;
        true
    }

    /// Install a freshly loaded configuration, keeping the current index when
    /// it is still valid and clamping it otherwise.
    pub fn replace(&mut self, config: Configuration) {
        self.config = config;
        self.current = self.current.min(self.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn page(id: i64, title: &str, content: &str) -> Page {
        Page {
            id,
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    fn store_with(count: usize) -> PageStore {
        let pages = (0..count)
            .map(|i| page(i as i64 * 10, &format!("Page {i}"), &format!("content {i}")))
            .collect();
        PageStore::new(Configuration {
            title: "Docs".to_string(),
            pages,
        })
    }

    #[test]
    fn test_new_store_starts_at_first_page() {
        let store = store_with(3);
        assert_eq!(store.current_index(), 0);
        assert_eq!(store.current_content(), "content 0");
    }

    #[test]
    fn test_next_stops_at_last_page() {
        let mut store = store_with(2);
        assert!(store.next());
        assert_eq!(store.current_index(), 1);
        assert!(!store.next());
        assert_eq!(store.current_index(), 1);
    }

    #[test]
    fn test_previous_stops_at_first_page() {
        let mut store = store_with(2);
        assert!(!store.previous());
        assert_eq!(store.current_index(), 0);
    }

    #[test]
    fn test_adjacent_pages() {
        let mut store = store_with(3);
        assert!(store.previous_page().is_none());
        assert_eq!(store.next_page().unwrap().title, "Page 1");

        store.jump_to(1);
        assert_eq!(store.previous_page().unwrap().title, "Page 0");
        assert_eq!(store.next_page().unwrap().title, "Page 2");

        store.jump_to(2);
        assert_eq!(store.previous_page().unwrap().title, "Page 1");
        assert!(store.next_page().is_none());
    }

    #[test]
    fn test_jump_out_of_range_is_ignored() {
        let mut store = store_with(3);
        store.jump_to(1);
        assert!(!store.jump_to(3));
        assert_eq!(store.current_index(), 1);
    }

    #[test]
    fn test_jump_to_current_reports_no_change() {
        let mut store = store_with(3);
        store.jump_to(2);
        assert!(!store.jump_to(2));
        assert_eq!(store.current_index(), 2);
    }

    #[test]
    fn test_empty_store_never_indexes() {
        let mut store = PageStore::default();
        assert!(store.is_empty());
        assert_eq!(store.current_content(), "");
        assert!(store.current_page().is_none());
        assert!(store.previous_page().is_none());
        assert!(store.next_page().is_none());
        assert!(!store.next());
        assert!(!store.previous());
        assert!(!store.jump_to(0));
        assert_eq!(store.current_index(), 0);
        assert_eq!(store.title(), "Documentation");
    }

    #[test]
    fn test_replace_clamps_index_to_new_range() {
        let mut store = store_with(5);
        store.jump_to(4);
        store.replace(store_with(2).config().clone());
        assert_eq!(store.current_index(), 1);

        store.replace(Configuration::default());
        assert_eq!(store.current_index(), 0);
    }

    #[test]
    fn test_replace_keeps_valid_index() {
        let mut store = store_with(5);
        store.jump_to(2);
        store.replace(store_with(4).config().clone());
        assert_eq!(store.current_index(), 2);
    }

    proptest! {
        #[test]
        fn prop_jump_then_read_yields_that_page(count in 1usize..40, pick in 0usize..40) {
            let mut store = store_with(count);
            let target = pick % count;
            store.jump_to(target);
            prop_assert_eq!(store.current_index(), target);
            let expected = format!("content {target}");
            prop_assert_eq!(store.current_content(), expected.as_str());
        }

        #[test]
        fn prop_navigation_stays_in_bounds(
            count in 0usize..12,
            ops in proptest::collection::vec(0u8..3, 0..64),
            jumps in proptest::collection::vec(0usize..20, 64),
        ) {
            let mut store = store_with(count);
            for (op, jump) in ops.iter().zip(jumps.iter()) {
                match op {
                    0 => { store.next(); }
                    1 => { store.previous(); }
                    _ => { store.jump_to(*jump); }
                }
                if count == 0 {
                    prop_assert_eq!(store.current_index(), 0);
                } else {
                    prop_assert!(store.current_index() < count);
                }
            }
        }

        #[test]
        fn prop_boundaries_are_idempotent(count in 1usize..20) {
            let mut store = store_with(count);
            for _ in 0..count + 3 {
                store.next();
            }
            prop_assert_eq!(store.current_index(), count - 1);
            prop_assert!(!store.next());
            for _ in 0..count + 3 {
                store.previous();
            }
            prop_assert_eq!(store.current_index(), 0);
            prop_assert!(!store.previous());
        }
    }
}
