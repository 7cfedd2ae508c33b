use std::collections::HashMap;

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered by the pager.
pub const PAGE_SIZE_OPTIONS: [usize; 3] = [5, 10, 25];

/// Zero-based page index and rows per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

impl PageState {
    pub fn first(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size.max(1))
    }

    /// The rows visible on this page; empty when the page is past the end.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.page.saturating_mul(self.page_size).min(items.len());
        let end = start.saturating_add(self.page_size).min(items.len());
        &items[start..end]
    }
}

/// Independent pager per entity id, created lazily on first access.
#[derive(Debug, Clone)]
pub struct PageStates {
    default_page_size: usize,
    states: HashMap<String, PageState>,
}

impl Default for PageStates {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageStates {
    pub fn new(default_page_size: usize) -> Self {
        Self {
            default_page_size: default_page_size.max(1),
            states: HashMap::new(),
        }
    }

    /// Current state for `id`, created at page 0 if unseen.
    pub fn get(&mut self, id: &str) -> PageState {
        *self.entry(id)
    }

    /// Current state without creating one.
    pub fn peek(&self, id: &str) -> Option<PageState> {
        self.states.get(id).copied()
    }

    pub fn set_page(&mut self, id: &str, page: usize) -> PageState {
        let state = self.entry(id);
        state.page = page;
        *state
    }

    /// Change rows per page; always returns to the first page.
    pub fn set_page_size(&mut self, id: &str, page_size: usize) -> PageState {
        let state = self.entry(id);
        *state = PageState::first(page_size);
        *state
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Forget every pager.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    fn entry(&mut self, id: &str) -> &mut PageState {
        let default_page_size = self.default_page_size;
        self.states
            .entry(id.to_string())
            .or_insert_with(|| PageState::first(default_page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_access_defaults_to_page_zero_size_ten() {
        let mut pages = PageStates::default();
        assert!(pages.peek("u1").is_none());
        assert_eq!(pages.get("u1"), PageState { page: 0, page_size: 10 });
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn pagers_are_independent() {
        let mut pages = PageStates::default();
        pages.set_page("u1", 2);
        assert_eq!(pages.get("u1").page, 2);
        assert_eq!(pages.get("u2").page, 0);
    }

    #[test]
    fn page_size_change_resets_page() {
        let mut pages = PageStates::default();
        pages.set_page("u1", 3);
        let state = pages.set_page_size("u1", 25);
        assert_eq!(state, PageState { page: 0, page_size: 25 });
    }

    #[test]
    fn slice_and_page_count() {
        let rows: Vec<u32> = (0..23).collect();
        let state = PageState { page: 2, page_size: 10 };
        assert_eq!(state.slice(&rows), &[20, 21, 22]);
        assert_eq!(state.page_count(rows.len()), 3);
        let past_end = PageState { page: 9, page_size: 10 };
        assert!(past_end.slice(&rows).is_empty());
    }

    #[test]
    fn clear_discards_all_state() {
        let mut pages = PageStates::new(5);
        pages.set_page("u1", 1);
        pages.clear();
        assert!(pages.is_empty());
        assert_eq!(pages.get("u1").page_size, 5);
    }
}
