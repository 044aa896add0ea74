use std::ops::Range;

use tracing::trace;

use crate::compare::sort_records;
use crate::domain::{DEFAULT_PAGE_SIZE, Field, SortDirection};
use crate::record::Record;

/// Everything that decides what the table shows.
///
/// `dataset` is `None` while the initial load is in flight. After every
/// mutation `page_index * page_size < max(len, 1)` holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    sort_key: Option<Field>,
    sort_direction: SortDirection,
    page_index: usize,
    page_size: usize,
    dataset: Option<Vec<Record>>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(None, DEFAULT_PAGE_SIZE)
    }
}

impl ViewState {
    pub fn new(sort_key: Option<Field>, page_size: usize) -> Self {
        ViewState {
            sort_key,
            sort_direction: SortDirection::Ascending,
            page_index: 0,
            page_size: page_size.max(1),
            dataset: None,
        }
    }

    pub fn sort_key(&self) -> Option<Field> {
        self.sort_key
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn dataset(&self) -> Option<&[Record]> {
        self.dataset.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.dataset.is_none()
    }

    pub fn len(&self) -> usize {
        self.dataset.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of pages, at least one even for an empty dataset.
    pub fn total_pages(&self) -> usize {
        total_pages(self.len(), self.page_size)
    }

    pub fn is_first_page(&self) -> bool {
        self.page_index == 0
    }

    pub fn is_last_page(&self) -> bool {
        self.page_index + 1 >= self.total_pages()
    }

    /// Absolute dataset positions shown on the current page.
    pub fn page_range(&self) -> Range<usize> {
        let len = self.len();
        let begin = std::cmp::min(self.page_index * self.page_size, len);
        let end = std::cmp::min(begin + self.page_size, len);
        begin..end
    }

    /// Rows of the current page, paired with their absolute position.
    pub fn page_rows(&self) -> impl Iterator<Item = (usize, &Record)> {
        let range = self.page_range();
        let begin = range.start;
        self.dataset
            .as_deref()
            .map(|records| &records[range])
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(move |(offset, record)| (begin + offset, record))
    }

    /// Replaces the dataset wholesale. The records are taken as already sorted.
    pub fn set_dataset(&mut self, records: Vec<Record>) {
        trace!("Dataset replaced with {} records", records.len());
        self.dataset = Some(records);
        self.clamp_page();
    }

    /// Sorts by `key`. Selecting the current key again flips the direction,
    /// a new key starts ascending.
    pub fn set_sort(&mut self, key: Field) {
        if self.sort_key == Some(key) {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_key = Some(key);
            self.sort_direction = SortDirection::Ascending;
        }
        if let Some(records) = self.dataset.as_mut() {
            sort_records(records, key, self.sort_direction);
        }
        trace!("Sorted by {key} {}", self.sort_direction);
    }

    /// Selects a page, clamping `index` into `[0, total_pages)`.
    pub fn set_page(&mut self, index: i64) {
        let last = (self.total_pages() - 1) as i64;
        self.page_index = index.clamp(0, last) as usize;
        trace!("Page {index} requested, showing page {}", self.page_index);
    }

    /// Changes the page size and keeps the page index in range.
    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.clamp_page();
        trace!(
            "Page size {}, showing page {} of {}",
            self.page_size,
            self.page_index + 1,
            self.total_pages()
        );
    }

    fn clamp_page(&mut self) {
        self.page_index = std::cmp::min(self.page_index, self.total_pages() - 1);
    }
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    std::cmp::max(len.div_ceil(page_size.max(1)), 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn countries(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record {
                name: Some(format!("Country {i:03}")),
                population: Some((i as i64 * 7919) % 1000),
                ..Record::default()
            })
            .collect()
    }

    fn loaded(n: usize, page_size: usize) -> ViewState {
        let mut state = ViewState::new(Some(Field::Name), page_size);
        state.set_dataset(countries(n));
        state
    }

    #[test]
    fn starts_loading_on_first_page() {
        let state = ViewState::new(Some(Field::Name), 20);
        assert!(state.is_loading());
        assert_eq!(state.page_index(), 0);
        assert_eq!(state.total_pages(), 1);
        assert_eq!(state.page_range(), 0..0);
        assert_eq!(state.page_rows().count(), 0);
    }

    #[test]
    fn empty_dataset_has_one_page() {
        assert_eq!(total_pages(0, 7), 1);
        let state = loaded(0, 20);
        assert!(!state.is_loading());
        assert!(state.is_empty());
        assert_eq!(state.total_pages(), 1);
        assert!(state.is_first_page());
        assert!(state.is_last_page());
    }

    #[test]
    fn set_page_clamps_to_last_page() {
        let mut state = loaded(45, 20);
        assert_eq!(state.total_pages(), 3);
        state.set_page(5);
        assert_eq!(state.page_index(), 2);
        assert_eq!(state.page_range(), 40..45);
        state.set_page(-3);
        assert_eq!(state.page_index(), 0);
    }

    #[test]
    fn shrinking_page_count_moves_to_new_last_page() {
        let mut state = loaded(45, 10);
        state.set_page(4);
        assert_eq!(state.page_index(), 4);
        state.set_page_size(20);
        assert_eq!(state.page_index(), 2);
        state.set_page_size(100);
        assert_eq!(state.page_index(), 0);
    }

    #[test]
    fn page_size_zero_is_treated_as_one() {
        let mut state = loaded(3, 20);
        state.set_page_size(0);
        assert_eq!(state.page_size(), 1);
        assert_eq!(state.total_pages(), 3);
    }

    #[test]
    fn same_key_flips_direction_other_key_resets() {
        let mut state = loaded(10, 20);
        state.set_sort(Field::Population);
        assert_eq!(state.sort_key(), Some(Field::Population));
        assert_eq!(state.sort_direction(), SortDirection::Ascending);
        state.set_sort(Field::Population);
        assert_eq!(state.sort_direction(), SortDirection::Descending);
        let populations: Vec<i64> = state
            .dataset()
            .unwrap_or_default()
            .iter()
            .filter_map(|r| r.population)
            .collect();
        assert!(populations.windows(2).all(|w| w[0] >= w[1]));
        state.set_sort(Field::Name);
        assert_eq!(state.sort_key(), Some(Field::Name));
        assert_eq!(state.sort_direction(), SortDirection::Ascending);
    }

    #[test]
    fn sorting_while_loading_only_updates_key() {
        let mut state = ViewState::new(None, 20);
        state.set_sort(Field::Population);
        assert!(state.is_loading());
        assert_eq!(state.sort_key(), Some(Field::Population));
    }

    #[test]
    fn page_rows_carry_absolute_positions() {
        let mut state = loaded(45, 20);
        state.set_page(1);
        let positions: Vec<usize> = state.page_rows().map(|(i, _)| i).collect();
        assert_eq!(positions, (20..40).collect::<Vec<_>>());
    }

    proptest! {
        #[test]
        fn set_page_is_idempotent(len in 0usize..200, size in 1usize..50, index in any::<i64>()) {
            let mut once = loaded(len, size);
            once.set_page(index);
            let mut twice = once.clone();
            twice.set_page(index);
            prop_assert_eq!(&once, &twice);
            prop_assert!(once.page_index() * once.page_size() < std::cmp::max(once.len(), 1));
        }

        #[test]
        fn page_size_change_keeps_page_in_range(len in 0usize..200, page in 0i64..40, size in 1usize..120) {
            let mut state = loaded(len, 10);
            state.set_page(page);
            state.set_page_size(size);
            prop_assert!(state.page_index() < state.total_pages());
            prop_assert!(state.page_index() * state.page_size() < std::cmp::max(state.len(), 1));
        }
    }
}
