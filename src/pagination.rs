use std::ops::Range;

use crate::dispatcher::Action;
use crate::domain::PAGE_WINDOW_WIDTH;
use crate::view_state::ViewState;

/// A navigation affordance. Disabled when activating it would not change the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub label: String,
    pub action: Action,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageButton {
    pub index: usize,
    pub label: String,
    pub current: bool,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSizeSelector {
    pub options: Vec<usize>,
    pub selected: usize,
    pub next: Option<Action>,
    pub previous: Option<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsPresentation {
    pub total_pages: usize,
    pub first: Control,
    pub previous: Control,
    pub pages: Vec<PageButton>,
    pub next: Control,
    pub last: Control,
    pub rows_per_page: String,
    pub page_summary: String,
    pub page_size: PageSizeSelector,
}

/// Up to `width` page indices around `current`, left biased and clipped to `[0, total)`.
pub fn page_window(current: usize, total: usize, width: usize) -> Range<usize> {
    let width = std::cmp::min(width, total);
    let start = current.saturating_sub(width / 2);
    let end = std::cmp::min(start + width, total);
    end.saturating_sub(width)..end
}

pub fn render_controls(state: &ViewState, page_size_options: &[usize]) -> ControlsPresentation {
    let total_pages = state.total_pages();
    let current = state.page_index();

    let control = |label: &str, action: Action, enabled: bool| Control {
        label: label.to_string(),
        action,
        enabled,
    };

    let pages = page_window(current, total_pages, PAGE_WINDOW_WIDTH)
        .map(|index| PageButton {
            index,
            label: (index + 1).to_string(),
            current: index == current,
            action: Action::GotoPage(index as i64),
        })
        .collect();

    ControlsPresentation {
        total_pages,
        first: control("«", Action::FirstPage, !state.is_first_page()),
        previous: control("<", Action::PreviousPage, !state.is_first_page()),
        pages,
        next: control(">", Action::NextPage, !state.is_last_page()),
        last: control("»", Action::LastPage, !state.is_last_page()),
        rows_per_page: format!("Showing max {} rows per page.", state.page_size()),
        page_summary: format!("page {} of {}", current + 1, total_pages),
        page_size: page_size_selector(state.page_size(), page_size_options),
    }
}

fn page_size_selector(selected: usize, options: &[usize]) -> PageSizeSelector {
    let position = options.iter().position(|&o| o == selected);
    let next = match position {
        Some(p) => options.get(p + 1).copied(),
        None => options.iter().copied().find(|&o| o > selected),
    };
    let previous = match position {
        Some(p) => p.checked_sub(1).and_then(|p| options.get(p).copied()),
        None => options.iter().copied().rev().find(|&o| o < selected),
    };
    PageSizeSelector {
        options: options.to_vec(),
        selected,
        next: next.map(Action::SetPageSize),
        previous: previous.map(Action::SetPageSize),
    }
}
