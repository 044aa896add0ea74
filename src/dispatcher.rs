use tracing::trace;

use crate::domain::Field;
use crate::view_state::ViewState;

/// A view state mutation, carried as data by header cells and pagination controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Sort(Field),
    GotoPage(i64),
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,
    SetPageSize(usize),
}

/// Applies `action` and returns the resulting state.
pub fn reduce(mut state: ViewState, action: &Action) -> ViewState {
    trace!("Dispatch {action:?}");
    let current = state.page_index() as i64;
    match *action {
        Action::Sort(field) => state.set_sort(field),
        Action::GotoPage(index) => state.set_page(index),
        Action::FirstPage => state.set_page(0),
        Action::PreviousPage => state.set_page(current - 1),
        Action::NextPage => state.set_page(current + 1),
        Action::LastPage => state.set_page(i64::MAX),
        Action::SetPageSize(size) => state.set_page_size(size),
    }
    state
}
