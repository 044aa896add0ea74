//! Declarative description of the table derived from a `ViewState`.
//!
//! Nothing in here touches the terminal. `ui.rs` binds these values to widgets.

use crate::dispatcher::Action;
use crate::domain::{ColumnDescriptor, SortDirection};
use crate::view_state::ViewState;

pub const LOADING_TEXT: &str = "Loading ...";
pub const NO_RECORDS_TEXT: &str = "No Record Found.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub label: String,
    /// Direction marker when the table is sorted by this column.
    pub sorted: Option<SortDirection>,
    /// Dispatched when the cell is activated. Only sortable columns have one.
    pub action: Option<Action>,
}

impl HeaderCell {
    pub fn text(&self) -> String {
        match self.sorted {
            Some(direction) => format!("{} {}", self.label, direction.marker()),
            None => self.label.clone(),
        }
    }

    pub fn is_sortable(&self) -> bool {
        self.action.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPresentation {
    pub cells: Vec<HeaderCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPresentation {
    /// 1-based position in the full sorted dataset.
    pub index: usize,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyPresentation {
    /// Placeholder spanning `span` columns while the dataset is loading.
    Loading { span: usize },
    /// Placeholder spanning `span` columns for a loaded but empty dataset.
    Empty { span: usize },
    Rows(Vec<RowPresentation>),
}

impl BodyPresentation {
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            BodyPresentation::Loading { .. } => Some(LOADING_TEXT),
            BodyPresentation::Empty { .. } => Some(NO_RECORDS_TEXT),
            BodyPresentation::Rows(_) => None,
        }
    }
}

pub fn render_header(state: &ViewState, columns: &[ColumnDescriptor]) -> HeaderPresentation {
    let cells = columns
        .iter()
        .map(|column| {
            let sorted = match column.field {
                Some(field) if state.sort_key() == Some(field) => Some(state.sort_direction()),
                _ => None,
            };
            let action = match column.field {
                Some(field) if column.sortable => Some(Action::Sort(field)),
                _ => None,
            };
            HeaderCell {
                label: column.label.clone(),
                sorted,
                action,
            }
        })
        .collect();
    HeaderPresentation { cells }
}

pub fn render_body(state: &ViewState, columns: &[ColumnDescriptor]) -> BodyPresentation {
    let span = columns.len();
    if state.is_loading() {
        return BodyPresentation::Loading { span };
    }
    if state.is_empty() {
        return BodyPresentation::Empty { span };
    }

    let rows = state
        .page_rows()
        .map(|(position, record)| {
            let index = position + 1;
            let cells = columns
                .iter()
                .map(|column| match column.field {
                    Some(field) => record.display(field),
                    None => index.to_string(),
                })
                .collect();
            RowPresentation { index, cells }
        })
        .collect();
    BodyPresentation::Rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Field, default_columns};
    use crate::record::Record;
    use pretty_assertions::assert_eq;

    fn countries(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record {
                name: Some(format!("Country {i:03}")),
                capital: Some(format!("Capital {i:03}")),
                region: Some("Europe".into()),
                subregion: None,
                population: Some(i as i64 * 1000),
            })
            .collect()
    }

    #[test]
    fn header_marks_sort_column_and_sortable_cells() {
        let mut state = ViewState::new(Some(Field::Name), 20);
        state.set_sort(Field::Population);
        state.set_sort(Field::Population);
        let header = render_header(&state, &default_columns());

        let texts: Vec<String> = header.cells.iter().map(HeaderCell::text).collect();
        assert_eq!(
            texts,
            vec!["", "name", "capital", "region", "sub region", "population ▼"]
        );
        let sortable: Vec<bool> = header.cells.iter().map(HeaderCell::is_sortable).collect();
        assert_eq!(sortable, vec![false, true, false, false, false, true]);
        assert_eq!(header.cells[5].action, Some(Action::Sort(Field::Population)));
    }

    #[test]
    fn loading_placeholder_spans_all_columns() {
        let state = ViewState::new(Some(Field::Name), 20);
        let body = render_body(&state, &default_columns());
        assert_eq!(body, BodyPresentation::Loading { span: 6 });
        assert_eq!(body.placeholder(), Some(LOADING_TEXT));
    }

    #[test]
    fn empty_dataset_shows_no_records() {
        let mut state = ViewState::new(Some(Field::Name), 20);
        state.set_dataset(Vec::new());
        let body = render_body(&state, &default_columns());
        assert_eq!(body, BodyPresentation::Empty { span: 6 });
        assert_eq!(body.placeholder(), Some(NO_RECORDS_TEXT));
    }

    #[test]
    fn rows_use_absolute_index() {
        let mut state = ViewState::new(Some(Field::Name), 20);
        state.set_dataset(countries(45));
        state.set_page(1);
        let BodyPresentation::Rows(rows) = render_body(&state, &default_columns()) else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0].index, 21);
        // Sorted position 37 is shown as row 38.
        let row = rows.iter().find(|r| r.cells[1] == "Country 037").unwrap();
        assert_eq!(row.index, 38);
        assert_eq!(
            row.cells,
            vec!["38", "Country 037", "Capital 037", "Europe", "", "37000"]
        );
    }

    #[test]
    fn last_page_is_partial() {
        let mut state = ViewState::new(Some(Field::Name), 20);
        state.set_dataset(countries(45));
        state.set_page(2);
        let BodyPresentation::Rows(rows) = render_body(&state, &default_columns()) else {
            panic!("expected rows");
        };
        let indices: Vec<usize> = rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, (41..=45).collect::<Vec<_>>());
    }

    #[test]
    fn rendering_is_idempotent() {
        let mut state = ViewState::new(Some(Field::Name), 10);
        state.set_dataset(countries(25));
        state.set_sort(Field::Population);
        let columns = default_columns();
        assert_eq!(render_header(&state, &columns), render_header(&state, &columns));
        assert_eq!(render_body(&state, &columns), render_body(&state, &columns));
    }
}
