use std::time::Instant;
use tracing::{error, info, trace};

use crate::dispatcher::{Action, reduce};
use crate::domain::{ColumnDescriptor, CtError, HELP_TEXT, Message, TableConfig};
use crate::loader::LoadOutcome;
use crate::pagination::{ControlsPresentation, render_controls};
use crate::presentation::{BodyPresentation, HeaderPresentation, render_body, render_header};
use crate::ui::{PAGINATION_HEIGHT, STATUSLINE_HEIGHT, TABLE_BORDER_HEIGHT, TABLE_HEADER_HEIGHT};
use crate::view_state::ViewState;

#[derive(Debug, PartialEq)]
pub enum Status {
    LOADING,
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    TABLE,
    POPUP,
}

/// Everything the UI needs for one frame. Rebuilt after every state change.
pub struct UIData {
    pub name: String,
    pub header: HeaderPresentation,
    pub body: BodyPresentation,
    pub controls: ControlsPresentation,
    pub focused_column: Option<usize>,
    pub row_offset: usize, // First page row drawn, the rest of the page is scrolled into view
    pub show_popup: bool,
    pub popup_message: String,
    pub status_message: String,
    pub last_update: Instant,
}

pub struct Model {
    config: TableConfig,
    pub status: Status,
    modus: Modus,
    previous_modus: Modus,
    state: ViewState,
    focused_column: Option<usize>, // Index into config.columns, always a sortable column
    row_offset: usize,
    table_height: Option<usize>, // Rows that fit below the header, unknown until the first resize
    uidata: UIData,
    status_message: String,
}

impl Model {
    pub fn init(config: &TableConfig) -> Self {
        let state = ViewState::new(config.default_sort, config.page_size);
        let focused_column = Self::initial_focus(&config.columns, &state);
        let uidata = Self::build_uidata(config, &state, focused_column, "Loading ...");
        let mut model = Self {
            config: config.clone(),
            status: Status::LOADING,
            modus: Modus::TABLE,
            previous_modus: Modus::TABLE,
            state,
            focused_column,
            row_offset: 0,
            table_height: None,
            uidata,
            status_message: String::new(),
        };
        model.set_status_message(format!("Loading {} ...", config.source.describe()));
        model
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), CtError> {
        if let Some(msg) = message {
            match self.modus {
                Modus::TABLE => match msg {
                    Message::Quit => self.quit(),
                    Message::SortColumn(n) => self.sort_nth_column(n),
                    Message::FocusNextColumn => self.move_focus(1),
                    Message::FocusPreviousColumn => self.move_focus(-1),
                    Message::SortFocused => self.sort_focused_column(),
                    Message::ScrollUp => self.scroll(-1),
                    Message::ScrollDown => self.scroll(1),
                    Message::FirstPage => self.navigate(Action::FirstPage),
                    Message::PreviousPage => self.navigate(Action::PreviousPage),
                    Message::NextPage => self.navigate(Action::NextPage),
                    Message::LastPage => self.navigate(Action::LastPage),
                    Message::IncreasePageSize => {
                        let next = self.uidata.controls.page_size.next;
                        self.change_page_size(next)
                    }
                    Message::DecreasePageSize => {
                        let previous = self.uidata.controls.page_size.previous;
                        self.change_page_size(previous)
                    }
                    Message::Help => self.show_help(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    Message::DataLoaded(outcome) => self.data_loaded(outcome),
                    Message::Exit => (),
                },
                Modus::POPUP => match msg {
                    Message::Quit => self.quit(),
                    Message::Resize(width, height) => self.ui_resize(width, height),
                    Message::DataLoaded(outcome) => self.data_loaded(outcome),
                    Message::Exit => self.exit(),
                    _ => (),
                },
            }
        }
        Ok(())
    }

    pub fn get_uidata(&self) -> &UIData {
        &self.uidata
    }

    pub fn view_state(&self) -> &ViewState {
        &self.state
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    /// Applies an action to the view state and re-renders header, body and controls.
    /// Every page, sort or page size change starts again at the top of the page.
    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, &action);
        self.row_offset = 0;
        self.update_uidata_for_table();
    }

    // -------------------- Control handling functions ---------------------- //

    fn data_loaded(&mut self, outcome: LoadOutcome) {
        let LoadOutcome {
            records,
            error,
            duration_ms,
        } = outcome;
        let nrecords = records.len();
        self.state.set_dataset(records);
        self.status = Status::READY;
        self.row_offset = 0;
        match error {
            Some(e) => {
                error!("No data available: {e}");
                self.set_status_message(format!("Failed to load data: {e}"));
            }
            None => {
                info!("Showing {nrecords} records");
                self.set_status_message(format!("Loaded {nrecords} records in {duration_ms}ms ..."));
            }
        }
        self.update_uidata_for_table();
    }

    fn navigate(&mut self, action: Action) {
        // Paging only makes sense once the data is there.
        if self.status != Status::READY {
            return;
        }
        self.dispatch(action);
    }

    fn change_page_size(&mut self, action: Option<Action>) {
        if self.status != Status::READY {
            return;
        }
        if let Some(action) = action {
            self.dispatch(action);
            self.set_status_message(format!("Showing {} rows per page", self.state.page_size()));
        }
    }

    fn sort_nth_column(&mut self, n: usize) {
        if self.status != Status::READY {
            return;
        }
        // n counts data columns, the index column is skipped
        let column = self
            .config
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.field.is_some())
            .nth(n.saturating_sub(1))
            .map(|(idx, c)| (idx, c.sortable));
        match column {
            Some((idx, true)) => {
                self.focused_column = Some(idx);
                self.sort_focused_column();
            }
            Some((idx, false)) => {
                let label = self.config.columns[idx].label.clone();
                self.set_status_message(format!("Column \"{label}\" is not sortable"));
            }
            None => trace!("No data column {n}"),
        }
    }

    fn sort_focused_column(&mut self) {
        if self.status != Status::READY {
            return;
        }
        let Some(idx) = self.focused_column else {
            return;
        };
        let Some(action) = self.uidata.header.cells.get(idx).and_then(|c| c.action) else {
            return;
        };
        self.dispatch(action);
        if let Some(key) = self.state.sort_key() {
            let direction = self.state.sort_direction();
            self.set_status_message(format!("Sorted by {key} {direction}"));
        }
    }

    fn scroll(&mut self, step: isize) {
        if self.status != Status::READY {
            return;
        }
        let offset = self.row_offset.saturating_add_signed(step).min(self.max_row_offset());
        if offset != self.row_offset {
            trace!("Scrolled page rows to offset {offset}");
            self.row_offset = offset;
            self.uidata.row_offset = offset;
            self.uidata.last_update = Instant::now();
        }
    }

    /// Largest offset that still fills the table area with page rows.
    fn max_row_offset(&self) -> usize {
        let rows = self.state.page_range().len();
        match self.table_height {
            Some(height) => rows.saturating_sub(height),
            None => 0,
        }
    }

    fn move_focus(&mut self, step: isize) {
        let sortable: Vec<usize> = self
            .config
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.sortable && c.field.is_some())
            .map(|(idx, _)| idx)
            .collect();
        if sortable.is_empty() {
            return;
        }
        let position = self
            .focused_column
            .and_then(|f| sortable.iter().position(|&idx| idx == f))
            .unwrap_or(0) as isize;
        let next = (position + step).rem_euclid(sortable.len() as isize) as usize;
        self.focused_column = Some(sortable[next]);
        trace!("Header focus on column {}", sortable[next]);
        self.uidata.focused_column = self.focused_column;
        self.uidata.last_update = Instant::now();
    }

    fn show_help(&mut self) {
        self.previous_modus = self.modus;
        self.modus = Modus::POPUP;
        self.uidata.popup_message = HELP_TEXT.to_string();
        self.uidata.show_popup = true;
        self.uidata.last_update = Instant::now();
    }

    fn exit(&mut self) {
        if self.modus == Modus::POPUP {
            trace!("Close popup ...");
            self.modus = self.previous_modus;
            self.previous_modus = Modus::POPUP;
            self.uidata.show_popup = false;
            self.uidata.last_update = Instant::now();
        }
    }

    fn ui_resize(&mut self, width: usize, height: usize) {
        trace!("UI was resized! w:{width}, h:{height}");
        let chrome =
            PAGINATION_HEIGHT + STATUSLINE_HEIGHT + TABLE_BORDER_HEIGHT + TABLE_HEADER_HEIGHT;
        self.table_height = Some(height.saturating_sub(chrome as usize).max(1));
        self.row_offset = self.row_offset.min(self.max_row_offset());
        self.update_uidata_for_table();
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.uidata.status_message = self.status_message.clone();
        self.uidata.last_update = Instant::now();
    }

    fn update_uidata_for_table(&mut self) {
        let show_popup = self.uidata.show_popup;
        let popup_message = std::mem::take(&mut self.uidata.popup_message);
        self.uidata = Self::build_uidata(
            &self.config,
            &self.state,
            self.focused_column,
            &self.status_message,
        );
        self.uidata.row_offset = self.row_offset;
        self.uidata.show_popup = show_popup;
        self.uidata.popup_message = popup_message;
    }

    fn build_uidata(
        config: &TableConfig,
        state: &ViewState,
        focused_column: Option<usize>,
        status_message: &str,
    ) -> UIData {
        UIData {
            name: config.source.describe(),
            header: render_header(state, &config.columns),
            body: render_body(state, &config.columns),
            controls: render_controls(state, &config.page_size_options),
            focused_column,
            row_offset: 0,
            show_popup: false,
            popup_message: String::new(),
            status_message: status_message.to_string(),
            last_update: Instant::now(),
        }
    }

    fn initial_focus(columns: &[ColumnDescriptor], state: &ViewState) -> Option<usize> {
        let sortable = |c: &ColumnDescriptor| c.sortable && c.field.is_some();
        columns
            .iter()
            .position(|c| sortable(c) && c.field == state.sort_key())
            .or_else(|| columns.iter().position(sortable))
    }
}
