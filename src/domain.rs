use std::fmt;
use std::io::Error;

use crate::loader::{DataSource, LoadOutcome};

pub const DEFAULT_DATA_URL: &str =
    "https://restcountries.com/v2/all?fields=name,capital,region,subregion,population";
pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];
pub const PAGE_WINDOW_WIDTH: usize = 5;

pub const HELP_TEXT: &str = "\
ct - country table viewer

  1-9          Sort by the n-th data column (sortable columns only)
  Tab/BackTab  Move the header focus between sortable columns
  Enter, s     Sort by the focused column (again to flip direction)
  Up, k        Scroll up within the page
  Down, j      Scroll down within the page
  Left, h      Previous page
  Right, l     Next page
  Home, g      First page
  End, G       Last page
  +, -         Next / previous page size
  ?            Show this help
  Esc          Close popup
  q            Quit";

#[derive(Debug)]
pub enum CtError {
    IoError(Error),
    HttpError(reqwest::Error),
    JsonError(serde_json::Error),
    NotAnArray,
    LoadingFailed(String),
    FileNotFound,
    PermissionDenied,
}

impl fmt::Display for CtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CtError::IoError(e) => write!(f, "I/O error: {e}"),
            CtError::HttpError(e) => write!(f, "HTTP error: {e}"),
            CtError::JsonError(e) => write!(f, "Invalid JSON: {e}"),
            CtError::NotAnArray => write!(f, "Expected a JSON array of records"),
            CtError::LoadingFailed(reason) => write!(f, "Loading failed: {reason}"),
            CtError::FileNotFound => write!(f, "File not found"),
            CtError::PermissionDenied => write!(f, "Permission denied"),
        }
    }
}

impl std::error::Error for CtError {}

impl From<Error> for CtError {
    fn from(err: Error) -> Self {
        CtError::IoError(err)
    }
}

impl From<reqwest::Error> for CtError {
    fn from(err: reqwest::Error) -> Self {
        CtError::HttpError(err)
    }
}

impl From<serde_json::Error> for CtError {
    fn from(err: serde_json::Error) -> Self {
        CtError::JsonError(err)
    }
}

/// The record fields a column can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Capital,
    Region,
    Subregion,
    Population,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Capital,
        Field::Region,
        Field::Subregion,
        Field::Population,
    ];

    /// Key of the field in the upstream payload.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Capital => "capital",
            Field::Region => "region",
            Field::Subregion => "subregion",
            Field::Population => "population",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Field::Population)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("ascending"),
            SortDirection::Descending => f.write_str("descending"),
        }
    }
}

/// Static mapping of a display label to a record field.
/// A descriptor without a field is the leading row index column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub label: String,
    pub field: Option<Field>,
    pub sortable: bool,
}

impl ColumnDescriptor {
    pub fn index() -> Self {
        Self {
            label: String::new(),
            field: None,
            sortable: false,
        }
    }

    pub fn new(label: &str, field: Field, sortable: bool) -> Self {
        Self {
            label: label.to_string(),
            field: Some(field),
            sortable,
        }
    }
}

pub fn default_columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::index(),
        ColumnDescriptor::new("name", Field::Name, true),
        ColumnDescriptor::new("capital", Field::Capital, false),
        ColumnDescriptor::new("region", Field::Region, false),
        ColumnDescriptor::new("sub region", Field::Subregion, false),
        ColumnDescriptor::new("population", Field::Population, true),
    ]
}

#[derive(Debug, Clone)]
pub struct TableConfig {
    pub event_poll_time: u64,
    pub source: DataSource,
    pub columns: Vec<ColumnDescriptor>,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub default_sort: Option<Field>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            source: DataSource::Url(DEFAULT_DATA_URL.to_string()),
            columns: default_columns(),
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            default_sort: Some(Field::Name),
        }
    }
}

#[derive(Debug)]
pub enum Message {
    Quit,
    SortColumn(usize),
    FocusNextColumn,
    FocusPreviousColumn,
    SortFocused,
    ScrollUp,
    ScrollDown,
    FirstPage,
    PreviousPage,
    NextPage,
    LastPage,
    IncreasePageSize,
    DecreasePageSize,
    Help,
    Exit,
    Resize(usize, usize),
    DataLoaded(LoadOutcome),
}
