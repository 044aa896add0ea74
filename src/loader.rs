use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, error, info, trace};

use crate::compare::sort_records;
use crate::domain::{CtError, Field, SortDirection};
use crate::record::Record;

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    /// Builds a file source, expanding `~` and environment variables.
    pub fn file(path: &str) -> Result<Self, CtError> {
        let expanded = shellexpand::full(path)
            .map_err(|e| CtError::LoadingFailed(format!("Cannot expand {path}: {e}")))?;
        Ok(DataSource::File(PathBuf::from(expanded.into_owned())))
    }

    pub fn describe(&self) -> String {
        match self {
            DataSource::Url(url) => url.clone(),
            DataSource::File(path) => path.to_string_lossy().to_string(),
        }
    }
}

/// Result of the initial load. A failed load still carries an (empty) dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub records: Vec<Record>,
    pub error: Option<String>,
    pub duration_ms: u128,
}

/// Fetches the payload and projects every element onto the record schema.
pub fn load(source: &DataSource) -> Result<Vec<Record>, CtError> {
    let payload = match source {
        DataSource::Url(url) => fetch_url(url)?,
        DataSource::File(path) => read_file(path)?,
    };
    project_all(&payload)
}

/// Loads and pre-sorts the dataset. Failures are logged and turn into an empty dataset.
pub fn load_or_empty(source: &DataSource, sort: Option<(Field, SortDirection)>) -> LoadOutcome {
    let start_time = Instant::now();
    let (mut records, error) = match load(source) {
        Ok(records) => (records, None),
        Err(e) => {
            error!("Loading {} failed: {e}", source.describe());
            (Vec::new(), Some(e.to_string()))
        }
    };
    if let Some((key, direction)) = sort {
        sort_records(&mut records, key, direction);
    }
    let duration_ms = start_time.elapsed().as_millis();
    info!(
        "Loaded {} records from {} in {duration_ms}ms",
        records.len(),
        source.describe()
    );
    for r in records.iter() {
        trace!("Record: {r:?}");
    }
    LoadOutcome {
        records,
        error,
        duration_ms,
    }
}

/// Runs `load_or_empty` on a worker thread. The outcome arrives on the returned channel.
pub fn spawn(source: DataSource, sort: Option<(Field, SortDirection)>) -> Receiver<LoadOutcome> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let outcome = load_or_empty(&source, sort);
        if tx.send(outcome).is_err() {
            debug!("Load finished after the receiver was dropped");
        }
    });
    rx
}

/// Takes the outcome if the worker has delivered it. A worker that died without
/// sending anything is reported as a failed load, so the table never stays in loading.
pub fn poll(rx: &Receiver<LoadOutcome>) -> Option<LoadOutcome> {
    match rx.try_recv() {
        Ok(outcome) => Some(outcome),
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Disconnected) => {
            let e = CtError::LoadingFailed("loader stopped without delivering data".to_string());
            error!("{e}");
            Some(LoadOutcome {
                records: Vec::new(),
                error: Some(e.to_string()),
                duration_ms: 0,
            })
        }
    }
}

fn fetch_url(url: &str) -> Result<Value, CtError> {
    debug!("GET {url}");
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(response.json::<Value>()?)
}

fn read_file(path: &Path) -> Result<Value, CtError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CtError::FileNotFound,
        ErrorKind::PermissionDenied => CtError::PermissionDenied,
        _ => CtError::IoError(e),
    })?;
    Ok(serde_json::from_str(&content)?)
}

fn project_all(payload: &Value) -> Result<Vec<Record>, CtError> {
    let items = payload.as_array().ok_or(CtError::NotAnArray)?;
    Ok(items.iter().map(Record::project).collect())
}
