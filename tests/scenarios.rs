use std::path::Path;

use ct::dispatcher::{Action, reduce};
use ct::domain::{DEFAULT_PAGE_SIZE_OPTIONS, Field, Message, SortDirection, TableConfig};
use ct::loader::{DataSource, load_or_empty};
use ct::model::{Model, Status};
use ct::pagination::render_controls;
use ct::presentation::{BodyPresentation, NO_RECORDS_TEXT, render_body};
use ct::record::Record;
use ct::view_state::ViewState;

fn fixture(name: &str) -> DataSource {
    DataSource::File(
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name),
    )
}

fn countries(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| Record {
            name: Some(format!("Country {i:03}")),
            capital: Some(format!("Capital {i:03}")),
            region: Some("Europe".into()),
            subregion: Some("Western Europe".into()),
            population: Some(((i * 7_919) % 1_000_003) as i64),
        })
        .collect()
}

#[test]
fn out_of_range_page_is_clamped() {
    let mut state = ViewState::new(Some(Field::Name), 20);
    state.set_dataset(countries(45));
    assert_eq!(state.total_pages(), 3);
    let state = reduce(state, &Action::GotoPage(5));
    assert_eq!(state.page_index(), 2);
}

#[test]
fn same_header_twice_flips_direction() {
    let mut state = ViewState::new(Some(Field::Name), 20);
    state.set_dataset(countries(45));
    let state = reduce(state, &Action::Sort(Field::Population));
    assert_eq!(state.sort_direction(), SortDirection::Ascending);
    let state = reduce(state, &Action::Sort(Field::Population));
    assert_eq!(state.sort_direction(), SortDirection::Descending);
    let populations: Vec<i64> = state
        .dataset()
        .unwrap_or_default()
        .iter()
        .filter_map(|r| r.population)
        .collect();
    assert!(populations.windows(2).all(|w| w[0] >= w[1]));

    let state = reduce(state, &Action::Sort(Field::Name));
    assert_eq!(state.sort_key(), Some(Field::Name));
    assert_eq!(state.sort_direction(), SortDirection::Ascending);
}

#[test]
fn failed_fetch_renders_empty_single_page() {
    let cfg = TableConfig {
        source: DataSource::Url("http://127.0.0.1:9/all".into()),
        ..TableConfig::default()
    };
    let mut model = Model::init(&cfg);
    let outcome = load_or_empty(&cfg.source, Some((Field::Name, SortDirection::Ascending)));
    assert!(outcome.error.is_some());
    model.update(Some(Message::DataLoaded(outcome))).unwrap();

    assert_eq!(model.status, Status::READY);
    let uidata = model.get_uidata();
    assert_eq!(uidata.body.placeholder(), Some(NO_RECORDS_TEXT));
    assert_eq!(uidata.controls.total_pages, 1);
    assert!(!uidata.controls.previous.enabled);
    assert!(!uidata.controls.next.enabled);
}

#[test]
fn row_index_is_absolute() {
    let mut state = ViewState::new(Some(Field::Name), 20);
    state.set_dataset(countries(60));
    state.set_sort(Field::Population);
    state.set_page(1);

    let columns = TableConfig::default().columns;
    let BodyPresentation::Rows(rows) = render_body(&state, &columns) else {
        panic!("expected rows");
    };
    let expected = state.dataset().unwrap_or_default()[37].display(Field::Name);
    let row = rows.iter().find(|r| r.cells[1] == expected).unwrap();
    assert_eq!(row.index, 38);
    assert_eq!(row.cells[0], "38");
}

#[test]
fn empty_dataset_has_one_page_and_placeholder() {
    let mut state = ViewState::new(None, 7);
    state.set_dataset(Vec::new());
    assert_eq!(state.total_pages(), 1);
    let columns = TableConfig::default().columns;
    assert_eq!(render_body(&state, &columns), BodyPresentation::Empty { span: 6 });
    let controls = render_controls(&state, &DEFAULT_PAGE_SIZE_OPTIONS);
    assert!(!controls.first.enabled && !controls.last.enabled);
}

#[test]
fn fixture_loads_end_to_end() {
    let cfg = TableConfig {
        source: fixture("countries.json"),
        page_size: 3,
        ..TableConfig::default()
    };
    let mut model = Model::init(&cfg);
    let outcome = load_or_empty(&cfg.source, Some((Field::Name, SortDirection::Ascending)));
    model.update(Some(Message::DataLoaded(outcome))).unwrap();
    assert_eq!(model.get_uidata().controls.page_summary, "page 1 of 3");

    model.update(Some(Message::LastPage)).unwrap();
    let BodyPresentation::Rows(rows) = &model.get_uidata().body else {
        panic!("expected rows");
    };
    let names: Vec<&str> = rows.iter().map(|r| r.cells[1].as_str()).collect();
    assert_eq!(names, vec!["Malta", "Peru"]);
    assert_eq!(rows[0].index, 7);
}
