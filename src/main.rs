use std::fs::File;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use tracing::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use ct::controller::Controller;
use ct::domain::{
    CtError, DEFAULT_DATA_URL, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_OPTIONS, Message,
    SortDirection, TableConfig, default_columns,
};
use ct::loader::{self, DataSource};
use ct::model::{Model, Status};
use ct::ui::TableUI;

/// Interactive, sortable and paginated table of countries.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// URL returning a JSON array of country records
    #[arg(short, long, default_value = DEFAULT_DATA_URL, conflicts_with = "file")]
    url: String,

    /// Read the JSON array from a local file instead
    #[arg(short, long)]
    file: Option<String>,

    /// Rows per page
    #[arg(short = 'p', long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Selectable page sizes
    #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_PAGE_SIZE_OPTIONS)]
    page_sizes: Vec<usize>,

    /// Log file, the terminal is occupied by the table
    #[arg(long, default_value = "ct.log")]
    log_file: String,

    /// Event poll interval in milliseconds
    #[arg(long, default_value_t = 100)]
    event_poll_time: u64,
}

impl Args {
    fn to_config(&self) -> Result<TableConfig, CtError> {
        let source = match &self.file {
            Some(path) => DataSource::file(path)?,
            None => DataSource::Url(self.url.clone()),
        };

        let page_size = self.page_size.max(1);
        let mut page_size_options: Vec<usize> =
            self.page_sizes.iter().copied().filter(|&s| s > 0).collect();
        if !page_size_options.contains(&page_size) {
            page_size_options.push(page_size);
        }
        page_size_options.sort_unstable();
        page_size_options.dedup();

        Ok(TableConfig {
            event_poll_time: self.event_poll_time,
            source,
            columns: default_columns(),
            page_size,
            page_size_options,
            ..TableConfig::default()
        })
    }
}

fn init_logging(path: &str) -> Result<(), CtError> {
    let path = shellexpand::tilde(path);
    let file = File::create(&*path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging(&args.log_file) {
        eprintln!("Error: cannot open log file {}: {e}", args.log_file);
        return ExitCode::FAILURE;
    }

    let result = args.to_config().and_then(|cfg| {
        let mut terminal = ratatui::init();
        let result = run(&cfg, &mut terminal);
        ratatui::restore();
        result
    });

    match result {
        Err(e) => {
            error!("Exiting with error: {e:?}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn run(cfg: &TableConfig, terminal: &mut ratatui::DefaultTerminal) -> Result<(), CtError> {
    info!("Starting ct with {}", cfg.source.describe());

    let mut model = Model::init(cfg);
    let ui = TableUI::new(cfg);
    let controller = Controller::new(cfg);

    let loading = loader::spawn(
        cfg.source.clone(),
        cfg.default_sort.map(|key| (key, SortDirection::Ascending)),
    );
    let size = terminal.size()?;
    model.update(Some(Message::Resize(size.width as usize, size.height as usize)))?;

    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui.draw(&model, f))?;

        if model.status == Status::LOADING
            && let Some(outcome) = loader::poll(&loading)
        {
            model.update(Some(Message::DataLoaded(outcome)))?;
            continue;
        }

        // Handle events and map to a Message
        let message = controller.handle_event(&model)?;
        model.update(message)?;
    }

    info!("Bye!");
    Ok(())
}
