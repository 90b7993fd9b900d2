mod paths;
mod render;

use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use patient_messages_lib::pager::{PageState, PagerViewModel};
use patient_messages_lib::{ClientConfig, MessageClient, RecordId, RecordStore, TableView};
use simplelog::{Config, LevelFilter, WriteLogger};

/// Print the patient message table from a data endpoint.
#[derive(Debug, Parser)]
#[command(name = "patient-messages", version)]
struct Args {
    /// Data endpoint URL (overrides PATIENT_MESSAGES_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Request timeout in seconds (overrides PATIENT_MESSAGES_TIMEOUT_SECS)
    #[arg(long)]
    timeout: Option<u64>,

    /// Comma-separated ids to show as selected
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,

    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    page: usize,

    /// Rows per page
    #[arg(long, default_value_t = 10)]
    rows_per_page: usize,

    /// Log level written to the log file
    #[arg(long, default_value = "debug")]
    log_level: LevelFilter,
}

/// Start the file logger. Returns the log file path.
fn init_logging(level: LevelFilter) -> Result<Option<PathBuf>> {
    let Some(dir) = paths::log_dir() else {
        return Ok(None);
    };
    let (path, rotation) = paths::prepare_log_file(&dir)
        .with_context(|| format!("cannot rotate logs in {}", dir.display()))?;
    let file = File::create(&path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    WriteLogger::init(level, Config::default(), file).context("logger already initialised")?;

    if let Some(archived) = &rotation.archived {
        log::debug!("Previous log archived to {}", archived.display());
    }
    if rotation.removed > 0 {
        log::debug!("Removed {} old log files", rotation.removed);
    }
    Ok(Some(path))
}

fn parse_id(raw: &str) -> RecordId {
    let raw = raw.trim();
    raw.parse::<i64>()
        .map(RecordId::from)
        .unwrap_or_else(|_| RecordId::from(raw))
}

async fn run(args: Args) -> Result<()> {
    let mut config = match &args.endpoint {
        Some(endpoint) => ClientConfig::new(endpoint),
        None => ClientConfig::from_env(),
    }
    .context("invalid client configuration")?;
    if let Some(secs) = args.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let page = PageState::new(args.page, args.rows_per_page).context("invalid page")?;
    let selected: Vec<RecordId> = args
        .select
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| parse_id(s))
        .collect();

    let client = MessageClient::from_config(&config).context("cannot build HTTP client")?;
    log::info!("Loading patient messages from {}", client.endpoint());

    let store = RecordStore::new();
    store.mount(client);
    let state = tokio::select! {
        state = store.settled() => state,
        _ = tokio::signal::ctrl_c() => {
            store.unmount();
            bail!("interrupted");
        }
    };
    store.unmount();

    let count = state.records().len();
    let view = TableView::build(&state, &selected, PagerViewModel::new(count, page));
    print!("{}", render::render(&view));

    match view.error {
        Some(error) => Err(anyhow!("loading patient messages failed: {}", error)),
        None => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let args = Args::parse();
    match init_logging(args.log_level) {
        Ok(Some(path)) => log::debug!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => eprintln!("Warning: logging disabled: {:#}", e),
    }

    if let Err(e) = run(args).await {
        log::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
