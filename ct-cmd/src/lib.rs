//! Command implementations for the city temperatures CLI.
//!
//! Each subcommand builds an HTTP-backed `Session`, drives it until every
//! request has settled, and renders the resulting view.

use anyhow::Context;
use clap::{Args, Subcommand};
use ct_data::filter::Selection;
use ct_record::http::{HttpStore, StoreConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use ct_record::RecordStore;
use ct_sync::{Session, SyncStatus, Update};
use log::{info, warn};
use std::time::Duration;

pub mod export;
pub mod render;
pub mod watch;

/// Where the record store lives.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Base URL of the record store (the `/cities` endpoint is appended)
    #[arg(long, env = "CITY_TEMPS_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "CITY_TEMPS_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl StoreArgs {
    pub fn config(&self) -> StoreConfig {
        StoreConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Threshold and band selection shared by the one-shot commands.
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Only fetch cities at or above this temperature
    #[arg(short = 'm', long, allow_hyphen_values = true)]
    pub min: Option<String>,

    /// Band to show: all, hot, warm or cool
    #[arg(short = 'b', long, default_value = "all")]
    pub band: Selection,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch records and print them grouped by band, with averages
    List {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Add a record, then print the refreshed view
    Add {
        /// City name
        #[arg(short = 'c', long)]
        city: String,

        /// Temperature
        #[arg(short = 't', long, allow_hyphen_values = true)]
        temp: String,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Print the band average chart series as JSON
    Chart {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Write the filtered records to a CSV file (band,city,temp)
    Export {
        /// Output path
        #[arg(short = 'o', long)]
        out: String,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Interactive session reading commands from stdin
    Watch {
        /// Initial minimum temperature
        #[arg(short = 'm', long, allow_hyphen_values = true)]
        min: Option<String>,
    },
}

pub async fn run(store: &StoreArgs, command: Command) -> anyhow::Result<()> {
    let http = HttpStore::new(&store.config()).context("failed to build HTTP client")?;
    info!("Using record store at {}", http.cities_url());

    match command {
        Command::List { view } => {
            let session = load(http, &view).await?;
            print!("{}", render::render_view(&session.view()?));
        }
        Command::Add { city, temp, view } => {
            let mut session = load(http, &view).await?;
            if !session.submit_new_record(&city, &temp) {
                warn!("Skipped add: a city and a numeric temperature are required");
            }
            for update in session.settle().await {
                if let Update::CreateFailed(record, e) = update {
                    warn!("Could not add {}: {}", record.city, e);
                }
            }
            print!("{}", render::render_view(&session.view()?));
        }
        Command::Chart { view } => {
            let session = load(http, &view).await?;
            let model = session.view()?;
            println!("{}", serde_json::to_string_pretty(&model.view.chart)?);
        }
        Command::Export { out, view } => {
            let session = load(http, &view).await?;
            let model = session.view()?;
            let rows = export::write_csv_file(&out, &model.view.filtered)
                .with_context(|| format!("failed to write {}", out))?;
            info!("Wrote {} rows to {}", rows, out);
        }
        Command::Watch { min } => {
            watch::run(http, min).await?;
        }
    }
    Ok(())
}

/// Apply the view arguments, fetch, and wait for the fetch to settle.
///
/// Fails when the list query fails, since a one-shot command has no
/// earlier data to fall back on.
pub async fn load<S: RecordStore + 'static>(
    store: S,
    view: &ViewArgs,
) -> anyhow::Result<Session<S>> {
    let mut session = Session::new(store);
    session.set_selection(view.band);
    session.set_threshold(view.min.as_deref().unwrap_or(""));
    if session.pending() == 0 {
        session.mount();
    }
    session.settle().await;

    let state = session.controller().state();
    if state.status() == SyncStatus::Failed {
        anyhow::bail!(
            "could not load cities: {}",
            state.error().unwrap_or("unknown error")
        );
    }
    Ok(session)
}
