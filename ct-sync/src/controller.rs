//! The sync state machine.
//!
//! States: `Idle -> Loading -> (Ready | Failed)`. Every list query carries a
//! generation number; only a response for the latest generation is applied,
//! so a slow response to an older threshold can never overwrite a newer one.

use chrono::{DateTime, Utc};
use ct_data::aggregate::EmptyAggregationError;
use ct_data::filter::Selection;
use ct_record::{CreateError, FetchError, Record};
use ct_utils::input::{parse_temp, parse_threshold};
use ct_view::{derive_view, DerivedView};
use log::{debug, info, warn};
use serde::Serialize;

/// Freshness of the local record collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// A `GET /cities?min=<min>` request issued by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub generation: u64,
    pub min: f64,
}

/// A `POST /cities` request issued by the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCommand {
    pub record: Record,
}

/// Whether a list response was applied or dropped as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutcome {
    Applied,
    Stale,
}

/// Application state owned by the controller.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Exactly the last successful list response
    records: Vec<Record>,
    selection: Selection,
    /// Raw threshold text as entered
    threshold: String,
    status: SyncStatus,
    /// Message from the last failed list query, cleared on success
    error: Option<String>,
    /// Message from the last failed create, cleared on the next success
    last_create_error: Option<String>,
    last_synced: Option<DateTime<Utc>>,
}

impl AppState {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn threshold(&self) -> &str {
        &self.threshold
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_create_error(&self) -> Option<&str> {
        self.last_create_error.as_deref()
    }

    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.last_synced
    }

    pub fn is_loading(&self) -> bool {
        self.status == SyncStatus::Loading
    }
}

/// Snapshot handed to the presentation layer after each transition.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ViewModel {
    pub status: SyncStatus,
    pub loading: bool,
    pub error: Option<String>,
    pub create_error: Option<String>,
    pub threshold: String,
    pub last_synced: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub view: DerivedView,
}

#[derive(Debug, Default)]
pub struct SyncController {
    state: AppState,
    latest_generation: u64,
}

impl SyncController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Generation of the most recently issued list query (0 before mount).
    pub fn latest_generation(&self) -> u64 {
        self.latest_generation
    }

    /// Initial load.
    pub fn mount(&mut self) -> ListQuery {
        self.issue_list()
    }

    /// Re-run the list query for the current threshold.
    pub fn refresh(&mut self) -> ListQuery {
        self.issue_list()
    }

    /// Update the threshold text; a change issues a new list query.
    pub fn set_threshold(&mut self, raw: &str) -> Option<ListQuery> {
        if self.state.threshold == raw {
            return None;
        }
        self.state.threshold = raw.to_string();
        Some(self.issue_list())
    }

    pub fn set_selection(&mut self, selection: Selection) {
        debug!("Selection changed to {}", selection);
        self.state.selection = selection;
    }

    fn issue_list(&mut self) -> ListQuery {
        self.latest_generation += 1;
        self.state.status = SyncStatus::Loading;
        let query = ListQuery {
            generation: self.latest_generation,
            min: parse_threshold(&self.state.threshold),
        };
        debug!("Issuing list query #{} (min={})", query.generation, query.min);
        query
    }

    /// Apply the result of a list query.
    ///
    /// Results for anything but the latest query are discarded untouched.
    pub fn apply_list(
        &mut self,
        query: &ListQuery,
        result: Result<Vec<Record>, FetchError>,
    ) -> ListOutcome {
        if query.generation != self.latest_generation {
            debug!(
                "Discarding stale list response #{} (latest is #{})",
                query.generation, self.latest_generation
            );
            return ListOutcome::Stale;
        }

        match result {
            Ok(records) => {
                info!("Loaded {} records (min={})", records.len(), query.min);
                self.state.records = records;
                self.state.status = SyncStatus::Ready;
                self.state.error = None;
                self.state.last_synced = Some(Utc::now());
            }
            Err(e) => {
                warn!("List query #{} failed: {}", query.generation, e);
                self.state.status = SyncStatus::Failed;
                self.state.error = Some(e.to_string());
            }
        }
        ListOutcome::Applied
    }

    /// Validate form input for a new record.
    ///
    /// Returns `None`, and issues nothing, when the city is blank or the
    /// temperature is not a finite number.
    pub fn submit_new_record(&self, city: &str, temp: &str) -> Option<CreateCommand> {
        let city = city.trim();
        if city.is_empty() {
            return None;
        }
        let temp = parse_temp(temp)?;
        Some(CreateCommand {
            record: Record::new(city, temp),
        })
    }

    /// Apply the result of a create command.
    ///
    /// Success always re-fetches, since the new record may or may not pass
    /// the current threshold. Failure leaves the list state alone.
    pub fn apply_create(
        &mut self,
        command: &CreateCommand,
        result: Result<(), CreateError>,
    ) -> Option<ListQuery> {
        match result {
            Ok(()) => {
                info!("Created record for {}", command.record.city);
                self.state.last_create_error = None;
                Some(self.issue_list())
            }
            Err(e) => {
                warn!("Create for {} failed: {}", command.record.city, e);
                self.state.last_create_error = Some(e.to_string());
                None
            }
        }
    }

    /// Derive the view model for the current state.
    pub fn view(&self) -> Result<ViewModel, EmptyAggregationError> {
        let state = &self.state;
        Ok(ViewModel {
            status: state.status,
            loading: state.is_loading(),
            error: state.error.clone(),
            create_error: state.last_create_error.clone(),
            threshold: state.threshold.clone(),
            last_synced: state.last_synced,
            view: derive_view(&state.records, state.selection)?,
        })
    }
}
