//! Async driver that connects a `SyncController` to a `RecordStore`.
//!
//! Requests run on spawned tokio tasks so issuing one never blocks the
//! caller. Finished tasks are joined through a `JoinSet` and applied to the
//! controller one at a time, in arrival order; the controller's generation
//! check takes care of responses that arrive out of order. A store call that
//! panics or is cancelled still completes, as a transport error.

use crate::controller::{CreateCommand, ListOutcome, ListQuery, SyncController, ViewModel};
use ct_data::aggregate::EmptyAggregationError;
use ct_data::filter::Selection;
use ct_record::{CreateError, FetchError, Record, RecordStore};
use log::{debug, error};
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};

enum Completion {
    List(ListQuery, Result<Vec<Record>, FetchError>),
    Create(CreateCommand, Result<(), CreateError>),
}

/// What applying one completion did to the state.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// The latest list query succeeded and replaced the records
    Synced,
    /// The latest list query failed; records are stale
    FetchFailed(FetchError),
    /// A superseded list response was dropped
    Discarded,
    /// A record was created and a refresh was issued
    Created(Record),
    CreateFailed(Record, CreateError),
}

pub struct Session<S: ?Sized> {
    store: Arc<S>,
    controller: SyncController,
    tasks: JoinSet<Completion>,
}

impl<S: RecordStore + 'static> Session<S> {
    pub fn new(store: S) -> Self {
        Self::from_shared(Arc::new(store))
    }
}

impl<S: RecordStore + ?Sized + 'static> Session<S> {
    pub fn from_shared(store: Arc<S>) -> Self {
        Self {
            store,
            controller: SyncController::new(),
            tasks: JoinSet::new(),
        }
    }

    pub fn controller(&self) -> &SyncController {
        &self.controller
    }

    pub fn view(&self) -> Result<ViewModel, EmptyAggregationError> {
        self.controller.view()
    }

    /// Number of requests still in flight.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn mount(&mut self) {
        let query = self.controller.mount();
        self.dispatch_list(query);
    }

    pub fn refresh(&mut self) {
        let query = self.controller.refresh();
        self.dispatch_list(query);
    }

    pub fn set_threshold(&mut self, raw: &str) {
        if let Some(query) = self.controller.set_threshold(raw) {
            self.dispatch_list(query);
        }
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.controller.set_selection(selection);
    }

    /// Submit a new record. Returns `false` when the input was skipped.
    pub fn submit_new_record(&mut self, city: &str, temp: &str) -> bool {
        match self.controller.submit_new_record(city, temp) {
            Some(command) => {
                self.dispatch_create(command);
                true
            }
            None => {
                debug!("Ignoring incomplete record input");
                false
            }
        }
    }

    fn dispatch_list(&mut self, query: ListQuery) {
        let store = Arc::clone(&self.store);
        let min = query.min;
        let request = tokio::spawn(async move { store.list(min).await });
        self.tasks.spawn(async move {
            let result = request
                .await
                .unwrap_or_else(|e| Err(FetchError::Transport(task_failure(e))));
            Completion::List(query, result)
        });
    }

    fn dispatch_create(&mut self, command: CreateCommand) {
        let store = Arc::clone(&self.store);
        let record = command.record.clone();
        let request = tokio::spawn(async move { store.create(&record).await });
        self.tasks.spawn(async move {
            let result = request
                .await
                .unwrap_or_else(|e| Err(CreateError::Transport(task_failure(e))));
            Completion::Create(command, result)
        });
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_update(&mut self) -> Option<Update> {
        let completion = loop {
            match self.tasks.join_next().await? {
                Ok(completion) => break completion,
                Err(e) => error!("Request task ended without a completion: {}", e),
            }
        };

        let update = match completion {
            Completion::List(query, result) => {
                let failure = result.as_ref().err().cloned();
                match (self.controller.apply_list(&query, result), failure) {
                    (ListOutcome::Stale, _) => Update::Discarded,
                    (ListOutcome::Applied, None) => Update::Synced,
                    (ListOutcome::Applied, Some(e)) => Update::FetchFailed(e),
                }
            }
            Completion::Create(command, result) => {
                let failure = result.as_ref().err().cloned();
                if let Some(query) = self.controller.apply_create(&command, result) {
                    self.dispatch_list(query);
                }
                match failure {
                    None => Update::Created(command.record),
                    Some(e) => Update::CreateFailed(command.record, e),
                }
            }
        };
        Some(update)
    }

    /// Apply completions until nothing is in flight, including any
    /// refreshes issued along the way.
    pub async fn settle(&mut self) -> Vec<Update> {
        let mut updates = Vec::new();
        while let Some(update) = self.next_update().await {
            updates.push(update);
        }
        updates
    }
}

fn task_failure(e: JoinError) -> String {
    error!("Store request task failed: {}", e);
    if e.is_panic() {
        "request task panicked".to_string()
    } else {
        format!("request task failed: {}", e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::SyncStatus;
    use async_trait::async_trait;
    use ct_record::Band;
    use std::sync::Mutex;
    use std::time::Duration;

    /// In-memory store. List calls for `slow_min` are delayed so their
    /// response arrives after later queries.
    struct FakeStore {
        records: Mutex<Vec<Record>>,
        slow_min: Option<f64>,
        fail_list: bool,
        fail_create: bool,
        panic_list: bool,
        panic_create: bool,
        list_calls: Mutex<Vec<f64>>,
    }

    impl FakeStore {
        fn new(records: Vec<Record>) -> Self {
            Self {
                records: Mutex::new(records),
                slow_min: None,
                fail_list: false,
                fail_create: false,
                panic_list: false,
                panic_create: false,
                list_calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RecordStore for FakeStore {
        async fn list(&self, min: f64) -> Result<Vec<Record>, FetchError> {
            self.list_calls.lock().unwrap().push(min);
            if self.slow_min == Some(min) {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            if self.panic_list {
                panic!("list blew up");
            }
            if self.fail_list {
                return Err(FetchError::Status(503));
            }
            let records = self.records.lock().unwrap();
            Ok(records.iter().filter(|r| r.temp >= min).cloned().collect())
        }

        async fn create(&self, record: &Record) -> Result<(), CreateError> {
            if self.panic_create {
                panic!("create blew up");
            }
            if self.fail_create {
                return Err(CreateError::Status(500));
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    fn scenario() -> Vec<Record> {
        vec![
            Record::new("Austin", 35.0),
            Record::new("Boston", 18.0),
            Record::new("Denver", 22.0),
        ]
    }

    #[tokio::test]
    async fn test_mount_and_settle() {
        let mut session = Session::new(FakeStore::new(scenario()));
        session.mount();
        assert_eq!(session.pending(), 1);
        assert_eq!(session.settle().await, vec![Update::Synced]);

        let view = session.view().unwrap();
        assert_eq!(view.status, SyncStatus::Ready);
        assert_eq!(view.view.chart.labels, vec![Band::Hot, Band::Warm, Band::Cool]);
        assert_eq!(view.view.chart.values, vec![35, 22, 18]);
    }

    #[tokio::test]
    async fn test_slow_initial_query_is_superseded() {
        let mut store = FakeStore::new(scenario());
        store.slow_min = Some(0.0);
        let mut session = Session::new(store);

        session.mount();
        session.set_threshold("25");
        let updates = session.settle().await;

        assert_eq!(updates, vec![Update::Synced, Update::Discarded]);
        let records = session.controller().state().records();
        assert_eq!(records, &[Record::new("Austin", 35.0)]);
    }

    #[tokio::test]
    async fn test_slow_latest_query_still_wins() {
        let mut store = FakeStore::new(scenario());
        store.slow_min = Some(25.0);
        let mut session = Session::new(store);

        session.mount();
        session.set_threshold("25");
        let updates = session.settle().await;

        assert_eq!(updates, vec![Update::Discarded, Update::Synced]);
        assert_eq!(session.controller().state().records().len(), 1);
    }

    #[tokio::test]
    async fn test_create_triggers_refresh() {
        let store = Arc::new(FakeStore::new(scenario()));
        let mut session = Session::from_shared(Arc::clone(&store));
        session.mount();
        session.settle().await;

        assert!(session.submit_new_record("Reno", "31"));
        let updates = session.settle().await;
        assert_eq!(
            updates,
            vec![Update::Created(Record::new("Reno", 31.0)), Update::Synced]
        );
        assert_eq!(session.controller().state().records().len(), 4);
        assert_eq!(store.list_calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_created_record_below_threshold_stays_hidden() {
        let mut session = Session::new(FakeStore::new(scenario()));
        session.set_threshold("25");
        session.settle().await;

        assert!(session.submit_new_record("Fargo", "5"));
        session.settle().await;
        let records = session.controller().state().records();
        assert_eq!(records, &[Record::new("Austin", 35.0)]);
    }

    #[tokio::test]
    async fn test_skipped_submit_issues_nothing() {
        let store = Arc::new(FakeStore::new(scenario()));
        let mut session = Session::from_shared(Arc::clone(&store));

        assert!(!session.submit_new_record("", "30"));
        assert_eq!(session.pending(), 0);
        assert!(session.next_update().await.is_none());
        assert_eq!(session.controller().state().status(), SyncStatus::Idle);
        assert!(store.list_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_does_not_refresh() {
        let mut store = FakeStore::new(scenario());
        store.fail_create = true;
        let store = Arc::new(store);
        let mut session = Session::from_shared(Arc::clone(&store));
        session.mount();
        session.settle().await;

        session.submit_new_record("Reno", "31");
        let updates = session.settle().await;
        assert_eq!(
            updates,
            vec![Update::CreateFailed(
                Record::new("Reno", 31.0),
                CreateError::Status(500)
            )]
        );
        assert_eq!(session.controller().state().status(), SyncStatus::Ready);
        assert_eq!(store.list_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_sets_error() {
        let mut store = FakeStore::new(scenario());
        store.fail_list = true;
        let mut session = Session::new(store);
        session.mount();
        let updates = session.settle().await;

        assert_eq!(updates, vec![Update::FetchFailed(FetchError::Status(503))]);
        let view = session.view().unwrap();
        assert_eq!(view.status, SyncStatus::Failed);
        assert!(view.error.is_some());
        assert!(view.view.chart.is_empty());
    }

    #[tokio::test]
    async fn test_dyn_store() {
        let store: Arc<dyn RecordStore> = Arc::new(FakeStore::new(scenario()));
        let mut session = Session::from_shared(store);
        session.mount();
        session.settle().await;
        session.set_selection(Selection::Band(Band::Cool));
        let view = session.view().unwrap();
        assert_eq!(view.view.chart.labels, vec![Band::Cool]);
    }

    #[tokio::test]
    async fn test_panicking_list_still_settles() {
        let mut broken = FakeStore::new(scenario());
        broken.panic_list = true;
        let mut session = Session::new(broken);
        session.mount();
        let updates = tokio::time::timeout(Duration::from_secs(2), session.settle())
            .await
            .expect("settle hung after a panicking list call");

        assert_eq!(updates.len(), 1);
        assert!(matches!(updates[0], Update::FetchFailed(FetchError::Transport(_))));
        assert_eq!(session.pending(), 0);
        let view = session.view().unwrap();
        assert_eq!(view.status, SyncStatus::Failed);
        assert!(!view.loading);
    }

    #[tokio::test]
    async fn test_panicking_create_still_settles() {
        let mut store = FakeStore::new(scenario());
        store.panic_create = true;
        let store = Arc::new(store);
        let mut session = Session::from_shared(Arc::clone(&store));
        session.mount();
        session.settle().await;

        assert!(session.submit_new_record("Reno", "31"));
        let updates = tokio::time::timeout(Duration::from_secs(2), session.settle())
            .await
            .expect("settle hung after a panicking create call");

        assert_eq!(updates.len(), 1);
        match &updates[0] {
            Update::CreateFailed(record, CreateError::Transport(_)) => {
                assert_eq!(record, &Record::new("Reno", 31.0));
            }
            other => panic!("unexpected update: {:?}", other),
        }
        assert_eq!(session.controller().state().status(), SyncStatus::Ready);
        assert_eq!(session.controller().state().records().len(), 3);
        assert_eq!(store.list_calls.lock().unwrap().len(), 1);
    }
}
