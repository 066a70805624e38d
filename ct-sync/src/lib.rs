//! Keeps a local copy of the remote record collection in sync.
//!
//! - `controller`: the `SyncController` state machine. It never performs I/O;
//!   it hands out `ListQuery` / `CreateCommand` values and is fed their results.
//! - `session`: runs those requests against a `RecordStore` on tokio tasks and
//!   feeds completions back to the controller one at a time.

pub mod controller;
pub mod session;

pub use controller::{
    AppState, CreateCommand, ListOutcome, ListQuery, SyncController, SyncStatus, ViewModel,
};
pub use session::{Session, Update};
