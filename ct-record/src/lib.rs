//! Core types for city temperature records.
//!
//! This crate provides:
//! - `record`: the `Record` fetched from and posted to the remote store
//! - `band`: temperature bands, the classifier and the display palette
//! - `error`: fetch and create failures reported by a store
//! - `store`: the `RecordStore` contract the sync layer talks to
//! - `http`: a `reqwest` implementation of `RecordStore` (feature `api`)

pub mod band;
pub mod error;
#[cfg(feature = "api")]
pub mod http;
pub mod record;
pub mod store;

pub use band::{classify, Band};
pub use error::{CreateError, FetchError};
pub use record::Record;
pub use store::RecordStore;
