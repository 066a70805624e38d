//! The request/response contract with the remote record store.
//!
//! - `list(min)` maps to `GET /cities?min=<min>`
//! - `create(record)` maps to `POST /cities` with a JSON `{city, temp}` body

use crate::error::{CreateError, FetchError};
use crate::record::Record;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch every record with `temp >= min`.
    async fn list(&self, min: f64) -> Result<Vec<Record>, FetchError>;

    /// Store a new record. The response body is not relied upon.
    async fn create(&self, record: &Record) -> Result<(), CreateError>;
}

#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    async fn list(&self, min: f64) -> Result<Vec<Record>, FetchError> {
        (**self).list(min).await
    }

    async fn create(&self, record: &Record) -> Result<(), CreateError> {
        (**self).create(record).await
    }
}
