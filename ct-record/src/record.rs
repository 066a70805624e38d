use crate::band::{classify, Band};
use serde::{Deserialize, Serialize};

/// A single city temperature reading from the remote store.
///
/// This is also the body of a create request. Extra fields returned by the
/// store (a generated `id`, for instance) are ignored on decode.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Record {
    pub city: String,
    pub temp: f64,
}

impl Record {
    pub fn new(city: impl Into<String>, temp: f64) -> Self {
        Self {
            city: city.into(),
            temp,
        }
    }

    pub fn band(&self) -> Band {
        classify(self.temp)
    }

    /// Parse a list response body into records.
    pub fn from_json_array(body: &str) -> serde_json::Result<Vec<Record>> {
        serde_json::from_str(body)
    }
}
