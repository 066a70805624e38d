//! Grouping, filtering and aggregation over city temperature records.
//!
//! This crate turns the flat record collection held by the sync layer into
//! the per-band structures the list and chart views consume.

/// Rounded mean temperature.
pub mod aggregate {
    use thiserror::Error;

    /// `average` was called on an empty sequence.
    ///
    /// Grouping never produces an empty bucket, so seeing this means an
    /// invariant was broken upstream.
    #[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
    #[error("cannot average an empty sequence of temperatures")]
    pub struct EmptyAggregationError;

    /// Arithmetic mean rounded half away from zero.
    pub fn average(temps: &[f64]) -> Result<i64, EmptyAggregationError> {
        if temps.is_empty() {
            return Err(EmptyAggregationError);
        }
        let sum: f64 = temps.iter().sum();
        Ok((sum / temps.len() as f64).round() as i64)
    }

}

/// Partition records into per-band buckets.
pub mod grouping {
    use ct_record::{Band, Record};
    use serde::Serialize;
    use std::collections::btree_map::{self, BTreeMap};

    /// Records bucketed by band.
    ///
    /// Buckets are only ever created with a first member, so a band with no
    /// records is absent rather than present and empty. Iteration follows
    /// display order (`Hot`, `Warm`, `Cool`).
    #[derive(Debug, Clone, Default, PartialEq, Serialize)]
    #[serde(transparent)]
    pub struct GroupedRecords {
        buckets: BTreeMap<Band, Vec<Record>>,
    }

    impl GroupedRecords {
        pub fn get(&self, band: Band) -> Option<&[Record]> {
            self.buckets.get(&band).map(Vec::as_slice)
        }

        pub fn contains(&self, band: Band) -> bool {
            self.buckets.contains_key(&band)
        }

        /// Bands present, in display order.
        pub fn bands(&self) -> impl Iterator<Item = Band> + '_ {
            self.buckets.keys().copied()
        }

        pub fn iter(&self) -> btree_map::Iter<'_, Band, Vec<Record>> {
            self.buckets.iter()
        }

        /// Number of bands present.
        pub fn len(&self) -> usize {
            self.buckets.len()
        }

        pub fn is_empty(&self) -> bool {
            self.buckets.is_empty()
        }

        /// Total number of records across all buckets.
        pub fn record_count(&self) -> usize {
            self.buckets.values().map(Vec::len).sum()
        }

        /// Keep only the bucket for `band`, if there is one.
        pub(crate) fn only(&self, band: Band) -> GroupedRecords {
            let mut buckets = BTreeMap::new();
            if let Some(records) = self.buckets.get(&band) {
                buckets.insert(band, records.clone());
            }
            GroupedRecords { buckets }
        }
    }

    impl<'a> IntoIterator for &'a GroupedRecords {
        type Item = (&'a Band, &'a Vec<Record>);
        type IntoIter = btree_map::Iter<'a, Band, Vec<Record>>;

        fn into_iter(self) -> Self::IntoIter {
            self.iter()
        }
    }

    /// Bucket every record by its band in a single pass.
    ///
    /// Source order is preserved within each bucket.
    pub fn group(records: &[Record]) -> GroupedRecords {
        let mut buckets: BTreeMap<Band, Vec<Record>> = BTreeMap::new();
        for record in records {
            buckets
                .entry(record.band())
                .or_default()
                .push(record.clone());
        }
        GroupedRecords { buckets }
    }

}

/// Select all bands or a single band from a grouped collection.
pub mod filter {
    use crate::grouping::GroupedRecords;
    use ct_record::band::{Band, UnknownBand};
    use serde::{Serialize, Serializer};
    use std::fmt;
    use std::str::FromStr;

    /// Which bands the views show.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub enum Selection {
        #[default]
        All,
        Band(Band),
    }

    impl fmt::Display for Selection {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Selection::All => f.write_str("All"),
                Selection::Band(band) => write!(f, "{}", band),
            }
        }
    }

    impl FromStr for Selection {
        type Err = UnknownBand;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            if s.trim().eq_ignore_ascii_case("all") {
                Ok(Selection::All)
            } else {
                s.parse::<Band>().map(Selection::Band)
            }
        }
    }

    impl From<Band> for Selection {
        fn from(band: Band) -> Self {
            Selection::Band(band)
        }
    }

    impl Serialize for Selection {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    /// Narrow `grouped` to the current selection.
    ///
    /// Selecting a band with no records yields an empty mapping.
    pub fn filter_view(grouped: &GroupedRecords, selection: Selection) -> GroupedRecords {
        match selection {
            Selection::All => grouped.clone(),
            Selection::Band(band) => grouped.only(band),
        }
    }

}

/// Per-band statistics for the list view.
pub mod summary {
    use crate::aggregate::{average, EmptyAggregationError};
    use crate::grouping::GroupedRecords;
    use ct_record::Band;
    use serde::Serialize;

    /// Count, rounded average and range of one band's temperatures.
    #[derive(Debug, Clone, Serialize, PartialEq)]
    pub struct BandSummary {
        pub band: Band,
        pub count: usize,
        pub average: i64,
        pub min: f64,
        pub max: f64,
    }

    /// Summarize each present band, in display order.
    pub fn summarize(grouped: &GroupedRecords) -> Result<Vec<BandSummary>, EmptyAggregationError> {
        grouped
            .iter()
            .map(|(band, records)| -> Result<BandSummary, EmptyAggregationError> {
                let temps: Vec<f64> = records.iter().map(|r| r.temp).collect();
                Ok(BandSummary {
                    band: *band,
                    count: temps.len(),
                    average: average(&temps)?,
                    min: temps.iter().copied().fold(f64::INFINITY, f64::min),
                    max: temps.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                })
            })
            .collect()
    }

}
