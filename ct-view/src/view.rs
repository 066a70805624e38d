use crate::chart::{build_chart, ChartSeries};
use ct_data::aggregate::EmptyAggregationError;
use ct_data::filter::{filter_view, Selection};
use ct_data::grouping::{group, GroupedRecords};
use ct_data::summary::{summarize, BandSummary};
use ct_record::Record;
use serde::Serialize;

/// Everything the list and chart views render for one state.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DerivedView {
    pub selection: Selection,
    /// All records, bucketed.
    pub grouped: GroupedRecords,
    /// `grouped` narrowed to the selection.
    pub filtered: GroupedRecords,
    pub summaries: Vec<BandSummary>,
    pub chart: ChartSeries,
}

/// Derive the view for a record collection and selection.
///
/// Pure; call it again after every state change.
pub fn derive_view(
    records: &[Record],
    selection: Selection,
) -> Result<DerivedView, EmptyAggregationError> {
    let grouped = group(records);
    let filtered = filter_view(&grouped, selection);
    let summaries = summarize(&filtered)?;
    let chart = build_chart(&filtered, selection)?;
    Ok(DerivedView {
        selection,
        grouped,
        filtered,
        summaries,
        chart,
    })
}
