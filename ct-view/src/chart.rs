use ct_data::aggregate::{average, EmptyAggregationError};
use ct_data::filter::Selection;
use ct_data::grouping::GroupedRecords;
use ct_record::Band;
use serde::Serialize;

/// Index-aligned series for the band average chart.
///
/// `labels`, `values` and `colors` always have the same length. An empty
/// series means there is nothing to plot, not an error.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<Band>,
    /// Rounded average temperature per band.
    pub values: Vec<i64>,
    pub colors: Vec<&'static str>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate `(label, value, color)` triples.
    pub fn points(&self) -> impl Iterator<Item = (Band, i64, &'static str)> + '_ {
        self.labels
            .iter()
            .zip(&self.values)
            .zip(&self.colors)
            .map(|((label, value), color)| (*label, *value, *color))
    }

    fn push(&mut self, label: Band, value: i64, color: &'static str) {
        self.labels.push(label);
        self.values.push(value);
        self.colors.push(color);
    }
}

/// Build the chart series for an already filtered grouping.
///
/// With `Selection::All` the palette is applied positionally to the bands
/// present; with a single band the one entry takes that band's color.
pub fn build_chart(
    filtered: &GroupedRecords,
    selection: Selection,
) -> Result<ChartSeries, EmptyAggregationError> {
    let palette: Vec<&'static str> = Band::ALL.iter().map(|b| b.color()).collect();
    let mut series = ChartSeries::default();

    for band in Band::ALL {
        let Some(records) = filtered.get(band) else {
            continue;
        };
        let temps: Vec<f64> = records.iter().map(|r| r.temp).collect();
        let color = match selection {
            Selection::All => palette[series.len()],
            Selection::Band(selected) => selected.color(),
        };
        series.push(band, average(&temps)?, color);
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_data::filter::filter_view;
    use ct_data::grouping::group;
    use ct_record::Record;

    fn scenario() -> GroupedRecords {
        group(&[
            Record::new("Austin", 35.0),
            Record::new("Boston", 18.0),
            Record::new("Denver", 22.0),
        ])
    }

    #[test]
    fn test_build_chart_all_bands() {
        let series = build_chart(&scenario(), Selection::All).unwrap();
        assert_eq!(series.labels, vec![Band::Hot, Band::Warm, Band::Cool]);
        assert_eq!(series.values, vec![35, 22, 18]);
        assert_eq!(series.colors, vec!["#FF5722", "#FFC107", "#2196F3"]);
    }

    #[test]
    fn test_build_chart_palette_is_positional() {
        let grouped = group(&[Record::new("Boston", 18.0), Record::new("Austin", 35.0)]);
        let series = build_chart(&grouped, Selection::All).unwrap();
        assert_eq!(series.labels, vec![Band::Hot, Band::Cool]);
        // Second present band takes the second palette slot.
        assert_eq!(series.colors, vec![Band::Hot.color(), Band::Warm.color()]);
    }

    #[test]
    fn test_build_chart_single_band() {
        let selection = Selection::Band(Band::Cool);
        let filtered = filter_view(&scenario(), selection);
        let series = build_chart(&filtered, selection).unwrap();
        assert_eq!(series.labels, vec![Band::Cool]);
        assert_eq!(series.values, vec![18]);
        assert_eq!(series.colors, vec![Band::Cool.color()]);
    }

    #[test]
    fn test_build_chart_empty_selection() {
        let grouped = group(&[Record::new("Austin", 35.0)]);
        let selection = Selection::Band(Band::Warm);
        let series = build_chart(&filter_view(&grouped, selection), selection).unwrap();
        assert!(series.is_empty());
        assert!(series.values.is_empty());
        assert!(series.colors.is_empty());
    }

    #[test]
    fn test_build_chart_lengths_align() {
        let grouped = group(&[
            Record::new("Austin", 35.0),
            Record::new("Phoenix", 40.0),
            Record::new("Boston", 18.0),
        ]);
        let selections = [
            Selection::All,
            Selection::Band(Band::Hot),
            Selection::Band(Band::Warm),
            Selection::Band(Band::Cool),
        ];
        for selection in selections {
            let series = build_chart(&filter_view(&grouped, selection), selection).unwrap();
            assert_eq!(series.labels.len(), series.values.len());
            assert_eq!(series.values.len(), series.colors.len());
            assert_eq!(series.points().count(), series.len());
        }
    }

    #[test]
    fn test_chart_serializes_for_renderer() {
        let series = build_chart(&scenario(), Selection::All).unwrap();
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["labels"], serde_json::json!(["Hot", "Warm", "Cool"]));
        assert_eq!(json["values"], serde_json::json!([35, 22, 18]));
    }
}
