//! Plain-text rendering of a `ViewModel` for the terminal.

use ct_sync::{SyncStatus, ViewModel};
use ct_utils::format::{format_temp, format_timestamp};
use ct_view::ChartSeries;
use std::fmt::{self, Write};

/// Width of the longest chart bar, in characters.
const BAR_WIDTH: usize = 40;

pub fn render_view(model: &ViewModel) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_view(&mut out, model);
    out
}

pub fn write_view<W: Write>(out: &mut W, model: &ViewModel) -> fmt::Result {
    write_status(out, model)?;
    write_list(out, model)?;
    write_chart(out, &model.view.chart)
}

fn write_status<W: Write>(out: &mut W, model: &ViewModel) -> fmt::Result {
    let status = match model.status {
        SyncStatus::Idle => "idle",
        SyncStatus::Loading => "loading...",
        SyncStatus::Ready => "ready",
        SyncStatus::Failed => "failed",
    };
    let threshold = if model.threshold.trim().is_empty() {
        "none"
    } else {
        model.threshold.trim()
    };
    writeln!(
        out,
        "Status: {} | Min temp: {} | Showing: {}",
        status, threshold, model.view.selection
    )?;
    if let Some(at) = &model.last_synced {
        writeln!(out, "Last updated: {}", format_timestamp(at))?;
    }
    if let Some(error) = &model.error {
        writeln!(out, "Error: {} (showing last known data)", error)?;
    }
    if let Some(error) = &model.create_error {
        writeln!(out, "Last add failed: {}", error)?;
    }
    Ok(())
}

fn write_list<W: Write>(out: &mut W, model: &ViewModel) -> fmt::Result {
    if model.view.filtered.is_empty() {
        return writeln!(out, "\nNo cities to show.");
    }
    for summary in &model.view.summaries {
        writeln!(
            out,
            "\n{} ({} {}, avg {}°, range {}°..{}°)",
            summary.band,
            summary.count,
            if summary.count == 1 { "city" } else { "cities" },
            summary.average,
            format_temp(summary.min),
            format_temp(summary.max),
        )?;
        for record in model.view.filtered.get(summary.band).unwrap_or_default() {
            writeln!(out, "  {:<24} {}°", record.city, format_temp(record.temp))?;
        }
    }
    Ok(())
}

/// Bar length for `value`, scaled so that `widest` fills `BAR_WIDTH`.
fn bar_len(value: i64, widest: u64) -> usize {
    if widest == 0 {
        return 0;
    }
    let scaled = value.unsigned_abs() as f64 / widest as f64 * BAR_WIDTH as f64;
    (scaled.round() as usize).min(BAR_WIDTH)
}

fn write_chart<W: Write>(out: &mut W, chart: &ChartSeries) -> fmt::Result {
    writeln!(out, "\nAverage temperature by band")?;
    if chart.is_empty() {
        return writeln!(out, "  (no data)");
    }
    let widest = chart.values.iter().map(|v| v.unsigned_abs()).max().unwrap_or(0);
    for (label, value, color) in chart.points() {
        writeln!(
            out,
            "  {:<5} {:<width$} {:>4}°  {}",
            label.as_str(),
            "#".repeat(bar_len(value, widest)),
            value,
            color,
            width = BAR_WIDTH,
        )?;
    }
    Ok(())
}
