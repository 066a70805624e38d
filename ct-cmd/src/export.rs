//! CSV export of a filtered view.
//!
//! Output columns: `band,city,temp`, with a header row. Rows follow band
//! display order, then source order within each band.

use ct_data::grouping::GroupedRecords;
use ct_utils::format::format_temp;
use std::io;

pub fn write_csv<W: io::Write>(writer: W, filtered: &GroupedRecords) -> anyhow::Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["band", "city", "temp"])?;
    let mut rows = 0;
    for (band, records) in filtered {
        for record in records {
            let temp = format_temp(record.temp);
            wtr.write_record([band.as_str(), record.city.as_str(), temp.as_str()])?;
            rows += 1;
        }
    }
    wtr.flush()?;
    Ok(rows)
}

pub fn write_csv_file(path: &str, filtered: &GroupedRecords) -> anyhow::Result<usize> {
    let file = std::fs::File::create(path)?;
    write_csv(file, filtered)
}
