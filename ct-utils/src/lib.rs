//! Shared utility functions for city temperature crates.

/// Parsing of raw form input.
pub mod input {
    /// Parse a minimum-temperature threshold.
    ///
    /// Empty, unparseable, non-finite and negative input all mean "no
    /// threshold" and yield 0.
    pub fn parse_threshold(raw: &str) -> f64 {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => value,
            _ => 0.0,
        }
    }

    /// Parse a temperature entered for a new record.
    ///
    /// Only finite numbers are accepted; `"NaN"` and `"inf"` parse as `f64`
    /// but are rejected here.
    pub fn parse_temp(raw: &str) -> Option<f64> {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
    }

}

/// Display formatting.
pub mod format {
    use chrono::{DateTime, Local, Utc};

    /// Format a temperature without a trailing `.0` for whole numbers.
    pub fn format_temp(temp: f64) -> String {
        if temp.fract() == 0.0 {
            format!("{:.0}", temp)
        } else {
            format!("{}", temp)
        }
    }

    /// Format a sync timestamp in local time as "YYYY-MM-DD HH:MM:SS".
    pub fn format_timestamp(at: &DateTime<Utc>) -> String {
        at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::TimeZone;

        #[test]
        fn test_format_temp() {
            assert_eq!(format_temp(35.0), "35");
            assert_eq!(format_temp(18.5), "18.5");
            assert_eq!(format_temp(-3.0), "-3");
        }

        #[test]
        fn test_format_timestamp_shape() {
            let at = Utc.with_ymd_and_hms(2024, 6, 15, 12, 30, 0).unwrap();
            let formatted = format_timestamp(&at);
            assert_eq!(formatted.len(), 19);
            assert_eq!(&formatted[4..5], "-");
        }
    }
}
