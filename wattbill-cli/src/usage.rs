//! Hourly usage exports.

use std::{
    collections::BTreeMap,
    io::{BufRead, BufReader, Read},
};

use chrono::{NaiveDateTime, Timelike};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use wattbill_core::{BillingPeriod, UsageSample};
use wattbill_quantities::KilowattHours;

use crate::prelude::*;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Row of the utility's hourly export.
#[derive(Debug, Deserialize)]
struct UsageRecord {
    #[serde(rename = "Hour")]
    timestamp: String,

    #[serde(rename = "kWh")]
    kwh: f64,
}

/// Read the samples, skipping the leading disclaimer lines.
///
/// Unreadable rows are skipped with a warning, readable rows with invalid values are an error.
#[instrument(skip_all)]
pub fn read_samples(reader: impl Read, skip_lines: usize) -> Result<Vec<UsageSample>> {
    let mut reader = BufReader::new(reader);
    let mut line = String::new();
    for _ in 0..skip_lines {
        reader.read_line(&mut line).context("failed to skip the leading lines")?;
        line.clear();
    }

    let mut csv_reader =
        ReaderBuilder::new().has_headers(true).flexible(true).trim(Trim::All).from_reader(reader);
    let mut samples = Vec::new();
    for result in csv_reader.deserialize::<UsageRecord>() {
        let record = match result {
            Ok(record) => record,
            Err(error) => {
                warn!(%error, "skipping unreadable record");
                continue;
            }
        };
        let timestamp = match NaiveDateTime::parse_from_str(&record.timestamp, TIMESTAMP_FORMAT) {
            Ok(timestamp) => timestamp,
            Err(error) => {
                warn!(%error, timestamp = %record.timestamp, "skipping invalid timestamp");
                continue;
            }
        };
        let sample =
            UsageSample::try_new(timestamp.date(), timestamp.hour(), KilowattHours::from(record.kwh))
                .with_context(|| format!("invalid usage at {timestamp}"))?;
        samples.push(sample);
    }
    info!(n_samples = samples.len(), "read usage");
    Ok(samples)
}

/// Group the samples by calendar month, in chronological order.
pub fn by_period(
    samples: impl IntoIterator<Item = UsageSample>,
) -> BTreeMap<BillingPeriod, Vec<UsageSample>> {
    let mut periods = BTreeMap::<_, Vec<_>>::new();
    for sample in samples {
        periods.entry(sample.period()).or_default().push(sample);
    }
    periods
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;

    use super::*;

    const EXPORT: &str = "\
Account: 123456789
Usage data is provided for informational purposes only
Hour, kWh
2024-01-31 06:00, 5.0
2024-01-31 12:00, 1.25
not a timestamp, 3.0
2024-02-01 18:00, oops
2024-02-01 18:00, 0.5
";

    #[test]
    fn test_read_samples() {
        let samples = read_samples(EXPORT.as_bytes(), 2).unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(samples[0].hour, 6);
        assert_abs_diff_eq!(samples[1].energy.get(), 1.25);
        assert_eq!(samples[2].hour, 18);
    }

    #[test]
    fn test_negative_usage_is_an_error() {
        let export = "Hour,kWh\n2024-01-31 06:00,-1.0\n";
        assert!(read_samples(export.as_bytes(), 0).is_err());
    }

    #[test]
    fn test_by_period() {
        let samples = read_samples(EXPORT.as_bytes(), 2).unwrap();
        let periods = by_period(samples);
        let keys = periods.keys().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(keys, ["2024-01", "2024-02"]);
        assert_eq!(periods.values().map(Vec::len).collect::<Vec<_>>(), [2, 1]);
    }
}
