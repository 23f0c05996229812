//! One-way export of the sample series
//!
//! Formats the full rolling buffer as a delimited text table (CSV) or a
//! JSON record array. Pure formatting; there is no parsing counterpart.
//! Writing to disk is the only fallible part.

use crate::classify::Thresholds;
use crate::error::{Result, ResultExt, ThermoVisError};
use crate::series::Sample;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Export format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn display_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Csv, ExportFormat::Json]
    }
}

/// One exported row: local time, temperature to two decimals, status label
#[derive(Debug, Serialize)]
struct ExportRecord {
    time: String,
    temperature: f64,
    status: &'static str,
}

impl ExportRecord {
    fn from_sample(sample: &Sample, thresholds: &Thresholds) -> Self {
        Self {
            time: sample.timestamp.format("%H:%M:%S").to_string(),
            temperature: (sample.temperature * 100.0).round() / 100.0,
            status: thresholds.status(sample.temperature).label(),
        }
    }
}

/// Render the series as a CSV table with a header row
pub fn csv_string(samples: &[Sample], thresholds: &Thresholds) -> String {
    let mut out = String::from("Time,Temperature (\u{b0}C),Status\n");
    for sample in samples {
        let record = ExportRecord::from_sample(sample, thresholds);
        // Infallible: writing to a String cannot fail
        let _ = writeln!(
            out,
            "{},{:.2},{}",
            record.time, record.temperature, record.status
        );
    }
    out
}

/// Render the series as a JSON array of records
pub fn json_string(samples: &[Sample], thresholds: &Thresholds) -> Result<String> {
    let records: Vec<ExportRecord> = samples
        .iter()
        .map(|s| ExportRecord::from_sample(s, thresholds))
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Write the series to `path` in the given format
pub fn write_series(
    path: &Path,
    format: ExportFormat,
    samples: &[Sample],
    thresholds: &Thresholds,
) -> Result<()> {
    let contents = match format {
        ExportFormat::Csv => csv_string(samples, thresholds),
        ExportFormat::Json => json_string(samples, thresholds)?,
    };
    std::fs::write(path, contents)
        .map_err(ThermoVisError::from)
        .with_context(|| format!("Failed to write {}", path.display()))
}
