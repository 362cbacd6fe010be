use std::path::PathBuf;

use thiserror::Error;

/// Failures while matching raw frames with their reports.
#[derive(Error, Debug)]
pub enum PairingError {
    #[error("No .{} files found in the folder {}", .suffix, .dir.display())]
    NoPairs { dir: PathBuf, suffix: String },
}

/// Failures while parsing a DSS `.Info.txt` report.
#[derive(Error, Debug, PartialEq)]
pub enum ReportError {
    #[error("Invalid value '{value}' for {key} on line {line}")]
    InvalidValue {
        key: &'static str,
        value: String,
        line: usize,
    },
}

/// Failures while reading the capture time from a raw frame.
#[derive(Error, Debug)]
pub enum TimestampError {
    #[error("Failed to read EXIF data: {0}")]
    Exif(#[from] exif::Error),

    #[error("DateTimeOriginal tag not present")]
    Missing,

    #[error("Malformed DateTimeOriginal value '{0}'")]
    Malformed(String),
}

/// Failures while rendering the quality plots.
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("No records to plot")]
    Empty,

    #[error("Failed to draw chart: {0}")]
    Drawing(String),
}
