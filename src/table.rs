//! The quality table: one row per light frame, persisted as CSV.
//!
//! Columns are `filename, quality, background, nstars, datetime`, renamed from
//! the DSS keys `OverallQuality`, `SkyBackground` and `NrStars`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::types::QualityRecord;

pub const COLUMNS: [&str; 5] = ["filename", "quality", "background", "nstars", "datetime"];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QualityTable {
    records: Vec<QualityRecord>,
}

impl QualityTable {
    pub fn from_records(records: Vec<QualityRecord>) -> Self {
        QualityTable { records }
    }

    pub fn records(&self) -> &[QualityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stable sort by capture time. Frame numbers wrap past 9999 during long
    /// acquisitions, so filename order is not chronological.
    pub fn sort_by_datetime(&mut self) {
        self.records.sort_by_key(|r| r.datetime);
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        if self.records.is_empty() {
            csv.write_record(COLUMNS).context("Failed to write CSV header")?;
        }
        for record in &self.records {
            csv.serialize(record)
                .with_context(|| format!("Failed to write row for {}", record.filename))?;
        }
        csv.flush().context("Failed to flush CSV")?;
        Ok(())
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        self.write_to(file)?;
        info!("Wrote {} rows to {}", self.records.len(), path.display());
        Ok(())
    }

    /// Read rows by header name; unknown columns (e.g. a leading index column) are ignored.
    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::Reader::from_reader(reader);
        let mut records = Vec::new();
        for (idx, row) in csv.deserialize::<QualityRecord>().enumerate() {
            let record = row.with_context(|| format!("Invalid CSV row {}", idx + 1))?;
            records.push(record);
        }
        Ok(QualityTable { records })
    }

    pub fn read_csv(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let table = Self::read_from(file)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        info!("Loaded {} rows from {}", table.len(), path.display());
        Ok(table)
    }
}
