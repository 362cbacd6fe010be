use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::merge;
use crate::pairing::{self, PairingConfig};
use crate::session::SessionLayout;
use crate::table::QualityTable;

const PROGRESS_TEMPLATE: &str = "{bar:40.cyan/blue} {pos}/{len} {msg}";

/// Builds the quality table for a folder of light frames.
pub struct QualityExtractor {
    pairing: PairingConfig,
    show_progress: bool,
}

impl QualityExtractor {
    pub fn new() -> Self {
        QualityExtractor {
            pairing: PairingConfig::default(),
            show_progress: true,
        }
    }

    /// Raw frame extension, `CR2` by default.
    pub fn with_raw_extension(mut self, ext: impl Into<String>) -> Self {
        self.pairing.raw_extension = ext.into().trim_start_matches('.').to_string();
        self
    }

    /// Report suffix, `Info.txt` by default.
    pub fn with_report_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.pairing.report_suffix = suffix.into().trim_start_matches('.').to_string();
        self
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        match ProgressStyle::with_template(PROGRESS_TEMPLATE) {
            Ok(style) => bar.set_style(style),
            Err(e) => warn!("Invalid progress template, using default style: {}", e),
        }
        bar
    }

    /// Pair, merge and tabulate every frame in `dir`. Rows are in frame-name order.
    pub fn extract<P: AsRef<Path>>(&self, dir: P) -> Result<QualityTable> {
        let dir = dir.as_ref();
        let pairs = pairing::find_frame_pairs(dir, &self.pairing)?;
        info!("Found {} frames in {}", pairs.len(), dir.display());

        let bar = self.progress_bar(pairs.len());
        let mut records = Vec::with_capacity(pairs.len());
        for pair in &pairs {
            bar.set_message(pair.base_name.clone());
            let record = merge::merge_frame(pair);
            bar.inc(1);
            records.push(record?);
        }
        bar.finish_and_clear();

        Ok(QualityTable::from_records(records))
    }

    /// Extract the session's lights folder and write the table. Returns the CSV path.
    pub fn extract_session(&self, layout: &SessionLayout) -> Result<PathBuf> {
        let table = self
            .extract(layout.lights_path())
            .with_context(|| format!("Extraction failed for session {}", layout.root().display()))?;

        layout.ensure_output_dir()?;
        let path = layout.table_path();
        table.write_csv(&path)?;
        Ok(path)
    }
}

impl Default for QualityExtractor {
    fn default() -> Self {
        Self::new()
    }
}
