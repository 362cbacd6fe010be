use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::error::PairingError;

pub const DEFAULT_RAW_EXTENSION: &str = "CR2";
pub const DEFAULT_REPORT_SUFFIX: &str = "Info.txt";

/// Which files make up a frame pair.
#[derive(Clone, Debug)]
pub struct PairingConfig {
    /// Raw image extension, matched case-insensitively (`CR2`, `NEF`, ...).
    pub raw_extension: String,
    /// Suffix of the DSS report written next to each raw frame.
    pub report_suffix: String,
}

impl Default for PairingConfig {
    fn default() -> Self {
        PairingConfig {
            raw_extension: DEFAULT_RAW_EXTENSION.to_string(),
            report_suffix: DEFAULT_REPORT_SUFFIX.to_string(),
        }
    }
}

/// A raw frame and its quality report, sharing a base name.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePair {
    pub base_name: String,
    pub raw_path: PathBuf,
    pub report_path: PathBuf,
}

/// List every raw frame in `dir` that has a companion report, sorted by base name.
pub fn find_frame_pairs(dir: &Path, config: &PairingConfig) -> Result<Vec<FramePair>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut pairs = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let raw_path = entry.path();
        if !raw_path.is_file() || !is_raw(&raw_path, &config.raw_extension) {
            continue;
        }

        let Some(base_name) = frame_base_name(&raw_path) else {
            continue;
        };

        let report_path = dir.join(format!("{}.{}", base_name, config.report_suffix));
        if !report_path.is_file() {
            warn!("Skipping {}: no {} report", raw_path.display(), config.report_suffix);
            continue;
        }

        debug!("Paired {}", base_name);
        pairs.push(FramePair {
            base_name,
            raw_path,
            report_path,
        });
    }

    if pairs.is_empty() {
        return Err(PairingError::NoPairs {
            dir: dir.to_path_buf(),
            suffix: config.report_suffix.clone(),
        }
        .into());
    }

    pairs.sort_by(|a, b| a.base_name.cmp(&b.base_name));
    Ok(pairs)
}

fn is_raw(path: &Path, raw_extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case(raw_extension))
}

/// File name up to the first `.`; `IMG_0001.CR2` → `IMG_0001`.
fn frame_base_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let base = name.split('.').next()?;
    if base.is_empty() {
        None
    } else {
        Some(base.to_string())
    }
}
