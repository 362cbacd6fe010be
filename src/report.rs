//! DeepSkyStacker `.Info.txt` report parsing.
//!
//! DSS writes one `Key = Value` pair per line, followed by per-star blocks:
//!
//! ```text
//! OverallQuality = 1273.4482
//! RedXShift = 0.0000
//! SkyBackground = 0.0763
//! NrStars = 152
//! Star0
//!     Intensity = 0.5318
//! ```

use std::path::Path;

use anyhow::{Context, Result};

use crate::error::ReportError;
use crate::types::ReportFields;

pub const KEY_QUALITY: &str = "OverallQuality";
pub const KEY_BACKGROUND: &str = "SkyBackground";
pub const KEY_NSTARS: &str = "NrStars";

/// Value of `key` if `line` is a `key = value` line. The value is everything after the last `=`.
fn get_keyword_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line.trim_start().strip_prefix(key)?;
    if !rest.trim_start().starts_with('=') {
        return None;
    }
    let eq_pos = rest.rfind('=')?;
    Some(rest[eq_pos + 1..].trim())
}

fn parse_value<T: std::str::FromStr>(
    key: &'static str,
    value: &str,
    line: usize,
) -> Result<T, ReportError> {
    value.parse().map_err(|_| ReportError::InvalidValue {
        key,
        value: value.to_string(),
        line,
    })
}

/// Extract quality, sky background and star count from report text.
///
/// Keys absent from the report stay `None`; the first occurrence of a key wins.
pub fn parse_report(text: &str) -> Result<ReportFields, ReportError> {
    let mut fields = ReportFields::default();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if fields.quality.is_none() {
            if let Some(v) = get_keyword_value(line, KEY_QUALITY) {
                fields.quality = Some(parse_value(KEY_QUALITY, v, line_no)?);
                continue;
            }
        }
        if fields.background.is_none() {
            if let Some(v) = get_keyword_value(line, KEY_BACKGROUND) {
                fields.background = Some(parse_value(KEY_BACKGROUND, v, line_no)?);
                continue;
            }
        }
        if fields.nstars.is_none() {
            if let Some(v) = get_keyword_value(line, KEY_NSTARS) {
                fields.nstars = Some(parse_value(KEY_NSTARS, v, line_no)?);
            }
        }
    }

    Ok(fields)
}

/// Read and parse a report file.
pub fn read_report(path: &Path) -> Result<ReportFields> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read report {}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    parse_report(&text).with_context(|| format!("Failed to parse report {}", path.display()))
}
