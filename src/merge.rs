use anyhow::{Context, Result};
use tracing::debug;

use crate::pairing::FramePair;
use crate::report;
use crate::timestamp;
use crate::types::QualityRecord;

/// Combine a frame's DSS report with its capture time. The capture time is required.
pub fn merge_frame(pair: &FramePair) -> Result<QualityRecord> {
    let fields = report::read_report(&pair.report_path)
        .with_context(|| format!("Frame {}", pair.base_name))?;
    let datetime = timestamp::read_capture_time(&pair.raw_path)
        .with_context(|| format!("Frame {}", pair.base_name))?;

    debug!(
        frame = %pair.base_name,
        quality = ?fields.quality,
        nstars = ?fields.nstars,
        %datetime,
        "merged frame"
    );

    Ok(QualityRecord::new(pair.base_name.clone(), fields, datetime))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::fixtures;
    use std::path::Path;

    fn write_pair(dir: &Path, base: &str, report: &str, raw: &[u8]) -> FramePair {
        let raw_path = dir.join(format!("{}.CR2", base));
        let report_path = dir.join(format!("{}.Info.txt", base));
        std::fs::write(&raw_path, raw).unwrap();
        std::fs::write(&report_path, report).unwrap();
        FramePair {
            base_name: base.to_string(),
            raw_path,
            report_path,
        }
    }

    #[test]
    fn test_merge_frame() {
        let tmp = tempfile::tempdir().unwrap();
        let pair = write_pair(
            tmp.path(),
            "IMG_0042",
            "OverallQuality = 812.5\nSkyBackground = 0.0912\nNrStars = 98\n",
            &fixtures::tiff_with_datetime("2021:12:09 23:15:00"),
        );

        let record = merge_frame(&pair).unwrap();
        assert_eq!(record.filename, "IMG_0042");
        assert_eq!(record.quality, Some(812.5));
        assert_eq!(record.background, Some(0.0912));
        assert_eq!(record.nstars, Some(98));
        assert_eq!(record.datetime.to_string(), "2021-12-09 23:15:00");
    }

    #[test]
    fn test_missing_timestamp_fails_with_frame_name() {
        let tmp = tempfile::tempdir().unwrap();
        let pair = write_pair(
            tmp.path(),
            "IMG_0043",
            "OverallQuality = 1.0\n",
            &fixtures::tiff_without_exif(),
        );

        let err = merge_frame(&pair).unwrap_err();
        assert!(format!("{:#}", err).contains("IMG_0043"));
    }
}
