//! Capture time from the EXIF block of a raw frame.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};

use crate::error::TimestampError;

const EXIF_FORMAT: &str = "%Y:%m:%d %H:%M:%S";
const ISO_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Read `DateTimeOriginal` from a raw frame (CR2/NEF/ARW or any EXIF container).
pub fn read_capture_time(path: &Path) -> Result<NaiveDateTime> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open raw frame {}", path.display()))?;
    let mut reader = BufReader::new(file);

    capture_time_from(&mut reader)
        .with_context(|| format!("Failed to read capture time from {}", path.display()))
}

fn capture_time_from<R>(reader: &mut R) -> Result<NaiveDateTime, TimestampError>
where
    R: std::io::BufRead + std::io::Seek,
{
    let exif = Reader::new().read_from_container(reader)?;
    let field = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .ok_or(TimestampError::Missing)?;

    match field.value {
        Value::Ascii(ref values) if !values.is_empty() => {
            let text = std::str::from_utf8(&values[0])
                .map_err(|_| TimestampError::Malformed(format!("{:?}", values[0])))?;
            parse_exif_datetime(text)
        }
        _ => Err(TimestampError::Malformed(
            field.display_value().to_string(),
        )),
    }
}

/// Parse an EXIF `YYYY:MM:DD HH:MM:SS` string. ISO dates parse too.
pub fn parse_exif_datetime(text: &str) -> Result<NaiveDateTime, TimestampError> {
    let trimmed = text.trim_end_matches('\0').trim();

    NaiveDateTime::parse_from_str(trimmed, EXIF_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, ISO_FORMATS[0]))
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, ISO_FORMATS[1]))
        .map_err(|_| TimestampError::Malformed(trimmed.to_string()))
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 12, 9)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_parse_exif_format() {
        assert_eq!(parse_exif_datetime("2021:12:09 21:33:10").unwrap(), at(21, 33, 10));
        assert_eq!(parse_exif_datetime("2021:12:09 21:33:10\0").unwrap(), at(21, 33, 10));
    }

    #[test]
    fn test_parse_iso_format() {
        assert_eq!(parse_exif_datetime("2021-12-09 21:33:10").unwrap(), at(21, 33, 10));
        assert_eq!(parse_exif_datetime("2021-12-09T21:33:10").unwrap(), at(21, 33, 10));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_exif_datetime(""), Err(TimestampError::Malformed(_))));
        assert!(matches!(
            parse_exif_datetime("0000:00:00 00:00:00"),
            Err(TimestampError::Malformed(_))
        ));
        assert!(matches!(
            parse_exif_datetime("    :  :     :  :  "),
            Err(TimestampError::Malformed(_))
        ));
    }

    #[test]
    fn test_read_capture_time_from_tiff() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("IMG_0001.CR2");
        std::fs::write(&path, fixtures::tiff_with_datetime("2021:12:09 22:01:45")).unwrap();

        assert_eq!(read_capture_time(&path).unwrap(), at(22, 1, 45));
    }

    #[test]
    fn test_missing_tag() {
        let mut cursor = std::io::Cursor::new(fixtures::tiff_without_exif());
        assert!(matches!(capture_time_from(&mut cursor), Err(TimestampError::Missing)));
    }

    #[test]
    fn test_not_an_exif_container() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("IMG_0001.CR2");
        std::fs::write(&path, b"definitely not a raw file").unwrap();

        let err = read_capture_time(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to read capture time"));
    }
}
