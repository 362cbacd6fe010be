use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Quality figures DeepSkyStacker writes into a frame's `.Info.txt` report.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ReportFields {
    /// `OverallQuality`: DSS score, higher is better.
    pub quality: Option<f64>,
    /// `SkyBackground`: fraction of full scale (0..1).
    pub background: Option<f64>,
    /// `NrStars`: stars registered in the frame.
    pub nstars: Option<u32>,
}

/// One row of the quality table: a light frame's report merged with its capture time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityRecord {
    pub filename: String,
    pub quality: Option<f64>,
    pub background: Option<f64>,
    pub nstars: Option<u32>,
    #[serde(with = "datetime_format")]
    pub datetime: NaiveDateTime,
}

impl QualityRecord {
    pub fn new(filename: impl Into<String>, fields: ReportFields, datetime: NaiveDateTime) -> Self {
        QualityRecord {
            filename: filename.into(),
            quality: fields.quality,
            background: fields.background,
            nstars: fields.nstars,
            datetime,
        }
    }
}

/// `YYYY-MM-DD HH:MM:SS` in the table; the ISO `T` separator is accepted on read.
pub(crate) mod datetime_format {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        let s = s.trim();
        NaiveDateTime::parse_from_str(s, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
            .map_err(|e| de::Error::custom(format!("invalid datetime '{}': {}", s, e)))
    }
}
