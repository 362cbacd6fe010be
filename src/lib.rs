//! DeepSkyStacker frame-quality tabulation and plotting.
//!
//! Pairs each raw light frame with the `.Info.txt` report DSS wrote for it,
//! merges the report's quality figures with the frame's EXIF capture time,
//! writes the result as CSV and renders rolling-average plots over time.

pub mod error;
pub mod extractor;
pub mod logging;
pub mod merge;
pub mod output;
pub mod pairing;
pub mod plot;
pub mod report;
pub mod session;
pub mod table;
pub mod timestamp;
pub mod types;

pub use error::{PairingError, PlotError, ReportError, TimestampError};
pub use extractor::QualityExtractor;
pub use pairing::{find_frame_pairs, FramePair, PairingConfig};
pub use plot::{render_panels, render_quality, rolling_mean, PlotConfig};
pub use report::{parse_report, read_report};
pub use session::SessionLayout;
pub use table::QualityTable;
pub use timestamp::{parse_exif_datetime, read_capture_time};
pub use types::{QualityRecord, ReportFields};
