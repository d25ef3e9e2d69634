use crate::media::MediaKind;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use exif::{In, Reader, Tag, Value};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// MP4 timestamps count seconds from 1904-01-01 rather than the Unix epoch.
const SECONDS_FROM_1904_TO_1970: u64 = 2_082_844_800;

/// Best-effort capture date of a media file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureDate {
    Known(NaiveDate),
    Unknown,
}

impl fmt::Display for CaptureDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureDate::Known(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            CaptureDate::Unknown => write!(f, "unknown"),
        }
    }
}

/// Extracts the capture date for `path`. Extraction failures are never
/// fatal; every degraded path logs and falls back to `Unknown`.
pub fn extract_capture_date(path: &Path, kind: MediaKind) -> CaptureDate {
    let date = match kind {
        MediaKind::Image => image_capture_date(path),
        MediaKind::Video => video_capture_date(path),
    };
    match date {
        Some(date) => CaptureDate::Known(date),
        None => CaptureDate::Unknown,
    }
}

fn image_capture_date(path: &Path) -> Option<NaiveDate> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            log::warn!("could not open {} for metadata: {}", path.display(), e);
            return None;
        }
    };

    let mut buf_reader = BufReader::new(file);
    let exif = match Reader::new().read_from_container(&mut buf_reader) {
        Ok(exif) => exif,
        // No EXIF segment at all is common and not worth a warning.
        Err(_) => return None,
    };

    let field = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .or_else(|| exif.get_field(Tag::DateTime, In::PRIMARY))?;
    let raw = field_to_string(&field.value)?;
    parse_exif_datetime(&raw)
}

fn video_capture_date(path: &Path) -> Option<NaiveDate> {
    // The mp4 crate covers the ISO-BMFF family; other containers degrade
    // to an unknown date.
    if !matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("mp4") | Some("mov") | Some("m4v")
    ) {
        return None;
    }

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            log::warn!("could not open {} for metadata: {}", path.display(), e);
            return None;
        }
    };
    let size = match file.metadata() {
        Ok(metadata) => metadata.len(),
        Err(e) => {
            log::warn!("could not stat {}: {}", path.display(), e);
            return None;
        }
    };

    let reader = match mp4::Mp4Reader::read_header(BufReader::new(file), size) {
        Ok(reader) => reader,
        Err(e) => {
            log::warn!("could not parse container of {}: {}", path.display(), e);
            return None;
        }
    };

    creation_date(reader.moov.mvhd.creation_time)
}

/// Converts an MP4 creation timestamp (seconds since 1904) to a calendar
/// date. Zero means the field was never set.
fn creation_date(secs_since_1904: u64) -> Option<NaiveDate> {
    if secs_since_1904 == 0 {
        return None;
    }
    let secs = i64::try_from(secs_since_1904.saturating_sub(SECONDS_FROM_1904_TO_1970)).ok()?;
    Some(DateTime::from_timestamp(secs, 0)?.naive_utc().date())
}

fn field_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(vec) => vec
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string()),
        _ => None,
    }
}

/// Parses the EXIF `YYYY:MM:DD HH:MM:SS` timestamp format down to a date.
fn parse_exif_datetime(raw: &str) -> Option<NaiveDate> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y:%m:%d %H:%M:%S") {
        return Some(datetime.date());
    }
    NaiveDate::parse_from_str(raw, "%Y:%m:%d").ok()
}
