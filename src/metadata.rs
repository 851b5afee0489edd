use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime};
use exif::{In, Reader, Tag};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

/// Extensions treated as video; everything else is assumed to be an image.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Infer the media kind from the file extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if VIDEO_EXTENSIONS.iter().any(|v| ext.eq_ignore_ascii_case(v)) {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// Why an image yielded no capture date. Reported once per file, then
/// downgraded to an unknown timestamp.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("cannot open file: {0}")]
    Open(#[from] std::io::Error),
    #[error("no readable exif data: {0}")]
    Exif(#[from] exif::Error),
    #[error("no capture date tag in exif data")]
    NoCaptureDate,
    #[error("unparseable capture date {0:?}")]
    BadCaptureDate(String),
}

/// Resolve the creation timestamp of a media file.
///
/// Videos use the filesystem modification time, which only approximates the
/// real creation time; a stat failure propagates. Images read the embedded
/// EXIF capture date; any image-side failure prints one diagnostic and
/// resolves to `None`.
pub fn resolve_date(path: &Path, kind: MediaKind) -> Result<Option<NaiveDateTime>> {
    match kind {
        MediaKind::Video => Ok(Some(video_mtime(path)?)),
        MediaKind::Image => match image_capture_date(path) {
            Ok(timestamp) => Ok(Some(timestamp)),
            Err(err) => {
                eprintln!("Warning: no capture date for {}: {}", path.display(), err);
                Ok(None)
            }
        },
    }
}

/// Last-modified time of the file, as local naive time.
fn video_mtime(path: &Path) -> Result<NaiveDateTime> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .with_context(|| format!("Failed to stat {}", path.display()))?;
    Ok(DateTime::<Local>::from(modified).naive_local())
}

/// Read the DateTimeOriginal tag from the file's embedded EXIF data.
fn image_capture_date(path: &Path) -> Result<NaiveDateTime, MetadataError> {
    let file = File::open(path)?;
    let exif = Reader::new().read_from_container(&mut BufReader::new(file))?;

    let field = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .ok_or(MetadataError::NoCaptureDate)?;

    let value = field.display_value().to_string();
    match parse_exif_datetime(&value) {
        Some(timestamp) => Ok(timestamp),
        None => Err(MetadataError::BadCaptureDate(value)),
    }
}

/// Parse an EXIF datetime. The raw tag format is `YYYY:MM:DD HH:MM:SS`, but
/// rendered values carry `-` date separators.
fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    let cleaned = s.replace('-', ":").replace('/', ":");
    NaiveDateTime::parse_from_str(cleaned.trim(), "%Y:%m:%d %H:%M:%S").ok()
}
