//! Transcript parsers
//!
//! Pidgin writes one transcript per contact per day, named after the day it
//! started (`2023-05-07.140322+0200CEST.html`). Both transcript styles share
//! the file-name date contract implemented here; line timestamps only carry
//! the time of day and are combined with that date as UTC.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};

use crate::error::{ImportError, Result};
use crate::models::RawRecord;

pub mod html;
pub mod markup;
pub mod text;

pub use html::HtmlTranscriptParser;
pub use text::TextTranscriptParser;

static FILE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").expect("valid date regex"));

/// The two transcript styles Pidgin can write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    /// `*.html` transcripts with inline markup
    Html,
    /// `*.txt` transcripts with multi-line bodies
    Text,
}

impl TranscriptFormat {
    /// Detect the format from a file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("html") => Some(Self::Html),
            Some("txt") => Some(Self::Text),
            _ => None,
        }
    }

    /// File extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Text => "txt",
        }
    }
}

/// A parser for one transcript style
pub trait TranscriptParser {
    /// Which files this parser reads
    fn format(&self) -> TranscriptFormat;

    /// Extract records from the contents of a transcript written on `date`
    fn parse_str(&self, date: NaiveDate, content: &str, source: &Path) -> Result<Vec<RawRecord>>;

    /// Read and parse one transcript file
    fn parse_file(&self, path: &Path) -> Result<Vec<RawRecord>> {
        let date = date_from_file_name(path)?;
        let bytes = fs::read(path)?;
        let content = String::from_utf8_lossy(&bytes);
        self.parse_str(date, &content, path)
    }
}

/// Extract the first `YYYY-MM-DD` date embedded in the file name of `path`
pub fn date_from_file_name(path: &Path) -> Result<NaiveDate> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let caps = FILE_DATE
        .captures(&file_name)
        .ok_or_else(|| ImportError::MissingDate(path.to_path_buf()))?;

    let year = caps[1].parse::<i32>().map_err(|_| invalid_date(&caps[0]))?;
    let month = caps[2].parse::<u32>().map_err(|_| invalid_date(&caps[0]))?;
    let day = caps[3].parse::<u32>().map_err(|_| invalid_date(&caps[0]))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid_date(&caps[0]))
}

/// Combine the transcript date with an `HH:MM:SS` capture triple as UTC
///
/// `caps` must carry hour, minute and second in groups 1 to 3.
pub(crate) fn timestamp_from_captures(date: NaiveDate, caps: &Captures<'_>, source: &Path) -> Result<i64> {
    let invalid = || ImportError::InvalidTimestamp {
        path: source.to_path_buf(),
        time: format!("{}:{}:{}", &caps[1], &caps[2], &caps[3]),
    };

    let hour = caps[1].parse::<u32>().map_err(|_| invalid())?;
    let minute = caps[2].parse::<u32>().map_err(|_| invalid())?;
    let second = caps[3].parse::<u32>().map_err(|_| invalid())?;

    date.and_hms_opt(hour, minute, second)
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(invalid)
}

fn invalid_date(raw: &str) -> ImportError {
    ImportError::InvalidDate(raw.to_string())
}
