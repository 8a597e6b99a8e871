//! Parser for Pidgin's HTML transcripts
//!
//! One message per line after a header line, e.g.
//! `<font color="#A82F2F"><font size="2">(14:03:22)</font> <b>Bob:</b></font> hi<br/>`.
//! Lines whose timestamp is not followed by a bold `Name:` are status lines.

use std::path::Path;

use chrono::NaiveDate;
use regex::Regex;

use super::markup::MarkupConverter;
use super::{timestamp_from_captures, TranscriptFormat, TranscriptParser};
use crate::error::Result;
use crate::models::RawRecord;

/// Reads `*.html` transcripts
#[derive(Debug, Clone)]
pub struct HtmlTranscriptParser {
    time: Regex,
    named: Regex,
    rest: Regex,
    markup: MarkupConverter,
}

impl HtmlTranscriptParser {
    /// Compile the line patterns
    pub fn new() -> Result<Self> {
        Ok(Self {
            time: Regex::new(r"^.*?>\(.*?(\d{2}):(\d{2}):(\d{2}).*?\)")?,
            named: Regex::new(r"^.*?>\(\d{2}:\d{2}:\d{2}.*?\)<.*?<b>(.*?):</b>(.*)")?,
            rest: Regex::new(r"^.*?>\(\d{2}:\d{2}:\d{2}.*?\)(.*)")?,
            markup: MarkupConverter::new()?,
        })
    }
}

impl TranscriptParser for HtmlTranscriptParser {
    fn format(&self) -> TranscriptFormat {
        TranscriptFormat::Html
    }

    fn parse_str(&self, date: NaiveDate, content: &str, source: &Path) -> Result<Vec<RawRecord>> {
        let mut records = Vec::new();

        for line in content.lines().skip(1) {
            let Some(time) = self.time.captures(line) else {
                continue;
            };
            let timestamp = timestamp_from_captures(date, &time, source)?;

            let record = if let Some(named) = self.named.captures(line) {
                RawRecord {
                    sender: Some(named[1].to_string()),
                    timestamp,
                    body: Some(self.markup.to_text(&named[2])),
                }
            } else {
                RawRecord {
                    sender: None,
                    timestamp,
                    body: self.rest.captures(line).map(|rest| self.markup.to_text(&rest[1])),
                }
            };
            records.push(record);
        }

        tracing::debug!(path = %source.display(), records = records.len(), "Parsed HTML transcript");
        Ok(records)
    }
}
