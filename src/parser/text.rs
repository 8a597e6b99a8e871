//! Parser for Pidgin's plain-text transcripts
//!
//! Entries start with `(HH:MM:SS) Name: body` or `(HH:MM:SS) status`.
//! A named entry's body runs on across every following line that does not
//! start a new timestamped entry.

use std::path::Path;

use chrono::NaiveDate;
use regex::Regex;

use super::{timestamp_from_captures, TranscriptFormat, TranscriptParser};
use crate::error::Result;
use crate::models::RawRecord;

/// Reads `*.txt` transcripts
#[derive(Debug, Clone)]
pub struct TextTranscriptParser {
    time: Regex,
    named: Regex,
    rest: Regex,
}

impl TextTranscriptParser {
    /// Compile the line patterns
    pub fn new() -> Result<Self> {
        Ok(Self {
            time: Regex::new(r"^\(.*?(\d{2}):(\d{2}):(\d{2})")?,
            named: Regex::new(r"^\(\d{2}:\d{2}:\d{2}[^)]*\) (.*?): (.*)")?,
            rest: Regex::new(r"^\(\d{2}:\d{2}:\d{2}[^)]*\) (.*)")?,
        })
    }
}

impl TranscriptParser for TextTranscriptParser {
    fn format(&self) -> TranscriptFormat {
        TranscriptFormat::Text
    }

    fn parse_str(&self, date: NaiveDate, content: &str, source: &Path) -> Result<Vec<RawRecord>> {
        let mut records = Vec::new();
        let mut lines = content.lines().peekable();

        while let Some(line) = lines.next() {
            let Some(time) = self.time.captures(line) else {
                continue;
            };
            let timestamp = timestamp_from_captures(date, &time, source)?;

            if let Some(named) = self.named.captures(line) {
                let mut body = named[2].trim().to_string();
                while let Some(continuation) = lines.next_if(|next| !self.time.is_match(next)) {
                    body.push('\n');
                    body.push_str(continuation.trim());
                }
                records.push(RawRecord {
                    sender: Some(named[1].to_string()),
                    timestamp,
                    body: Some(body),
                });
            } else {
                records.push(RawRecord {
                    sender: None,
                    timestamp,
                    body: self.rest.captures(line).map(|rest| rest[1].to_string()),
                });
            }
        }

        tracing::debug!(path = %source.display(), records = records.len(), "Parsed text transcript");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Vec<RawRecord> {
        let parser = TextTranscriptParser::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2023, 5, 7).unwrap();
        parser.parse_str(date, content, Path::new("2023-05-07.090000+0200CEST.txt")).unwrap()
    }

    #[test]
    fn test_continuation_lines_are_merged() {
        let records = parse(
            "(09:00:00) Alice: line one\nline two\nline three\n(09:01:00) Bob: reply\n",
        );

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sender.as_deref(), Some("Alice"));
        assert_eq!(records[0].body.as_deref(), Some("line one\nline two\nline three"));
        assert_eq!(records[1].body.as_deref(), Some("reply"));
    }

    #[test]
    fn test_continuation_runs_to_end_of_file() {
        let records = parse("(09:00:00 AM) Alice: first\n  indented  \n\ntail");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body.as_deref(), Some("first\nindented\n\ntail"));
    }

    #[test]
    fn test_status_line_consumes_no_continuation() {
        let records = parse(
            "Conversation with bob@example.org at Sun 07 May 2023 09:00:00 on me (jabber)\n\
             (09:00:00) Bob has signed on.\n\
             stray line\n\
             (09:00:05) Bob: hi\n",
        );

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sender, None);
        assert_eq!(records[0].body.as_deref(), Some("Bob has signed on."));
        assert_eq!(records[1].sender.as_deref(), Some("Bob"));
        assert_eq!(records[1].body.as_deref(), Some("hi"));
    }

    #[test]
    fn test_sender_stops_at_first_colon() {
        let records = parse("(10:00:00) Bob: see: this\n");
        assert_eq!(records[0].sender.as_deref(), Some("Bob"));
        assert_eq!(records[0].body.as_deref(), Some("see: this"));
    }

    #[test]
    fn test_action_line_is_unattributed() {
        let records = parse("(10:00:00) ***Bob waves\n");
        assert_eq!(records[0].sender, None);
        assert_eq!(records[0].body.as_deref(), Some("***Bob waves"));
    }
}
