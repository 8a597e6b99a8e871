//! Transcript tree traversal and ingestion
//!
//! Walks `<root>/<protocol>/<account>/<contact>/<file>`, parses every
//! transcript with the parser for its format and feeds the records through
//! the normalizer into the [`LogStore`].

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::Result;
use crate::normalize;
use crate::parser::{HtmlTranscriptParser, TextTranscriptParser, TranscriptFormat, TranscriptParser};
use crate::store::{ContactRef, LogStore};

/// Depth of contact directories below the root
const CONTACT_DIR_DEPTH: usize = 3;

/// Counts gathered while scanning a transcript tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Contact directories visited
    pub directories: usize,
    /// Transcript files parsed
    pub files: usize,
    /// Records extracted by the parsers
    pub records: usize,
    /// Records that became messages
    pub messages: usize,
}

/// Parses transcripts into a [`LogStore`]
#[derive(Debug, Clone)]
pub struct Importer {
    html: HtmlTranscriptParser,
    text: TextTranscriptParser,
}

impl Importer {
    /// Build an importer with both transcript parsers
    pub fn new() -> Result<Self> {
        Ok(Self {
            html: HtmlTranscriptParser::new()?,
            text: TextTranscriptParser::new()?,
        })
    }

    fn parser_for(&self, format: TranscriptFormat) -> &dyn TranscriptParser {
        match format {
            TranscriptFormat::Html => &self.html,
            TranscriptFormat::Text => &self.text,
        }
    }

    /// Scan every contact directory under `root`.
    ///
    /// `on_directory` is called before each contact directory is parsed.
    pub fn scan_tree(
        &self,
        root: &Path,
        store: &mut LogStore,
        mut on_directory: impl FnMut(&Path),
    ) -> Result<ScanSummary> {
        let mut summary = ScanSummary::default();

        let walker = WalkDir::new(root)
            .min_depth(CONTACT_DIR_DEPTH)
            .max_depth(CONTACT_DIR_DEPTH)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                continue;
            }

            on_directory(entry.path());
            let dir_summary = self.import_directory(entry.path(), store)?;
            summary.directories += 1;
            summary.files += dir_summary.files;
            summary.records += dir_summary.records;
            summary.messages += dir_summary.messages;
        }

        info!(
            directories = summary.directories,
            files = summary.files,
            messages = summary.messages,
            "Scanned transcript tree"
        );
        Ok(summary)
    }

    /// Parse every transcript directly inside one contact directory.
    ///
    /// HTML transcripts are read before plain-text ones, each in file-name order.
    pub fn import_directory(&self, contact_dir: &Path, store: &mut LogStore) -> Result<ScanSummary> {
        let contact = store.resolve(contact_dir)?;

        let mut transcripts: Vec<(TranscriptFormat, PathBuf)> = Vec::new();
        for entry in WalkDir::new(contact_dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(format) = TranscriptFormat::from_path(entry.path()) {
                transcripts.push((format, entry.into_path()));
            }
        }
        // stable sort keeps file-name order within each format
        transcripts.sort_by_key(|(format, _)| *format == TranscriptFormat::Text);

        let mut summary = ScanSummary::default();
        for (format, path) in &transcripts {
            let (records, messages) = self.import_file(*format, path, contact, store)?;
            summary.files += 1;
            summary.records += records;
            summary.messages += messages;
        }
        Ok(summary)
    }

    /// Parse one transcript and ingest its records for `contact`.
    ///
    /// Returns the number of records parsed and messages kept.
    pub fn import_file(
        &self,
        format: TranscriptFormat,
        path: &Path,
        contact: ContactRef,
        store: &mut LogStore,
    ) -> Result<(usize, usize)> {
        let records = self.parser_for(format).parse_file(path)?;
        let parsed = records.len();

        let target = store.contact_mut(contact);
        let mut kept = 0;
        for record in records {
            if normalize::ingest(target, record) {
                kept += 1;
            }
        }

        debug!(path = %path.display(), parsed, kept, "Imported transcript");
        Ok((parsed, kept))
    }
}
