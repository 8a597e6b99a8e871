//! Markup-to-text conversion for HTML transcript bodies
//!
//! Bold and italic spans render the way a Markdown-ish text renderer would
//! (`**bold**`, `_italic_`), line breaks become newlines, every other tag is
//! removed and entities are decoded. Message content that itself looked like
//! markup cannot be recovered.

use regex::{Captures, Regex};

use crate::error::Result;

/// Converts inline transcript markup to plain text
#[derive(Debug, Clone)]
pub struct MarkupConverter {
    line_break: Regex,
    bold: Regex,
    italic: Regex,
    any_tag: Regex,
    entity: Regex,
}

impl MarkupConverter {
    /// Compile the markup patterns
    pub fn new() -> Result<Self> {
        Ok(Self {
            line_break: Regex::new(r"(?i)<br\s*/?>")?,
            bold: Regex::new(r"(?i)</?(?:b|strong)(?:\s[^>]*)?>")?,
            italic: Regex::new(r"(?i)</?(?:i|em)(?:\s[^>]*)?>")?,
            any_tag: Regex::new(r"<[^>]*>")?,
            entity: Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);")?,
        })
    }

    /// Convert a markup fragment to trimmed plain text
    #[must_use]
    pub fn to_text(&self, markup: &str) -> String {
        let text = self.line_break.replace_all(markup, "\n");
        let text = self.bold.replace_all(&text, "**");
        let text = self.italic.replace_all(&text, "_");
        let text = self.any_tag.replace_all(&text, "");
        let text = self.entity.replace_all(&text, |caps: &Captures<'_>| {
            decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        });

        text.replace("\\n", "\n").trim().to_string()
    }
}

fn decode_entity(entity: &str) -> Option<String> {
    let decoded = match entity {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)?
        }
    };
    Some(decoded.to_string())
}
