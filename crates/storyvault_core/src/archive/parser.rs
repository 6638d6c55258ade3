//! Content parser for merged chapter and note texts.
//!
//! # Invariants
//! - Parsing never fails. Text without the expected markers or header falls
//!   back to "whole text is the body".
//! - A chapter's order and title come from its base key, never its body.

use crate::archive::path::{parse_chapter_key, readable_name};
use crate::config::ArchiveConfig;
use crate::model::project::NoteCategory;
use once_cell::sync::Lazy;
use regex::Regex;

/// Marker opening the summary section of a chapter entry.
pub const SUMMARY_MARKER: &str = "---SUMMARY---";
/// Marker opening the content section of a chapter entry.
pub const CONTENT_MARKER: &str = "---CONTENT---";

// 【name】, a labelled description line, a blank line, then the body.
static NOTE_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A【(.*?)】\r?\n[^\r\n]*?[:：][ \t]?([^\r\n]*)\r?\n\r?\n(.*)\z")
        .expect("valid note header regex")
});

/// Chapter fields recovered from one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedChapter {
    /// Position from the `SSS_` key prefix, `None` when the key has none.
    pub order: Option<u32>,
    pub title: String,
    pub summary: String,
    pub content: String,
}

/// Note fields recovered from one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNote {
    pub category: NoteCategory,
    pub name: String,
    pub description: String,
    pub content: String,
}

/// Parses a merged chapter text.
pub fn parse_chapter(base_key: &str, text: &str) -> ParsedChapter {
    let (order, title) = parse_chapter_key(base_key);
    let (summary, content) = match split_chapter_sections(text) {
        Some((summary, content)) => (summary.trim().to_string(), content.to_string()),
        None => (String::new(), text.to_string()),
    };
    ParsedChapter {
        order,
        title,
        summary,
        content,
    }
}

/// Parses a merged note text.
pub fn parse_note(
    base_key: &str,
    text: &str,
    category: NoteCategory,
    config: &ArchiveConfig,
) -> ParsedNote {
    if let Some(caps) = NOTE_HEADER_RE.captures(text) {
        let capture = |group: usize| caps.get(group).map_or("", |m| m.as_str()).to_string();
        return ParsedNote {
            category,
            name: capture(1),
            description: capture(2),
            content: capture(3),
        };
    }
    ParsedNote {
        category,
        name: readable_name(base_key),
        description: config.missing_description.clone(),
        content: text.to_string(),
    }
}

/// Returns `(summary, content)` slices when both markers are present in order.
fn split_chapter_sections(text: &str) -> Option<(&str, &str)> {
    let summary_start = text.find(SUMMARY_MARKER)? + SUMMARY_MARKER.len();
    let content_offset = text[summary_start..].find(CONTENT_MARKER)?;
    let summary = &text[summary_start..summary_start + content_offset];
    let after_marker = &text[summary_start + content_offset + CONTENT_MARKER.len()..];
    Some((summary, strip_line_break(after_marker)))
}

/// Drops the single line break written directly after a marker.
fn strip_line_break(value: &str) -> &str {
    value
        .strip_prefix("\r\n")
        .or_else(|| value.strip_prefix('\n'))
        .unwrap_or(value)
}
