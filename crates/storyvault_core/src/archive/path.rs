//! Entry-name encoding for archive fields.
//!
//! # Responsibility
//! - Turn note names and chapter positions/titles into base keys.
//! - Render and parse `<base>[_NNN].txt` entry names.
//!
//! # Invariants
//! - Export and import share one chunk-suffix rule: a stem ending in `_` plus
//!   three digits, or four or more digits without a leading zero, is a chunk.
//! - A base key that itself matches the rule is always written with a suffix,
//!   so `parse_entry_stem(entry stem)` returns the written base key.

use crate::archive::chunk::Chunk;
use once_cell::sync::Lazy;
use regex::Regex;

/// Extension of every field entry.
pub const ENTRY_EXTENSION: &str = "txt";

const UNSAFE_NAME_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

static CHUNK_STEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(.*)_(\d{3}|[1-9]\d{3,})$").expect("valid chunk stem regex")
});
static CHAPTER_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(\d{3,})_(.*)$").expect("valid chapter key regex"));

/// Replaces path-hostile characters with `_`.
pub fn sanitize_name(name: &str) -> String {
    name.replace(UNSAFE_NAME_CHARS, "_")
}

/// Base key for a note entry.
pub fn note_base_key(name: &str) -> String {
    sanitize_name(name)
}

/// Base key for the chapter at 1-based `position`.
pub fn chapter_base_key(position: usize, title: &str) -> String {
    format!("{position:03}_{}", sanitize_name(title))
}

/// File name of one chunk: `base.txt` or `base_NNN.txt`.
pub fn entry_file_name(base_key: &str, chunk: &Chunk) -> String {
    match chunk.suffix() {
        Some(suffix) => format!("{base_key}_{suffix}.{ENTRY_EXTENSION}"),
        None => format!("{base_key}.{ENTRY_EXTENSION}"),
    }
}

/// Strips the extension from an entry file name.
///
/// Dotfiles such as `.notes` keep their full name.
pub fn file_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => &file_name[..dot],
        _ => file_name,
    }
}

/// Splits an extension-less entry name into base key and chunk index.
///
/// Returns index `None` for names without a chunk suffix.
pub fn parse_entry_stem(stem: &str) -> (String, Option<u32>) {
    if let Some(caps) = CHUNK_STEM_RE.captures(stem) {
        let base = caps.get(1).map_or("", |m| m.as_str());
        if let Some(index) = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok()) {
            return (base.to_string(), Some(index));
        }
    }
    (stem.to_string(), None)
}

/// True when a base key would be read back as a chunk of a shorter key.
pub fn looks_like_chunk_stem(base_key: &str) -> bool {
    CHUNK_STEM_RE.is_match(base_key)
}

/// Recovers `(order, display title)` from a chapter base key.
///
/// Keys without a numeric `SSS_` prefix return order `None` and the whole key
/// as the title. Underscores become spaces in either case.
pub fn parse_chapter_key(base_key: &str) -> (Option<u32>, String) {
    if let Some(caps) = CHAPTER_KEY_RE.captures(base_key) {
        let order = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
        if let Some(order) = order {
            let rest = caps.get(2).map_or("", |m| m.as_str());
            return (Some(order), readable_name(rest));
        }
    }
    (None, readable_name(base_key))
}

/// Display form of a base key: underscores become spaces.
pub fn readable_name(base_key: &str) -> String {
    base_key.replace('_', " ")
}
