//! Archive writer: project snapshot to zip bytes.
//!
//! # Invariants
//! - The root folder and all four section folders exist even when empty.
//! - Chapters are written in project order, numbered from 1.
//! - No two fields of one section share a base key or an entry name.
//! - Output is byte-identical for identical input (fixed entry timestamps).
//! - Any failure returns an error and no bytes.

use crate::archive::chunk::{split, Chunk};
use crate::archive::parser::{CONTENT_MARKER, SUMMARY_MARKER};
use crate::archive::path::{
    chapter_base_key, entry_file_name, looks_like_chunk_stem, note_base_key, sanitize_name,
};
use crate::archive::{ArchiveError, ArchiveResult, Section};
use crate::config::ArchiveConfig;
use crate::model::project::{Chapter, Note, Project};
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

const UNTITLED_ROOT: &str = "Untitled";

/// Serialized archive ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedArchive {
    /// Suggested file name, `<title>_archive.zip`.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Base keys and entry names already written into one section.
#[derive(Debug, Default)]
struct SectionNames {
    keys: HashSet<String>,
    entries: HashSet<String>,
}

/// Builds the zip container for `project`.
pub fn write_archive(project: &Project, config: &ArchiveConfig) -> ArchiveResult<ExportedArchive> {
    let root = root_folder_name(&project.title);
    let fixed_time = DateTime::from_date_and_time(1980, 1, 1, 0, 0, 0)
        .map_err(|err| ArchiveError::Write(err.to_string()))?;
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(fixed_time);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.add_directory(format!("{root}/"), options)
        .map_err(write_error)?;
    for section in Section::ALL {
        zip.add_directory(format!("{root}/{}/", section.label()), options)
            .map_err(write_error)?;
    }

    let mut used: HashMap<Section, SectionNames> = HashMap::new();
    for note in &project.notes {
        let section = Section::for_category(note.category);
        let body = format_note_body(note, &config.description_label);
        let entries = reserve_entries(
            used.entry(section).or_default(),
            note_base_key(&note.name),
            split(&body, config.max_chunk_chars),
        );
        write_entries(&mut zip, options, &root, section, entries)?;
    }

    for (position, chapter) in project.chapters.iter().enumerate() {
        let body = format_chapter_body(chapter);
        let entries = reserve_entries(
            used.entry(Section::Content).or_default(),
            chapter_base_key(position + 1, &chapter.title),
            split(&body, config.max_chunk_chars),
        );
        write_entries(&mut zip, options, &root, Section::Content, entries)?;
    }

    let cursor = zip.finish().map_err(write_error)?;
    Ok(ExportedArchive {
        file_name: format!("{root}_archive.zip"),
        bytes: cursor.into_inner(),
    })
}

/// Note entry body: bracketed name, description line, blank line, content.
///
/// Line breaks inside the description are flattened to spaces so the header
/// stays a single line.
pub fn format_note_body(note: &Note, description_label: &str) -> String {
    format!(
        "【{}】\n{}: {}\n\n{}",
        note.name,
        description_label,
        single_line(&note.description),
        note.content
    )
}

/// Chapter entry body: summary section followed by content section.
pub fn format_chapter_body(chapter: &Chapter) -> String {
    format!(
        "{SUMMARY_MARKER}\n{}\n{CONTENT_MARKER}\n{}",
        chapter.summary.as_deref().unwrap_or(""),
        chapter.content
    )
}

/// Root folder name derived from the project title.
pub fn root_folder_name(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNTITLED_ROOT.to_string()
    } else {
        sanitize_name(trimmed)
    }
}

fn single_line(value: &str) -> String {
    value.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Picks the first free key among `base`, `base (2)`, `base (3)`, ... whose
/// entry names are all unused, records them and returns `(entry name, chunk)`
/// pairs.
fn reserve_entries(
    names: &mut SectionNames,
    base: String,
    chunks: Vec<Chunk>,
) -> Vec<(String, Chunk)> {
    let mut counter = 1;
    loop {
        let key = if counter == 1 {
            base.clone()
        } else {
            format!("{base} ({counter})")
        };
        let entries: Vec<(String, Chunk)> = suffixed_chunks(&key, chunks.clone())
            .into_iter()
            .map(|chunk| (entry_file_name(&key, &chunk), chunk))
            .collect();
        let free = !names.keys.contains(&key)
            && entries
                .iter()
                .all(|(entry, _)| !names.entries.contains(entry));
        if free {
            names.keys.insert(key);
            names
                .entries
                .extend(entries.iter().map(|(entry, _)| entry.clone()));
            return entries;
        }
        counter += 1;
    }
}

/// A single chunk whose key already ends like a chunk suffix is written as
/// chunk 1 so the reader recovers the whole key.
fn suffixed_chunks(key: &str, mut chunks: Vec<Chunk>) -> Vec<Chunk> {
    if let [single] = chunks.as_mut_slice() {
        if single.index.is_none() && looks_like_chunk_stem(key) {
            single.index = Some(1);
        }
    }
    chunks
}

fn write_entries(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    root: &str,
    section: Section,
    entries: Vec<(String, Chunk)>,
) -> ArchiveResult<()> {
    for (entry, chunk) in entries {
        zip.start_file(format!("{root}/{}/{entry}", section.label()), options)
            .map_err(write_error)?;
        zip.write_all(chunk.text.as_bytes())
            .map_err(|err| ArchiveError::Write(err.to_string()))?;
    }
    Ok(())
}

fn write_error(err: zip::result::ZipError) -> ArchiveError {
    ArchiveError::Write(err.to_string())
}
