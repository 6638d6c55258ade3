//! Archive reader: classifies container entries and groups field chunks.
//!
//! # Responsibility
//! - Open arbitrary zip bytes and walk every entry once.
//! - Drop directories, OS junk and entries outside the known sections.
//! - Group chunk entries by `(section, base key)`.
//!
//! # Invariants
//! - Only an unopenable container is an error; unreadable entries are skipped.
//! - Group order is deterministic (section, then base key).

use crate::archive::chunk::Chunk;
use crate::archive::path::{file_stem, parse_entry_stem};
use crate::archive::{ArchiveError, ArchiveResult, Section};
use crate::config::ArchiveConfig;
use log::warn;
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use zip::ZipArchive;

const JUNK_FOLDERS: &[&str] = &["__MACOSX"];
const JUNK_FILES: &[&str] = &[".ds_store", "thumbs.db", "desktop.ini"];

/// All chunks recovered for one logical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroup {
    pub section: Section,
    pub base_key: String,
    /// Chunks in container enumeration order.
    pub chunks: Vec<Chunk>,
}

/// Result of scanning a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveScan {
    /// Root folder shared by every classified entry, if there is exactly one.
    pub root_folder: Option<String>,
    pub groups: Vec<FieldGroup>,
    /// Classified entries dropped because they were oversized or unreadable.
    pub skipped_entries: usize,
}

/// Where a classified entry belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLocation {
    pub section: Section,
    /// First path component when the entry sits below a root folder.
    pub root: Option<String>,
    pub base_key: String,
    pub index: Option<u32>,
}

/// Scans `bytes` as a zip container and groups field chunks.
///
/// # Errors
/// - Returns `ArchiveError::InvalidContainer` when the bytes are not a zip.
pub fn read_groups(bytes: &[u8], config: &ArchiveConfig) -> ArchiveResult<ArchiveScan> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(ArchiveError::InvalidContainer)?;

    let mut grouped: BTreeMap<(Section, String), Vec<Chunk>> = BTreeMap::new();
    let mut roots = RootTracker::default();
    let mut skipped_entries = 0;

    for entry_index in 0..archive.len() {
        let mut file = match archive.by_index(entry_index) {
            Ok(file) => file,
            Err(err) => {
                warn!(
                    "event=archive_entry module=archive status=skipped entry_index={} reason=open_failed error={}",
                    entry_index, err
                );
                skipped_entries += 1;
                continue;
            }
        };
        if file.is_dir() {
            continue;
        }
        let Some(location) = classify_entry(file.name()) else {
            continue;
        };
        if file.size() > config.max_entry_bytes {
            warn!(
                "event=archive_entry module=archive status=skipped entry_index={} reason=oversized size={}",
                entry_index,
                file.size()
            );
            skipped_entries += 1;
            continue;
        }

        let mut raw = Vec::new();
        if let Err(err) = file.read_to_end(&mut raw) {
            warn!(
                "event=archive_entry module=archive status=skipped entry_index={} reason=read_failed error={}",
                entry_index, err
            );
            skipped_entries += 1;
            continue;
        }

        roots.observe(location.root.as_deref());
        grouped
            .entry((location.section, location.base_key))
            .or_default()
            .push(Chunk {
                index: location.index,
                text: decode_text(raw),
            });
    }

    let groups = grouped
        .into_iter()
        .map(|((section, base_key), chunks)| FieldGroup {
            section,
            base_key,
            chunks,
        })
        .collect();

    Ok(ArchiveScan {
        root_folder: roots.into_single(),
        groups,
        skipped_entries,
    })
}

/// Classifies one entry path, returning `None` for junk or unknown folders.
///
/// Accepts both `/` and `\` separators.
pub fn classify_entry(path: &str) -> Option<EntryLocation> {
    let normalized = path.replace('\\', "/");
    let components: Vec<&str> = normalized
        .split('/')
        .filter(|component| !component.is_empty())
        .collect();
    if is_junk(&components) || components.len() < 2 {
        return None;
    }

    let file_name = components[components.len() - 1];
    let parent = components[components.len() - 2];
    let section = Section::classify(parent)?;
    let root = (components.len() >= 3).then(|| components[0].to_string());
    let (base_key, index) = parse_entry_stem(file_stem(file_name));

    Some(EntryLocation {
        section,
        root,
        base_key,
        index,
    })
}

fn is_junk(components: &[&str]) -> bool {
    if components
        .iter()
        .any(|component| JUNK_FOLDERS.contains(component))
    {
        return true;
    }
    match components.last() {
        Some(file_name) => {
            file_name.starts_with("._")
                || JUNK_FILES.contains(&file_name.to_ascii_lowercase().as_str())
        }
        None => true,
    }
}

fn decode_text(raw: Vec<u8>) -> String {
    match String::from_utf8(raw) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}

/// Tracks whether every classified entry shares one root folder.
#[derive(Debug, Default)]
struct RootTracker {
    root: Option<String>,
    mixed: bool,
}

impl RootTracker {
    fn observe(&mut self, root: Option<&str>) {
        if self.mixed {
            return;
        }
        match (self.root.as_deref(), root) {
            (_, None) => self.mixed = true,
            (None, Some(value)) => self.root = Some(value.to_string()),
            (Some(current), Some(value)) if current != value => self.mixed = true,
            _ => {}
        }
    }

    fn into_single(self) -> Option<String> {
        if self.mixed {
            None
        } else {
            self.root
        }
    }
}
