//! Project archive codec.
//!
//! # Responsibility
//! - Export a `Project` into a browsable zip container (one folder per
//!   section, one text entry per chunk).
//! - Rebuild a fresh `Project` from any container that follows, or loosely
//!   resembles, that layout.
//!
//! # Invariants
//! - Chunks of one field concatenated in index order reproduce the field text.
//! - Chapter order is recovered from the numeric prefix of entry names.
//! - An imported project always has at least one chapter.
//! - Only an unopenable container fails an import; every per-entry problem
//!   degrades to a documented fallback.
//!
//! # Layout
//! ```text
//! <title>/
//!   Outline/      plot and idea notes
//!   Characters/   character notes
//!   Worldview/    worldview notes
//!   Content/      chapters
//! ```

pub mod assembler;
pub mod chunk;
pub mod parser;
pub mod path;
pub mod reader;
pub mod writer;

use crate::config::ArchiveConfig;
use crate::model::ids::IdGenerator;
use crate::model::project::{NoteCategory, Project};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub use assembler::assemble_project;
pub use chunk::{merge, split, Chunk};
pub use parser::{parse_chapter, parse_note, ParsedChapter, ParsedNote};
pub use reader::{read_groups, ArchiveScan, FieldGroup};
pub use writer::{write_archive, ExportedArchive};

pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Top-level container folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    /// Plot and idea notes.
    Outline,
    Characters,
    Worldview,
    /// Chapters.
    Content,
}

impl Section {
    /// Canonical export order.
    pub const ALL: [Section; 4] = [
        Section::Outline,
        Section::Characters,
        Section::Worldview,
        Section::Content,
    ];

    /// Folder name written on export.
    pub fn label(self) -> &'static str {
        match self {
            Self::Outline => "Outline",
            Self::Characters => "Characters",
            Self::Worldview => "Worldview",
            Self::Content => "Content",
        }
    }

    /// Lowercase tags recognized inside a folder name on import.
    ///
    /// Every canonical label contains its first tag.
    fn tags(self) -> &'static [&'static str] {
        match self {
            Self::Outline => &["outline"],
            Self::Characters => &["character"],
            Self::Worldview => &["worldview"],
            Self::Content => &["content", "chapter"],
        }
    }

    /// Classifies a folder name by case-insensitive tag match.
    pub fn classify(folder_name: &str) -> Option<Section> {
        let lowered = folder_name.to_lowercase();
        Self::ALL.into_iter().find(|section| {
            section
                .tags()
                .iter()
                .any(|tag| lowered.contains(tag))
        })
    }

    /// Export folder for a note category. Plot and idea share `Outline`.
    pub fn for_category(category: NoteCategory) -> Section {
        match category {
            NoteCategory::Plot | NoteCategory::Idea => Self::Outline,
            NoteCategory::Character => Self::Characters,
            NoteCategory::Worldview => Self::Worldview,
        }
    }

    /// Category assigned to notes read back from this section.
    ///
    /// Returns `None` for the chapter section.
    pub fn note_category(self) -> Option<NoteCategory> {
        match self {
            Self::Outline => Some(NoteCategory::Plot),
            Self::Characters => Some(NoteCategory::Character),
            Self::Worldview => Some(NoteCategory::Worldview),
            Self::Content => None,
        }
    }
}

/// Fatal archive errors. Per-entry problems never surface here.
#[derive(Debug)]
pub enum ArchiveError {
    /// Input bytes are not a readable zip container.
    InvalidContainer(zip::result::ZipError),
    /// Serializing the container failed; no bytes were produced.
    Write(String),
}

impl Display for ArchiveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidContainer(err) => write!(f, "not a valid project archive: {err}"),
            Self::Write(message) => write!(f, "failed to write project archive: {message}"),
        }
    }
}

impl Error for ArchiveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidContainer(err) => Some(err),
            Self::Write(_) => None,
        }
    }
}

/// Exports a project snapshot into a zip byte stream.
///
/// # Errors
/// - Returns `ArchiveError::Write` when the container cannot be serialized.
pub fn export_project(project: &Project, config: &ArchiveConfig) -> ArchiveResult<ExportedArchive> {
    let started_at = Instant::now();
    match write_archive(project, config) {
        Ok(archive) => {
            info!(
                "event=archive_export module=archive status=ok chapters={} notes={} bytes={} duration_ms={}",
                project.chapters.len(),
                project.notes.len(),
                archive.bytes.len(),
                started_at.elapsed().as_millis()
            );
            Ok(archive)
        }
        Err(err) => {
            error!(
                "event=archive_export module=archive status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Imports a zip byte stream into a brand-new project.
///
/// # Errors
/// - Returns `ArchiveError::InvalidContainer` when `bytes` is not a zip.
pub fn import_project(
    bytes: &[u8],
    config: &ArchiveConfig,
    ids: &mut dyn IdGenerator,
) -> ArchiveResult<Project> {
    let started_at = Instant::now();
    let scan = match read_groups(bytes, config) {
        Ok(scan) => scan,
        Err(err) => {
            error!(
                "event=archive_import module=archive status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err);
        }
    };

    let mut chapters = Vec::new();
    let mut notes = Vec::new();
    for group in &scan.groups {
        let text = merge(&group.chunks);
        match group.section.note_category() {
            None => chapters.push(parse_chapter(&group.base_key, &text)),
            Some(category) => notes.push(parse_note(&group.base_key, &text, category, config)),
        }
    }

    let project = assemble_project(scan.root_folder.as_deref(), chapters, notes, config, ids);
    info!(
        "event=archive_import module=archive status=ok groups={} skipped_entries={} chapters={} notes={} duration_ms={}",
        scan.groups.len(),
        scan.skipped_entries,
        project.chapters.len(),
        project.notes.len(),
        started_at.elapsed().as_millis()
    );
    Ok(project)
}

/// Imports `bytes` and hands the new project to `insert`.
///
/// `insert` is never called when the container cannot be opened.
pub fn import_project_with<T>(
    bytes: &[u8],
    config: &ArchiveConfig,
    ids: &mut dyn IdGenerator,
    insert: impl FnOnce(Project) -> T,
) -> ArchiveResult<T> {
    let project = import_project(bytes, config, ids)?;
    Ok(insert(project))
}

#[cfg(test)]
mod tests {
    use super::Section;
    use crate::model::project::NoteCategory;

    #[test]
    fn classify_matches_canonical_labels() {
        for section in Section::ALL {
            assert_eq!(Section::classify(section.label()), Some(section));
        }
    }

    #[test]
    fn classify_is_case_insensitive_and_tolerates_decoration() {
        assert_eq!(Section::classify("01 - CHARACTERS"), Some(Section::Characters));
        assert_eq!(Section::classify("my_chapters"), Some(Section::Content));
        assert_eq!(Section::classify("Drafts"), None);
    }

    #[test]
    fn plot_and_idea_share_outline_and_read_back_as_plot() {
        assert_eq!(Section::for_category(NoteCategory::Idea), Section::Outline);
        assert_eq!(Section::for_category(NoteCategory::Plot), Section::Outline);
        assert_eq!(Section::Outline.note_category(), Some(NoteCategory::Plot));
        assert_eq!(Section::Content.note_category(), None);
    }
}
