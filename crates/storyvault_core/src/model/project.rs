//! Project domain model.
//!
//! # Responsibility
//! - Define the canonical book project record with its chapters and notes.
//! - Provide constructors that take identifiers from an `IdGenerator`.
//!
//! # Invariants
//! - `chapters` is ordered; index 0 is the first chapter of the book.
//! - `id` values are never reused across projects, chapters or notes.

use crate::model::ids::IdGenerator;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for projects, chapters and notes.
pub type ProjectId = Uuid;

/// Publication state of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Still being written and released in parts.
    #[default]
    Serializing,
    /// Finished.
    Completed,
}

impl ProjectStatus {
    /// Stable storage/wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Serializing => "serializing",
            Self::Completed => "completed",
        }
    }

    /// Parses the storage string produced by [`ProjectStatus::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "serializing" => Some(Self::Serializing),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Worldbuilding note category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteCategory {
    Character,
    Worldview,
    Plot,
    Idea,
}

impl NoteCategory {
    /// Stable storage/wire string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Worldview => "worldview",
            Self::Plot => "plot",
            Self::Idea => "idea",
        }
    }

    /// Parses the storage string produced by [`NoteCategory::as_str`].
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "character" => Some(Self::Character),
            "worldview" => Some(Self::Worldview),
            "plot" => Some(Self::Plot),
            "idea" => Some(Self::Idea),
            _ => None,
        }
    }
}

/// One chapter of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: ProjectId,
    pub title: String,
    /// Chapter body text.
    pub content: String,
    /// Optional short synopsis shown in outlines.
    #[serde(default)]
    pub summary: Option<String>,
}

impl Chapter {
    /// Creates a chapter with an identifier taken from `ids`.
    pub fn new(
        ids: &mut dyn IdGenerator,
        title: impl Into<String>,
        content: impl Into<String>,
        summary: Option<String>,
    ) -> Self {
        Self {
            id: ids.next_id(),
            title: title.into(),
            content: content.into(),
            summary,
        }
    }
}

/// Worldbuilding entity (character, place, plot thread, idea).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: ProjectId,
    pub category: NoteCategory,
    pub name: String,
    /// One-line description rendered under the name.
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form body text.
    pub content: String,
}

impl Note {
    /// Creates a note with an identifier taken from `ids` and no tags.
    pub fn new(
        ids: &mut dyn IdGenerator,
        category: NoteCategory,
        name: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: ids.next_id(),
            category,
            name: name.into(),
            description: description.into(),
            tags: Vec::new(),
            content: content.into(),
        }
    }
}

/// Canonical book project record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    /// Opaque cover preset tag interpreted by the UI.
    #[serde(default)]
    pub cover: String,
    /// Ordered chapters.
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Project {
    /// Creates an empty project with an identifier taken from `ids`.
    pub fn new(
        ids: &mut dyn IdGenerator,
        title: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id: ids.next_id(),
            title: title.into(),
            author: author.into(),
            description: String::new(),
            status: ProjectStatus::default(),
            cover: String::new(),
            chapters: Vec::new(),
            notes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteCategory, Project, ProjectStatus};
    use crate::model::ids::SequentialIdGenerator;

    #[test]
    fn status_and_category_strings_roundtrip() {
        for status in [ProjectStatus::Serializing, ProjectStatus::Completed] {
            assert_eq!(ProjectStatus::parse(status.as_str()), Some(status));
        }
        for category in [
            NoteCategory::Character,
            NoteCategory::Worldview,
            NoteCategory::Plot,
            NoteCategory::Idea,
        ] {
            assert_eq!(NoteCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(NoteCategory::parse("location"), None);
    }

    #[test]
    fn deserialize_fills_optional_fields_with_defaults() {
        let value = serde_json::json!({
            "id": "11111111-2222-4333-8444-555555555555",
            "title": "T",
            "author": "A"
        });
        let project: Project = serde_json::from_value(value).unwrap();
        assert_eq!(project.status, ProjectStatus::Serializing);
        assert!(project.chapters.is_empty());
        assert!(project.notes.is_empty());
        assert_eq!(project.description, "");
    }

    #[test]
    fn new_project_takes_identifier_from_generator() {
        let mut ids = SequentialIdGenerator::default();
        let project = Project::new(&mut ids, "T", "A");
        assert_eq!(project.id.as_u128(), 1);
    }
}
