//! Project assembler for imported archives.
//!
//! # Invariants
//! - Every identifier comes from the injected `IdGenerator`.
//! - Chapters are ordered by recovered position; unnumbered chapters follow
//!   all numbered ones in base-key order.
//! - The result has at least one chapter.

use crate::archive::parser::{ParsedChapter, ParsedNote};
use crate::config::ArchiveConfig;
use crate::model::ids::IdGenerator;
use crate::model::project::{Chapter, Note, Project, ProjectStatus};

/// Builds a fresh project from parsed archive fields.
///
/// `root_folder` becomes the title when present and non-blank.
pub fn assemble_project(
    root_folder: Option<&str>,
    mut chapters: Vec<ParsedChapter>,
    notes: Vec<ParsedNote>,
    config: &ArchiveConfig,
    ids: &mut dyn IdGenerator,
) -> Project {
    let title = root_folder
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(config.default_title.as_str());

    let mut project = Project::new(ids, title, config.default_author.as_str());
    project.status = ProjectStatus::Serializing;
    project.cover = config.default_cover.clone();

    // Stable sort keeps base-key order among equal or missing positions.
    chapters.sort_by_key(|chapter| chapter.order.unwrap_or(u32::MAX));
    project.chapters = chapters
        .into_iter()
        .map(|parsed| {
            let summary = Some(parsed.summary).filter(|value| !value.is_empty());
            Chapter::new(ids, parsed.title, parsed.content, summary)
        })
        .collect();

    if project.chapters.is_empty() {
        project.chapters.push(Chapter::new(
            ids,
            config.placeholder_chapter_title.as_str(),
            "",
            None,
        ));
    }

    project.notes = notes
        .into_iter()
        .map(|parsed| {
            Note::new(
                ids,
                parsed.category,
                parsed.name,
                parsed.description,
                parsed.content,
            )
        })
        .collect();

    project
}

#[cfg(test)]
mod tests {
    use super::assemble_project;
    use crate::archive::parser::{ParsedChapter, ParsedNote};
    use crate::config::ArchiveConfig;
    use crate::model::ids::SequentialIdGenerator;
    use crate::model::project::{NoteCategory, ProjectStatus};

    fn chapter(order: Option<u32>, title: &str) -> ParsedChapter {
        ParsedChapter {
            order,
            title: title.to_string(),
            summary: String::new(),
            content: format!("{title} body"),
        }
    }

    #[test]
    fn chapters_sorted_with_unnumbered_last() {
        let config = ArchiveConfig::default();
        let mut ids = SequentialIdGenerator::default();
        let project = assemble_project(
            Some("Book"),
            vec![
                chapter(None, "Loose"),
                chapter(Some(10), "Ten"),
                chapter(Some(2), "Two"),
            ],
            Vec::new(),
            &config,
            &mut ids,
        );

        let titles: Vec<&str> = project.chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Two", "Ten", "Loose"]);
        assert_eq!(project.title, "Book");
        assert_eq!(project.status, ProjectStatus::Serializing);
        assert_eq!(project.author, config.default_author);
    }

    #[test]
    fn empty_input_gets_placeholder_chapter_and_default_title() {
        let config = ArchiveConfig::default();
        let mut ids = SequentialIdGenerator::default();
        let project = assemble_project(None, Vec::new(), Vec::new(), &config, &mut ids);

        assert_eq!(project.title, config.default_title);
        assert_eq!(project.chapters.len(), 1);
        assert_eq!(project.chapters[0].title, "Chapter One");
        assert_eq!(project.chapters[0].content, "");
        assert_eq!(project.chapters[0].summary, None);
        assert!(project.notes.is_empty());
    }

    #[test]
    fn identifiers_come_from_generator() {
        let config = ArchiveConfig::default();
        let mut ids = SequentialIdGenerator::default();
        let notes = vec![ParsedNote {
            category: NoteCategory::Character,
            name: "Alice".to_string(),
            description: "d".to_string(),
            content: "c".to_string(),
        }];
        let project = assemble_project(
            None,
            vec![chapter(Some(1), "One")],
            notes,
            &config,
            &mut ids,
        );

        assert_eq!(project.id.as_u128(), 1);
        assert_eq!(project.chapters[0].id.as_u128(), 2);
        assert_eq!(project.notes[0].id.as_u128(), 3);
        assert!(project.notes[0].tags.is_empty());
    }
}
