//! Project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist whole projects (metadata, ordered chapters, notes, tags).
//! - Load them back in their original order for export.
//!
//! # Invariants
//! - `insert_project` writes every row in one transaction or none at all.
//! - Chapter and note order is preserved through a `position` column.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::project::{
    Chapter, Note, NoteCategory, Project, ProjectId, ProjectStatus,
};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for project persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(ProjectId),
    /// A project with this id is already stored.
    Duplicate(ProjectId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "project not found: {id}"),
            Self::Duplicate(id) => write!(f, "project already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted project data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Listing row for stored projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub title: String,
    pub author: String,
    pub status: ProjectStatus,
    pub chapter_count: u32,
    pub note_count: u32,
}

/// Store that supplies projects to export and receives imported ones.
pub trait ProjectRepository {
    /// Inserts a complete project and returns its id.
    fn insert_project(&mut self, project: &Project) -> RepoResult<ProjectId>;
    /// Loads one project with chapters and notes in stored order.
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    /// Lists stored projects, newest first.
    fn list_projects(&self) -> RepoResult<Vec<ProjectSummary>>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Constructs a repository over a migrated connection.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn insert_project(&mut self, project: &Project) -> RepoResult<ProjectId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if project_exists(&tx, project.id)? {
            return Err(RepoError::Duplicate(project.id));
        }

        tx.execute(
            "INSERT INTO projects (uuid, title, author, description, status, cover)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                project.id.to_string(),
                project.title,
                project.author,
                project.description,
                project.status.as_str(),
                project.cover,
            ],
        )?;
        insert_chapters(&tx, project)?;
        insert_notes(&tx, project)?;

        tx.commit()?;
        Ok(project.id)
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let row = self
            .conn
            .query_row(
                "SELECT title, author, description, status, cover
                 FROM projects
                 WHERE uuid = ?1;",
                [id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>("title")?,
                        row.get::<_, String>("author")?,
                        row.get::<_, String>("description")?,
                        row.get::<_, String>("status")?,
                        row.get::<_, String>("cover")?,
                    ))
                },
            )
            .optional()?;
        let Some((title, author, description, status, cover)) = row else {
            return Ok(None);
        };

        Ok(Some(Project {
            id,
            title,
            author,
            description,
            status: parse_status(&status)?,
            cover,
            chapters: load_chapters(self.conn, id)?,
            notes: load_notes(self.conn, id)?,
        }))
    }

    fn list_projects(&self) -> RepoResult<Vec<ProjectSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                p.uuid,
                p.title,
                p.author,
                p.status,
                (SELECT COUNT(*) FROM chapters c WHERE c.project_uuid = p.uuid) AS chapter_count,
                (SELECT COUNT(*) FROM notes n WHERE n.project_uuid = p.uuid) AS note_count
             FROM projects p
             ORDER BY p.created_at DESC, p.uuid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get("uuid")?;
            let status: String = row.get("status")?;
            projects.push(ProjectSummary {
                id: parse_uuid(&uuid_text)?,
                title: row.get("title")?,
                author: row.get("author")?,
                status: parse_status(&status)?,
                chapter_count: row.get("chapter_count")?,
                note_count: row.get("note_count")?,
            });
        }
        Ok(projects)
    }
}

fn insert_chapters(tx: &Transaction<'_>, project: &Project) -> RepoResult<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO chapters (uuid, project_uuid, position, title, content, summary)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
    )?;
    for (position, chapter) in project.chapters.iter().enumerate() {
        stmt.execute(params![
            chapter.id.to_string(),
            project.id.to_string(),
            position as i64,
            chapter.title,
            chapter.content,
            chapter.summary,
        ])?;
    }
    Ok(())
}

fn insert_notes(tx: &Transaction<'_>, project: &Project) -> RepoResult<()> {
    let mut note_stmt = tx.prepare(
        "INSERT INTO notes (uuid, project_uuid, position, category, name, description, content)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
    )?;
    let mut tag_stmt =
        tx.prepare("INSERT INTO note_tags (note_uuid, position, tag) VALUES (?1, ?2, ?3);")?;
    for (position, note) in project.notes.iter().enumerate() {
        let note_uuid = note.id.to_string();
        note_stmt.execute(params![
            note_uuid,
            project.id.to_string(),
            position as i64,
            note.category.as_str(),
            note.name,
            note.description,
            note.content,
        ])?;
        for (tag_position, tag) in note.tags.iter().enumerate() {
            tag_stmt.execute(params![note_uuid, tag_position as i64, tag])?;
        }
    }
    Ok(())
}

fn load_chapters(conn: &Connection, project_id: ProjectId) -> RepoResult<Vec<Chapter>> {
    let mut stmt = conn.prepare(
        "SELECT uuid, title, content, summary
         FROM chapters
         WHERE project_uuid = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([project_id.to_string()])?;
    let mut chapters = Vec::new();
    while let Some(row) = rows.next()? {
        let uuid_text: String = row.get("uuid")?;
        chapters.push(Chapter {
            id: parse_uuid(&uuid_text)?,
            title: row.get("title")?,
            content: row.get("content")?,
            summary: row.get("summary")?,
        });
    }
    Ok(chapters)
}

fn load_notes(conn: &Connection, project_id: ProjectId) -> RepoResult<Vec<Note>> {
    let mut stmt = conn.prepare(
        "SELECT uuid, category, name, description, content
         FROM notes
         WHERE project_uuid = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([project_id.to_string()])?;
    let mut notes = Vec::new();
    while let Some(row) = rows.next()? {
        let uuid_text: String = row.get("uuid")?;
        let category: String = row.get("category")?;
        notes.push(Note {
            id: parse_uuid(&uuid_text)?,
            category: NoteCategory::parse(&category).ok_or_else(|| {
                RepoError::InvalidData(format!("invalid note category `{category}`"))
            })?,
            name: row.get("name")?,
            description: row.get("description")?,
            tags: load_tags(conn, &uuid_text)?,
            content: row.get("content")?,
        });
    }
    Ok(notes)
}

fn load_tags(conn: &Connection, note_uuid: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT tag FROM note_tags WHERE note_uuid = ?1 ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([note_uuid])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(row.get(0)?);
    }
    Ok(tags)
}

fn project_exists(tx: &Transaction<'_>, id: ProjectId) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM projects WHERE uuid = ?1);",
        [id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_uuid(value: &str) -> RepoResult<ProjectId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}`")))
}

fn parse_status(value: &str) -> RepoResult<ProjectStatus> {
    ProjectStatus::parse(value)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid project status `{value}`")))
}
