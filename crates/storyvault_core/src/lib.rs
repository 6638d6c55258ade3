//! Core domain logic for StoryVault.
//!
//! Exports writing projects into browsable zip archives and rebuilds fresh
//! projects from them, with a SQLite store as the source and sink.

pub mod archive;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use archive::{
    export_project, import_project, import_project_with, ArchiveError, ArchiveResult,
    ExportedArchive, Section,
};
pub use config::{ArchiveConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::ids::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
pub use model::project::{Chapter, Note, NoteCategory, Project, ProjectId, ProjectStatus};
pub use repo::project_repo::{
    ProjectRepository, ProjectSummary, RepoError, RepoResult, SqliteProjectRepository,
};
pub use service::archive_service::{ArchiveService, ArchiveServiceError};
