//! Archive use-case service.
//!
//! # Responsibility
//! - Export a stored project by id into a downloadable archive.
//! - Import an archive as a brand-new project and insert it into the store.
//!
//! # Invariants
//! - Import never touches an existing project; it always inserts a new one.
//! - A failed import leaves the store unchanged.
//! - Configuration is validated once, at construction.

use crate::archive::{export_project, import_project_with, ArchiveError, ExportedArchive};
use crate::config::{ArchiveConfig, ConfigError};
use crate::model::ids::IdGenerator;
use crate::model::project::{Project, ProjectId};
use crate::repo::project_repo::{ProjectRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for archive use-cases.
#[derive(Debug)]
pub enum ArchiveServiceError {
    Config(ConfigError),
    Archive(ArchiveError),
    /// Requested project is not stored.
    ProjectNotFound(ProjectId),
    Repo(RepoError),
}

impl Display for ArchiveServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Archive(err) => write!(f, "{err}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ArchiveServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Archive(err) => Some(err),
            Self::ProjectNotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ArchiveServiceError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<ArchiveError> for ArchiveServiceError {
    fn from(value: ArchiveError) -> Self {
        Self::Archive(value)
    }
}

impl From<RepoError> for ArchiveServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ProjectNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Archive service facade over a project store and an id generator.
pub struct ArchiveService<R: ProjectRepository, G: IdGenerator> {
    repo: R,
    ids: G,
    config: ArchiveConfig,
}

impl<R: ProjectRepository, G: IdGenerator> ArchiveService<R, G> {
    /// Creates a service after validating `config`.
    pub fn new(repo: R, ids: G, config: ArchiveConfig) -> Result<Self, ArchiveServiceError> {
        config.validate()?;
        Ok(Self { repo, ids, config })
    }

    /// Exports the stored project `id`.
    pub fn export(&self, id: ProjectId) -> Result<ExportedArchive, ArchiveServiceError> {
        let project = self
            .repo
            .get_project(id)?
            .ok_or(ArchiveServiceError::ProjectNotFound(id))?;
        Ok(export_project(&project, &self.config)?)
    }

    /// Imports `bytes` as a new project, stores it and returns it.
    pub fn import(&mut self, bytes: &[u8]) -> Result<Project, ArchiveServiceError> {
        let repo = &mut self.repo;
        let inserted = import_project_with(bytes, &self.config, &mut self.ids, |project| {
            repo.insert_project(&project).map(|_| project)
        })?;
        Ok(inserted?)
    }

    /// Returns the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }
}

#[cfg(test)]
mod tests {
    use super::{ArchiveService, ArchiveServiceError};
    use crate::config::ArchiveConfig;
    use crate::db::open_db_in_memory;
    use crate::model::ids::SequentialIdGenerator;
    use crate::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
    use uuid::Uuid;

    #[test]
    fn rejects_invalid_config() {
        let mut conn = open_db_in_memory().unwrap();
        let config = ArchiveConfig {
            max_chunk_chars: 0,
            ..ArchiveConfig::default()
        };
        let result = ArchiveService::new(
            SqliteProjectRepository::new(&mut conn),
            SequentialIdGenerator::default(),
            config,
        );
        assert!(matches!(result, Err(ArchiveServiceError::Config(_))));
    }

    #[test]
    fn export_of_unknown_project_is_not_found() {
        let mut conn = open_db_in_memory().unwrap();
        let service = ArchiveService::new(
            SqliteProjectRepository::new(&mut conn),
            SequentialIdGenerator::default(),
            ArchiveConfig::default(),
        )
        .unwrap();

        let missing = Uuid::from_u128(99);
        let err = service.export(missing).unwrap_err();
        assert!(matches!(err, ArchiveServiceError::ProjectNotFound(id) if id == missing));
    }

    #[test]
    fn failed_import_leaves_store_empty() {
        let mut conn = open_db_in_memory().unwrap();
        let mut service = ArchiveService::new(
            SqliteProjectRepository::new(&mut conn),
            SequentialIdGenerator::default(),
            ArchiveConfig::default(),
        )
        .unwrap();

        let err = service.import(b"definitely not a zip").unwrap_err();
        assert!(matches!(err, ArchiveServiceError::Archive(_)));
        assert!(service.repo().list_projects().unwrap().is_empty());
    }
}
