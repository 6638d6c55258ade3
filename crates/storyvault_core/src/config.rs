//! Archive codec configuration.
//!
//! # Responsibility
//! - Hold the tunable constants of the container format (chunk bound, labels,
//!   import defaults).
//! - Validate user-supplied overrides before any export/import runs.
//!
//! # Invariants
//! - `max_chunk_chars` is at least 1.
//! - `description_label` is a single line without `:`, so the note header
//!   written on export is parseable on import.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Default maximum characters per chunk entry.
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 5000;
/// Entries larger than this (declared uncompressed size) are skipped on import.
pub const DEFAULT_MAX_ENTRY_BYTES: u64 = 100 * 1024 * 1024;

/// Tunables for export and import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Maximum characters per container entry before a field is chunked.
    pub max_chunk_chars: usize,
    /// Label written before the description line of a note body.
    pub description_label: String,
    /// Description used for notes whose body has no recognizable header.
    pub missing_description: String,
    /// Title of the chapter injected when an import recovers no chapters.
    pub placeholder_chapter_title: String,
    /// Project title used when the container has no single root folder.
    pub default_title: String,
    pub default_author: String,
    pub default_cover: String,
    pub max_entry_bytes: u64,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: DEFAULT_MAX_CHUNK_CHARS,
            description_label: "Description".to_string(),
            missing_description: "Imported from archive".to_string(),
            placeholder_chapter_title: "Chapter One".to_string(),
            default_title: "Imported Project".to_string(),
            default_author: "Unknown".to_string(),
            default_cover: "default".to_string(),
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        }
    }
}

impl ArchiveConfig {
    /// Loads a JSON config file; absent fields keep their defaults.
    ///
    /// # Errors
    /// - Returns `ConfigError::Io` when the file cannot be read.
    /// - Returns `ConfigError::Parse` when the JSON is malformed.
    /// - Returns validation errors from [`ArchiveConfig::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        let config: Self = serde_json::from_str(&raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates format-level invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_chunk_chars == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        let label = self.description_label.trim();
        if label.is_empty() {
            return Err(ConfigError::EmptyDescriptionLabel);
        }
        if label.contains([':', '：', '\n', '\r']) {
            return Err(ConfigError::InvalidDescriptionLabel(
                self.description_label.clone(),
            ));
        }
        if self.placeholder_chapter_title.trim().is_empty() {
            return Err(ConfigError::EmptyPlaceholderTitle);
        }
        Ok(())
    }
}

/// Configuration loading/validation error.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    ZeroChunkSize,
    EmptyDescriptionLabel,
    InvalidDescriptionLabel(String),
    EmptyPlaceholderTitle,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read archive config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse archive config: {err}"),
            Self::ZeroChunkSize => write!(f, "max_chunk_chars must be at least 1"),
            Self::EmptyDescriptionLabel => write!(f, "description_label must not be empty"),
            Self::InvalidDescriptionLabel(value) => write!(
                f,
                "description_label must be one line without `:`, got `{value}`"
            ),
            Self::EmptyPlaceholderTitle => {
                write!(f, "placeholder_chapter_title must not be empty")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}
