//! Writing-project domain model.
//!
//! # Responsibility
//! - Define the project/chapter/note shapes shared by the archive codec, the
//!   project store and the CLI.
//! - Own the identifier generation contract used when synthesizing projects.
//!
//! # Invariants
//! - Chapter order inside a `Project` is significant.
//! - Imported projects always receive fresh identifiers.

pub mod ids;
pub mod project;
