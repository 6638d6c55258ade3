//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate the archive codec and the project store into use-case APIs.
//! - Keep CLI/UI layers decoupled from storage and container details.

pub mod archive_service;
