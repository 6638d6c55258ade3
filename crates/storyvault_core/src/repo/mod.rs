//! Repository layer for the project store.
//!
//! # Responsibility
//! - Define the storage contract the archive service exports from and imports
//!   into.
//! - Keep SQL details out of the service layer.

pub mod project_repo;
