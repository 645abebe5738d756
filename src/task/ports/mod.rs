//! Port contracts for task persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by the engine
//! services.

pub mod repository;

pub use repository::{Page, TaskGuard, TaskRepository, TaskRepositoryError, TaskRepositoryResult};
