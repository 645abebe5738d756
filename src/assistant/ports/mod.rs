//! Port contracts for assistant registry persistence.

pub mod repository;

pub use repository::{AssistantRepository, AssistantRepositoryError, AssistantRepositoryResult};
