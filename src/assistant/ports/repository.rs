//! Repository port for assistant registry persistence.

use crate::assistant::domain::{Assistant, AssistantId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for assistant repository operations.
pub type AssistantRepositoryResult<T> = Result<T, AssistantRepositoryError>;

/// Assistant registry persistence contract.
#[async_trait]
pub trait AssistantRepository: Send + Sync {
    /// Stores a new assistant.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantRepositoryError::DuplicateAssistant`] when the
    /// assistant ID already exists.
    async fn insert(&self, assistant: &Assistant) -> AssistantRepositoryResult<()>;

    /// Persists changes to an existing assistant (availability, metrics).
    ///
    /// # Errors
    ///
    /// Returns [`AssistantRepositoryError::NotFound`] when the assistant
    /// does not exist.
    async fn update(&self, assistant: &Assistant) -> AssistantRepositoryResult<()>;

    /// Finds an assistant by identifier.
    ///
    /// Returns `None` when the assistant does not exist.
    async fn find_by_id(&self, id: AssistantId) -> AssistantRepositoryResult<Option<Assistant>>;

    /// Counts assistants currently flagged online.
    async fn count_online(&self) -> AssistantRepositoryResult<u64>;
}

/// Errors returned by assistant repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AssistantRepositoryError {
    /// An assistant with the same identifier already exists.
    #[error("duplicate assistant identifier: {0}")]
    DuplicateAssistant(AssistantId),

    /// The assistant was not found.
    #[error("assistant not found: {0}")]
    NotFound(AssistantId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AssistantRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
