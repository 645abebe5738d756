//! Error taxonomy for assignment, marketplace, and lifecycle orchestration.

use crate::assistant::domain::{AssistantId, CapacityLimit};
use crate::assistant::ports::AssistantRepositoryError;
use crate::pairing::ports::PairingRepositoryError;
use crate::task::domain::{TaskDomainError, TaskId, TaskKind};
use crate::task::ports::TaskRepositoryError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the engine services.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The assistant does not exist.
    #[error("assistant not found: {0}")]
    AssistantNotFound(AssistantId),

    /// The task was claimed or otherwise taken before this caller got to it.
    #[error("task {0} is no longer available to claim")]
    AlreadyClaimed(TaskId),

    /// A guarded write lost to a concurrent update. Transient; the caller
    /// may re-read and retry.
    #[error("task {0} was modified concurrently")]
    Conflict(TaskId),

    /// Binding would exceed the assistant's capacity ceiling.
    #[error("assistant {assistant_id} is at capacity ({limit} active tasks)")]
    CapacityExceeded {
        /// Assistant whose ceiling was hit.
        assistant_id: AssistantId,
        /// The ceiling that was enforced.
        limit: CapacityLimit,
    },

    /// The assistant's specialization does not permit the task's kind.
    #[error("assistant {assistant_id} cannot take {kind} tasks")]
    SpecializationMismatch {
        /// Assistant whose specialization was checked.
        assistant_id: AssistantId,
        /// Kind the task carries.
        kind: TaskKind,
    },

    /// The caller is not the assistant bound to the task.
    #[error("assistant {assistant_id} is not bound to task {task_id}")]
    NotTaskAssistant {
        /// Task the operation targeted.
        task_id: TaskId,
        /// Assistant that attempted the operation.
        assistant_id: AssistantId,
    },

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Task persistence failed.
    #[error(transparent)]
    TaskStore(TaskRepositoryError),

    /// Assistant registry persistence failed.
    #[error(transparent)]
    AssistantRegistry(AssistantRepositoryError),

    /// Pairing persistence failed.
    #[error(transparent)]
    PairingStore(PairingRepositoryError),
}

impl From<TaskRepositoryError> for EngineError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(task_id) => Self::TaskNotFound(task_id),
            TaskRepositoryError::StaleTask(task_id) => Self::Conflict(task_id),
            TaskRepositoryError::CapacityExceeded {
                assistant_id,
                limit,
            } => Self::CapacityExceeded {
                assistant_id,
                limit,
            },
            other => Self::TaskStore(other),
        }
    }
}

impl From<AssistantRepositoryError> for EngineError {
    fn from(err: AssistantRepositoryError) -> Self {
        match err {
            AssistantRepositoryError::NotFound(assistant_id) => {
                Self::AssistantNotFound(assistant_id)
            }
            other => Self::AssistantRegistry(other),
        }
    }
}

impl From<PairingRepositoryError> for EngineError {
    fn from(err: PairingRepositoryError) -> Self {
        Self::PairingStore(err)
    }
}
