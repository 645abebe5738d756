//! Repository port for task persistence, guarded writes, and marketplace
//! queries.

use crate::assistant::domain::{AssistantId, CapacityLimit};
use crate::task::domain::{Task, TaskId, TaskKindSet, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Expected `(status, assistant)` pair for a guarded write.
///
/// Guarded writes are the compare-and-swap unit the lifecycle relies on:
/// claim, reject, and reassign racing on the same task can never interleave
/// into two binds or an unmatched unbind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskGuard {
    /// Status the stored record must still hold.
    pub status: TaskStatus,
    /// Assistant the stored record must still carry.
    pub assistant_id: Option<AssistantId>,
}

impl TaskGuard {
    /// Captures the guard for a task as currently loaded.
    ///
    /// Call before mutating the aggregate so the write is conditioned on the
    /// state the decision was made against.
    #[must_use]
    pub const fn of(task: &Task) -> Self {
        Self {
            status: task.status(),
            assistant_id: task.assistant_id(),
        }
    }
}

/// Offset/limit window over an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    offset: u64,
    limit: u32,
}

impl Page {
    /// Largest accepted page size.
    pub const MAX_LIMIT: u32 = 100;
    /// Page size used when callers do not specify one.
    pub const DEFAULT_LIMIT: u32 = 20;

    /// Creates a page window, clamping the limit to `1..=MAX_LIMIT`.
    #[must_use]
    pub const fn new(offset: u64, limit: u32) -> Self {
        let clamped = if limit == 0 {
            1
        } else if limit > Self::MAX_LIMIT {
            Self::MAX_LIMIT
        } else {
            limit
        };
        Self {
            offset,
            limit: clamped,
        }
    }

    /// Returns the number of records to skip.
    #[must_use]
    pub const fn offset(self) -> u64 {
        self.offset
    }

    /// Returns the maximum number of records to return.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }
}

/// Task persistence contract.
///
/// Implementations must make each method a single atomic unit of work: an
/// abandoned call leaves no partial state, and the capacity count inside
/// [`TaskRepository::bind_guarded`] sees the same snapshot the write applies
/// to.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Persists changes to a task only while the stored record still matches
    /// `guard`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist, or [`TaskRepositoryError::StaleTask`] when a concurrent writer
    /// got there first.
    async fn update_guarded(&self, task: &Task, guard: TaskGuard) -> TaskRepositoryResult<()>;

    /// Guarded write that additionally enforces the capacity ceiling of the
    /// assistant the task is bound to.
    ///
    /// The count of the assistant's load-bearing tasks (excluding the task
    /// being written) is taken in the same atomic unit as the write, so two
    /// racing binds cannot both slip under the ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::MissingAssistant`] when the task
    /// carries no binding, [`TaskRepositoryError::CapacityExceeded`] when
    /// the assistant is at the ceiling, and otherwise the same errors as
    /// [`TaskRepository::update_guarded`].
    async fn bind_guarded(
        &self,
        task: &Task,
        guard: TaskGuard,
        limit: CapacityLimit,
    ) -> TaskRepositoryResult<()>;

    /// Lists pending, unbound tasks whose kind is in `allowed`, oldest
    /// created first.
    async fn list_claimable(
        &self,
        allowed: TaskKindSet,
        page: Page,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Lists pending, unbound tasks that carry a rejection stamp, most
    /// recently rejected first.
    async fn list_rejected_pending(&self, page: Page) -> TaskRepositoryResult<Vec<Task>>;

    /// Counts the load-bearing tasks currently bound to an assistant.
    async fn count_active_for(&self, assistant_id: AssistantId) -> TaskRepositoryResult<u32>;

    /// Counts pending, unbound tasks.
    async fn count_claimable(&self) -> TaskRepositoryResult<u64>;

    /// Counts pending, unbound tasks whose deadline has lapsed.
    async fn count_overdue(&self, now: DateTime<Utc>) -> TaskRepositoryResult<u64>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A guarded write lost to a concurrent update.
    #[error("stale task state: {0}")]
    StaleTask(TaskId),

    /// Binding would exceed the assistant's capacity ceiling.
    #[error("assistant {assistant_id} is at capacity ({limit} active tasks)")]
    CapacityExceeded {
        /// Assistant whose ceiling was hit.
        assistant_id: AssistantId,
        /// The ceiling that was enforced.
        limit: CapacityLimit,
    },

    /// A bind was requested for a task that carries no assistant.
    #[error("task {0} carries no assistant to bind")]
    MissingAssistant(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
