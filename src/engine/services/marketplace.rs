//! Marketplace listing, claiming, and reporting.

use crate::assistant::{
    domain::{Assistant, AssistantId},
    ports::AssistantRepository,
};
use crate::engine::{EngineError, EngineResult};
use crate::task::{
    domain::{Task, TaskId, TaskKind, TaskKindSet, TaskStatus},
    ports::{Page, TaskGuard, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Point-in-time marketplace counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketplaceStats {
    /// Pending, unbound tasks available to claim.
    pub claimable: u64,
    /// Claimable tasks whose deadline has lapsed.
    pub overdue: u64,
    /// Assistants currently flagged online.
    pub online_assistants: u64,
}

/// Marketplace operations: what an assistant can see and take.
#[derive(Clone)]
pub struct MarketplaceService<T, A, C>
where
    T: TaskRepository,
    A: AssistantRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    assistants: Arc<A>,
    clock: Arc<C>,
}

impl<T, A, C> MarketplaceService<T, A, C>
where
    T: TaskRepository,
    A: AssistantRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new marketplace service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, assistants: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            assistants,
            clock,
        }
    }

    /// Lists tasks the assistant may claim, oldest created first.
    ///
    /// The assistant's specialization bounds the visible kinds;
    /// `kind_filter` narrows further. A filter outside the specialization
    /// yields an empty page rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AssistantNotFound`] when the assistant does
    /// not exist, and persistence errors otherwise.
    pub async fn list_claimable(
        &self,
        assistant_id: AssistantId,
        kind_filter: Option<TaskKind>,
        page: Page,
    ) -> EngineResult<Vec<Task>> {
        let assistant = self.require_assistant(assistant_id).await?;
        let mut allowed = assistant.specialization().allowed_kinds();
        if let Some(kind) = kind_filter {
            allowed = allowed.intersection(TaskKindSet::of(kind));
        }
        if allowed.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.tasks.list_claimable(allowed, page).await?)
    }

    /// Claims a pending task for an assistant.
    ///
    /// This is the one racing operation: the bind is a compare-and-swap plus
    /// a capacity count in the same atomic unit, so of any number of
    /// concurrent claimers exactly one wins.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AlreadyClaimed`] when the task left the pool
    /// first, [`EngineError::SpecializationMismatch`] when the assistant
    /// cannot take the task's kind, and
    /// [`EngineError::CapacityExceeded`] when the assistant is full.
    pub async fn claim(&self, task_id: TaskId, assistant_id: AssistantId) -> EngineResult<Task> {
        let assistant = self.require_assistant(assistant_id).await?;
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(EngineError::TaskNotFound(task_id))?;

        if !assistant
            .specialization()
            .allowed_kinds()
            .contains(task.kind())
        {
            return Err(EngineError::SpecializationMismatch {
                assistant_id,
                kind: task.kind(),
            });
        }
        if task.status() != TaskStatus::Pending || task.assistant_id().is_some() {
            return Err(EngineError::AlreadyClaimed(task_id));
        }

        let guard = TaskGuard::of(&task);
        let mut claimed = task;
        claimed.bind(assistant_id, &*self.clock)?;

        self.tasks
            .bind_guarded(&claimed, guard, assistant.capacity())
            .await
            .map_err(|err| match err {
                TaskRepositoryError::StaleTask(id) => EngineError::AlreadyClaimed(id),
                other => other.into(),
            })?;

        info!(task_id = %task_id, assistant_id = %assistant_id, "task claimed");
        Ok(claimed)
    }

    /// Lists pending tasks back in the pool after an assistant rejection,
    /// most recently rejected first.
    ///
    /// # Errors
    ///
    /// Returns persistence errors from the task store.
    pub async fn rejected_queue(&self, page: Page) -> EngineResult<Vec<Task>> {
        Ok(self.tasks.list_rejected_pending(page).await?)
    }

    /// Reports point-in-time marketplace counters.
    ///
    /// # Errors
    ///
    /// Returns persistence errors from the task store or the registry.
    pub async fn stats(&self) -> EngineResult<MarketplaceStats> {
        let now = self.clock.utc();
        let claimable = self.tasks.count_claimable().await?;
        let overdue = self.tasks.count_overdue(now).await?;
        let online_assistants = self.assistants.count_online().await?;
        Ok(MarketplaceStats {
            claimable,
            overdue,
            online_assistants,
        })
    }

    async fn require_assistant(&self, assistant_id: AssistantId) -> EngineResult<Assistant> {
        self.assistants
            .find_by_id(assistant_id)
            .await?
            .ok_or(EngineError::AssistantNotFound(assistant_id))
    }
}
