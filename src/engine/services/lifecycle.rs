//! Lifecycle orchestration: creation, review flow, rejection, reassignment,
//! cancellation, and load reporting.

use crate::assistant::{
    domain::{Assistant, AssistantId, CapacityLimit},
    ports::AssistantRepository,
};
use crate::engine::{EngineError, EngineResult};
use crate::task::{
    domain::{ClientId, Rating, Task, TaskId, TaskKind},
    ports::{TaskGuard, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

use super::default_claim_window;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskRequest {
    client_id: ClientId,
    title: String,
    description: Option<String>,
    kind: TaskKind,
}

impl NewTaskRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(client_id: ClientId, title: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            client_id,
            title: title.into(),
            description: None,
            kind,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An assistant's derived active load against their capacity ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssistantLoad {
    /// Number of load-bearing tasks currently bound to the assistant.
    pub active: u32,
    /// The assistant's capacity ceiling.
    pub capacity: CapacityLimit,
}

impl AssistantLoad {
    /// Returns whether the assistant can take another task.
    #[must_use]
    pub const fn has_room(self) -> bool {
        !self.capacity.is_reached_by(self.active)
    }
}

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct LifecycleService<T, A, C>
where
    T: TaskRepository,
    A: AssistantRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    assistants: Arc<A>,
    clock: Arc<C>,
}

impl<T, A, C> LifecycleService<T, A, C>
where
    T: TaskRepository,
    A: AssistantRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, assistants: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            assistants,
            clock,
        }
    }

    /// Creates a pending, unbound task for a client.
    ///
    /// Routing is a separate step; callers hand the new task to the
    /// assignment engine's `dispatch`.
    ///
    /// # Errors
    ///
    /// Returns a domain error when the title is blank, or persistence errors
    /// from the task store.
    pub async fn create_task(&self, request: NewTaskRequest) -> EngineResult<Task> {
        let task = Task::new(
            request.client_id,
            request.title,
            request.description,
            request.kind,
            &*self.clock,
        )?;
        self.tasks.insert(&task).await?;
        info!(task_id = %task.id(), client_id = %task.client_id(), "task created");
        Ok(task)
    }

    /// Retrieves a task, retrying the read once on a persistence failure.
    ///
    /// The read is idempotent, so one transparent retry absorbs transient
    /// store hiccups without the caller noticing.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaskNotFound`] when the task does not exist,
    /// or the persistence error when the retry also fails.
    pub async fn find_task(&self, task_id: TaskId) -> EngineResult<Task> {
        let first = self.tasks.find_by_id(task_id).await;
        let found = match first {
            Err(TaskRepositoryError::Persistence(_)) => self.tasks.find_by_id(task_id).await,
            other => other,
        };
        found?.ok_or(EngineError::TaskNotFound(task_id))
    }

    /// Delivers work on a task for client review.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaskNotFound`], a domain error when the task is
    /// not in progress or under revision, or [`EngineError::Conflict`] when a
    /// concurrent writer got there first.
    pub async fn complete(
        &self,
        task_id: TaskId,
        result: impl Into<String> + Send,
        notes: Option<String>,
    ) -> EngineResult<Task> {
        let mut task = self.require_task(task_id).await?;
        let guard = TaskGuard::of(&task);
        task.submit_result(result, notes, &*self.clock)?;
        self.tasks.update_guarded(&task, guard).await?;
        info!(task_id = %task_id, "work delivered for review");
        Ok(task)
    }

    /// Accepts delivered work and records the approval on the assistant's
    /// track record.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaskNotFound`], a domain error when the task is
    /// not completed or the rating is out of range, or
    /// [`EngineError::Conflict`] on a lost write.
    pub async fn approve(
        &self,
        task_id: TaskId,
        rating: Option<u8>,
        feedback: Option<String>,
    ) -> EngineResult<Task> {
        let client_rating = rating
            .map(Rating::new)
            .transpose()
            .map_err(EngineError::Domain)?;

        let mut task = self.require_task(task_id).await?;
        let guard = TaskGuard::of(&task);
        task.approve(client_rating, feedback, &*self.clock)?;
        self.tasks.update_guarded(&task, guard).await?;

        if let Some(assistant_id) = task.assistant_id() {
            let mut assistant = self.require_assistant(assistant_id).await?;
            assistant.record_approval(client_rating, &*self.clock);
            self.assistants.update(&assistant).await?;
        }

        info!(task_id = %task_id, "work approved");
        Ok(task)
    }

    /// Sends delivered work back to the bound assistant for rework.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaskNotFound`], a domain error when the task is
    /// not completed, or [`EngineError::Conflict`] on a lost write.
    pub async fn request_revision(
        &self,
        task_id: TaskId,
        feedback: impl Into<String> + Send,
    ) -> EngineResult<Task> {
        let mut task = self.require_task(task_id).await?;
        let guard = TaskGuard::of(&task);
        task.request_revision(feedback, &*self.clock)?;
        self.tasks.update_guarded(&task, guard).await?;
        info!(task_id = %task_id, "revision requested");
        Ok(task)
    }

    /// Records an assistant's rejection: the task returns to the marketplace
    /// pool with a fresh claim window when the old one is absent or lapsed.
    ///
    /// Deliberately does not re-run auto-assignment: the paired assistant
    /// just declined this task.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotTaskAssistant`] when the caller is not the
    /// bound assistant, a domain error when the reason is blank or the task
    /// is not rejectable, or [`EngineError::Conflict`] on a lost write.
    pub async fn reject(
        &self,
        task_id: TaskId,
        assistant_id: AssistantId,
        reason: impl Into<String> + Send,
    ) -> EngineResult<Task> {
        let mut task = self.require_task(task_id).await?;
        if task.assistant_id() != Some(assistant_id) {
            return Err(EngineError::NotTaskAssistant {
                task_id,
                assistant_id,
            });
        }

        let guard = TaskGuard::of(&task);
        task.reject(reason, &*self.clock)?;

        let now = self.clock.utc();
        if task.deadline().is_none_or(|deadline| deadline < now) {
            task.set_deadline(now + default_claim_window(), &*self.clock);
        }

        self.tasks.update_guarded(&task, guard).await?;
        info!(task_id = %task_id, assistant_id = %assistant_id, "task rejected back to the pool");
        Ok(task)
    }

    /// Management override: moves a task to another assistant, or unbinds it
    /// back to the pool when `new_assistant` is `None`. One atomic write.
    ///
    /// Unbinding a task that carries no assistant is a no-op; the task is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AssistantNotFound`],
    /// [`EngineError::SpecializationMismatch`], or
    /// [`EngineError::CapacityExceeded`] when the target cannot take the
    /// task; a domain error when the task is terminal; and
    /// [`EngineError::Conflict`] on a lost write.
    pub async fn reassign(
        &self,
        task_id: TaskId,
        new_assistant: Option<AssistantId>,
    ) -> EngineResult<Task> {
        let mut task = self.require_task(task_id).await?;
        let guard = TaskGuard::of(&task);

        match new_assistant {
            None => {
                if task.assistant_id().is_none() {
                    return Ok(task);
                }
                task.release(&*self.clock)?;
                self.tasks.update_guarded(&task, guard).await?;
                info!(task_id = %task_id, "task unassigned back to the pool");
            }
            Some(assistant_id) => {
                let assistant = self.require_assistant(assistant_id).await?;
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

                if task.assistant_id().is_some() {
                    task.release(&*self.clock)?;
                }
                task.bind(assistant_id, &*self.clock)?;
                self.tasks
                    .bind_guarded(&task, guard, assistant.capacity())
                    .await?;
                info!(task_id = %task_id, assistant_id = %assistant_id, "task reassigned");
            }
        }
        Ok(task)
    }

    /// Management override: withdraws a task from any non-terminal state.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaskNotFound`], a domain error when the task is
    /// already terminal, or [`EngineError::Conflict`] on a lost write.
    pub async fn cancel(
        &self,
        task_id: TaskId,
        reason: impl Into<String> + Send,
    ) -> EngineResult<Task> {
        let mut task = self.require_task(task_id).await?;
        let guard = TaskGuard::of(&task);
        task.cancel(reason, &*self.clock)?;
        self.tasks.update_guarded(&task, guard).await?;
        info!(task_id = %task_id, "task cancelled");
        Ok(task)
    }

    /// Reports an assistant's derived active load against their ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AssistantNotFound`] when the assistant does
    /// not exist, and persistence errors otherwise.
    pub async fn assistant_load(&self, assistant_id: AssistantId) -> EngineResult<AssistantLoad> {
        let assistant = self.require_assistant(assistant_id).await?;
        let active = self.tasks.count_active_for(assistant_id).await?;
        Ok(AssistantLoad {
            active,
            capacity: assistant.capacity(),
        })
    }

    async fn require_task(&self, task_id: TaskId) -> EngineResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(EngineError::TaskNotFound(task_id))
    }

    async fn require_assistant(&self, assistant_id: AssistantId) -> EngineResult<Assistant> {
        self.assistants
            .find_by_id(assistant_id)
            .await?
            .ok_or(EngineError::AssistantNotFound(assistant_id))
    }
}
