//! Auto-assignment and marketplace placement.

use crate::assistant::{domain::AssistantId, ports::AssistantRepository};
use crate::engine::{EngineError, EngineResult};
use crate::pairing::ports::PairingRepository;
use crate::task::{
    domain::{Task, TaskId, TaskStatus},
    ports::{TaskGuard, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::default_claim_window;

/// Routes freshly created tasks: pairing-backed auto-assignment first, the
/// marketplace pool as the fallback.
///
/// Auto-assignment is deterministic and single-candidate: the client's
/// active pairing names the only assistant considered. Every "no placement"
/// outcome is `Ok(None)`; the task then enters the marketplace unharmed.
#[derive(Clone)]
pub struct AssignmentEngine<T, A, P, C>
where
    T: TaskRepository,
    A: AssistantRepository,
    P: PairingRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    assistants: Arc<A>,
    pairings: Arc<P>,
    clock: Arc<C>,
}

impl<T, A, P, C> AssignmentEngine<T, A, P, C>
where
    T: TaskRepository,
    A: AssistantRepository,
    P: PairingRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new assignment engine.
    #[must_use]
    pub const fn new(tasks: Arc<T>, assistants: Arc<A>, pairings: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            assistants,
            pairings,
            clock,
        }
    }

    /// Attempts to bind the task to the client's permanently paired
    /// assistant.
    ///
    /// Returns `Ok(None)` when no placement happens: no active pairing, the
    /// kind is not permitted, or the paired assistant is at capacity.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaskNotFound`] when the task does not exist,
    /// [`EngineError::AlreadyClaimed`] when it is no longer pending and
    /// unbound, and persistence errors otherwise.
    pub async fn attempt_auto_assign(&self, task_id: TaskId) -> EngineResult<Option<AssistantId>> {
        let task = self.require_task(task_id).await?;
        ensure_placeable(&task)?;

        let Some(pairing) = self
            .pairings
            .find_active_for_client(task.client_id())
            .await?
        else {
            debug!(task_id = %task_id, "no active pairing; task goes to the marketplace");
            return Ok(None);
        };

        let Some(assistant) = self.assistants.find_by_id(pairing.assistant_id()).await? else {
            warn!(
                pairing_id = %pairing.id(),
                assistant_id = %pairing.assistant_id(),
                "pairing references an unregistered assistant; falling through"
            );
            return Ok(None);
        };

        let allowed = pairing
            .allowed_kinds()
            .unwrap_or_else(|| assistant.specialization().allowed_kinds());
        if !allowed.contains(task.kind()) {
            debug!(
                task_id = %task_id,
                kind = %task.kind(),
                "pairing does not permit the task kind"
            );
            return Ok(None);
        }

        let guard = TaskGuard::of(&task);
        let mut bound = task;
        bound.bind(assistant.id(), &*self.clock)?;

        match self
            .tasks
            .bind_guarded(&bound, guard, assistant.capacity())
            .await
        {
            Ok(()) => {
                info!(
                    task_id = %task_id,
                    assistant_id = %assistant.id(),
                    "auto-assigned via permanent pairing"
                );
                Ok(Some(assistant.id()))
            }
            Err(TaskRepositoryError::CapacityExceeded { assistant_id, .. }) => {
                debug!(
                    task_id = %task_id,
                    assistant_id = %assistant_id,
                    "paired assistant at capacity; task goes to the marketplace"
                );
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Places a pending, unbound task into the marketplace pool, issuing the
    /// default claim window when no deadline is set.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::TaskNotFound`] when the task does not exist or
    /// [`EngineError::AlreadyClaimed`] when it is no longer pending and
    /// unbound.
    pub async fn send_to_marketplace(&self, task_id: TaskId) -> EngineResult<Task> {
        let mut task = self.require_task(task_id).await?;
        ensure_placeable(&task)?;

        if task.deadline().is_none() {
            let guard = TaskGuard::of(&task);
            let deadline = self.clock.utc() + default_claim_window();
            task.set_deadline(deadline, &*self.clock);
            self.tasks.update_guarded(&task, guard).await?;
        }

        info!(task_id = %task_id, "task placed in the marketplace");
        Ok(task)
    }

    /// Routes a task: auto-assignment first, the marketplace on fall-through.
    ///
    /// Returns the assistant the task was bound to, or `None` when it went
    /// to the marketplace.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`AssignmentEngine::attempt_auto_assign`]
    /// and [`AssignmentEngine::send_to_marketplace`].
    pub async fn dispatch(&self, task_id: TaskId) -> EngineResult<Option<AssistantId>> {
        if let Some(assistant_id) = self.attempt_auto_assign(task_id).await? {
            return Ok(Some(assistant_id));
        }
        self.send_to_marketplace(task_id).await?;
        Ok(None)
    }

    async fn require_task(&self, task_id: TaskId) -> EngineResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(EngineError::TaskNotFound(task_id))
    }
}

/// Rejects placement of a task that already left the pending pool.
fn ensure_placeable(task: &Task) -> EngineResult<()> {
    if task.status() == TaskStatus::Pending && task.assistant_id().is_none() {
        Ok(())
    } else {
        Err(EngineError::AlreadyClaimed(task.id()))
    }
}
