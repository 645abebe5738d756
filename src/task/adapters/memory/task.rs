//! In-memory task repository.
//!
//! Used by the engine tests and as the reference semantics for guarded
//! writes: every method runs under a single lock guard, so each call is one
//! atomic unit of work.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::assistant::domain::{AssistantId, CapacityLimit};
use crate::task::{
    domain::{Task, TaskId, TaskKindSet, TaskStatus},
    ports::{Page, TaskGuard, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, HashMap<TaskId, Task>>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, HashMap<TaskId, Task>>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Returns whether the stored record still matches the guard.
fn guard_matches(stored: &Task, guard: TaskGuard) -> bool {
    stored.status() == guard.status && stored.assistant_id() == guard.assistant_id
}

/// Counts load-bearing tasks bound to `assistant_id`, excluding `except`.
fn active_count(
    tasks: &HashMap<TaskId, Task>,
    assistant_id: AssistantId,
    except: Option<TaskId>,
) -> TaskRepositoryResult<u32> {
    let count = tasks
        .values()
        .filter(|task| {
            except != Some(task.id())
                && task.assistant_id() == Some(assistant_id)
                && task.status().counts_toward_load()
        })
        .count();
    u32::try_from(count).map_err(TaskRepositoryError::persistence)
}

fn is_claimable(task: &Task) -> bool {
    task.status() == TaskStatus::Pending && task.assistant_id().is_none()
}

fn paginate(mut tasks: Vec<Task>, page: Page) -> TaskRepositoryResult<Vec<Task>> {
    let offset = usize::try_from(page.offset()).map_err(TaskRepositoryError::persistence)?;
    let limit = usize::try_from(page.limit()).map_err(TaskRepositoryError::persistence)?;
    if offset >= tasks.len() {
        return Ok(Vec::new());
    }
    tasks.drain(..offset);
    tasks.truncate(limit);
    Ok(tasks)
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut tasks = self.write()?;
        if tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTask(task.id()));
        }
        tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let tasks = self.read()?;
        Ok(tasks.get(&id).cloned())
    }

    async fn update_guarded(&self, task: &Task, guard: TaskGuard) -> TaskRepositoryResult<()> {
        let mut tasks = self.write()?;
        let stored = tasks
            .get(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        if !guard_matches(stored, guard) {
            return Err(TaskRepositoryError::StaleTask(task.id()));
        }
        tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn bind_guarded(
        &self,
        task: &Task,
        guard: TaskGuard,
        limit: CapacityLimit,
    ) -> TaskRepositoryResult<()> {
        let assistant_id = task
            .assistant_id()
            .ok_or(TaskRepositoryError::MissingAssistant(task.id()))?;

        let mut tasks = self.write()?;
        let stored = tasks
            .get(&task.id())
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;
        if !guard_matches(stored, guard) {
            return Err(TaskRepositoryError::StaleTask(task.id()));
        }
        let active = active_count(&tasks, assistant_id, Some(task.id()))?;
        if limit.is_reached_by(active) {
            return Err(TaskRepositoryError::CapacityExceeded {
                assistant_id,
                limit,
            });
        }
        tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn list_claimable(
        &self,
        allowed: TaskKindSet,
        page: Page,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let tasks = self.read()?;
        let mut claimable: Vec<Task> = tasks
            .values()
            .filter(|task| is_claimable(task) && allowed.contains(task.kind()))
            .cloned()
            .collect();
        // Oldest first for FIFO fairness; identifier tie-break keeps
        // pagination restartable.
        claimable.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().into_inner().cmp(&b.id().into_inner()))
        });
        paginate(claimable, page)
    }

    async fn list_rejected_pending(&self, page: Page) -> TaskRepositoryResult<Vec<Task>> {
        let tasks = self.read()?;
        let mut rejected: Vec<Task> = tasks
            .values()
            .filter(|task| is_claimable(task) && task.rejected_at().is_some())
            .cloned()
            .collect();
        rejected.sort_by(|a, b| {
            b.rejected_at()
                .cmp(&a.rejected_at())
                .then_with(|| a.id().into_inner().cmp(&b.id().into_inner()))
        });
        paginate(rejected, page)
    }

    async fn count_active_for(&self, assistant_id: AssistantId) -> TaskRepositoryResult<u32> {
        let tasks = self.read()?;
        active_count(&tasks, assistant_id, None)
    }

    async fn count_claimable(&self) -> TaskRepositoryResult<u64> {
        let tasks = self.read()?;
        let count = tasks.values().filter(|task| is_claimable(task)).count();
        u64::try_from(count).map_err(TaskRepositoryError::persistence)
    }

    async fn count_overdue(&self, now: DateTime<Utc>) -> TaskRepositoryResult<u64> {
        let tasks = self.read()?;
        let count = tasks
            .values()
            .filter(|task| is_claimable(task) && task.is_overdue(now))
            .count();
        u64::try_from(count).map_err(TaskRepositoryError::persistence)
    }
}
