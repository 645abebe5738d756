//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::assistant::domain::{AssistantId, CapacityLimit};
use crate::task::{
    domain::{ClientId, PersistedTaskData, Rating, Task, TaskId, TaskKind, TaskKindSet, TaskStatus},
    ports::{Page, TaskGuard, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Statuses that occupy a slot of the bound assistant's capacity.
const LOAD_BEARING_STATUSES: [&str; 3] = [
    TaskStatus::InProgress.as_str(),
    TaskStatus::Completed.as_str(),
    TaskStatus::RevisionRequested.as_str(),
];

/// Statuses that keep a task claimable from the marketplace.
const CLAIMABLE_STATUS: &str = TaskStatus::Pending.as_str();

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn update_guarded(&self, task: &Task, guard: TaskGuard) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task);

        self.run_blocking(move |connection| {
            let affected = apply_guarded_update(connection, task_id, guard, &changeset)?;
            if affected == 0 {
                return Err(stale_or_missing(connection, task_id)?);
            }
            Ok(())
        })
        .await
    }

    async fn bind_guarded(
        &self,
        task: &Task,
        guard: TaskGuard,
        limit: CapacityLimit,
    ) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let assistant_id = task
            .assistant_id()
            .ok_or(TaskRepositoryError::MissingAssistant(task_id))?;
        let changeset = to_changeset(task);

        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|connection| {
                // Serialize racing binds on the assistant's registry row so
                // the capacity count and the write see the same snapshot.
                lock_assistant_row(connection, assistant_id)?;

                let active = count_load_bearing(connection, assistant_id, Some(task_id))?;
                if limit.is_reached_by(active) {
                    return Err(TaskRepositoryError::CapacityExceeded {
                        assistant_id,
                        limit,
                    });
                }

                let affected = apply_guarded_update(connection, task_id, guard, &changeset)?;
                if affected == 0 {
                    return Err(stale_or_missing(connection, task_id)?);
                }
                Ok(())
            })
        })
        .await
    }

    async fn list_claimable(
        &self,
        allowed: TaskKindSet,
        page: Page,
    ) -> TaskRepositoryResult<Vec<Task>> {
        if allowed.is_empty() {
            return Ok(Vec::new());
        }
        let kinds: Vec<&'static str> = allowed.kinds().into_iter().map(TaskKind::as_str).collect();
        let offset = i64::try_from(page.offset()).map_err(TaskRepositoryError::persistence)?;
        let limit = i64::from(page.limit());

        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::status.eq(CLAIMABLE_STATUS))
                .filter(tasks::assistant_id.is_null())
                .filter(tasks::kind.eq_any(kinds))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .offset(offset)
                .limit(limit)
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_rejected_pending(&self, page: Page) -> TaskRepositoryResult<Vec<Task>> {
        let offset = i64::try_from(page.offset()).map_err(TaskRepositoryError::persistence)?;
        let limit = i64::from(page.limit());

        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::status.eq(CLAIMABLE_STATUS))
                .filter(tasks::assistant_id.is_null())
                .filter(tasks::rejected_at.is_not_null())
                .order((tasks::rejected_at.desc(), tasks::id.asc()))
                .offset(offset)
                .limit(limit)
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn count_active_for(&self, assistant_id: AssistantId) -> TaskRepositoryResult<u32> {
        self.run_blocking(move |connection| count_load_bearing(connection, assistant_id, None))
            .await
    }

    async fn count_claimable(&self) -> TaskRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count: i64 = tasks::table
                .filter(tasks::status.eq(CLAIMABLE_STATUS))
                .filter(tasks::assistant_id.is_null())
                .count()
                .get_result(connection)
                .map_err(TaskRepositoryError::persistence)?;
            u64::try_from(count).map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn count_overdue(&self, now: DateTime<Utc>) -> TaskRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count: i64 = tasks::table
                .filter(tasks::status.eq(CLAIMABLE_STATUS))
                .filter(tasks::assistant_id.is_null())
                .filter(tasks::deadline.lt(now))
                .count()
                .get_result(connection)
                .map_err(TaskRepositoryError::persistence)?;
            u64::try_from(count).map_err(TaskRepositoryError::persistence)
        })
        .await
    }
}

/// Applies a guarded write: the row must still carry the status and
/// assistant captured in `guard`.
fn apply_guarded_update(
    connection: &mut PgConnection,
    task_id: TaskId,
    guard: TaskGuard,
    changeset: &TaskChangeset,
) -> TaskRepositoryResult<usize> {
    let guard_assistant = guard.assistant_id.map(AssistantId::into_inner);
    diesel::update(
        tasks::table
            .filter(tasks::id.eq(task_id.into_inner()))
            .filter(tasks::status.eq(guard.status.as_str()))
            .filter(tasks::assistant_id.is_not_distinct_from(guard_assistant)),
    )
    .set(changeset)
    .execute(connection)
    .map_err(TaskRepositoryError::persistence)
}

/// Distinguishes a lost guarded write from a missing row.
fn stale_or_missing(
    connection: &mut PgConnection,
    task_id: TaskId,
) -> TaskRepositoryResult<TaskRepositoryError> {
    let exists: i64 = tasks::table
        .filter(tasks::id.eq(task_id.into_inner()))
        .count()
        .get_result(connection)
        .map_err(TaskRepositoryError::persistence)?;
    if exists == 0 {
        Ok(TaskRepositoryError::NotFound(task_id))
    } else {
        Ok(TaskRepositoryError::StaleTask(task_id))
    }
}

#[derive(QueryableByName)]
struct LockedAssistantRow {
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    #[expect(dead_code, reason = "fetched only to take the row lock")]
    id: uuid::Uuid,
}

/// Takes a row lock on the assistant so concurrent binds serialize.
fn lock_assistant_row(
    connection: &mut PgConnection,
    assistant_id: AssistantId,
) -> TaskRepositoryResult<()> {
    let locked = diesel::sql_query("SELECT id FROM assistants WHERE id = $1 FOR UPDATE")
        .bind::<diesel::sql_types::Uuid, _>(assistant_id.into_inner())
        .get_result::<LockedAssistantRow>(connection)
        .optional()
        .map_err(TaskRepositoryError::persistence)?;
    if locked.is_none() {
        return Err(TaskRepositoryError::persistence(std::io::Error::other(
            format!("assistant {assistant_id} has no registry row"),
        )));
    }
    Ok(())
}

/// Counts load-bearing tasks bound to `assistant_id`, excluding `except`.
fn count_load_bearing(
    connection: &mut PgConnection,
    assistant_id: AssistantId,
    except: Option<TaskId>,
) -> TaskRepositoryResult<u32> {
    let mut query = tasks::table
        .filter(tasks::assistant_id.eq(assistant_id.into_inner()))
        .filter(tasks::status.eq_any(LOAD_BEARING_STATUSES.to_vec()))
        .into_boxed();
    if let Some(task_id) = except {
        query = query.filter(tasks::id.ne(task_id.into_inner()));
    }
    let count: i64 = query
        .count()
        .get_result(connection)
        .map_err(TaskRepositoryError::persistence)?;
    u32::try_from(count).map_err(TaskRepositoryError::persistence)
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        client_id: task.client_id().into_inner(),
        assistant_id: task.assistant_id().map(AssistantId::into_inner),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        kind: task.kind().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
        deadline: task.deadline(),
        claimed_at: task.claimed_at(),
        completed_at: task.completed_at(),
        approved_at: task.approved_at(),
        rejected_at: task.rejected_at(),
        result: task.result().map(str::to_owned),
        completion_notes: task.completion_notes().map(str::to_owned),
        revision_notes: task.revision_notes().map(str::to_owned),
        rejection_reason: task.rejection_reason().map(str::to_owned),
        cancellation_reason: task.cancellation_reason().map(str::to_owned),
        client_rating: task.client_rating().map(|rating| i32::from(rating.value())),
        client_feedback: task.client_feedback().map(str::to_owned),
    }
}

fn to_changeset(task: &Task) -> TaskChangeset {
    TaskChangeset {
        assistant_id: task.assistant_id().map(AssistantId::into_inner),
        status: task.status().as_str().to_owned(),
        updated_at: task.updated_at(),
        deadline: task.deadline(),
        claimed_at: task.claimed_at(),
        completed_at: task.completed_at(),
        approved_at: task.approved_at(),
        rejected_at: task.rejected_at(),
        result: task.result().map(str::to_owned),
        completion_notes: task.completion_notes().map(str::to_owned),
        revision_notes: task.revision_notes().map(str::to_owned),
        rejection_reason: task.rejection_reason().map(str::to_owned),
        cancellation_reason: task.cancellation_reason().map(str::to_owned),
        client_rating: task.client_rating().map(|rating| i32::from(rating.value())),
        client_feedback: task.client_feedback().map(str::to_owned),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        client_id,
        assistant_id,
        title,
        description,
        kind: persisted_kind,
        status: persisted_status,
        created_at,
        updated_at,
        deadline,
        claimed_at,
        completed_at,
        approved_at,
        rejected_at,
        result,
        completion_notes,
        revision_notes,
        rejection_reason,
        cancellation_reason,
        client_rating: persisted_rating,
        client_feedback,
    } = row;

    let kind =
        TaskKind::try_from(persisted_kind.as_str()).map_err(TaskRepositoryError::persistence)?;
    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::persistence)?;
    let client_rating = persisted_rating
        .map(|raw| {
            let stars = u8::try_from(raw).map_err(TaskRepositoryError::persistence)?;
            Rating::new(stars).map_err(TaskRepositoryError::persistence)
        })
        .transpose()?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        client_id: ClientId::from_uuid(client_id),
        assistant_id: assistant_id.map(AssistantId::from_uuid),
        title,
        description,
        kind,
        status,
        created_at,
        updated_at,
        deadline,
        claimed_at,
        completed_at,
        approved_at,
        rejected_at,
        result,
        completion_notes,
        revision_notes,
        rejection_reason,
        cancellation_reason,
        client_rating,
        client_feedback,
    };
    Ok(Task::from_persisted(data))
}
