//! `PostgreSQL` repository implementation for assistant registry storage.

use super::{
    models::{AssistantChangeset, AssistantRow, NewAssistantRow},
    schema::assistants,
};
use crate::assistant::{
    domain::{
        Assistant, AssistantId, Availability, CapacityLimit, PersistedAssistantData, RatingTally,
        Specialization,
    },
    ports::{AssistantRepository, AssistantRepositoryError, AssistantRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by assistant adapters.
pub type AssistantPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed assistant registry.
#[derive(Debug, Clone)]
pub struct PostgresAssistantRegistry {
    pool: AssistantPgPool,
}

impl PostgresAssistantRegistry {
    /// Creates a new registry from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: AssistantPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AssistantRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AssistantRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AssistantRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AssistantRepositoryError::persistence)?
    }
}

#[async_trait]
impl AssistantRepository for PostgresAssistantRegistry {
    async fn insert(&self, assistant: &Assistant) -> AssistantRepositoryResult<()> {
        let assistant_id = assistant.id();
        let new_row = to_new_row(assistant);

        self.run_blocking(move |connection| {
            diesel::insert_into(assistants::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        AssistantRepositoryError::DuplicateAssistant(assistant_id)
                    }
                    _ => AssistantRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, assistant: &Assistant) -> AssistantRepositoryResult<()> {
        let assistant_id = assistant.id();
        let changeset = to_changeset(assistant);

        self.run_blocking(move |connection| {
            let affected = diesel::update(
                assistants::table.filter(assistants::id.eq(assistant_id.into_inner())),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(AssistantRepositoryError::persistence)?;
            if affected == 0 {
                return Err(AssistantRepositoryError::NotFound(assistant_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: AssistantId) -> AssistantRepositoryResult<Option<Assistant>> {
        self.run_blocking(move |connection| {
            let row = assistants::table
                .filter(assistants::id.eq(id.into_inner()))
                .select(AssistantRow::as_select())
                .first::<AssistantRow>(connection)
                .optional()
                .map_err(AssistantRepositoryError::persistence)?;
            row.map(row_to_assistant).transpose()
        })
        .await
    }

    async fn count_online(&self) -> AssistantRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let count: i64 = assistants::table
                .filter(assistants::availability.eq(Availability::Online.as_str()))
                .count()
                .get_result(connection)
                .map_err(AssistantRepositoryError::persistence)?;
            u64::try_from(count).map_err(AssistantRepositoryError::persistence)
        })
        .await
    }
}

fn to_new_row(assistant: &Assistant) -> NewAssistantRow {
    NewAssistantRow {
        id: assistant.id().into_inner(),
        specialization: assistant.specialization().as_str().to_owned(),
        availability: assistant.availability().as_str().to_owned(),
        capacity_limit: i32::from(assistant.capacity().value()),
        completed_count: i64::from(assistant.completed_count()),
        rating_total: i64::from(assistant.ratings().total()),
        rating_count: i64::from(assistant.ratings().count()),
        created_at: assistant.created_at(),
        updated_at: assistant.updated_at(),
    }
}

fn to_changeset(assistant: &Assistant) -> AssistantChangeset {
    AssistantChangeset {
        availability: assistant.availability().as_str().to_owned(),
        completed_count: i64::from(assistant.completed_count()),
        rating_total: i64::from(assistant.ratings().total()),
        rating_count: i64::from(assistant.ratings().count()),
        updated_at: assistant.updated_at(),
    }
}

fn row_to_assistant(row: AssistantRow) -> AssistantRepositoryResult<Assistant> {
    let AssistantRow {
        id,
        specialization: persisted_specialization,
        availability: persisted_availability,
        capacity_limit,
        completed_count,
        rating_total,
        rating_count,
        created_at,
        updated_at,
    } = row;

    let specialization = Specialization::try_from(persisted_specialization.as_str())
        .map_err(AssistantRepositoryError::persistence)?;
    let availability = Availability::try_from(persisted_availability.as_str())
        .map_err(AssistantRepositoryError::persistence)?;
    let capacity_value =
        u8::try_from(capacity_limit).map_err(AssistantRepositoryError::persistence)?;
    let capacity =
        CapacityLimit::new(capacity_value).map_err(AssistantRepositoryError::persistence)?;
    let completed_count =
        u32::try_from(completed_count).map_err(AssistantRepositoryError::persistence)?;
    let rating_total =
        u32::try_from(rating_total).map_err(AssistantRepositoryError::persistence)?;
    let rating_count =
        u32::try_from(rating_count).map_err(AssistantRepositoryError::persistence)?;

    let data = PersistedAssistantData {
        id: AssistantId::from_uuid(id),
        specialization,
        availability,
        capacity,
        completed_count,
        ratings: RatingTally::from_parts(rating_total, rating_count),
        created_at,
        updated_at,
    };
    Ok(Assistant::from_persisted(data))
}
