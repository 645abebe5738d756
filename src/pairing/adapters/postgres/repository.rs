//! `PostgreSQL` repository implementation for permanent pairing storage.

use super::{
    models::{NewPairingRow, PairingChangeset, PairingRow},
    schema::pairings,
};
use crate::assistant::domain::AssistantId;
use crate::pairing::{
    domain::{ManagerId, Pairing, PairingId, PairingStatus, PersistedPairingData},
    ports::{PairingRepository, PairingRepositoryError, PairingRepositoryResult},
};
use crate::task::domain::{ClientId, TaskKindSet};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by pairing adapters.
pub type PairingPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed pairing repository.
///
/// The one-active-pairing-per-client invariant is delegated to the partial
/// unique index declared alongside the schema; violations surface as
/// [`PairingRepositoryError::ActivePairingExists`].
#[derive(Debug, Clone)]
pub struct PostgresPairingRepository {
    pool: PairingPgPool,
}

impl PostgresPairingRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PairingPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> PairingRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> PairingRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(PairingRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(PairingRepositoryError::persistence)?
    }
}

#[async_trait]
impl PairingRepository for PostgresPairingRepository {
    async fn insert(&self, pairing: &Pairing) -> PairingRepositoryResult<()> {
        let pairing_id = pairing.id();
        let client_id = pairing.client_id();
        let new_row = to_new_row(pairing)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(pairings::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| map_write_error(err, pairing_id, client_id))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, pairing: &Pairing) -> PairingRepositoryResult<()> {
        let pairing_id = pairing.id();
        let client_id = pairing.client_id();
        let changeset = PairingChangeset {
            status: pairing.status().as_str().to_owned(),
            updated_at: pairing.updated_at(),
        };

        self.run_blocking(move |connection| {
            let affected =
                diesel::update(pairings::table.filter(pairings::id.eq(pairing_id.into_inner())))
                    .set(&changeset)
                    .execute(connection)
                    .map_err(|err| map_write_error(err, pairing_id, client_id))?;
            if affected == 0 {
                return Err(PairingRepositoryError::NotFound(pairing_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: PairingId) -> PairingRepositoryResult<Option<Pairing>> {
        self.run_blocking(move |connection| {
            let row = pairings::table
                .filter(pairings::id.eq(id.into_inner()))
                .select(PairingRow::as_select())
                .first::<PairingRow>(connection)
                .optional()
                .map_err(PairingRepositoryError::persistence)?;
            row.map(row_to_pairing).transpose()
        })
        .await
    }

    async fn find_active_for_client(
        &self,
        client_id: ClientId,
    ) -> PairingRepositoryResult<Option<Pairing>> {
        self.run_blocking(move |connection| {
            let row = pairings::table
                .filter(pairings::client_id.eq(client_id.into_inner()))
                .filter(pairings::status.eq(PairingStatus::Active.as_str()))
                .select(PairingRow::as_select())
                .first::<PairingRow>(connection)
                .optional()
                .map_err(PairingRepositoryError::persistence)?;
            row.map(row_to_pairing).transpose()
        })
        .await
    }
}

fn is_active_client_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_pairings_active_client_unique")
}

fn map_write_error(
    err: DieselError,
    pairing_id: PairingId,
    client_id: ClientId,
) -> PairingRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_active_client_unique_violation(info.as_ref()) =>
        {
            PairingRepositoryError::ActivePairingExists(client_id)
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            PairingRepositoryError::DuplicatePairing(pairing_id)
        }
        _ => PairingRepositoryError::persistence(err),
    }
}

fn to_new_row(pairing: &Pairing) -> PairingRepositoryResult<NewPairingRow> {
    let allowed_kinds = pairing
        .allowed_kinds()
        .map(|set| serde_json::to_value(set).map_err(PairingRepositoryError::persistence))
        .transpose()?;

    Ok(NewPairingRow {
        id: pairing.id().into_inner(),
        client_id: pairing.client_id().into_inner(),
        assistant_id: pairing.assistant_id().into_inner(),
        status: pairing.status().as_str().to_owned(),
        allowed_kinds,
        created_by: pairing.created_by().map(ManagerId::into_inner),
        created_at: pairing.created_at(),
        updated_at: pairing.updated_at(),
    })
}

fn row_to_pairing(row: PairingRow) -> PairingRepositoryResult<Pairing> {
    let PairingRow {
        id,
        client_id,
        assistant_id,
        status: persisted_status,
        allowed_kinds: persisted_allowed_kinds,
        created_by,
        created_at,
        updated_at,
    } = row;

    let status = PairingStatus::try_from(persisted_status.as_str())
        .map_err(PairingRepositoryError::persistence)?;
    let allowed_kinds = persisted_allowed_kinds
        .map(|value| {
            serde_json::from_value::<TaskKindSet>(value).map_err(PairingRepositoryError::persistence)
        })
        .transpose()?;

    let data = PersistedPairingData {
        id: PairingId::from_uuid(id),
        client_id: ClientId::from_uuid(client_id),
        assistant_id: AssistantId::from_uuid(assistant_id),
        status,
        allowed_kinds,
        created_by: created_by.map(ManagerId::from_uuid),
        created_at,
        updated_at,
    };
    Ok(Pairing::from_persisted(data))
}
