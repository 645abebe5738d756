//! Service layer for permanent pairing management.

use crate::assistant::{
    domain::{Assistant, AssistantId},
    ports::{AssistantRepository, AssistantRepositoryError},
};
use crate::pairing::{
    domain::{ManagerId, Pairing, PairingDomainError, PairingId},
    ports::{PairingRepository, PairingRepositoryError},
};
use crate::task::domain::{ClientId, TaskKindSet};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating a permanent pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePairingRequest {
    client_id: ClientId,
    assistant_id: AssistantId,
    allowed_kinds: Option<TaskKindSet>,
    created_by: Option<ManagerId>,
}

impl CreatePairingRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub const fn new(client_id: ClientId, assistant_id: AssistantId) -> Self {
        Self {
            client_id,
            assistant_id,
            allowed_kinds: None,
            created_by: None,
        }
    }

    /// Restricts the pairing to an explicit kind set.
    #[must_use]
    pub const fn with_allowed_kinds(mut self, kinds: TaskKindSet) -> Self {
        self.allowed_kinds = Some(kinds);
        self
    }

    /// Records the manager creating the pairing.
    #[must_use]
    pub const fn created_by(mut self, manager_id: ManagerId) -> Self {
        self.created_by = Some(manager_id);
        self
    }
}

/// Service-level errors for pairing management.
#[derive(Debug, Error)]
pub enum PairingServiceError {
    /// The assistant does not exist.
    #[error("assistant not found: {0}")]
    AssistantNotFound(AssistantId),

    /// The pairing does not exist.
    #[error("pairing not found: {0}")]
    PairingNotFound(PairingId),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] PairingDomainError),

    /// Pairing persistence failed.
    #[error(transparent)]
    Repository(PairingRepositoryError),

    /// Assistant registry persistence failed.
    #[error(transparent)]
    Registry(AssistantRepositoryError),
}

impl From<PairingRepositoryError> for PairingServiceError {
    fn from(err: PairingRepositoryError) -> Self {
        match err {
            PairingRepositoryError::NotFound(pairing_id) => Self::PairingNotFound(pairing_id),
            other => Self::Repository(other),
        }
    }
}

impl From<AssistantRepositoryError> for PairingServiceError {
    fn from(err: AssistantRepositoryError) -> Self {
        match err {
            AssistantRepositoryError::NotFound(assistant_id) => {
                Self::AssistantNotFound(assistant_id)
            }
            other => Self::Registry(other),
        }
    }
}

/// Result type for pairing management operations.
pub type PairingServiceResult<T> = Result<T, PairingServiceError>;

/// Permanent pairing management service.
#[derive(Clone)]
pub struct PairingService<P, A, C>
where
    P: PairingRepository,
    A: AssistantRepository,
    C: Clock + Send + Sync,
{
    pairings: Arc<P>,
    assistants: Arc<A>,
    clock: Arc<C>,
}

impl<P, A, C> PairingService<P, A, C>
where
    P: PairingRepository,
    A: AssistantRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new pairing management service.
    #[must_use]
    pub const fn new(pairings: Arc<P>, assistants: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            pairings,
            assistants,
            clock,
        }
    }

    /// Creates an active pairing between a client and an assistant.
    ///
    /// An explicit allowed-kind set must stay within the assistant's
    /// specialization. The write path rejects a second active pairing for
    /// the client.
    ///
    /// # Errors
    ///
    /// Returns [`PairingServiceError::AssistantNotFound`], a domain error for
    /// an empty or over-broad kind set, or
    /// [`PairingRepositoryError::ActivePairingExists`] through the repository
    /// wrapper.
    pub async fn create_pairing(
        &self,
        request: CreatePairingRequest,
    ) -> PairingServiceResult<Pairing> {
        let assistant = self.require_assistant(request.assistant_id).await?;
        if let Some(kinds) = request.allowed_kinds {
            if !kinds.is_subset_of(assistant.specialization().allowed_kinds()) {
                return Err(PairingDomainError::AllowedKindsExceedSpecialization {
                    assistant_id: assistant.id(),
                }
                .into());
            }
        }

        let pairing = Pairing::new(
            request.client_id,
            request.assistant_id,
            request.allowed_kinds,
            request.created_by,
            &*self.clock,
        )?;
        self.pairings.insert(&pairing).await?;
        info!(
            pairing_id = %pairing.id(),
            client_id = %pairing.client_id(),
            assistant_id = %pairing.assistant_id(),
            "pairing created"
        );
        Ok(pairing)
    }

    /// Suspends a pairing so the engine stops auto-assigning through it.
    ///
    /// # Errors
    ///
    /// Returns [`PairingServiceError::PairingNotFound`] or a domain error
    /// when the pairing is already inactive.
    pub async fn deactivate(&self, pairing_id: PairingId) -> PairingServiceResult<Pairing> {
        let mut pairing = self.require_pairing(pairing_id).await?;
        pairing.deactivate(&*self.clock)?;
        self.pairings.update(&pairing).await?;
        info!(pairing_id = %pairing_id, "pairing deactivated");
        Ok(pairing)
    }

    /// Resumes a pairing; the write path re-enforces the one-active-per-
    /// client invariant.
    ///
    /// # Errors
    ///
    /// Returns [`PairingServiceError::PairingNotFound`], a domain error when
    /// the pairing is already active, or
    /// [`PairingRepositoryError::ActivePairingExists`] through the repository
    /// wrapper.
    pub async fn reactivate(&self, pairing_id: PairingId) -> PairingServiceResult<Pairing> {
        let mut pairing = self.require_pairing(pairing_id).await?;
        pairing.reactivate(&*self.clock)?;
        self.pairings.update(&pairing).await?;
        info!(pairing_id = %pairing_id, "pairing reactivated");
        Ok(pairing)
    }

    /// Finds the client's active pairing, if any.
    ///
    /// # Errors
    ///
    /// Returns persistence errors from the pairing store.
    pub async fn active_pairing_for(
        &self,
        client_id: ClientId,
    ) -> PairingServiceResult<Option<Pairing>> {
        Ok(self.pairings.find_active_for_client(client_id).await?)
    }

    async fn require_pairing(&self, pairing_id: PairingId) -> PairingServiceResult<Pairing> {
        self.pairings
            .find_by_id(pairing_id)
            .await?
            .ok_or(PairingServiceError::PairingNotFound(pairing_id))
    }

    async fn require_assistant(
        &self,
        assistant_id: AssistantId,
    ) -> PairingServiceResult<Assistant> {
        self.assistants
            .find_by_id(assistant_id)
            .await?
            .ok_or(PairingServiceError::AssistantNotFound(assistant_id))
    }
}
