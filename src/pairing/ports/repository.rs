//! Repository port for permanent pairing persistence.
//!
//! The one-active-pairing-per-client rule lives here, in the write path,
//! rather than being re-validated by every caller.

use crate::pairing::domain::{Pairing, PairingId};
use crate::task::domain::ClientId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for pairing repository operations.
pub type PairingRepositoryResult<T> = Result<T, PairingRepositoryError>;

/// Permanent pairing persistence contract.
#[async_trait]
pub trait PairingRepository: Send + Sync {
    /// Stores a new pairing.
    ///
    /// # Errors
    ///
    /// Returns [`PairingRepositoryError::DuplicatePairing`] when the pairing
    /// ID already exists, or
    /// [`PairingRepositoryError::ActivePairingExists`] when the client
    /// already has an active pairing and this one is active.
    async fn insert(&self, pairing: &Pairing) -> PairingRepositoryResult<()>;

    /// Persists changes to an existing pairing (status flips).
    ///
    /// # Errors
    ///
    /// Returns [`PairingRepositoryError::NotFound`] when the pairing does
    /// not exist, or [`PairingRepositoryError::ActivePairingExists`] when
    /// activating it would give the client a second active pairing.
    async fn update(&self, pairing: &Pairing) -> PairingRepositoryResult<()>;

    /// Finds a pairing by identifier.
    ///
    /// Returns `None` when the pairing does not exist.
    async fn find_by_id(&self, id: PairingId) -> PairingRepositoryResult<Option<Pairing>>;

    /// Finds the client's single active pairing, if any.
    async fn find_active_for_client(
        &self,
        client_id: ClientId,
    ) -> PairingRepositoryResult<Option<Pairing>>;
}

/// Errors returned by pairing repository implementations.
#[derive(Debug, Clone, Error)]
pub enum PairingRepositoryError {
    /// A pairing with the same identifier already exists.
    #[error("duplicate pairing identifier: {0}")]
    DuplicatePairing(PairingId),

    /// The pairing was not found.
    #[error("pairing not found: {0}")]
    NotFound(PairingId),

    /// The client already has an active pairing.
    #[error("client {0} already has an active pairing")]
    ActivePairingExists(ClientId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PairingRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
