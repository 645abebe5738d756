//! In-memory permanent pairing repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::pairing::{
    domain::{Pairing, PairingId},
    ports::{PairingRepository, PairingRepositoryError, PairingRepositoryResult},
};
use crate::task::domain::ClientId;

/// Thread-safe in-memory pairing repository.
///
/// The one-active-pairing-per-client invariant is checked under the same
/// write guard as the insert or activation, mirroring the partial unique
/// index the PostgreSQL adapter relies on.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPairingRepository {
    state: Arc<RwLock<HashMap<PairingId, Pairing>>>,
}

impl InMemoryPairingRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> PairingRepositoryResult<RwLockReadGuard<'_, HashMap<PairingId, Pairing>>> {
        self.state.read().map_err(|err| {
            PairingRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> PairingRepositoryResult<RwLockWriteGuard<'_, HashMap<PairingId, Pairing>>> {
        self.state.write().map_err(|err| {
            PairingRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Returns whether another active pairing already covers the client.
fn other_active_exists(
    pairings: &HashMap<PairingId, Pairing>,
    client_id: ClientId,
    except: PairingId,
) -> bool {
    pairings
        .values()
        .any(|p| p.id() != except && p.client_id() == client_id && p.is_active())
}

#[async_trait]
impl PairingRepository for InMemoryPairingRepository {
    async fn insert(&self, pairing: &Pairing) -> PairingRepositoryResult<()> {
        let mut pairings = self.write()?;
        if pairings.contains_key(&pairing.id()) {
            return Err(PairingRepositoryError::DuplicatePairing(pairing.id()));
        }
        if pairing.is_active() && other_active_exists(&pairings, pairing.client_id(), pairing.id())
        {
            return Err(PairingRepositoryError::ActivePairingExists(
                pairing.client_id(),
            ));
        }
        pairings.insert(pairing.id(), pairing.clone());
        Ok(())
    }

    async fn update(&self, pairing: &Pairing) -> PairingRepositoryResult<()> {
        let mut pairings = self.write()?;
        if !pairings.contains_key(&pairing.id()) {
            return Err(PairingRepositoryError::NotFound(pairing.id()));
        }
        if pairing.is_active() && other_active_exists(&pairings, pairing.client_id(), pairing.id())
        {
            return Err(PairingRepositoryError::ActivePairingExists(
                pairing.client_id(),
            ));
        }
        pairings.insert(pairing.id(), pairing.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: PairingId) -> PairingRepositoryResult<Option<Pairing>> {
        let pairings = self.read()?;
        Ok(pairings.get(&id).cloned())
    }

    async fn find_active_for_client(
        &self,
        client_id: ClientId,
    ) -> PairingRepositoryResult<Option<Pairing>> {
        let pairings = self.read()?;
        Ok(pairings
            .values()
            .find(|p| p.client_id() == client_id && p.is_active())
            .cloned())
    }
}
