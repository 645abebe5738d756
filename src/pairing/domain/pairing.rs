//! Permanent pairing aggregate root.

use super::{ManagerId, PairingDomainError, PairingId, ParsePairingStatusError};
use crate::assistant::domain::AssistantId;
use crate::task::domain::{ClientId, TaskKindSet};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a permanent pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingStatus {
    /// The pairing pre-authorizes auto-assignment.
    Active,
    /// The pairing is suspended and ignored by the engine.
    Inactive,
}

impl PairingStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for PairingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PairingStatus {
    type Error = ParsePairingStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(ParsePairingStatusError(value.to_owned())),
        }
    }
}

/// A standing client-to-assistant relationship that pre-authorizes
/// auto-assignment.
///
/// At most one pairing per client may be active at a time; the repository
/// write path enforces that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    id: PairingId,
    client_id: ClientId,
    assistant_id: AssistantId,
    status: PairingStatus,
    allowed_kinds: Option<TaskKindSet>,
    created_by: Option<ManagerId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted pairing aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPairingData {
    /// Persisted pairing identifier.
    pub id: PairingId,
    /// Persisted client reference.
    pub client_id: ClientId,
    /// Persisted assistant reference.
    pub assistant_id: AssistantId,
    /// Persisted pairing status.
    pub status: PairingStatus,
    /// Persisted explicit allowed-kind restriction.
    pub allowed_kinds: Option<TaskKindSet>,
    /// Persisted creating manager.
    pub created_by: Option<ManagerId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Pairing {
    /// Creates an active pairing.
    ///
    /// `allowed_kinds` restricts the pairing below the assistant's
    /// specialization; `None` means the specialization decides at
    /// assignment time.
    ///
    /// # Errors
    ///
    /// Returns [`PairingDomainError::EmptyAllowedKinds`] when an explicit
    /// empty set is given.
    pub fn new(
        client_id: ClientId,
        assistant_id: AssistantId,
        allowed_kinds: Option<TaskKindSet>,
        created_by: Option<ManagerId>,
        clock: &impl Clock,
    ) -> Result<Self, PairingDomainError> {
        if allowed_kinds.is_some_and(TaskKindSet::is_empty) {
            return Err(PairingDomainError::EmptyAllowedKinds);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: PairingId::new(),
            client_id,
            assistant_id,
            status: PairingStatus::Active,
            allowed_kinds,
            created_by,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a pairing from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedPairingData) -> Self {
        Self {
            id: data.id,
            client_id: data.client_id,
            assistant_id: data.assistant_id,
            status: data.status,
            allowed_kinds: data.allowed_kinds,
            created_by: data.created_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the pairing identifier.
    #[must_use]
    pub const fn id(&self) -> PairingId {
        self.id
    }

    /// Returns the client side of the pairing.
    #[must_use]
    pub const fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Returns the assistant side of the pairing.
    #[must_use]
    pub const fn assistant_id(&self) -> AssistantId {
        self.assistant_id
    }

    /// Returns the pairing status.
    #[must_use]
    pub const fn status(&self) -> PairingStatus {
        self.status
    }

    /// Returns whether the pairing currently pre-authorizes assignment.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, PairingStatus::Active)
    }

    /// Returns the explicit allowed-kind restriction, if one was set.
    #[must_use]
    pub const fn allowed_kinds(&self) -> Option<TaskKindSet> {
        self.allowed_kinds
    }

    /// Returns the manager that created the pairing, if recorded.
    #[must_use]
    pub const fn created_by(&self) -> Option<ManagerId> {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Suspends the pairing.
    ///
    /// # Errors
    ///
    /// Returns [`PairingDomainError::NotActive`] when the pairing is already
    /// inactive.
    pub fn deactivate(&mut self, clock: &impl Clock) -> Result<(), PairingDomainError> {
        if !self.is_active() {
            return Err(PairingDomainError::NotActive(self.id));
        }
        self.status = PairingStatus::Inactive;
        self.touch(clock);
        Ok(())
    }

    /// Resumes the pairing.
    ///
    /// The repository write path re-enforces the one-active-pairing-per-
    /// client invariant when the change is persisted.
    ///
    /// # Errors
    ///
    /// Returns [`PairingDomainError::NotInactive`] when the pairing is
    /// already active.
    pub fn reactivate(&mut self, clock: &impl Clock) -> Result<(), PairingDomainError> {
        if self.is_active() {
            return Err(PairingDomainError::NotInactive(self.id));
        }
        self.status = PairingStatus::Active;
        self.touch(clock);
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
