//! Error types for pairing domain validation and parsing.

use super::PairingId;
use crate::assistant::domain::AssistantId;
use thiserror::Error;

/// Errors returned while constructing or mutating pairing domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PairingDomainError {
    /// An explicit allowed-kind set must name at least one kind.
    #[error("allowed task kinds must not be empty")]
    EmptyAllowedKinds,

    /// The explicit allowed-kind set names kinds the assistant's
    /// specialization does not permit.
    #[error("allowed task kinds exceed the specialization of assistant {assistant_id}")]
    AllowedKindsExceedSpecialization {
        /// Assistant whose specialization was checked.
        assistant_id: AssistantId,
    },

    /// The pairing is not active.
    #[error("pairing {0} is not active")]
    NotActive(PairingId),

    /// The pairing is not inactive.
    #[error("pairing {0} is not inactive")]
    NotInactive(PairingId),
}

/// Error returned while parsing pairing statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown pairing status: {0}")]
pub struct ParsePairingStatusError(pub String);
