//! Domain model for permanent client-to-assistant pairings.

mod error;
mod ids;
mod pairing;

pub use error::{PairingDomainError, ParsePairingStatusError};
pub use ids::{ManagerId, PairingId};
pub use pairing::{Pairing, PairingStatus, PersistedPairingData};
