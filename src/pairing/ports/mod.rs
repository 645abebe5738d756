//! Port contracts for permanent pairing persistence.

pub mod repository;

pub use repository::{PairingRepository, PairingRepositoryError, PairingRepositoryResult};
