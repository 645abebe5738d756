//! In-memory adapters for pairing persistence.

mod pairing;

pub use pairing::InMemoryPairingRepository;
