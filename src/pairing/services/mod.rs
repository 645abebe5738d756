//! Services for permanent pairing management.

mod management;

pub use management::{
    CreatePairingRequest, PairingService, PairingServiceError, PairingServiceResult,
};
