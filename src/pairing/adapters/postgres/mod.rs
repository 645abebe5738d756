//! `PostgreSQL` adapters for permanent pairing persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PairingPgPool, PostgresPairingRepository};
