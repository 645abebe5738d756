//! Storage adapters for permanent pairing persistence.

pub mod memory;
pub mod postgres;
