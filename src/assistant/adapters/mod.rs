//! Storage adapters for assistant registry persistence.

pub mod memory;
pub mod postgres;
