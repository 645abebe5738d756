//! Storage adapters for task lifecycle persistence.

pub mod memory;
pub mod postgres;
