//! Task lifecycle bounded context.
//!
//! Holds the Task aggregate and its state machine, the repository port with
//! guarded (compare-and-swap) writes, and the in-memory and `PostgreSQL`
//! adapters. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
