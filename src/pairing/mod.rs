//! Permanent pairing bounded context.
//!
//! Holds the Pairing aggregate, the repository port whose write path
//! enforces the one-active-pairing-per-client invariant, its adapters, and
//! the management service.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
