//! Assistant registry bounded context.
//!
//! Holds the Assistant aggregate (specialization, availability, capacity
//! ceiling, track record), the registry port and adapters, and the
//! registration service.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
