//! Cross-context orchestration: assignment, marketplace, and lifecycle.

mod error;
pub mod services;

pub use error::{EngineError, EngineResult};

#[cfg(test)]
mod tests;
