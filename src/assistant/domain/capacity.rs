//! Concurrent-binding capacity limit.

use super::AssistantDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hard ceiling on the number of tasks an assistant may hold concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapacityLimit(u8);

impl CapacityLimit {
    /// Product-default ceiling of five concurrent bindings.
    pub const DEFAULT: Self = Self(5);

    /// Creates a validated capacity limit.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantDomainError::InvalidCapacityLimit`] when the value
    /// is zero.
    pub const fn new(value: u8) -> Result<Self, AssistantDomainError> {
        if value == 0 {
            return Err(AssistantDomainError::InvalidCapacityLimit(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying ceiling.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns whether `active` bindings already meet or exceed the ceiling.
    #[must_use]
    pub const fn is_reached_by(self, active: u32) -> bool {
        active >= self.0 as u32
    }
}

impl Default for CapacityLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for CapacityLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
