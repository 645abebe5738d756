//! Client satisfaction rating.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated one-to-five-star client rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating value.
    pub const MIN: u8 = 1;
    /// Highest accepted rating value.
    pub const MAX: u8 = 5;

    /// Creates a validated rating.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidRating`] when the value falls
    /// outside the 1..=5 range.
    pub const fn new(value: u8) -> Result<Self, TaskDomainError> {
        if value < Self::MIN || value > Self::MAX {
            return Err(TaskDomainError::InvalidRating(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying star count.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
