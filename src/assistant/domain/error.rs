//! Error types for assistant domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing assistant domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssistantDomainError {
    /// The capacity limit must be at least one concurrent binding.
    #[error("invalid capacity limit {0}, expected a positive ceiling")]
    InvalidCapacityLimit(u8),
}

/// Error returned while parsing specializations from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown specialization: {0}")]
pub struct ParseSpecializationError(pub String);

/// Error returned while parsing availability flags from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown availability: {0}")]
pub struct ParseAvailabilityError(pub String);
