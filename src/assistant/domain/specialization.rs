//! Assistant specialization and availability.

use super::{ParseAvailabilityError, ParseSpecializationError};
use crate::task::domain::TaskKindSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The set of task kinds an assistant is permitted to work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialization {
    /// Works personal tasks only.
    PersonalOnly,
    /// Works business tasks only.
    BusinessOnly,
    /// Works every task kind.
    FullAccess,
}

impl Specialization {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PersonalOnly => "personal_only",
            Self::BusinessOnly => "business_only",
            Self::FullAccess => "full_access",
        }
    }

    /// Returns the task kinds this specialization permits.
    #[must_use]
    pub const fn allowed_kinds(self) -> TaskKindSet {
        match self {
            Self::PersonalOnly => TaskKindSet::of(crate::task::domain::TaskKind::Personal),
            Self::BusinessOnly => TaskKindSet::of(crate::task::domain::TaskKind::Business),
            Self::FullAccess => TaskKindSet::ALL,
        }
    }
}

impl fmt::Display for Specialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Specialization {
    type Error = ParseSpecializationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "personal_only" => Ok(Self::PersonalOnly),
            "business_only" => Ok(Self::BusinessOnly),
            "full_access" => Ok(Self::FullAccess),
            _ => Err(ParseSpecializationError(value.to_owned())),
        }
    }
}

/// Whether an assistant is currently reachable for work.
///
/// Availability is advisory (it feeds listings and marketplace stats); it
/// does not gate claims, which are bounded by capacity instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// The assistant is online and taking work.
    Online,
    /// The assistant is offline.
    Offline,
}

impl Availability {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Availability {
    type Error = ParseAvailabilityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            _ => Err(ParseAvailabilityError(value.to_owned())),
        }
    }
}
