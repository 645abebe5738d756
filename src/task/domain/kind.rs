//! Task kind classification and finite kind sets.

use super::ParseTaskKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of client work a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Personal errands and private matters.
    Personal,
    /// Business and professional work.
    Business,
}

impl TaskKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Business => "business",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskKind {
    type Error = ParseTaskKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "personal" => Ok(Self::Personal),
            "business" => Ok(Self::Business),
            _ => Err(ParseTaskKindError(value.to_owned())),
        }
    }
}

/// Finite set of [`TaskKind`] values.
///
/// Replaces the serialized-list representation of allowed task kinds with a
/// proper set type that can be validated at write time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskKindSet {
    personal: bool,
    business: bool,
}

impl TaskKindSet {
    /// The empty set.
    pub const EMPTY: Self = Self {
        personal: false,
        business: false,
    };

    /// The set containing every task kind.
    pub const ALL: Self = Self {
        personal: true,
        business: true,
    };

    /// Creates a set containing a single kind.
    #[must_use]
    pub const fn of(kind: TaskKind) -> Self {
        Self::EMPTY.with(kind)
    }

    /// Returns a copy of the set with `kind` added.
    #[must_use]
    pub const fn with(self, kind: TaskKind) -> Self {
        match kind {
            TaskKind::Personal => Self {
                personal: true,
                ..self
            },
            TaskKind::Business => Self {
                business: true,
                ..self
            },
        }
    }

    /// Returns whether `kind` is a member of the set.
    #[must_use]
    pub const fn contains(self, kind: TaskKind) -> bool {
        match kind {
            TaskKind::Personal => self.personal,
            TaskKind::Business => self.business,
        }
    }

    /// Returns whether the set has no members.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        !self.personal && !self.business
    }

    /// Returns the intersection of two sets.
    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self {
            personal: self.personal && other.personal,
            business: self.business && other.business,
        }
    }

    /// Returns whether every member of `self` is also a member of `other`.
    #[must_use]
    pub const fn is_subset_of(self, other: Self) -> bool {
        (!self.personal || other.personal) && (!self.business || other.business)
    }

    /// Returns the members of the set in canonical order.
    #[must_use]
    pub fn kinds(self) -> Vec<TaskKind> {
        let mut members = Vec::with_capacity(2);
        if self.personal {
            members.push(TaskKind::Personal);
        }
        if self.business {
            members.push(TaskKind::Business);
        }
        members
    }
}

impl FromIterator<TaskKind> for TaskKindSet {
    fn from_iter<I: IntoIterator<Item = TaskKind>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}
