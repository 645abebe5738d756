//! Task lifecycle status and transition rules.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Unbound and awaiting placement or a marketplace claim.
    Pending,
    /// Bound to an assistant and being worked.
    InProgress,
    /// Work delivered, awaiting client review.
    Completed,
    /// Accepted by the client. Terminal.
    Approved,
    /// Client asked the same assistant for rework.
    RevisionRequested,
    /// Declined after revision. Terminal.
    Rejected,
    /// Withdrawn by a management action. Terminal.
    Cancelled,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Approved => "approved",
            Self::RevisionRequested => "revision_requested",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether the status machine permits moving to `next`.
    ///
    /// Moving back to [`TaskStatus::Pending`] models assistant rejection and
    /// manager unassignment; both unbind the task and return it to the
    /// marketplace pool.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress | Self::Cancelled)
                | (
                    Self::InProgress,
                    Self::Completed | Self::Pending | Self::Cancelled
                )
                | (
                    Self::Completed,
                    Self::Approved | Self::RevisionRequested | Self::Pending | Self::Cancelled
                )
                | (
                    Self::RevisionRequested,
                    Self::Completed | Self::Pending | Self::Rejected | Self::Cancelled
                )
        )
    }

    /// Returns whether the status is terminal.
    ///
    /// Terminal records are retained for audit and accept no transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected | Self::Cancelled)
    }

    /// Returns whether a task in this status must carry a bound assistant.
    #[must_use]
    pub const fn requires_assistant(self) -> bool {
        matches!(
            self,
            Self::InProgress | Self::Completed | Self::Approved | Self::RevisionRequested
        )
    }

    /// Returns whether a task in this status counts toward its assistant's
    /// active load.
    ///
    /// Approved tasks stay bound for audit but no longer occupy capacity.
    #[must_use]
    pub const fn counts_toward_load(self) -> bool {
        matches!(
            self,
            Self::InProgress | Self::Completed | Self::RevisionRequested
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "approved" => Ok(Self::Approved),
            "revision_requested" => Ok(Self::RevisionRequested),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}
