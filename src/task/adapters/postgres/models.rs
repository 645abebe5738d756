//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning client identifier.
    pub client_id: uuid::Uuid,
    /// Bound assistant identifier.
    pub assistant_id: Option<uuid::Uuid>,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Task kind.
    pub kind: String,
    /// Lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optional claim deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// When the task was last bound.
    pub claimed_at: Option<DateTime<Utc>>,
    /// When work was last delivered.
    pub completed_at: Option<DateTime<Utc>>,
    /// When the client approved the work.
    pub approved_at: Option<DateTime<Utc>>,
    /// When an assistant last rejected the task.
    pub rejected_at: Option<DateTime<Utc>>,
    /// Delivered work result.
    pub result: Option<String>,
    /// Assistant completion notes.
    pub completion_notes: Option<String>,
    /// Client revision feedback.
    pub revision_notes: Option<String>,
    /// Latest assistant rejection reason.
    pub rejection_reason: Option<String>,
    /// Cancellation reason.
    pub cancellation_reason: Option<String>,
    /// Client rating recorded at approval.
    pub client_rating: Option<i32>,
    /// Client feedback recorded at approval.
    pub client_feedback: Option<String>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning client identifier.
    pub client_id: uuid::Uuid,
    /// Bound assistant identifier.
    pub assistant_id: Option<uuid::Uuid>,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Task kind.
    pub kind: String,
    /// Lifecycle status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optional claim deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// When the task was last bound.
    pub claimed_at: Option<DateTime<Utc>>,
    /// When work was last delivered.
    pub completed_at: Option<DateTime<Utc>>,
    /// When the client approved the work.
    pub approved_at: Option<DateTime<Utc>>,
    /// When an assistant last rejected the task.
    pub rejected_at: Option<DateTime<Utc>>,
    /// Delivered work result.
    pub result: Option<String>,
    /// Assistant completion notes.
    pub completion_notes: Option<String>,
    /// Client revision feedback.
    pub revision_notes: Option<String>,
    /// Latest assistant rejection reason.
    pub rejection_reason: Option<String>,
    /// Cancellation reason.
    pub cancellation_reason: Option<String>,
    /// Client rating recorded at approval.
    pub client_rating: Option<i32>,
    /// Client feedback recorded at approval.
    pub client_feedback: Option<String>,
}

/// Update model for guarded task writes.
///
/// `treat_none_as_null` matters here: unbinding must clear the stored
/// assistant and claim columns, not leave them untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Bound assistant identifier.
    pub assistant_id: Option<uuid::Uuid>,
    /// Lifecycle status.
    pub status: String,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Optional claim deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// When the task was last bound.
    pub claimed_at: Option<DateTime<Utc>>,
    /// When work was last delivered.
    pub completed_at: Option<DateTime<Utc>>,
    /// When the client approved the work.
    pub approved_at: Option<DateTime<Utc>>,
    /// When an assistant last rejected the task.
    pub rejected_at: Option<DateTime<Utc>>,
    /// Delivered work result.
    pub result: Option<String>,
    /// Assistant completion notes.
    pub completion_notes: Option<String>,
    /// Client revision feedback.
    pub revision_notes: Option<String>,
    /// Latest assistant rejection reason.
    pub rejection_reason: Option<String>,
    /// Cancellation reason.
    pub cancellation_reason: Option<String>,
    /// Client rating recorded at approval.
    pub client_rating: Option<i32>,
    /// Client feedback recorded at approval.
    pub client_feedback: Option<String>,
}
