//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records with lifecycle status and review metadata.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning client identifier.
        client_id -> Uuid,
        /// Bound assistant identifier, when the status requires one.
        assistant_id -> Nullable<Uuid>,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Task kind.
        #[max_length = 20]
        kind -> Varchar,
        /// Lifecycle status.
        #[max_length = 30]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Optional claim deadline.
        deadline -> Nullable<Timestamptz>,
        /// When the task was last bound.
        claimed_at -> Nullable<Timestamptz>,
        /// When work was last delivered.
        completed_at -> Nullable<Timestamptz>,
        /// When the client approved the work.
        approved_at -> Nullable<Timestamptz>,
        /// When an assistant last rejected the task.
        rejected_at -> Nullable<Timestamptz>,
        /// Delivered work result.
        result -> Nullable<Text>,
        /// Assistant completion notes.
        completion_notes -> Nullable<Text>,
        /// Client revision feedback.
        revision_notes -> Nullable<Text>,
        /// Latest assistant rejection reason.
        rejection_reason -> Nullable<Text>,
        /// Cancellation reason.
        cancellation_reason -> Nullable<Text>,
        /// Client rating recorded at approval.
        client_rating -> Nullable<Int4>,
        /// Client feedback recorded at approval.
        client_feedback -> Nullable<Text>,
    }
}
