//! Diesel schema for assistant registry persistence.

diesel::table! {
    /// Assistant registry records with specialization and track record.
    assistants (id) {
        /// Assistant identifier.
        id -> Uuid,
        /// Specialization tier.
        #[max_length = 30]
        specialization -> Varchar,
        /// Availability flag.
        #[max_length = 20]
        availability -> Varchar,
        /// Capacity ceiling.
        capacity_limit -> Int4,
        /// Count of approved tasks.
        completed_count -> Int8,
        /// Sum of recorded star values.
        rating_total -> Int8,
        /// Number of recorded ratings.
        rating_count -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
