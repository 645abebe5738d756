//! Diesel schema for permanent pairing persistence.
//!
//! A partial unique index on `client_id` where `status = 'active'`
//! (`idx_pairings_active_client_unique`) backs the one-active-pairing-per-
//! client invariant.

diesel::table! {
    /// Permanent pairing records.
    pairings (id) {
        /// Pairing identifier.
        id -> Uuid,
        /// Client side of the pairing.
        client_id -> Uuid,
        /// Assistant side of the pairing.
        assistant_id -> Uuid,
        /// Pairing status.
        #[max_length = 20]
        status -> Varchar,
        /// Explicit allowed-kind restriction.
        allowed_kinds -> Nullable<Jsonb>,
        /// Manager that created the pairing.
        created_by -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
