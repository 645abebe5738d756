//! Diesel row models for pairing persistence.

use super::schema::pairings;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for pairing records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pairings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PairingRow {
    /// Pairing identifier.
    pub id: uuid::Uuid,
    /// Client side of the pairing.
    pub client_id: uuid::Uuid,
    /// Assistant side of the pairing.
    pub assistant_id: uuid::Uuid,
    /// Pairing status.
    pub status: String,
    /// Explicit allowed-kind restriction.
    pub allowed_kinds: Option<Value>,
    /// Manager that created the pairing.
    pub created_by: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for pairing records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pairings)]
pub struct NewPairingRow {
    /// Pairing identifier.
    pub id: uuid::Uuid,
    /// Client side of the pairing.
    pub client_id: uuid::Uuid,
    /// Assistant side of the pairing.
    pub assistant_id: uuid::Uuid,
    /// Pairing status.
    pub status: String,
    /// Explicit allowed-kind restriction.
    pub allowed_kinds: Option<Value>,
    /// Manager that created the pairing.
    pub created_by: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Update model for pairing status flips.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = pairings)]
pub struct PairingChangeset {
    /// Pairing status.
    pub status: String,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
