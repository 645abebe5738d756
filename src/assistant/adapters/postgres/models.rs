//! Diesel row models for assistant registry persistence.

use super::schema::assistants;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for assistant records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = assistants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AssistantRow {
    /// Assistant identifier.
    pub id: uuid::Uuid,
    /// Specialization tier.
    pub specialization: String,
    /// Availability flag.
    pub availability: String,
    /// Capacity ceiling.
    pub capacity_limit: i32,
    /// Count of approved tasks.
    pub completed_count: i64,
    /// Sum of recorded star values.
    pub rating_total: i64,
    /// Number of recorded ratings.
    pub rating_count: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for assistant records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = assistants)]
pub struct NewAssistantRow {
    /// Assistant identifier.
    pub id: uuid::Uuid,
    /// Specialization tier.
    pub specialization: String,
    /// Availability flag.
    pub availability: String,
    /// Capacity ceiling.
    pub capacity_limit: i32,
    /// Count of approved tasks.
    pub completed_count: i64,
    /// Sum of recorded star values.
    pub rating_total: i64,
    /// Number of recorded ratings.
    pub rating_count: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Update model for assistant records.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = assistants)]
pub struct AssistantChangeset {
    /// Availability flag.
    pub availability: String,
    /// Count of approved tasks.
    pub completed_count: i64,
    /// Sum of recorded star values.
    pub rating_total: i64,
    /// Number of recorded ratings.
    pub rating_count: i64,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
