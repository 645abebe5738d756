//! Assistant aggregate root and performance metrics.

use super::{AssistantId, Availability, CapacityLimit, Specialization};
use crate::task::domain::Rating;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Accumulated client ratings as an integer tally.
///
/// The average is left for reporting collaborators to derive; the core
/// stores only the sum and count so no arithmetic can drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RatingTally {
    total: u32,
    count: u32,
}

impl RatingTally {
    /// Creates an empty tally.
    #[must_use]
    pub const fn new() -> Self {
        Self { total: 0, count: 0 }
    }

    /// Reconstructs a tally from persisted values.
    #[must_use]
    pub const fn from_parts(total: u32, count: u32) -> Self {
        Self { total, count }
    }

    /// Returns the sum of all recorded star values.
    #[must_use]
    pub const fn total(self) -> u32 {
        self.total
    }

    /// Returns the number of recorded ratings.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.count
    }

    /// Folds one rating into the tally.
    #[must_use]
    pub const fn record(self, rating: Rating) -> Self {
        Self {
            total: self.total.saturating_add(rating.value() as u32),
            count: self.count.saturating_add(1),
        }
    }
}

/// A worker with a specialization and a capacity ceiling.
///
/// The active-task load is deliberately not a field here: it is derived from
/// task records inside the same atomic unit as any bind or unbind, so the
/// counter cannot drift from the tasks it describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assistant {
    id: AssistantId,
    specialization: Specialization,
    availability: Availability,
    capacity: CapacityLimit,
    completed_count: u32,
    ratings: RatingTally,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted assistant aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAssistantData {
    /// Persisted assistant identifier.
    pub id: AssistantId,
    /// Persisted specialization.
    pub specialization: Specialization,
    /// Persisted availability flag.
    pub availability: Availability,
    /// Persisted capacity ceiling.
    pub capacity: CapacityLimit,
    /// Persisted count of approved tasks.
    pub completed_count: u32,
    /// Persisted rating tally.
    pub ratings: RatingTally,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Assistant {
    /// Registers a new offline assistant with an empty track record.
    #[must_use]
    pub fn new(specialization: Specialization, capacity: CapacityLimit, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: AssistantId::new(),
            specialization,
            availability: Availability::Offline,
            capacity,
            completed_count: 0,
            ratings: RatingTally::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an assistant from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedAssistantData) -> Self {
        Self {
            id: data.id,
            specialization: data.specialization,
            availability: data.availability,
            capacity: data.capacity,
            completed_count: data.completed_count,
            ratings: data.ratings,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the assistant identifier.
    #[must_use]
    pub const fn id(&self) -> AssistantId {
        self.id
    }

    /// Returns the specialization.
    #[must_use]
    pub const fn specialization(&self) -> Specialization {
        self.specialization
    }

    /// Returns the availability flag.
    #[must_use]
    pub const fn availability(&self) -> Availability {
        self.availability
    }

    /// Returns whether the assistant is currently online.
    #[must_use]
    pub const fn is_online(&self) -> bool {
        matches!(self.availability, Availability::Online)
    }

    /// Returns the capacity ceiling.
    #[must_use]
    pub const fn capacity(&self) -> CapacityLimit {
        self.capacity
    }

    /// Returns the number of approved tasks.
    #[must_use]
    pub const fn completed_count(&self) -> u32 {
        self.completed_count
    }

    /// Returns the rating tally.
    #[must_use]
    pub const fn ratings(&self) -> RatingTally {
        self.ratings
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Flips the availability flag.
    pub fn set_availability(&mut self, availability: Availability, clock: &impl Clock) {
        self.availability = availability;
        self.touch(clock);
    }

    /// Records a client approval, folding in the rating when one was given.
    pub fn record_approval(&mut self, rating: Option<Rating>, clock: &impl Clock) {
        self.completed_count = self.completed_count.saturating_add(1);
        if let Some(stars) = rating {
            self.ratings = self.ratings.record(stars);
        }
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
