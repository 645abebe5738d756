//! Domain model for the assistant registry.
//!
//! Models assistant specialization, availability, capacity ceilings, and
//! performance metrics. Active load is derived from task records rather than
//! stored here.

mod assistant;
mod capacity;
mod error;
mod ids;
mod specialization;

pub use assistant::{Assistant, PersistedAssistantData, RatingTally};
pub use capacity::CapacityLimit;
pub use error::{AssistantDomainError, ParseAvailabilityError, ParseSpecializationError};
pub use ids::AssistantId;
pub use specialization::{Availability, Specialization};
