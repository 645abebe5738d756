//! Orchestration services spanning the task, assistant, and pairing contexts.

mod assignment;
mod lifecycle;
mod marketplace;

pub use assignment::AssignmentEngine;
pub use lifecycle::{AssistantLoad, LifecycleService, NewTaskRequest};
pub use marketplace::{MarketplaceService, MarketplaceStats};

use chrono::TimeDelta;

/// Hours a marketplace task stays inside its claim window by default.
const CLAIM_WINDOW_HOURS: i64 = 24;

/// Returns the default claim window applied when a task enters the
/// marketplace without a deadline.
pub(crate) fn default_claim_window() -> TimeDelta {
    TimeDelta::hours(CLAIM_WINDOW_HOURS)
}
