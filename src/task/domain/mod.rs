//! Domain model for the task lifecycle.
//!
//! Models task creation, the status machine, assistant binding, and the
//! derived overdue flag while keeping all infrastructure concerns outside of
//! the domain boundary.

mod error;
mod ids;
mod kind;
mod rating;
mod status;
mod task;

pub use error::{ParseTaskKindError, ParseTaskStatusError, TaskDomainError};
pub use ids::{ClientId, TaskId};
pub use kind::{TaskKind, TaskKindSet};
pub use rating::Rating;
pub use status::TaskStatus;
pub use task::{PersistedTaskData, Task};
