//! Task aggregate root.

use super::{ClientId, Rating, TaskDomainError, TaskId, TaskKind, TaskStatus};
use crate::assistant::domain::AssistantId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A unit of client-submitted work moving through the lifecycle.
///
/// The aggregate enforces the status machine and the binding invariant: an
/// assistant is attached exactly while the status requires one. Title,
/// description, results, and notes are opaque to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    client_id: ClientId,
    assistant_id: Option<AssistantId>,
    title: String,
    description: Option<String>,
    kind: TaskKind,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deadline: Option<DateTime<Utc>>,
    claimed_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    approved_at: Option<DateTime<Utc>>,
    rejected_at: Option<DateTime<Utc>>,
    result: Option<String>,
    completion_notes: Option<String>,
    revision_notes: Option<String>,
    rejection_reason: Option<String>,
    cancellation_reason: Option<String>,
    client_rating: Option<Rating>,
    client_feedback: Option<String>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning client.
    pub client_id: ClientId,
    /// Persisted bound assistant, if any.
    pub assistant_id: Option<AssistantId>,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted task kind.
    pub kind: TaskKind,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted claim deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Persisted claim timestamp.
    pub claimed_at: Option<DateTime<Utc>>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted approval timestamp.
    pub approved_at: Option<DateTime<Utc>>,
    /// Persisted rejection timestamp.
    pub rejected_at: Option<DateTime<Utc>>,
    /// Persisted work result.
    pub result: Option<String>,
    /// Persisted completion notes.
    pub completion_notes: Option<String>,
    /// Persisted revision feedback.
    pub revision_notes: Option<String>,
    /// Persisted rejection reason.
    pub rejection_reason: Option<String>,
    /// Persisted cancellation reason.
    pub cancellation_reason: Option<String>,
    /// Persisted client rating.
    pub client_rating: Option<Rating>,
    /// Persisted client feedback.
    pub client_feedback: Option<String>,
}

impl Task {
    /// Creates a new unbound pending task for a client.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank after
    /// trimming.
    pub fn new(
        client_id: ClientId,
        raw_title: impl Into<String>,
        description: Option<String>,
        kind: TaskKind,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let title = raw_title.into().trim().to_owned();
        if title.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            client_id,
            assistant_id: None,
            title,
            description,
            kind,
            status: TaskStatus::Pending,
            created_at: timestamp,
            updated_at: timestamp,
            deadline: None,
            claimed_at: None,
            completed_at: None,
            approved_at: None,
            rejected_at: None,
            result: None,
            completion_notes: None,
            revision_notes: None,
            rejection_reason: None,
            cancellation_reason: None,
            client_rating: None,
            client_feedback: None,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            client_id: data.client_id,
            assistant_id: data.assistant_id,
            title: data.title,
            description: data.description,
            kind: data.kind,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
            deadline: data.deadline,
            claimed_at: data.claimed_at,
            completed_at: data.completed_at,
            approved_at: data.approved_at,
            rejected_at: data.rejected_at,
            result: data.result,
            completion_notes: data.completion_notes,
            revision_notes: data.revision_notes,
            rejection_reason: data.rejection_reason,
            cancellation_reason: data.cancellation_reason,
            client_rating: data.client_rating,
            client_feedback: data.client_feedback,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning client.
    #[must_use]
    pub const fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Returns the bound assistant, if any.
    #[must_use]
    pub const fn assistant_id(&self) -> Option<AssistantId> {
        self.assistant_id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the task kind.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the claim deadline, if one has been issued.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns when the task was last bound, if it is bound.
    #[must_use]
    pub const fn claimed_at(&self) -> Option<DateTime<Utc>> {
        self.claimed_at
    }

    /// Returns when work was last delivered, if it has been.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns when the client approved the work, if they have.
    #[must_use]
    pub const fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    /// Returns when an assistant last rejected the task, if one has.
    #[must_use]
    pub const fn rejected_at(&self) -> Option<DateTime<Utc>> {
        self.rejected_at
    }

    /// Returns the delivered work result, if any.
    #[must_use]
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Returns the assistant's completion notes, if any.
    #[must_use]
    pub fn completion_notes(&self) -> Option<&str> {
        self.completion_notes.as_deref()
    }

    /// Returns the client's revision feedback, if any.
    #[must_use]
    pub fn revision_notes(&self) -> Option<&str> {
        self.revision_notes.as_deref()
    }

    /// Returns the reason given for the latest assistant rejection, if any.
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    /// Returns the reason given for cancellation, if any.
    #[must_use]
    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    /// Returns the client rating, if one was recorded at approval.
    #[must_use]
    pub const fn client_rating(&self) -> Option<Rating> {
        self.client_rating
    }

    /// Returns the client feedback, if any.
    #[must_use]
    pub fn client_feedback(&self) -> Option<&str> {
        self.client_feedback.as_deref()
    }

    /// Returns whether the task is pending and past its deadline.
    ///
    /// Overdue is a derived reporting flag; the task stays claimable.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == TaskStatus::Pending && self.deadline.is_some_and(|deadline| deadline < now)
    }

    /// Returns whether the binding invariant holds: an assistant is attached
    /// exactly when the status requires one.
    #[must_use]
    pub const fn binding_is_consistent(&self) -> bool {
        self.assistant_id.is_some() == self.status.requires_assistant()
    }

    /// Issues or replaces the claim deadline.
    pub fn set_deadline(&mut self, deadline: DateTime<Utc>, clock: &impl Clock) {
        self.deadline = Some(deadline);
        self.touch(clock);
    }

    /// Binds the task to an assistant and starts work.
    ///
    /// Stamps `claimed_at`. Capacity enforcement happens at the storage
    /// boundary, in the same atomic unit as the write.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// pending.
    pub fn bind(
        &mut self,
        assistant_id: AssistantId,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::InProgress)?;
        self.assistant_id = Some(assistant_id);
        self.status = TaskStatus::InProgress;
        self.claimed_at = Some(clock.utc());
        self.touch(clock);
        Ok(())
    }

    /// Delivers work for client review.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// in progress or under revision.
    pub fn submit_result(
        &mut self,
        result: impl Into<String>,
        notes: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::Completed)?;
        self.status = TaskStatus::Completed;
        self.completed_at = Some(clock.utc());
        self.result = Some(result.into());
        self.completion_notes = notes;
        self.touch(clock);
        Ok(())
    }

    /// Accepts the delivered work. Terminal; the binding is kept for audit.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// completed.
    pub fn approve(
        &mut self,
        rating: Option<Rating>,
        feedback: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::Approved)?;
        self.status = TaskStatus::Approved;
        self.approved_at = Some(clock.utc());
        self.client_rating = rating;
        self.client_feedback = feedback;
        self.touch(clock);
        Ok(())
    }

    /// Sends the delivered work back to the same assistant for rework.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// completed.
    pub fn request_revision(
        &mut self,
        feedback: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::RevisionRequested)?;
        self.status = TaskStatus::RevisionRequested;
        self.revision_notes = Some(feedback.into());
        self.touch(clock);
        Ok(())
    }

    /// Records an assistant rejection: unbinds the task and returns it to
    /// the marketplace pool.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyRejectionReason`] when the reason is
    /// blank, or [`TaskDomainError::InvalidStateTransition`] unless the task
    /// is in progress or under revision.
    pub fn reject(
        &mut self,
        raw_reason: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let reason = raw_reason.into().trim().to_owned();
        if reason.is_empty() {
            return Err(TaskDomainError::EmptyRejectionReason);
        }
        if !matches!(
            self.status,
            TaskStatus::InProgress | TaskStatus::RevisionRequested
        ) {
            return Err(self.transition_error(TaskStatus::Pending));
        }
        self.status = TaskStatus::Pending;
        self.assistant_id = None;
        self.claimed_at = None;
        self.rejected_at = Some(clock.utc());
        self.rejection_reason = Some(reason);
        self.touch(clock);
        Ok(())
    }

    /// Unbinds the task without recording a rejection (manager unassignment),
    /// returning it to the marketplace pool.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// in a bound, non-terminal status.
    pub fn release(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::Pending)?;
        self.status = TaskStatus::Pending;
        self.assistant_id = None;
        self.claimed_at = None;
        self.touch(clock);
        Ok(())
    }

    /// Withdraws the task. Terminal; unbinds if bound.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when the task is
    /// already terminal.
    pub fn cancel(
        &mut self,
        reason: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_transition(TaskStatus::Cancelled)?;
        self.status = TaskStatus::Cancelled;
        self.assistant_id = None;
        self.claimed_at = None;
        self.cancellation_reason = Some(reason.into());
        self.touch(clock);
        Ok(())
    }

    fn ensure_transition(&self, to: TaskStatus) -> Result<(), TaskDomainError> {
        if self.status.can_transition_to(to) {
            Ok(())
        } else {
            Err(self.transition_error(to))
        }
    }

    const fn transition_error(&self, to: TaskStatus) -> TaskDomainError {
        TaskDomainError::InvalidStateTransition {
            task_id: self.id,
            from: self.status,
            to,
        }
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
