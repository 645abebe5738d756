//! Unit tests for task status transition validation and the aggregate's
//! lifecycle operations.

use crate::assistant::domain::AssistantId;
use crate::task::domain::{ClientId, Task, TaskDomainError, TaskKind, TaskStatus};
use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

const ALL_STATUSES: [TaskStatus; 7] = [
    TaskStatus::Pending,
    TaskStatus::InProgress,
    TaskStatus::Completed,
    TaskStatus::Approved,
    TaskStatus::RevisionRequested,
    TaskStatus::Rejected,
    TaskStatus::Cancelled,
];

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[fixture]
fn pending_task(clock: DefaultClock) -> Result<Task, TaskDomainError> {
    Task::new(
        ClientId::new(),
        "Book a restaurant",
        None,
        TaskKind::Personal,
        &clock,
    )
}

#[rstest]
#[case(TaskStatus::Pending, TaskStatus::InProgress, true)]
#[case(TaskStatus::Pending, TaskStatus::Cancelled, true)]
#[case(TaskStatus::Pending, TaskStatus::Pending, false)]
#[case(TaskStatus::Pending, TaskStatus::Completed, false)]
#[case(TaskStatus::Pending, TaskStatus::Approved, false)]
#[case(TaskStatus::Pending, TaskStatus::RevisionRequested, false)]
#[case(TaskStatus::Pending, TaskStatus::Rejected, false)]
#[case(TaskStatus::InProgress, TaskStatus::Completed, true)]
#[case(TaskStatus::InProgress, TaskStatus::Pending, true)]
#[case(TaskStatus::InProgress, TaskStatus::Cancelled, true)]
#[case(TaskStatus::InProgress, TaskStatus::InProgress, false)]
#[case(TaskStatus::InProgress, TaskStatus::Approved, false)]
#[case(TaskStatus::InProgress, TaskStatus::RevisionRequested, false)]
#[case(TaskStatus::InProgress, TaskStatus::Rejected, false)]
#[case(TaskStatus::Completed, TaskStatus::Approved, true)]
#[case(TaskStatus::Completed, TaskStatus::RevisionRequested, true)]
#[case(TaskStatus::Completed, TaskStatus::Pending, true)]
#[case(TaskStatus::Completed, TaskStatus::Cancelled, true)]
#[case(TaskStatus::Completed, TaskStatus::InProgress, false)]
#[case(TaskStatus::Completed, TaskStatus::Completed, false)]
#[case(TaskStatus::Completed, TaskStatus::Rejected, false)]
#[case(TaskStatus::RevisionRequested, TaskStatus::Completed, true)]
#[case(TaskStatus::RevisionRequested, TaskStatus::Pending, true)]
#[case(TaskStatus::RevisionRequested, TaskStatus::Rejected, true)]
#[case(TaskStatus::RevisionRequested, TaskStatus::Cancelled, true)]
#[case(TaskStatus::RevisionRequested, TaskStatus::InProgress, false)]
#[case(TaskStatus::RevisionRequested, TaskStatus::Approved, false)]
#[case(TaskStatus::RevisionRequested, TaskStatus::RevisionRequested, false)]
fn can_transition_to_returns_expected(
    #[case] from: TaskStatus,
    #[case] to: TaskStatus,
    #[case] expected: bool,
) {
    assert_eq!(from.can_transition_to(to), expected);
}

#[rstest]
#[case(TaskStatus::Approved)]
#[case(TaskStatus::Rejected)]
#[case(TaskStatus::Cancelled)]
fn terminal_statuses_permit_no_transitions(#[case] terminal: TaskStatus) {
    assert!(terminal.is_terminal());
    for target in ALL_STATUSES {
        assert!(!terminal.can_transition_to(target));
    }
}

#[rstest]
#[case(TaskStatus::Pending, false)]
#[case(TaskStatus::InProgress, false)]
#[case(TaskStatus::Completed, false)]
#[case(TaskStatus::Approved, true)]
#[case(TaskStatus::RevisionRequested, false)]
#[case(TaskStatus::Rejected, true)]
#[case(TaskStatus::Cancelled, true)]
fn is_terminal_returns_expected(#[case] status: TaskStatus, #[case] expected: bool) {
    assert_eq!(status.is_terminal(), expected);
}

#[rstest]
#[case(TaskStatus::Pending, false)]
#[case(TaskStatus::InProgress, true)]
#[case(TaskStatus::Completed, true)]
#[case(TaskStatus::Approved, true)]
#[case(TaskStatus::RevisionRequested, true)]
#[case(TaskStatus::Rejected, false)]
#[case(TaskStatus::Cancelled, false)]
fn requires_assistant_returns_expected(#[case] status: TaskStatus, #[case] expected: bool) {
    assert_eq!(status.requires_assistant(), expected);
}

#[rstest]
#[case(TaskStatus::Pending, false)]
#[case(TaskStatus::InProgress, true)]
#[case(TaskStatus::Completed, true)]
#[case(TaskStatus::Approved, false)]
#[case(TaskStatus::RevisionRequested, true)]
#[case(TaskStatus::Rejected, false)]
#[case(TaskStatus::Cancelled, false)]
fn counts_toward_load_returns_expected(#[case] status: TaskStatus, #[case] expected: bool) {
    assert_eq!(status.counts_toward_load(), expected);
}

#[rstest]
fn bind_moves_pending_task_in_progress(
    clock: DefaultClock,
    pending_task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = pending_task?;
    let assistant_id = AssistantId::new();

    task.bind(assistant_id, &clock)?;

    ensure!(task.status() == TaskStatus::InProgress);
    ensure!(task.assistant_id() == Some(assistant_id));
    ensure!(task.claimed_at().is_some());
    ensure!(task.binding_is_consistent());
    Ok(())
}

#[rstest]
fn bind_rejects_task_already_in_progress(
    clock: DefaultClock,
    pending_task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = pending_task?;
    task.bind(AssistantId::new(), &clock)?;
    let task_id = task.id();

    let result = task.bind(AssistantId::new(), &clock);
    let expected = Err(TaskDomainError::InvalidStateTransition {
        task_id,
        from: TaskStatus::InProgress,
        to: TaskStatus::InProgress,
    });

    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    Ok(())
}

#[rstest]
fn full_review_cycle_keeps_binding_consistent(
    clock: DefaultClock,
    pending_task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = pending_task?;
    let assistant_id = AssistantId::new();

    task.bind(assistant_id, &clock)?;
    task.submit_result("Table for two at eight", None, &clock)?;
    ensure!(task.status() == TaskStatus::Completed);
    ensure!(task.completed_at().is_some());
    ensure!(task.binding_is_consistent());

    task.request_revision("Make it nine", &clock)?;
    ensure!(task.status() == TaskStatus::RevisionRequested);
    ensure!(task.binding_is_consistent());

    task.submit_result("Table for two at nine", Some("Confirmed".to_owned()), &clock)?;
    task.approve(None, Some("Great".to_owned()), &clock)?;
    ensure!(task.status() == TaskStatus::Approved);
    ensure!(task.approved_at().is_some());
    // Approved keeps the binding for audit.
    ensure!(task.assistant_id() == Some(assistant_id));
    ensure!(task.binding_is_consistent());
    Ok(())
}

#[rstest]
fn reject_unbinds_and_stamps_reason(
    clock: DefaultClock,
    pending_task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = pending_task?;
    task.bind(AssistantId::new(), &clock)?;

    task.reject("Outside my expertise", &clock)?;

    ensure!(task.status() == TaskStatus::Pending);
    ensure!(task.assistant_id().is_none());
    ensure!(task.claimed_at().is_none());
    ensure!(task.rejected_at().is_some());
    ensure!(task.rejection_reason() == Some("Outside my expertise"));
    ensure!(task.binding_is_consistent());
    Ok(())
}

#[rstest]
fn reject_requires_a_reason(
    clock: DefaultClock,
    pending_task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = pending_task?;
    task.bind(AssistantId::new(), &clock)?;

    let result = task.reject("   ", &clock);
    if result != Err(TaskDomainError::EmptyRejectionReason) {
        bail!("expected EmptyRejectionReason, got {result:?}");
    }
    ensure!(task.status() == TaskStatus::InProgress);
    Ok(())
}

#[rstest]
fn reject_is_rejected_for_pending_task(
    clock: DefaultClock,
    pending_task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = pending_task?;

    let result = task.reject("No binding yet", &clock);
    ensure!(result.is_err());
    ensure!(task.status() == TaskStatus::Pending);
    Ok(())
}

#[rstest]
fn release_returns_bound_task_to_the_pool(
    clock: DefaultClock,
    pending_task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = pending_task?;
    task.bind(AssistantId::new(), &clock)?;
    task.submit_result("Draft", None, &clock)?;

    task.release(&clock)?;

    ensure!(task.status() == TaskStatus::Pending);
    ensure!(task.assistant_id().is_none());
    // Release is not a rejection; no rejection stamp appears.
    ensure!(task.rejected_at().is_none());
    ensure!(task.binding_is_consistent());
    Ok(())
}

#[rstest]
fn cancel_is_terminal_and_unbinds(
    clock: DefaultClock,
    pending_task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = pending_task?;
    task.bind(AssistantId::new(), &clock)?;

    task.cancel("Client withdrew the request", &clock)?;

    ensure!(task.status() == TaskStatus::Cancelled);
    ensure!(task.assistant_id().is_none());
    ensure!(task.cancellation_reason() == Some("Client withdrew the request"));

    let result = task.bind(AssistantId::new(), &clock);
    ensure!(result.is_err());
    Ok(())
}

#[rstest]
fn approve_from_pending_is_rejected(
    clock: DefaultClock,
    pending_task: Result<Task, TaskDomainError>,
) -> eyre::Result<()> {
    let mut task = pending_task?;
    let task_id = task.id();

    let result = task.approve(None, None, &clock);
    let expected = Err(TaskDomainError::InvalidStateTransition {
        task_id,
        from: TaskStatus::Pending,
        to: TaskStatus::Approved,
    });

    if result != expected {
        bail!("expected {expected:?}, got {result:?}");
    }
    ensure!(task.status() == TaskStatus::Pending);
    Ok(())
}
