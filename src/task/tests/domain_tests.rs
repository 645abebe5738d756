//! Unit tests for task domain values: titles, kinds, kind sets, ratings, and
//! the overdue flag.

use crate::task::domain::{
    ClientId, Rating, Task, TaskDomainError, TaskKind, TaskKindSet, TaskStatus,
};
use chrono::TimeDelta;
use eyre::ensure;
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[rstest]
fn new_task_trims_title_and_starts_pending(clock: DefaultClock) -> eyre::Result<()> {
    let task = Task::new(
        ClientId::new(),
        "  Prepare quarterly report  ",
        Some("For the board meeting".to_owned()),
        TaskKind::Business,
        &clock,
    )?;

    ensure!(task.title() == "Prepare quarterly report");
    ensure!(task.status() == TaskStatus::Pending);
    ensure!(task.assistant_id().is_none());
    ensure!(task.deadline().is_none());
    ensure!(task.binding_is_consistent());
    Ok(())
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\t\n")]
fn new_task_rejects_blank_title(#[case] title: &str, clock: DefaultClock) {
    let result = Task::new(ClientId::new(), title, None, TaskKind::Personal, &clock);
    assert_eq!(result, Err(TaskDomainError::EmptyTitle));
}

#[rstest]
fn overdue_is_derived_from_the_deadline(clock: DefaultClock) -> eyre::Result<()> {
    let mut task = Task::new(
        ClientId::new(),
        "Walk the dog",
        None,
        TaskKind::Personal,
        &clock,
    )?;
    let now = clock.utc();

    ensure!(!task.is_overdue(now));

    task.set_deadline(now - TimeDelta::hours(1), &clock);
    ensure!(task.is_overdue(now));

    task.set_deadline(now + TimeDelta::hours(1), &clock);
    ensure!(!task.is_overdue(now));
    Ok(())
}

#[rstest]
#[case(1, true)]
#[case(3, true)]
#[case(5, true)]
#[case(0, false)]
#[case(6, false)]
#[case(255, false)]
fn rating_accepts_one_through_five(#[case] stars: u8, #[case] accepted: bool) {
    let result = Rating::new(stars);
    if accepted {
        assert!(result.is_ok());
    } else {
        assert_eq!(result, Err(TaskDomainError::InvalidRating(stars)));
    }
}

#[rstest]
#[case("personal", Ok(TaskKind::Personal))]
#[case(" Business ", Ok(TaskKind::Business))]
#[case("errand", Err(()))]
fn task_kind_parses_canonical_strings(
    #[case] input: &str,
    #[case] expected: Result<TaskKind, ()>,
) {
    let parsed = TaskKind::try_from(input).map_err(|_| ());
    assert_eq!(parsed, expected);
}

#[rstest]
fn kind_set_membership_and_intersection() {
    let personal = TaskKindSet::of(TaskKind::Personal);
    let business = TaskKindSet::of(TaskKind::Business);

    assert!(personal.contains(TaskKind::Personal));
    assert!(!personal.contains(TaskKind::Business));
    assert!(TaskKindSet::EMPTY.is_empty());
    assert!(!TaskKindSet::ALL.is_empty());

    assert_eq!(personal.intersection(business), TaskKindSet::EMPTY);
    assert_eq!(TaskKindSet::ALL.intersection(personal), personal);
    assert!(personal.is_subset_of(TaskKindSet::ALL));
    assert!(!TaskKindSet::ALL.is_subset_of(personal));
}

#[rstest]
fn kind_set_lists_members_in_canonical_order() {
    assert_eq!(
        TaskKindSet::ALL.kinds(),
        vec![TaskKind::Personal, TaskKind::Business]
    );
    assert_eq!(TaskKindSet::EMPTY.kinds(), Vec::<TaskKind>::new());
    assert_eq!(
        [TaskKind::Business, TaskKind::Business]
            .into_iter()
            .collect::<TaskKindSet>(),
        TaskKindSet::of(TaskKind::Business)
    );
}

#[rstest]
#[case("pending", Ok(TaskStatus::Pending))]
#[case("IN_PROGRESS", Ok(TaskStatus::InProgress))]
#[case("revision_requested", Ok(TaskStatus::RevisionRequested))]
#[case("archived", Err(()))]
fn task_status_parses_canonical_strings(
    #[case] input: &str,
    #[case] expected: Result<TaskStatus, ()>,
) {
    let parsed = TaskStatus::try_from(input).map_err(|_| ());
    assert_eq!(parsed, expected);
}
