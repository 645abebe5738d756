//! Unit tests for assistant domain values: specialization, capacity, and the
//! rating tally.

use crate::assistant::domain::{
    Assistant, AssistantDomainError, Availability, CapacityLimit, RatingTally, Specialization,
};
use crate::task::domain::{Rating, TaskKind, TaskKindSet};
use eyre::ensure;
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[rstest]
#[case(Specialization::PersonalOnly, TaskKindSet::of(TaskKind::Personal))]
#[case(Specialization::BusinessOnly, TaskKindSet::of(TaskKind::Business))]
#[case(Specialization::FullAccess, TaskKindSet::ALL)]
fn specialization_maps_to_allowed_kinds(
    #[case] specialization: Specialization,
    #[case] expected: TaskKindSet,
) {
    assert_eq!(specialization.allowed_kinds(), expected);
}

#[rstest]
fn capacity_limit_rejects_zero() {
    assert_eq!(
        CapacityLimit::new(0),
        Err(AssistantDomainError::InvalidCapacityLimit(0))
    );
    assert_eq!(CapacityLimit::default(), CapacityLimit::DEFAULT);
    assert_eq!(CapacityLimit::DEFAULT.value(), 5);
}

#[rstest]
#[case(0, false)]
#[case(4, false)]
#[case(5, true)]
#[case(6, true)]
fn capacity_limit_is_reached_at_the_ceiling(#[case] active: u32, #[case] reached: bool) {
    assert_eq!(CapacityLimit::DEFAULT.is_reached_by(active), reached);
}

#[rstest]
fn rating_tally_accumulates_without_averaging(clock: DefaultClock) -> eyre::Result<()> {
    let mut assistant = Assistant::new(Specialization::FullAccess, CapacityLimit::DEFAULT, &clock);
    ensure!(assistant.ratings() == RatingTally::new());
    ensure!(assistant.completed_count() == 0);

    assistant.record_approval(Some(Rating::new(5)?), &clock);
    assistant.record_approval(None, &clock);
    assistant.record_approval(Some(Rating::new(3)?), &clock);

    ensure!(assistant.completed_count() == 3);
    ensure!(assistant.ratings().total() == 8);
    ensure!(assistant.ratings().count() == 2);
    Ok(())
}

#[rstest]
fn new_assistant_starts_offline(clock: DefaultClock) -> eyre::Result<()> {
    let mut assistant = Assistant::new(Specialization::PersonalOnly, CapacityLimit::DEFAULT, &clock);
    ensure!(!assistant.is_online());
    ensure!(assistant.availability() == Availability::Offline);

    assistant.set_availability(Availability::Online, &clock);
    ensure!(assistant.is_online());
    Ok(())
}

#[rstest]
#[case("full_access", Ok(Specialization::FullAccess))]
#[case(" Personal_Only ", Ok(Specialization::PersonalOnly))]
#[case("generalist", Err(()))]
fn specialization_parses_canonical_strings(
    #[case] input: &str,
    #[case] expected: Result<Specialization, ()>,
) {
    let parsed = Specialization::try_from(input).map_err(|_| ());
    assert_eq!(parsed, expected);
}
