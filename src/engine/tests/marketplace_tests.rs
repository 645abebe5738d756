//! Tests for marketplace listings, claims, the rejected queue, and stats.

use super::support::Env;
use crate::assistant::domain::{Availability, Specialization};
use crate::assistant::ports::AssistantRepository;
use crate::engine::EngineError;
use crate::task::domain::{ClientId, TaskKind, TaskStatus};
use crate::task::ports::Page;
use eyre::{bail, ensure};

#[tokio::test]
async fn listings_are_bounded_by_specialization() -> eyre::Result<()> {
    let env = Env::new();
    env.seed_task(ClientId::new(), TaskKind::Personal).await?;
    env.seed_task(ClientId::new(), TaskKind::Business).await?;
    let personal_only = env
        .register_assistant(Specialization::PersonalOnly, 5)
        .await?;

    let visible = env
        .marketplace()
        .list_claimable(personal_only.id(), None, Page::default())
        .await?;
    ensure!(visible.len() == 1);
    ensure!(visible.iter().all(|task| task.kind() == TaskKind::Personal));

    // A filter outside the specialization yields nothing rather than erroring.
    let none = env
        .marketplace()
        .list_claimable(personal_only.id(), Some(TaskKind::Business), Page::default())
        .await?;
    ensure!(none.is_empty());
    Ok(())
}

#[tokio::test]
async fn claim_binds_and_persists_the_task() -> eyre::Result<()> {
    let env = Env::new();
    let assistant = env
        .register_assistant(Specialization::FullAccess, 5)
        .await?;
    let task = env.seed_task(ClientId::new(), TaskKind::Business).await?;

    let claimed = env.marketplace().claim(task.id(), assistant.id()).await?;

    ensure!(claimed.status() == TaskStatus::InProgress);
    ensure!(claimed.assistant_id() == Some(assistant.id()));
    let stored = env.stored_task(&task).await?;
    ensure!(stored == claimed);
    Ok(())
}

#[tokio::test]
async fn claim_rejects_a_specialization_mismatch() -> eyre::Result<()> {
    let env = Env::new();
    let assistant = env
        .register_assistant(Specialization::PersonalOnly, 5)
        .await?;
    let task = env.seed_task(ClientId::new(), TaskKind::Business).await?;

    let result = env.marketplace().claim(task.id(), assistant.id()).await;
    match result {
        Err(EngineError::SpecializationMismatch { assistant_id, kind }) => {
            ensure!(assistant_id == assistant.id());
            ensure!(kind == TaskKind::Business);
        }
        other => bail!("expected SpecializationMismatch, got {other:?}"),
    }
    // The task stays in the pool untouched.
    let stored = env.stored_task(&task).await?;
    ensure!(stored.status() == TaskStatus::Pending);
    Ok(())
}

#[tokio::test]
async fn second_claim_loses_with_already_claimed() -> eyre::Result<()> {
    let env = Env::new();
    let winner = env
        .register_assistant(Specialization::FullAccess, 5)
        .await?;
    let loser = env
        .register_assistant(Specialization::FullAccess, 5)
        .await?;
    let task = env.seed_task(ClientId::new(), TaskKind::Personal).await?;

    env.marketplace().claim(task.id(), winner.id()).await?;

    let result = env.marketplace().claim(task.id(), loser.id()).await;
    match result {
        Err(EngineError::AlreadyClaimed(id)) => ensure!(id == task.id()),
        other => bail!("expected AlreadyClaimed, got {other:?}"),
    }
    let stored = env.stored_task(&task).await?;
    ensure!(stored.assistant_id() == Some(winner.id()));
    Ok(())
}

#[tokio::test]
async fn claim_at_capacity_is_a_typed_error() -> eyre::Result<()> {
    let env = Env::new();
    let assistant = env
        .register_assistant(Specialization::FullAccess, 1)
        .await?;
    let first = env.seed_task(ClientId::new(), TaskKind::Personal).await?;
    let second = env.seed_task(ClientId::new(), TaskKind::Personal).await?;

    env.marketplace().claim(first.id(), assistant.id()).await?;

    let result = env.marketplace().claim(second.id(), assistant.id()).await;
    match result {
        Err(EngineError::CapacityExceeded { assistant_id, limit }) => {
            ensure!(assistant_id == assistant.id());
            ensure!(limit.value() == 1);
        }
        other => bail!("expected CapacityExceeded, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn rejected_queue_surfaces_returned_tasks() -> eyre::Result<()> {
    let env = Env::new();
    let assistant = env
        .register_assistant(Specialization::FullAccess, 5)
        .await?;
    let task = env.seed_task(ClientId::new(), TaskKind::Personal).await?;
    env.marketplace().claim(task.id(), assistant.id()).await?;
    env.lifecycle()
        .reject(task.id(), assistant.id(), "Not available this week")
        .await?;

    let queue = env.marketplace().rejected_queue(Page::default()).await?;
    ensure!(queue.len() == 1);
    ensure!(queue.iter().all(|queued| queued.id() == task.id()));
    Ok(())
}

#[tokio::test]
async fn stats_count_pool_deadlines_and_online_assistants() -> eyre::Result<()> {
    let env = Env::new();
    let task = env.seed_task(ClientId::new(), TaskKind::Personal).await?;
    env.engine().send_to_marketplace(task.id()).await?;

    let mut online = env
        .register_assistant(Specialization::FullAccess, 5)
        .await?;
    online.set_availability(Availability::Online, &*env.clock);
    env.assistants.update(&online).await?;
    env.register_assistant(Specialization::FullAccess, 5)
        .await?;

    let stats = env.marketplace().stats().await?;
    ensure!(stats.claimable == 1);
    ensure!(stats.online_assistants == 1);
    // The fresh claim window has not lapsed.
    ensure!(stats.overdue == 0);
    Ok(())
}
