//! End-to-end scenarios for the assignment engine over the public API.
//!
//! These tests wire the lifecycle, assignment, marketplace, pairing, and
//! registry services over the in-memory adapters and walk realistic task
//! journeys: pairing-backed auto-assignment, marketplace claims under
//! contention, rejection round-trips, and manual reassignment.

use std::sync::Arc;

use eyre::{bail, ensure};
use mockable::DefaultClock;
use taskfloor::assistant::adapters::memory::InMemoryAssistantRegistry;
use taskfloor::assistant::domain::{Assistant, Specialization};
use taskfloor::assistant::services::AssistantRegistryService;
use taskfloor::engine::EngineError;
use taskfloor::engine::services::{
    AssignmentEngine, LifecycleService, MarketplaceService, NewTaskRequest,
};
use taskfloor::pairing::adapters::memory::InMemoryPairingRepository;
use taskfloor::pairing::services::{CreatePairingRequest, PairingService};
use taskfloor::task::adapters::memory::InMemoryTaskRepository;
use taskfloor::task::domain::{ClientId, Task, TaskKind, TaskKindSet, TaskStatus};
use taskfloor::task::ports::{Page, TaskRepository};

/// All services wired over shared in-memory stores.
struct Harness {
    tasks: Arc<InMemoryTaskRepository>,
    lifecycle: LifecycleService<InMemoryTaskRepository, InMemoryAssistantRegistry, DefaultClock>,
    engine: AssignmentEngine<
        InMemoryTaskRepository,
        InMemoryAssistantRegistry,
        InMemoryPairingRepository,
        DefaultClock,
    >,
    marketplace:
        MarketplaceService<InMemoryTaskRepository, InMemoryAssistantRegistry, DefaultClock>,
    pairings: PairingService<InMemoryPairingRepository, InMemoryAssistantRegistry, DefaultClock>,
    registry: AssistantRegistryService<InMemoryAssistantRegistry, DefaultClock>,
}

impl Harness {
    fn new() -> Self {
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let assistants = Arc::new(InMemoryAssistantRegistry::new());
        let pairings = Arc::new(InMemoryPairingRepository::new());
        let clock = Arc::new(DefaultClock);
        Self {
            tasks: Arc::clone(&tasks),
            lifecycle: LifecycleService::new(
                Arc::clone(&tasks),
                Arc::clone(&assistants),
                Arc::clone(&clock),
            ),
            engine: AssignmentEngine::new(
                Arc::clone(&tasks),
                Arc::clone(&assistants),
                Arc::clone(&pairings),
                Arc::clone(&clock),
            ),
            marketplace: MarketplaceService::new(
                Arc::clone(&tasks),
                Arc::clone(&assistants),
                Arc::clone(&clock),
            ),
            pairings: PairingService::new(pairings, Arc::clone(&assistants), Arc::clone(&clock)),
            registry: AssistantRegistryService::new(assistants, clock),
        }
    }

    async fn register(&self, specialization: Specialization, capacity: u8) -> eyre::Result<Assistant> {
        Ok(self.registry.register(specialization, Some(capacity)).await?)
    }

    async fn new_task(&self, client_id: ClientId, kind: TaskKind) -> eyre::Result<Task> {
        Ok(self
            .lifecycle
            .create_task(NewTaskRequest::new(client_id, "Quarterly expense report", kind))
            .await?)
    }

    async fn reload(&self, task: &Task) -> eyre::Result<Task> {
        self.tasks
            .find_by_id(task.id())
            .await?
            .ok_or_else(|| eyre::eyre!("task {} missing from the store", task.id()))
    }
}

#[tokio::test]
async fn paired_client_task_runs_the_full_review_cycle() -> eyre::Result<()> {
    let harness = Harness::new();
    let client_id = ClientId::new();
    let assistant = harness.register(Specialization::FullAccess, 5).await?;
    harness
        .pairings
        .create_pairing(CreatePairingRequest::new(client_id, assistant.id()))
        .await?;

    let task = harness.new_task(client_id, TaskKind::Business).await?;
    let placed = harness.engine.dispatch(task.id()).await?;
    ensure!(placed == Some(assistant.id()));

    harness
        .lifecycle
        .complete(task.id(), "Report attached", None)
        .await?;
    let approved = harness
        .lifecycle
        .approve(task.id(), Some(5), Some("Great work".to_owned()))
        .await?;

    ensure!(approved.status() == TaskStatus::Approved);
    ensure!(approved.assistant_id() == Some(assistant.id()));
    ensure!(harness.tasks.count_active_for(assistant.id()).await? == 0);

    let updated = harness.registry.get(assistant.id()).await?;
    ensure!(updated.completed_count() == 1);
    ensure!(updated.ratings().total() == 5);
    Ok(())
}

#[tokio::test]
async fn kind_restricted_pairing_routes_to_the_marketplace() -> eyre::Result<()> {
    let harness = Harness::new();
    let client_id = ClientId::new();
    let paired = harness.register(Specialization::FullAccess, 5).await?;
    harness
        .pairings
        .create_pairing(
            CreatePairingRequest::new(client_id, paired.id())
                .with_allowed_kinds(TaskKindSet::of(TaskKind::Personal)),
        )
        .await?;

    let task = harness.new_task(client_id, TaskKind::Business).await?;
    ensure!(harness.engine.dispatch(task.id()).await?.is_none());

    // The pool task is visible to, and claimable by, another assistant.
    let walk_in = harness.register(Specialization::FullAccess, 5).await?;
    let listings = harness
        .marketplace
        .list_claimable(walk_in.id(), None, Page::default())
        .await?;
    ensure!(listings.iter().any(|listed| listed.id() == task.id()));

    let claimed = harness.marketplace.claim(task.id(), walk_in.id()).await?;
    ensure!(claimed.assistant_id() == Some(walk_in.id()));
    Ok(())
}

#[tokio::test]
async fn deactivated_pairing_stops_auto_assignment() -> eyre::Result<()> {
    let harness = Harness::new();
    let client_id = ClientId::new();
    let assistant = harness.register(Specialization::FullAccess, 5).await?;
    let pairing = harness
        .pairings
        .create_pairing(CreatePairingRequest::new(client_id, assistant.id()))
        .await?;
    harness.pairings.deactivate(pairing.id()).await?;

    let task = harness.new_task(client_id, TaskKind::Personal).await?;
    ensure!(harness.engine.dispatch(task.id()).await?.is_none());

    harness.pairings.reactivate(pairing.id()).await?;
    let next = harness.new_task(client_id, TaskKind::Personal).await?;
    ensure!(harness.engine.dispatch(next.id()).await? == Some(assistant.id()));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_claims_produce_exactly_one_winner() -> eyre::Result<()> {
    let harness = Harness::new();
    let first = harness.register(Specialization::FullAccess, 5).await?;
    let second = harness.register(Specialization::FullAccess, 5).await?;
    let task = harness.new_task(ClientId::new(), TaskKind::Personal).await?;

    let (left, right) = tokio::join!(
        harness.marketplace.claim(task.id(), first.id()),
        harness.marketplace.claim(task.id(), second.id()),
    );

    let winners = [left.is_ok(), right.is_ok()]
        .iter()
        .filter(|won| **won)
        .count();
    ensure!(winners == 1, "expected exactly one winning claim");
    for outcome in [left, right] {
        if let Err(err) = outcome {
            match err {
                EngineError::AlreadyClaimed(id) => ensure!(id == task.id()),
                other => bail!("loser should see AlreadyClaimed, got {other:?}"),
            }
        }
    }

    let stored = harness.reload(&task).await?;
    ensure!(stored.status() == TaskStatus::InProgress);
    ensure!(stored.binding_is_consistent());
    let bound = stored
        .assistant_id()
        .ok_or_else(|| eyre::eyre!("winner not recorded"))?;
    ensure!(harness.tasks.count_active_for(bound).await? == 1);
    Ok(())
}

#[tokio::test]
async fn rejected_task_returns_to_the_pool_for_another_claim() -> eyre::Result<()> {
    let harness = Harness::new();
    let first = harness.register(Specialization::FullAccess, 5).await?;
    let second = harness.register(Specialization::FullAccess, 5).await?;
    let task = harness.new_task(ClientId::new(), TaskKind::Personal).await?;

    harness.marketplace.claim(task.id(), first.id()).await?;
    harness
        .lifecycle
        .reject(task.id(), first.id(), "Travelling this week")
        .await?;

    let queue = harness.marketplace.rejected_queue(Page::default()).await?;
    ensure!(queue.iter().any(|queued| queued.id() == task.id()));

    let reclaimed = harness.marketplace.claim(task.id(), second.id()).await?;
    ensure!(reclaimed.assistant_id() == Some(second.id()));
    ensure!(harness.tasks.count_active_for(first.id()).await? == 0);
    ensure!(harness.tasks.count_active_for(second.id()).await? == 1);
    Ok(())
}

#[tokio::test]
async fn manual_reassignment_moves_work_between_assistants() -> eyre::Result<()> {
    let harness = Harness::new();
    let client_id = ClientId::new();
    let original = harness.register(Specialization::FullAccess, 5).await?;
    let replacement = harness.register(Specialization::FullAccess, 5).await?;
    harness
        .pairings
        .create_pairing(CreatePairingRequest::new(client_id, original.id()))
        .await?;

    let task = harness.new_task(client_id, TaskKind::Personal).await?;
    ensure!(harness.engine.dispatch(task.id()).await? == Some(original.id()));

    let released = harness.lifecycle.reassign(task.id(), None).await?;
    ensure!(released.status() == TaskStatus::Pending);
    ensure!(released.assistant_id().is_none());

    let moved = harness
        .lifecycle
        .reassign(task.id(), Some(replacement.id()))
        .await?;
    ensure!(moved.status() == TaskStatus::InProgress);
    ensure!(moved.assistant_id() == Some(replacement.id()));
    ensure!(harness.tasks.count_active_for(original.id()).await? == 0);
    ensure!(harness.tasks.count_active_for(replacement.id()).await? == 1);
    Ok(())
}
