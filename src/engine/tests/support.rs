//! Shared in-memory harness for engine service tests.

use crate::assistant::adapters::memory::InMemoryAssistantRegistry;
use crate::assistant::domain::{Assistant, CapacityLimit, Specialization};
use crate::assistant::ports::AssistantRepository;
use crate::engine::services::{AssignmentEngine, LifecycleService, MarketplaceService};
use crate::pairing::adapters::memory::InMemoryPairingRepository;
use crate::pairing::domain::Pairing;
use crate::pairing::ports::PairingRepository;
use crate::task::adapters::memory::InMemoryTaskRepository;
use crate::task::domain::{ClientId, Task, TaskKind, TaskKindSet};
use crate::task::ports::TaskRepository;
use eyre::WrapErr;
use mockable::DefaultClock;
use std::sync::Arc;

pub type TestLifecycle =
    LifecycleService<InMemoryTaskRepository, InMemoryAssistantRegistry, DefaultClock>;
pub type TestEngine = AssignmentEngine<
    InMemoryTaskRepository,
    InMemoryAssistantRegistry,
    InMemoryPairingRepository,
    DefaultClock,
>;
pub type TestMarketplace =
    MarketplaceService<InMemoryTaskRepository, InMemoryAssistantRegistry, DefaultClock>;

/// In-memory stores plus the services wired over them.
pub struct Env {
    pub tasks: Arc<InMemoryTaskRepository>,
    pub assistants: Arc<InMemoryAssistantRegistry>,
    pub pairings: Arc<InMemoryPairingRepository>,
    pub clock: Arc<DefaultClock>,
}

impl Env {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(InMemoryTaskRepository::new()),
            assistants: Arc::new(InMemoryAssistantRegistry::new()),
            pairings: Arc::new(InMemoryPairingRepository::new()),
            clock: Arc::new(DefaultClock),
        }
    }

    pub fn lifecycle(&self) -> TestLifecycle {
        LifecycleService::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.assistants),
            Arc::clone(&self.clock),
        )
    }

    pub fn engine(&self) -> TestEngine {
        AssignmentEngine::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.assistants),
            Arc::clone(&self.pairings),
            Arc::clone(&self.clock),
        )
    }

    pub fn marketplace(&self) -> TestMarketplace {
        MarketplaceService::new(
            Arc::clone(&self.tasks),
            Arc::clone(&self.assistants),
            Arc::clone(&self.clock),
        )
    }

    /// Registers an assistant directly in the in-memory registry.
    pub async fn register_assistant(
        &self,
        specialization: Specialization,
        capacity: u8,
    ) -> eyre::Result<Assistant> {
        let ceiling = CapacityLimit::new(capacity)?;
        let assistant = Assistant::new(specialization, ceiling, &*self.clock);
        self.assistants
            .insert(&assistant)
            .await
            .wrap_err("registering assistant")?;
        Ok(assistant)
    }

    /// Creates an active pairing directly in the in-memory store.
    pub async fn pair(
        &self,
        client_id: ClientId,
        assistant: &Assistant,
        allowed_kinds: Option<TaskKindSet>,
    ) -> eyre::Result<Pairing> {
        let pairing = Pairing::new(client_id, assistant.id(), allowed_kinds, None, &*self.clock)?;
        self.pairings
            .insert(&pairing)
            .await
            .wrap_err("creating pairing")?;
        Ok(pairing)
    }

    /// Creates a pending task directly in the in-memory store.
    pub async fn seed_task(&self, client_id: ClientId, kind: TaskKind) -> eyre::Result<Task> {
        let task = Task::new(client_id, "Seeded task", None, kind, &*self.clock)?;
        self.tasks.insert(&task).await.wrap_err("seeding task")?;
        Ok(task)
    }

    /// Reloads a task from the store.
    pub async fn stored_task(&self, task: &Task) -> eyre::Result<Task> {
        self.tasks
            .find_by_id(task.id())
            .await
            .wrap_err("loading task")?
            .ok_or_else(|| eyre::eyre!("task {} missing from the store", task.id()))
    }
}
