//! In-memory assistant registry repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::assistant::{
    domain::{Assistant, AssistantId},
    ports::{AssistantRepository, AssistantRepositoryError, AssistantRepositoryResult},
};

/// Thread-safe in-memory assistant registry.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssistantRegistry {
    state: Arc<RwLock<HashMap<AssistantId, Assistant>>>,
}

impl InMemoryAssistantRegistry {
    /// Creates an empty in-memory registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AssistantRepositoryResult<RwLockReadGuard<'_, HashMap<AssistantId, Assistant>>> {
        self.state.read().map_err(|err| {
            AssistantRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(
        &self,
    ) -> AssistantRepositoryResult<RwLockWriteGuard<'_, HashMap<AssistantId, Assistant>>> {
        self.state.write().map_err(|err| {
            AssistantRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl AssistantRepository for InMemoryAssistantRegistry {
    async fn insert(&self, assistant: &Assistant) -> AssistantRepositoryResult<()> {
        let mut assistants = self.write()?;
        if assistants.contains_key(&assistant.id()) {
            return Err(AssistantRepositoryError::DuplicateAssistant(assistant.id()));
        }
        assistants.insert(assistant.id(), assistant.clone());
        Ok(())
    }

    async fn update(&self, assistant: &Assistant) -> AssistantRepositoryResult<()> {
        let mut assistants = self.write()?;
        if !assistants.contains_key(&assistant.id()) {
            return Err(AssistantRepositoryError::NotFound(assistant.id()));
        }
        assistants.insert(assistant.id(), assistant.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: AssistantId) -> AssistantRepositoryResult<Option<Assistant>> {
        let assistants = self.read()?;
        Ok(assistants.get(&id).cloned())
    }

    async fn count_online(&self) -> AssistantRepositoryResult<u64> {
        let assistants = self.read()?;
        let count = assistants.values().filter(|a| a.is_online()).count();
        u64::try_from(count).map_err(AssistantRepositoryError::persistence)
    }
}
