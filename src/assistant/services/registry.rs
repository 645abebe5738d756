//! Service layer for assistant registration and availability.

use crate::assistant::{
    domain::{Assistant, AssistantDomainError, AssistantId, Availability, CapacityLimit, Specialization},
    ports::{AssistantRepository, AssistantRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for assistant registry operations.
#[derive(Debug, Error)]
pub enum AssistantRegistryServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] AssistantDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] AssistantRepositoryError),
}

/// Result type for assistant registry service operations.
pub type AssistantRegistryServiceResult<T> = Result<T, AssistantRegistryServiceError>;

/// Assistant registration and availability service.
#[derive(Clone)]
pub struct AssistantRegistryService<A, C>
where
    A: AssistantRepository,
    C: Clock + Send + Sync,
{
    assistants: Arc<A>,
    clock: Arc<C>,
}

impl<A, C> AssistantRegistryService<A, C>
where
    A: AssistantRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new registry service.
    #[must_use]
    pub const fn new(assistants: Arc<A>, clock: Arc<C>) -> Self {
        Self { assistants, clock }
    }

    /// Registers a new assistant, offline until they flag themselves online.
    ///
    /// `capacity` falls back to the product default when not given.
    ///
    /// # Errors
    ///
    /// Returns a domain error for a zero capacity, or persistence errors
    /// from the registry.
    pub async fn register(
        &self,
        specialization: Specialization,
        capacity: Option<u8>,
    ) -> AssistantRegistryServiceResult<Assistant> {
        let ceiling = capacity
            .map(CapacityLimit::new)
            .transpose()?
            .unwrap_or_default();
        let assistant = Assistant::new(specialization, ceiling, &*self.clock);
        self.assistants.insert(&assistant).await?;
        info!(
            assistant_id = %assistant.id(),
            specialization = %specialization,
            "assistant registered"
        );
        Ok(assistant)
    }

    /// Flips an assistant's availability flag.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantRepositoryError::NotFound`] through the repository
    /// wrapper when the assistant does not exist.
    pub async fn set_availability(
        &self,
        assistant_id: AssistantId,
        availability: Availability,
    ) -> AssistantRegistryServiceResult<Assistant> {
        let mut assistant = self.require_assistant(assistant_id).await?;
        assistant.set_availability(availability, &*self.clock);
        self.assistants.update(&assistant).await?;
        info!(
            assistant_id = %assistant_id,
            availability = %availability,
            "assistant availability updated"
        );
        Ok(assistant)
    }

    /// Retrieves an assistant by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantRepositoryError::NotFound`] through the repository
    /// wrapper when the assistant does not exist.
    pub async fn get(&self, assistant_id: AssistantId) -> AssistantRegistryServiceResult<Assistant> {
        self.require_assistant(assistant_id).await
    }

    async fn require_assistant(
        &self,
        assistant_id: AssistantId,
    ) -> AssistantRegistryServiceResult<Assistant> {
        self.assistants
            .find_by_id(assistant_id)
            .await?
            .ok_or_else(|| AssistantRepositoryError::NotFound(assistant_id).into())
    }
}
