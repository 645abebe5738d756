//! Services for assistant registration and availability.

mod registry;

pub use registry::{
    AssistantRegistryService, AssistantRegistryServiceError, AssistantRegistryServiceResult,
};
