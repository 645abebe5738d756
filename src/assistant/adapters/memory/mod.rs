//! In-memory adapters for assistant registry persistence.

mod registry;

pub use registry::InMemoryAssistantRegistry;
