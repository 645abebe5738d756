//! `PostgreSQL` adapters for assistant registry persistence.

mod models;
mod repository;
mod schema;

pub use repository::{AssistantPgPool, PostgresAssistantRegistry};
