//! Taskfloor: task lifecycle and assignment engine for a staffing
//! marketplace.
//!
//! Clients submit tasks; assistants with specializations and capacity
//! ceilings take them on, either automatically through a permanent pairing
//! or by claiming from a marketplace pool. This crate is the domain core:
//! authentication, billing, messaging, and delivery surfaces are external
//! collaborators.
//!
//! # Architecture
//!
//! Taskfloor follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`task`]: Task aggregate, state machine, and guarded persistence
//! - [`assistant`]: Assistant registry with specialization and capacity
//! - [`pairing`]: Permanent client-to-assistant pairings
//! - [`engine`]: Assignment, marketplace, and lifecycle orchestration

pub mod assistant;
pub mod engine;
pub mod pairing;
pub mod task;
