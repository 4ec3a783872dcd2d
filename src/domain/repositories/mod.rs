//! Repository trait definitions for the domain layer.
//!
//! Together these traits form the data store collaborator the core talks to.
//! Implementations live in `crate::infrastructure::persistence`; mock
//! implementations are auto-generated via `mockall` for testing.
//!
//! - [`LinkRepository`] - Short link lookup, insert, update and soft delete
//! - [`EventRepository`] - Event recording, raw queries and precomputed rollups

pub mod event_repository;
pub mod link_repository;

pub use event_repository::{EventQuery, EventRepository};
pub use link_repository::LinkRepository;

#[cfg(test)]
pub use event_repository::MockEventRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
