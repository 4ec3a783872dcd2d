//! Repository implementations.
//!
//! Concrete implementations of the domain repository traits: PostgreSQL via
//! SQLx for deployments, and a process-local store for development and tests.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Short link storage on PostgreSQL
//! - [`PgEventRepository`] - Event storage and server-side rollups on PostgreSQL
//! - [`InMemoryStore`] - Both traits, in memory

pub mod memory_store;
pub mod pg_event_repository;
pub mod pg_link_repository;

pub use memory_store::InMemoryStore;
pub use pg_event_repository::PgEventRepository;
pub use pg_link_repository::PgLinkRepository;
