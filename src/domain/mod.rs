//! Domain layer containing business entities and logic.
//!
//! Defines entities, repository interfaces and the pure analytics core,
//! independent of storage and HTTP concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`analytics`] - Window comparison, dimensional rollups and report assembly
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Orchestration lives in services (see [`crate::application::services`])

pub mod analytics;
pub mod entities;
pub mod repositories;
