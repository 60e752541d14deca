//! Generic per-key actor framework.
//!
//! This module provides the building blocks for running one sequential actor per key
//! (for example one per show), so that mutations for the same key never race while
//! different keys proceed in parallel.
//!
//! # Main Components
//!
//! - [`ActorEntity`] - Trait that keyed state implements to be driven by an actor
//! - [`ResourceActor`] - Generic actor owning one entity
//! - [`ResourceClient`] - Type-safe handle for sending requests to one actor
//! - [`ActorRegistry`] - Spawns actors on first interest and retires idle ones
//! - [`FrameworkError`] - Common error types
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test clients without spawning full actors.

pub mod actor;
pub mod client;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod registry;

// Re-export core types for convenience
pub use actor::{ActorSettings, ResourceActor};
pub use client::ResourceClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
pub use registry::ActorRegistry;
