//! # ActorEntity Trait
//!
//! The `ActorEntity` trait defines the contract that every keyed resource (for example the
//! hold set of one show) must implement to be driven by the generic `ResourceActor`.
//!
//! # Architecture Note
//! One actor owns exactly one entity. The entity is created from its key the first time
//! somebody shows interest in it, receives every message for that key *sequentially*, and is
//! retired once it reports itself idle for long enough. Two messages for the same key can
//! therefore never race, while entities with different keys run in parallel tasks.
//!
//! We use "Associated Types" (type Id, type Action, etc.) to enforce type safety.
//! A hold actor only accepts hold actions; the compiler rejects anything else.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_tick`] runs on every periodic tick of the actor loop.
//! - [`ActorEntity::is_idle`] tells the actor whether it may retire.
//!
//! The default implementations do nothing and never retire.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any keyed entity must implement to be managed by a `ResourceActor`.
///
/// # Async & Context
/// This trait is `#[async_trait]` to allow asynchronous operations in hooks (e.g. reading the
/// booking store). The `Context` type is injected into every hook, which allows "Late Binding"
/// of dependencies (passing collaborators to `run()` instead of `new()`).
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The key this entity is addressed by (e.g. a show id).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// Enum representing resource-specific operations (e.g. `RequestHold`).
    type Action: Send + Sync + Debug;

    /// The result type returned by actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// # Design Note: Error Granularity
    ///
    /// The framework enforces a **Per-Actor Error Type** (one enum for the whole actor) rather
    /// than **Per-Message Error Types**. Clients deal with a single error enum, at the cost of
    /// some actions technically being able to return variants they never produce.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct a fresh, empty entity for the given key.
    fn from_id(id: Self::Id) -> Self;

    /// Handle a resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;

    /// Periodic maintenance, called on every tick of the actor loop.
    async fn on_tick(&mut self, _ctx: &Self::Context) {}

    /// Whether the entity holds no state worth keeping an actor alive for.
    fn is_idle(&self) -> bool {
        false
    }
}
