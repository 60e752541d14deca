//! # Generic Actor Server
//!
//! This module defines the `ResourceActor`, the component that owns one keyed entity and
//! processes every message for it sequentially. It implements the "Server" side of the Actor
//! Model and ensures exclusive access to the entity without any locking.

use super::client::ResourceClient;
use super::entity::ActorEntity;
use super::error::FrameworkError;
use super::message::ResourceRequest;
use super::registry::Retirement;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Tuning knobs shared by every actor a registry spawns.
#[derive(Debug, Clone, Copy)]
pub struct ActorSettings {
    /// Capacity of the mailbox. When it is full, senders wait for space.
    pub buffer_size: usize,
    /// How often [`ActorEntity::on_tick`] runs.
    pub tick_interval: Duration,
    /// How long an idle entity is kept before its actor retires.
    pub idle_grace: Duration,
}

impl Default for ActorSettings {
    fn default() -> Self {
        Self {
            buffer_size: 32,
            tick_interval: Duration::from_secs(1),
            idle_grace: Duration::from_secs(60),
        }
    }
}

/// The generic actor that owns a single entity.
///
/// # Architecture Note
/// This struct is the "Server" half of the actor. It owns the entity and the receiver end of
/// the channel.
///
/// **Concurrency Model**:
/// Even though there may be one `ResourceActor` per active show, each one processes its own
/// messages *sequentially* in a loop. We don't need a `Mutex` around the entity; exclusive
/// ownership inside the task gives us safety.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ResourceActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Wire**: Pass dependencies into `actor.run(context)`.
/// 3.  **Run**: Spawn the run loop in a background task.
///
/// Actors spawned by an [`ActorRegistry`](super::ActorRegistry) additionally retire themselves
/// once their entity has been idle for [`ActorSettings::idle_grace`].
pub struct ResourceActor<T: ActorEntity> {
    id: T::Id,
    entity: T,
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    settings: ActorSettings,
    retirement: Option<Retirement<T>>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` for `id` and its associated `ResourceClient`.
    pub fn new(id: T::Id, settings: ActorSettings) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(settings.buffer_size.max(1));
        let actor = Self {
            entity: T::from_id(id.clone()),
            id,
            receiver,
            settings,
            retirement: None,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    pub(crate) fn with_retirement(mut self, retirement: Retirement<T>) -> Self {
        self.retirement = Some(retirement);
        self
    }

    /// Runs the actor's event loop until every client is dropped or the actor retires.
    ///
    /// # Context Injection
    /// The `context` argument is injected into every entity hook. This allows entities
    /// to access collaborators that were created *after* the actor was instantiated but
    /// *before* the loop started.
    pub async fn run(mut self, context: T::Context) {
        // Extract just the type name (e.g., "ShowHolds" instead of "seat_reservation::model::hold::ShowHolds")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        let id = self.id.clone();
        info!(entity_type, %id, "Actor started");

        let mut ticker = interval(self.settings.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_activity = Instant::now();

        loop {
            tokio::select! {
                msg = self.receiver.recv() => {
                    let Some(msg) = msg else { break };
                    self.dispatch(msg, &context, entity_type).await;
                    last_activity = Instant::now();
                }
                _ = ticker.tick() => {
                    self.entity.on_tick(&context).await;
                    if !self.entity.is_idle() {
                        last_activity = Instant::now();
                    } else if last_activity.elapsed() >= self.settings.idle_grace
                        && self.retirement.is_some()
                    {
                        self.retire(entity_type).await;
                        return;
                    }
                }
            }
        }

        info!(entity_type, %id, "Shutdown");
    }

    async fn dispatch(&mut self, msg: ResourceRequest<T>, context: &T::Context, entity_type: &str) {
        let id = &self.id;
        match msg {
            ResourceRequest::Get { respond_to } => {
                debug!(entity_type, %id, "Get");
                let _ = respond_to.send(Ok(self.entity.clone()));
            }
            ResourceRequest::Action { action, respond_to } => {
                debug!(entity_type, %id, ?action, "Action");
                let result = self
                    .entity
                    .handle_action(action, context)
                    .await
                    .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                match &result {
                    Ok(_) => info!(entity_type, %id, "Action ok"),
                    Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                }
                let _ = respond_to.send(result);
            }
        }
    }

    /// Unregisters the actor, then rejects whatever is still queued so callers retry elsewhere.
    async fn retire(&mut self, entity_type: &str) {
        if let Some(retirement) = self.retirement.take() {
            retirement.unregister(&self.id).await;
        }
        self.receiver.close();
        let mut rejected = 0usize;
        while let Some(msg) = self.receiver.recv().await {
            msg.reject(FrameworkError::ActorRetired);
            rejected += 1;
        }
        info!(entity_type, id = %self.id, rejected, "Retired");
    }
}
