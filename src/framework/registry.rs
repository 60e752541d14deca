//! # Actor Registry
//!
//! Spawns one [`ResourceActor`] per key on first interest and routes requests to it.
//!
//! Actors unregister themselves when their entity has been idle past the grace period.
//! A request that races with a retiring actor is rejected *unprocessed*
//! ([`FrameworkError::ActorRetired`] or [`FrameworkError::ActorClosed`]) and transparently
//! resent to a freshly spawned actor, so callers never observe the retirement.

use super::actor::{ActorSettings, ResourceActor};
use super::client::ResourceClient;
use super::entity::ActorEntity;
use super::error::FrameworkError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// How many times a request is resent after landing on a retiring actor.
const MAX_ATTEMPTS: usize = 3;

struct ActorSlot<T: ActorEntity> {
    generation: u64,
    client: ResourceClient<T>,
    handle: Option<JoinHandle<()>>,
}

struct RegistryInner<T: ActorEntity> {
    actors: Mutex<HashMap<T::Id, ActorSlot<T>>>,
    context: T::Context,
    settings: ActorSettings,
    next_generation: AtomicU64,
}

/// Lets a spawned actor remove its own slot, provided the slot still belongs to it.
pub struct Retirement<T: ActorEntity> {
    registry: Weak<RegistryInner<T>>,
    generation: u64,
}

impl<T: ActorEntity> Retirement<T> {
    pub(crate) async fn unregister(&self, id: &T::Id) {
        let Some(inner) = self.registry.upgrade() else {
            return;
        };
        let mut actors = inner.actors.lock().await;
        if actors.get(id).is_some_and(|slot| slot.generation == self.generation) {
            actors.remove(id);
            debug!(%id, remaining = actors.len(), "Actor unregistered");
        }
    }
}

/// Owns the per-key actors of one entity type.
///
/// Cloning the registry is cheap; all clones route to the same actors.
pub struct ActorRegistry<T: ActorEntity> {
    inner: Arc<RegistryInner<T>>,
}

impl<T: ActorEntity> Clone for ActorRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> ActorRegistry<T>
where
    T: ActorEntity,
    T::Context: Clone,
{
    /// Creates an empty registry. Every actor it spawns receives a clone of `context`.
    pub fn new(settings: ActorSettings, context: T::Context) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                actors: Mutex::new(HashMap::new()),
                context,
                settings,
                next_generation: AtomicU64::new(1),
            }),
        }
    }

    /// Returns the client for `id`, spawning its actor if none is running.
    pub async fn client_for(&self, id: &T::Id) -> ResourceClient<T> {
        let mut actors = self.inner.actors.lock().await;
        if let Some(slot) = actors.get(id) {
            if !slot.client.is_closed() {
                return slot.client.clone();
            }
        }

        let generation = self.inner.next_generation.fetch_add(1, Ordering::SeqCst);
        let (actor, client) = ResourceActor::<T>::new(id.clone(), self.inner.settings);
        let actor = actor.with_retirement(Retirement {
            registry: Arc::downgrade(&self.inner),
            generation,
        });
        let handle = tokio::spawn(actor.run(self.inner.context.clone()));
        actors.insert(
            id.clone(),
            ActorSlot {
                generation,
                client: client.clone(),
                handle: Some(handle),
            },
        );
        debug!(%id, generation, active = actors.len(), "Actor spawned");
        client
    }

    /// Routes an action to the actor for `id`, resending it if the actor was retiring.
    pub async fn perform_action(
        &self,
        id: &T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError>
    where
        T::Action: Clone,
    {
        let mut attempt = 1;
        loop {
            let client = self.client_for(id).await;
            match client.perform_action(action.clone()).await {
                Err(e) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
                    debug!(%id, attempt, error = %e, "Resending to a fresh actor");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// Snapshot of the entity for `id`, or `None` when no actor is alive for it.
    ///
    /// Never spawns an actor.
    pub async fn get(&self, id: &T::Id) -> Result<Option<T>, FrameworkError> {
        let client = {
            let actors = self.inner.actors.lock().await;
            actors.get(id).map(|slot| slot.client.clone())
        };
        let Some(client) = client else {
            return Ok(None);
        };
        match client.get().await {
            Ok(entity) => Ok(Some(entity)),
            // A retired actor only ever held an idle entity.
            Err(e) if e.is_retryable() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Routes `id` to an externally driven client (e.g. a mock) instead of a spawned actor.
    pub async fn attach(&self, id: T::Id, client: ResourceClient<T>) {
        let generation = self.inner.next_generation.fetch_add(1, Ordering::SeqCst);
        let mut actors = self.inner.actors.lock().await;
        actors.insert(
            id,
            ActorSlot {
                generation,
                client,
                handle: None,
            },
        );
    }

    /// Number of keys that currently have a live actor.
    pub async fn active(&self) -> usize {
        let actors = self.inner.actors.lock().await;
        actors.values().filter(|slot| !slot.client.is_closed()).count()
    }

    /// Drops every client and waits for the spawned actors to finish.
    pub async fn shutdown(&self) -> Result<(), String> {
        let slots: Vec<ActorSlot<T>> = {
            let mut actors = self.inner.actors.lock().await;
            actors.drain().map(|(_, slot)| slot).collect()
        };
        info!(actors = slots.len(), "Stopping actors");

        let mut handles = Vec::with_capacity(slots.len());
        for slot in slots {
            drop(slot.client);
            handles.extend(slot.handle);
        }
        for handle in handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    #[derive(Clone, Debug, Default)]
    struct Counter {
        value: u32,
    }

    #[derive(Clone, Debug)]
    enum CounterAction {
        Add(u32),
        Reset,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("counter error")]
    struct CounterError;

    #[async_trait]
    impl ActorEntity for Counter {
        type Id = String;
        type Action = CounterAction;
        type ActionResult = u32;
        type Context = ();
        type Error = CounterError;

        fn from_id(_id: String) -> Self {
            Self::default()
        }

        async fn handle_action(&mut self, action: CounterAction, _ctx: &()) -> Result<u32, CounterError> {
            match action {
                CounterAction::Add(n) => self.value += n,
                CounterAction::Reset => self.value = 0,
            }
            Ok(self.value)
        }

        fn is_idle(&self) -> bool {
            self.value == 0
        }
    }

    fn settings() -> ActorSettings {
        ActorSettings {
            buffer_size: 8,
            tick_interval: Duration::from_millis(100),
            idle_grace: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn test_one_actor_per_key() {
        let registry = ActorRegistry::<Counter>::new(settings(), ());

        assert_eq!(registry.perform_action(&"a".into(), CounterAction::Add(2)).await.unwrap(), 2);
        assert_eq!(registry.perform_action(&"a".into(), CounterAction::Add(3)).await.unwrap(), 5);
        assert_eq!(registry.perform_action(&"b".into(), CounterAction::Add(1)).await.unwrap(), 1);
        assert_eq!(registry.active().await, 2);

        let a = registry.get(&"a".into()).await.unwrap().unwrap();
        assert_eq!(a.value, 5);
        assert!(registry.get(&"missing".into()).await.unwrap().is_none());
        assert_eq!(registry.active().await, 2, "get must not spawn actors");

        registry.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_actor_retires_and_respawns() {
        let registry = ActorRegistry::<Counter>::new(settings(), ());
        let key = "show".to_string();

        registry.perform_action(&key, CounterAction::Add(1)).await.unwrap();
        registry.perform_action(&key, CounterAction::Reset).await.unwrap();
        assert_eq!(registry.active().await, 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(registry.active().await, 0);
        assert!(registry.get(&key).await.unwrap().is_none());

        // A new request transparently lands on a fresh actor.
        assert_eq!(registry.perform_action(&key, CounterAction::Add(4)).await.unwrap(), 4);
        assert_eq!(registry.active().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_actor_is_kept() {
        let registry = ActorRegistry::<Counter>::new(settings(), ());
        let key = "busy".to_string();

        registry.perform_action(&key, CounterAction::Add(7)).await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(registry.active().await, 1);
        assert_eq!(registry.get(&key).await.unwrap().unwrap().value, 7);
    }
}
