//! Hold-specific resource logic: one actor per show owns that show's seat holds.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::availability::AvailabilityAggregator;
use crate::broadcast::ShowBroadcaster;
use crate::clients::HoldClient;
use crate::framework::ActorRegistry;
use crate::lifecycle::ReservationConfig;

/// Collaborators injected into every hold actor.
#[derive(Clone)]
pub struct HoldContext {
    pub availability: AvailabilityAggregator,
    pub broadcaster: ShowBroadcaster,
}

/// Creates the hold actor registry and its client.
///
/// Actors are spawned lazily, per show, on the first request that needs one.
pub fn new(config: &ReservationConfig, context: HoldContext) -> HoldClient {
    let registry = ActorRegistry::new(config.hold.actor_settings(), context);
    HoldClient::new(registry, config)
}
