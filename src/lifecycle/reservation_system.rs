use super::config::ReservationConfig;
use crate::availability::{AvailabilityAggregator, AvailabilityError, SeatAvailability};
use crate::booking::BookingCoordinator;
use crate::broadcast::{ShowBroadcaster, Subscription};
use crate::clients::HoldClient;
use crate::hold_actor::{HoldContext, HoldError};
use crate::model::{SeatLabel, ShowId};
use crate::store::{BookingStore, ShowCatalog};
use std::sync::Arc;
use tracing::{info, warn};

/// The runtime orchestrator of the reservation engine.
///
/// `ReservationSystem` is responsible for:
/// - **Dependency Wiring**: the hold actors and the booking coordinator share one
///   availability aggregator and one broadcaster
/// - **Lifecycle Management**: hold actors are spawned per show on demand and stopped by
///   [`ReservationSystem::shutdown`]
///
/// # Example
///
/// ```ignore
/// let system = ReservationSystem::new(ReservationConfig::from_env(), catalog, store);
///
/// let mut events = system.subscribe(show_id, "conn-1");
/// let response = system.holds.request_hold(show_id, "alice", &["A1", "A2"], None).await?;
/// let booking = system.bookings.create_booking(show_id, "alice", &["A1", "A2"]).await?;
///
/// system.shutdown().await?;
/// ```
pub struct ReservationSystem {
    /// Client for the per-show Hold actors
    pub holds: HoldClient,

    /// Creates, cancels and lists bookings
    pub bookings: BookingCoordinator,

    /// Read-only availability over the catalog and the booking store
    pub availability: AvailabilityAggregator,

    /// Per-show event fan-out
    pub broadcaster: ShowBroadcaster,
}

impl ReservationSystem {
    /// Wires every component over the given catalog and booking store.
    ///
    /// No actor runs yet; the first hold request for a show spawns that show's actor.
    pub fn new(config: ReservationConfig, catalog: Arc<dyn ShowCatalog>, store: Arc<dyn BookingStore>) -> Self {
        let availability = AvailabilityAggregator::new(catalog, Arc::clone(&store));
        let broadcaster = ShowBroadcaster::new();

        let holds = crate::hold_actor::new(
            &config,
            HoldContext {
                availability: availability.clone(),
                broadcaster: broadcaster.clone(),
            },
        );
        let bookings = BookingCoordinator::new(
            availability.clone(),
            store,
            holds.clone(),
            broadcaster.clone(),
            config.booking.max_seats_per_booking,
        );

        info!(?config, "Reservation system ready");
        Self {
            holds,
            bookings,
            availability,
            broadcaster,
        }
    }

    /// Booked and held seats of a show with its seat map.
    ///
    /// Hold state is advisory; if the show's actor cannot be reached the summary is still
    /// returned without holds.
    pub async fn seat_availability(&self, show_id: ShowId) -> Result<SeatAvailability, AvailabilityError> {
        let held = match self.holds.held_seats(show_id).await {
            Ok(held) => held,
            Err(e) => {
                warn!(%show_id, error = %e, "Hold snapshot unavailable");
                Vec::new()
            }
        };
        self.availability.availability(show_id, held).await
    }

    /// Disconnect hook: releases every hold of `holder_id` on the show.
    pub async fn disconnect(&self, show_id: ShowId, holder_id: &str) -> Result<Vec<SeatLabel>, HoldError> {
        info!(%show_id, %holder_id, "Holder disconnected");
        self.holds.release_all(show_id, holder_id).await
    }

    /// Ordered event stream of a show for `subscriber_id`.
    pub fn subscribe(&self, show_id: ShowId, subscriber_id: impl Into<String>) -> Subscription {
        self.broadcaster.subscribe(show_id, subscriber_id)
    }

    pub fn unsubscribe(&self, show_id: ShowId, subscriber_id: &str) -> bool {
        self.broadcaster.unsubscribe(show_id, subscriber_id)
    }

    /// Gracefully shuts down the system.
    ///
    /// Stops every hold actor and waits for its task to finish. Holds are ephemeral and are
    /// lost; bookings are untouched.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if all actors shut down cleanly
    /// - `Err(String)` if any actor task failed or panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        self.holds.shutdown().await?;
        info!("System shutdown complete.");
        Ok(())
    }
}
