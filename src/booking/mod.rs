//! # Booking Transaction Coordinator
//!
//! Turns a seat selection into a durable booking. The only correctness boundary is the
//! store's per-show transaction: inside it the booked set is recomputed from the visible
//! records, intersected with the request, and the booking is inserted and committed. Holds
//! are never consulted, so a stale or missing hold can not cause a double booking.
//!
//! Events are published only after a successful commit.

pub mod error;

pub use error::*;

use crate::availability::{AvailabilityAggregator, AvailabilityError};
use crate::broadcast::ShowBroadcaster;
use crate::clients::HoldClient;
use crate::model::{validate_selection, Booking, BookingId, SeatLabel, ShowEvent, ShowId};
use crate::store::{BookingStore, StoreError};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Creates and cancels bookings.
#[derive(Clone)]
pub struct BookingCoordinator {
    availability: AvailabilityAggregator,
    store: Arc<dyn BookingStore>,
    holds: HoldClient,
    broadcaster: ShowBroadcaster,
    max_seats: usize,
}

impl BookingCoordinator {
    pub fn new(
        availability: AvailabilityAggregator,
        store: Arc<dyn BookingStore>,
        holds: HoldClient,
        broadcaster: ShowBroadcaster,
        max_seats: usize,
    ) -> Self {
        Self {
            availability,
            store,
            holds,
            broadcaster,
            max_seats,
        }
    }

    /// Books `seats` for `user_id`, or reports exactly which of them were taken first.
    #[instrument(skip(self, seats))]
    pub async fn create_booking<S: AsRef<str>>(
        &self,
        show_id: ShowId,
        user_id: &str,
        seats: &[S],
    ) -> Result<Booking, BookingError> {
        let seats = validate_selection(seats, self.max_seats)?;
        debug!(?seats, "create_booking called");
        let show = self.availability.show(show_id).await.map_err(Self::availability_error)?;

        let mut tx = self.store.begin(show_id).await.map_err(Self::storage_error)?;
        let booked = AvailabilityAggregator::booked_from(&tx.bookings());
        let conflicts: Vec<SeatLabel> = seats.iter().filter(|s| booked.contains(*s)).copied().collect();
        if !conflicts.is_empty() {
            info!(?conflicts, "Booking rejected, seats already booked");
            return Err(BookingError::Conflict { conflicts });
        }

        let booking = Booking::confirmed(show_id, user_id, seats.iter().copied(), show.price_for(seats.len()));
        match tx.insert(booking.clone()) {
            Ok(()) => {}
            Err(StoreError::UniqueViolation(conflicts)) => {
                info!(?conflicts, "Booking rejected by unique seat constraint");
                return Err(BookingError::Conflict { conflicts });
            }
            Err(e) => return Err(Self::storage_error(e)),
        }
        tx.commit().await.map_err(Self::storage_error)?;
        info!(booking_id = %booking.id, total_price = booking.total_price, "Booking confirmed");

        let booked_seats: Vec<SeatLabel> = booking.seats.iter().copied().collect();
        // The booking stands even if the hold actor is unreachable; its holds expire on their own.
        if let Err(e) = self.holds.booking_committed(show_id, booked_seats.clone()).await {
            warn!(booking_id = %booking.id, error = %e, "Could not drop holds on booked seats");
        }
        self.broadcaster.publish(ShowEvent::BookingConfirmed {
            show_id,
            booking_id: booking.id,
            seats: booked_seats,
        });

        Ok(booking)
    }

    /// Cancels a confirmed booking owned by `user_id`, freeing its seats.
    #[instrument(skip(self))]
    pub async fn cancel_booking(&self, booking_id: BookingId, user_id: &str) -> Result<Booking, BookingError> {
        let existing = self
            .store
            .find(booking_id)
            .await
            .map_err(Self::storage_error)?
            .ok_or(BookingError::BookingNotFound(booking_id))?;
        if existing.user_id != user_id {
            return Err(BookingError::NotOwner(booking_id));
        }

        let mut tx = self.store.begin(existing.show_id).await.map_err(Self::storage_error)?;
        let current = tx
            .bookings()
            .into_iter()
            .find(|b| b.id == booking_id)
            .ok_or(BookingError::BookingNotFound(booking_id))?;
        if !current.is_confirmed() {
            return Err(BookingError::AlreadyCancelled(booking_id));
        }
        let cancelled = tx.cancel(booking_id).map_err(Self::storage_error)?;
        tx.commit().await.map_err(Self::storage_error)?;
        info!(show_id = %cancelled.show_id, "Booking cancelled");

        self.broadcaster.publish(ShowEvent::BookingCancelled {
            show_id: cancelled.show_id,
            booking_id,
            seats: cancelled.seats.iter().copied().collect(),
        });
        Ok(cancelled)
    }

    /// All bookings of `user_id`, newest first.
    pub async fn booking_history(&self, user_id: &str) -> Result<Vec<Booking>, BookingError> {
        self.store.bookings_for_user(user_id).await.map_err(Self::storage_error)
    }

    fn storage_error(e: StoreError) -> BookingError {
        warn!(error = %e, "Booking storage failure");
        BookingError::Unavailable
    }

    fn availability_error(e: AvailabilityError) -> BookingError {
        if let AvailabilityError::Unavailable(detail) = &e {
            warn!(%detail, "Show lookup failed");
        }
        e.into()
    }
}
