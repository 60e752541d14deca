//! Error types for bookings.

use crate::availability::AvailabilityError;
use crate::model::{BookingId, SeatError, SeatLabel, ShowId};
use thiserror::Error;

/// Errors returned by the booking coordinator.
///
/// Storage faults are logged where they happen and surface only as [`BookingError::Unavailable`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BookingError {
    /// The seat selection failed validation; nothing reached the store.
    #[error("Invalid seat selection: {0}")]
    InvalidSelection(#[from] SeatError),

    #[error("Show not found: {0}")]
    ShowNotFound(ShowId),

    /// Some of the requested seats were booked first. Lists exactly the overlapping seats.
    #[error("Seats already booked: {}", format_seats(.conflicts))]
    Conflict { conflicts: Vec<SeatLabel> },

    #[error("Booking not found: {0}")]
    BookingNotFound(BookingId),

    /// Only the user who made a booking may cancel it.
    #[error("Booking {0} belongs to another user")]
    NotOwner(BookingId),

    #[error("Booking {0} is already cancelled")]
    AlreadyCancelled(BookingId),

    /// Transient storage failure. No partial booking was written.
    #[error("Booking service unavailable")]
    Unavailable,
}

fn format_seats(seats: &[SeatLabel]) -> String {
    seats.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

impl From<AvailabilityError> for BookingError {
    fn from(e: AvailabilityError) -> Self {
        match e {
            AvailabilityError::ShowNotFound(show_id) => BookingError::ShowNotFound(show_id),
            AvailabilityError::Unavailable(_) => BookingError::Unavailable,
        }
    }
}
