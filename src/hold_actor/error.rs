//! Error types for the Hold actor.

use crate::availability::AvailabilityError;
use crate::model::{SeatError, ShowId};
use thiserror::Error;

/// Errors that can occur during hold operations.
///
/// Contention (`HeldByOther`, `AlreadyBooked`) is not an error; it is reported per seat in
/// the [`HoldResponse`](crate::model::HoldResponse).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HoldError {
    /// The requested show does not exist.
    #[error("Show not found: {0}")]
    ShowNotFound(ShowId),

    /// The seat selection failed validation.
    #[error("Invalid seat selection: {0}")]
    InvalidSelection(#[from] SeatError),

    /// The booked set could not be read, so nothing was granted.
    #[error("Hold state unavailable: {0}")]
    Unavailable(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<AvailabilityError> for HoldError {
    fn from(e: AvailabilityError) -> Self {
        match e {
            AvailabilityError::ShowNotFound(show_id) => HoldError::ShowNotFound(show_id),
            AvailabilityError::Unavailable(msg) => HoldError::Unavailable(msg),
        }
    }
}
