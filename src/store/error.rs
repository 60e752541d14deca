//! Error types for the storage collaborators.

use crate::model::SeatLabel;
use thiserror::Error;

/// Errors reported by the show catalog and the booking store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// A confirmed booking already owns one of the seats (unique `(show, seat)` violation).
    #[error("Seats already booked: {0:?}")]
    UniqueViolation(Vec<SeatLabel>),

    /// The referenced record does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// The write does not belong to the transaction's show.
    #[error("Write outside transaction scope: {0}")]
    OutOfScope(String),

    /// Transient storage fault; nothing was written.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
