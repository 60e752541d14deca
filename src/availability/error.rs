//! Error types for availability queries.

use crate::model::ShowId;
use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AvailabilityError {
    /// The catalog does not know the show.
    #[error("Show not found: {0}")]
    ShowNotFound(ShowId),

    /// The catalog or booking store could not be read.
    #[error("Availability unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for AvailabilityError {
    fn from(e: StoreError) -> Self {
        AvailabilityError::Unavailable(e.to_string())
    }
}
