use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a show (one screening of a movie at a given time).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShowId(pub u64);

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "show_{}", self.0)
    }
}

impl From<u64> for ShowId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A show as provided by the catalog. Read-only for the reservation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: ShowId,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    /// Price of a single seat.
    pub price: f64,
}

impl Show {
    /// Creates a new Show instance.
    ///
    /// # Arguments
    /// * `id` - Catalog identifier
    /// * `title` - Movie title shown to users
    /// * `starts_at` - Start of the screening
    /// * `price` - Price per seat
    pub fn new(id: impl Into<ShowId>, title: impl Into<String>, starts_at: DateTime<Utc>, price: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            starts_at,
            price,
        }
    }

    /// Total price for `seats` seats.
    pub fn price_for(&self, seats: usize) -> f64 {
        self.price * seats as f64
    }
}
