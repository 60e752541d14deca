use super::seat::SeatLabel;
use super::show::ShowId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Identifier of a durable booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub Uuid);

impl BookingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

/// A confirmed (or later cancelled) purchase of seats for one show.
///
/// Bookings are never deleted; the only mutation is `Confirmed -> Cancelled`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub show_id: ShowId,
    pub user_id: String,
    pub seats: BTreeSet<SeatLabel>,
    pub total_price: f64,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Creates a new confirmed booking stamped with the current time.
    pub fn confirmed(
        show_id: ShowId,
        user_id: impl Into<String>,
        seats: impl IntoIterator<Item = SeatLabel>,
        total_price: f64,
    ) -> Self {
        Self {
            id: BookingId::new(),
            show_id,
            user_id: user_id.into(),
            seats: seats.into_iter().collect(),
            total_price,
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }
}
