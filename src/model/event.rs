use super::booking::BookingId;
use super::seat::SeatLabel;
use super::show::ShowId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why held seats became free again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnblockReason {
    Released,
    Expired,
    Disconnected,
}

/// State transition published on a show's topic.
///
/// Every payload is idempotent to apply: replaying an event leaves a client's seat map unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ShowEvent {
    SeatsBlocked {
        show_id: ShowId,
        holder_id: String,
        seats: Vec<SeatLabel>,
        expires_at: DateTime<Utc>,
    },
    SeatsUnblocked {
        show_id: ShowId,
        holder_id: String,
        seats: Vec<SeatLabel>,
        reason: UnblockReason,
    },
    BookingConfirmed {
        show_id: ShowId,
        booking_id: BookingId,
        seats: Vec<SeatLabel>,
    },
    BookingCancelled {
        show_id: ShowId,
        booking_id: BookingId,
        seats: Vec<SeatLabel>,
    },
}

impl ShowEvent {
    pub fn show_id(&self) -> ShowId {
        match self {
            ShowEvent::SeatsBlocked { show_id, .. }
            | ShowEvent::SeatsUnblocked { show_id, .. }
            | ShowEvent::BookingConfirmed { show_id, .. }
            | ShowEvent::BookingCancelled { show_id, .. } => *show_id,
        }
    }

    pub fn seats(&self) -> &[SeatLabel] {
        match self {
            ShowEvent::SeatsBlocked { seats, .. }
            | ShowEvent::SeatsUnblocked { seats, .. }
            | ShowEvent::BookingConfirmed { seats, .. }
            | ShowEvent::BookingCancelled { seats, .. } => seats,
        }
    }

    /// Wire name of the event, e.g. `seats-blocked`.
    pub fn name(&self) -> &'static str {
        match self {
            ShowEvent::SeatsBlocked { .. } => "seats-blocked",
            ShowEvent::SeatsUnblocked { .. } => "seats-unblocked",
            ShowEvent::BookingConfirmed { .. } => "booking-confirmed",
            ShowEvent::BookingCancelled { .. } => "booking-cancelled",
        }
    }

    /// JSON payload as delivered to transport subscribers.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
