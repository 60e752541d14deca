//! Custom actions for the Hold actor.
//!
//! This module defines the operations that can be performed on the
//! [`ShowHolds`](crate::model::ShowHolds) of one show. They are handled sequentially by
//! [`ActorEntity::handle_action`](crate::framework::ActorEntity::handle_action), which makes
//! the actor the single writer of that show's holds.

use crate::model::{HoldResponse, SeatLabel};
use std::time::Duration;

/// Operations on the holds of one show.
///
/// Seats are already validated and canonical when an action is built.
#[derive(Debug, Clone)]
pub enum HoldAction {
    /// Grants or refreshes holds seat by seat. Partial success is allowed.
    Request {
        holder_id: String,
        seats: Vec<SeatLabel>,
        ttl: Duration,
    },
    /// Releases the listed seats if `holder_id` holds them.
    Release { holder_id: String, seats: Vec<SeatLabel> },
    /// Releases every hold of `holder_id` (disconnect).
    ReleaseAll { holder_id: String },
    /// Drops every hold on seats that just became booked, whoever holds them.
    BookingCommitted { seats: Vec<SeatLabel> },
    /// Removes expired holds.
    Sweep,
}

/// Results from HoldActions, one variant per action.
#[derive(Debug, Clone, PartialEq)]
pub enum HoldActionResult {
    Request(HoldResponse),
    Release(Vec<SeatLabel>),
    ReleaseAll(Vec<SeatLabel>),
    /// Number of holds dropped.
    BookingCommitted(usize),
    /// Number of holds that had expired.
    Sweep(usize),
}
