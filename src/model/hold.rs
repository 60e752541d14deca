//! Per-show hold state.
//!
//! # Actor Framework
//! [`ShowHolds`] implements the [`ActorEntity`](crate::framework::ActorEntity) trait, so one
//! [`ResourceActor`](crate::framework::ResourceActor) owns the holds of exactly one show and
//! applies every change to them sequentially.
//!
//! See [`impl ActorEntity for ShowHolds`](crate::hold_actor::entity) for the actions it handles.

use super::seat::SeatLabel;
use super::show::ShowId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tokio::time::Instant;

/// A time-bounded claim of one seat by one holder.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatHold {
    pub holder_id: String,
    /// Monotonic deadline used for expiry.
    pub expires_at: Instant,
    /// Wall-clock deadline reported to clients.
    pub expires_at_utc: DateTime<Utc>,
}

/// Outcome of a hold request for a single seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HoldOutcome {
    /// The seat is now held by the requester (new hold or refreshed).
    Granted,
    /// The seat belongs to a confirmed booking.
    AlreadyBooked,
    /// Another holder has an unexpired hold on the seat.
    HeldByOther,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatHoldResult {
    pub seat: SeatLabel,
    pub outcome: HoldOutcome,
}

/// Per-seat answer to a hold request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldResponse {
    pub show_id: ShowId,
    pub holder_id: String,
    /// Deadline of the holds granted by this request.
    pub expires_at: DateTime<Utc>,
    pub results: Vec<SeatHoldResult>,
}

impl HoldResponse {
    /// Seats that were granted (or refreshed) by the request.
    pub fn granted(&self) -> Vec<SeatLabel> {
        self.seats_with(HoldOutcome::Granted)
    }

    pub fn seats_with(&self, outcome: HoldOutcome) -> Vec<SeatLabel> {
        self.results
            .iter()
            .filter(|r| r.outcome == outcome)
            .map(|r| r.seat)
            .collect()
    }

    pub fn outcome_of(&self, seat: SeatLabel) -> Option<HoldOutcome> {
        self.results.iter().find(|r| r.seat == seat).map(|r| r.outcome)
    }
}

/// The holds of one show, keyed by seat. At most one hold per seat.
#[derive(Debug, Clone)]
pub struct ShowHolds {
    pub show_id: ShowId,
    holds: HashMap<SeatLabel, SeatHold>,
}

impl ShowHolds {
    pub fn new(show_id: ShowId) -> Self {
        Self {
            show_id,
            holds: HashMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.holds.is_empty()
    }

    pub fn len(&self) -> usize {
        self.holds.len()
    }

    pub fn get(&self, seat: &SeatLabel) -> Option<&SeatHold> {
        self.holds.get(seat)
    }

    /// Holder of `seat`, if it is held.
    pub fn holder_of(&self, seat: &SeatLabel) -> Option<&str> {
        self.holds.get(seat).map(|hold| hold.holder_id.as_str())
    }

    /// All held seats in grid order.
    pub fn held_seats(&self) -> Vec<SeatLabel> {
        let mut seats: Vec<SeatLabel> = self.holds.keys().copied().collect();
        seats.sort();
        seats
    }

    /// Seats held by `holder_id`, in grid order.
    pub fn seats_held_by(&self, holder_id: &str) -> Vec<SeatLabel> {
        let mut seats: Vec<SeatLabel> = self
            .holds
            .iter()
            .filter(|(_, hold)| hold.holder_id == holder_id)
            .map(|(seat, _)| *seat)
            .collect();
        seats.sort();
        seats
    }

    /// Grants or refreshes a hold unless another holder owns the seat.
    ///
    /// Does not know about bookings; callers check those first.
    pub fn try_hold(&mut self, seat: SeatLabel, holder_id: &str, expires_at: Instant, expires_at_utc: DateTime<Utc>) -> HoldOutcome {
        match self.holds.get_mut(&seat) {
            Some(existing) if existing.holder_id != holder_id => HoldOutcome::HeldByOther,
            Some(existing) => {
                existing.expires_at = expires_at;
                existing.expires_at_utc = expires_at_utc;
                HoldOutcome::Granted
            }
            None => {
                self.holds.insert(
                    seat,
                    SeatHold {
                        holder_id: holder_id.to_string(),
                        expires_at,
                        expires_at_utc,
                    },
                );
                HoldOutcome::Granted
            }
        }
    }

    /// Removes the holds `holder_id` owns among `seats`. Seats held by others are untouched.
    pub fn release(&mut self, holder_id: &str, seats: &[SeatLabel]) -> Vec<SeatLabel> {
        let mut released = Vec::new();
        for seat in seats {
            if self.holder_of(seat) == Some(holder_id) {
                self.holds.remove(seat);
                released.push(*seat);
            }
        }
        released.sort();
        released.dedup();
        released
    }

    /// Removes every hold owned by `holder_id`.
    pub fn release_all(&mut self, holder_id: &str) -> Vec<SeatLabel> {
        let seats = self.seats_held_by(holder_id);
        self.release(holder_id, &seats)
    }

    /// Removes the holds on `seats` whoever owns them, grouped by holder.
    pub fn remove_seats(&mut self, seats: &[SeatLabel]) -> BTreeMap<String, Vec<SeatLabel>> {
        let mut removed: BTreeMap<String, Vec<SeatLabel>> = BTreeMap::new();
        for seat in seats {
            if let Some(hold) = self.holds.remove(seat) {
                removed.entry(hold.holder_id).or_default().push(*seat);
            }
        }
        removed
    }

    /// Removes every hold whose deadline is not after `now`, grouped by holder.
    pub fn take_expired(&mut self, now: Instant) -> BTreeMap<String, Vec<SeatLabel>> {
        let mut expired: Vec<SeatLabel> = self
            .holds
            .iter()
            .filter(|(_, hold)| hold.expires_at <= now)
            .map(|(seat, _)| *seat)
            .collect();
        expired.sort();
        self.remove_seats(&expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn seat(raw: &str) -> SeatLabel {
        raw.parse().unwrap()
    }

    #[test]
    fn test_hold_exclusivity_and_refresh() {
        let now = Instant::now();
        let mut holds = ShowHolds::new(ShowId(1));

        assert_eq!(holds.try_hold(seat("A1"), "alice", now + Duration::from_secs(30), Utc::now()), HoldOutcome::Granted);
        assert_eq!(holds.try_hold(seat("A1"), "bob", now + Duration::from_secs(30), Utc::now()), HoldOutcome::HeldByOther);

        let later = now + Duration::from_secs(60);
        assert_eq!(holds.try_hold(seat("A1"), "alice", later, Utc::now()), HoldOutcome::Granted);
        assert_eq!(holds.get(&seat("A1")).unwrap().expires_at, later);
        assert_eq!(holds.len(), 1);
    }

    #[test]
    fn test_release_is_idempotent_and_owner_scoped() {
        let deadline = Instant::now() + Duration::from_secs(30);
        let mut holds = ShowHolds::new(ShowId(1));
        holds.try_hold(seat("A1"), "alice", deadline, Utc::now());
        holds.try_hold(seat("A2"), "bob", deadline, Utc::now());

        assert!(holds.release("bob", &[seat("A1")]).is_empty());
        assert_eq!(holds.release("alice", &[seat("A1"), seat("A1")]), vec![seat("A1")]);
        assert!(holds.release("alice", &[seat("A1")]).is_empty());
        assert_eq!(holds.holder_of(&seat("A2")), Some("bob"));
    }

    #[test]
    fn test_take_expired_groups_by_holder() {
        let now = Instant::now();
        let mut holds = ShowHolds::new(ShowId(1));
        holds.try_hold(seat("B5"), "alice", now, Utc::now());
        holds.try_hold(seat("B6"), "alice", now, Utc::now());
        holds.try_hold(seat("C1"), "bob", now + Duration::from_secs(10), Utc::now());

        let expired = holds.take_expired(now);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired["alice"], vec![seat("B5"), seat("B6")]);
        assert_eq!(holds.held_seats(), vec![seat("C1")]);
    }
}
