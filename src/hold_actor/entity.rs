//! Entity trait implementation for the per-show hold set.
//!
//! This module contains the [`ActorEntity`] implementation that lets
//! [`ShowHolds`] be driven by the generic [`crate::framework::ResourceActor`]: one actor per
//! show, created on first interest and retired once the show has no holds left.
//!
//! Expired holds are swept lazily before every action and on every tick of the actor loop,
//! so a hold is never observed past its deadline by any operation on the show.

use super::actions::{HoldAction, HoldActionResult};
use super::error::HoldError;
use super::HoldContext;
use crate::framework::ActorEntity;
use crate::model::{HoldOutcome, HoldResponse, SeatHoldResult, SeatLabel, ShowEvent, ShowHolds, ShowId, UnblockReason};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

impl ShowHolds {
    /// Removes expired holds and announces them, grouped by their original holder.
    fn sweep(&mut self, ctx: &HoldContext, now: Instant) -> usize {
        let mut swept = 0;
        for (holder_id, seats) in self.take_expired(now) {
            swept += seats.len();
            info!(show_id = %self.show_id, %holder_id, ?seats, "Holds expired");
            ctx.broadcaster.publish(ShowEvent::SeatsUnblocked {
                show_id: self.show_id,
                holder_id,
                seats,
                reason: UnblockReason::Expired,
            });
        }
        swept
    }

    async fn request(
        &mut self,
        ctx: &HoldContext,
        holder_id: String,
        seats: Vec<SeatLabel>,
        ttl: Duration,
    ) -> Result<HoldResponse, HoldError> {
        let booked = ctx.availability.booked_seats(self.show_id).await?;

        let expires_at = Instant::now() + ttl;
        let expires_at_utc = Utc::now() + chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::zero());

        let mut results = Vec::with_capacity(seats.len());
        let mut granted = Vec::new();
        for seat in seats {
            let outcome = if booked.contains(&seat) {
                HoldOutcome::AlreadyBooked
            } else {
                self.try_hold(seat, &holder_id, expires_at, expires_at_utc)
            };
            if outcome == HoldOutcome::Granted {
                granted.push(seat);
            }
            results.push(SeatHoldResult { seat, outcome });
        }

        if !granted.is_empty() {
            info!(show_id = %self.show_id, %holder_id, seats = ?granted, "Seats held");
            ctx.broadcaster.publish(ShowEvent::SeatsBlocked {
                show_id: self.show_id,
                holder_id: holder_id.clone(),
                seats: granted,
                expires_at: expires_at_utc,
            });
        }

        Ok(HoldResponse {
            show_id: self.show_id,
            holder_id,
            expires_at: expires_at_utc,
            results,
        })
    }

    fn release_and_announce(
        &mut self,
        ctx: &HoldContext,
        holder_id: String,
        released: Vec<SeatLabel>,
        reason: UnblockReason,
    ) -> Vec<SeatLabel> {
        if !released.is_empty() {
            info!(show_id = %self.show_id, %holder_id, seats = ?released, ?reason, "Holds released");
            ctx.broadcaster.publish(ShowEvent::SeatsUnblocked {
                show_id: self.show_id,
                holder_id,
                seats: released.clone(),
                reason,
            });
        }
        released
    }
}

#[async_trait]
impl ActorEntity for ShowHolds {
    type Id = ShowId;
    type Action = HoldAction;
    type ActionResult = HoldActionResult;
    type Context = HoldContext;
    type Error = HoldError;

    fn from_id(id: ShowId) -> Self {
        ShowHolds::new(id)
    }

    /// Handles hold actions for one show.
    ///
    /// # Actions
    /// - `Request`: per seat `AlreadyBooked`, `HeldByOther` or `Granted`; publishes `seats-blocked`
    /// - `Release` / `ReleaseAll`: removes the caller's holds; publishes `seats-unblocked`
    /// - `BookingCommitted`: silently drops holds on newly booked seats
    /// - `Sweep`: reports how many holds had expired
    async fn handle_action(&mut self, action: HoldAction, ctx: &HoldContext) -> Result<HoldActionResult, HoldError> {
        let expired = self.sweep(ctx, Instant::now());

        match action {
            HoldAction::Request { holder_id, seats, ttl } => {
                self.request(ctx, holder_id, seats, ttl).await.map(HoldActionResult::Request)
            }
            HoldAction::Release { holder_id, seats } => {
                let released = self.release(&holder_id, &seats);
                Ok(HoldActionResult::Release(self.release_and_announce(
                    ctx,
                    holder_id,
                    released,
                    UnblockReason::Released,
                )))
            }
            HoldAction::ReleaseAll { holder_id } => {
                let released = self.release_all(&holder_id);
                Ok(HoldActionResult::ReleaseAll(self.release_and_announce(
                    ctx,
                    holder_id,
                    released,
                    UnblockReason::Disconnected,
                )))
            }
            HoldAction::BookingCommitted { seats } => {
                let dropped: usize = self.remove_seats(&seats).values().map(Vec::len).sum();
                debug!(show_id = %self.show_id, dropped, "Dropped holds on booked seats");
                Ok(HoldActionResult::BookingCommitted(dropped))
            }
            HoldAction::Sweep => Ok(HoldActionResult::Sweep(expired)),
        }
    }

    async fn on_tick(&mut self, ctx: &HoldContext) {
        self.sweep(ctx, Instant::now());
    }

    fn is_idle(&self) -> bool {
        self.is_empty()
    }
}
