//! # Availability Aggregator
//!
//! Derives the authoritative booked set of a show from the durable booking records. Nothing
//! is cached: every call reads the store, so the answer is as fresh as the last commit.
//!
//! The same derivation ([`AvailabilityAggregator::booked_from`]) is applied by the booking
//! coordinator to the records visible inside its transaction, which is what makes the
//! commit-time re-validation authoritative.

pub mod error;

pub use error::*;

use crate::model::{Booking, SeatLabel, Show, ShowId, CAPACITY};
use crate::store::{BookingStore, ShowCatalog};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// One cell of the seat map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatCell {
    pub label: SeatLabel,
    /// Not covered by a confirmed booking.
    pub available: bool,
    /// Currently held by some user. Advisory.
    pub held: bool,
}

/// The cells of one grid row, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRow {
    pub row: char,
    pub seats: Vec<SeatCell>,
}

/// Availability of a show as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatAvailability {
    pub show: Show,
    pub booked: Vec<SeatLabel>,
    pub held: Vec<SeatLabel>,
    pub total_booked_seats: usize,
    pub available_seats: usize,
    pub seat_map: Vec<SeatRow>,
}

/// Read-only view over the catalog and the booking store.
#[derive(Clone)]
pub struct AvailabilityAggregator {
    catalog: Arc<dyn ShowCatalog>,
    store: Arc<dyn BookingStore>,
}

impl AvailabilityAggregator {
    pub fn new(catalog: Arc<dyn ShowCatalog>, store: Arc<dyn BookingStore>) -> Self {
        Self { catalog, store }
    }

    pub async fn show(&self, show_id: ShowId) -> Result<Show, AvailabilityError> {
        self.catalog
            .get_show(show_id)
            .await?
            .ok_or(AvailabilityError::ShowNotFound(show_id))
    }

    /// Union of the seats of every confirmed booking of the show.
    pub async fn booked_seats(&self, show_id: ShowId) -> Result<BTreeSet<SeatLabel>, AvailabilityError> {
        self.show(show_id).await?;
        let bookings = self.store.bookings_for_show(show_id).await?;
        let booked = Self::booked_from(&bookings);
        debug!(%show_id, booked = booked.len(), "Computed booked seats");
        Ok(booked)
    }

    /// Booked set derived from an arbitrary list of records, e.g. those visible in a transaction.
    pub fn booked_from(bookings: &[Booking]) -> BTreeSet<SeatLabel> {
        bookings
            .iter()
            .filter(|b| b.is_confirmed())
            .flat_map(|b| b.seats.iter().copied())
            .collect()
    }

    /// All cells of the grid grouped by row, with `available = not booked`.
    pub async fn seat_map(&self, show_id: ShowId) -> Result<Vec<SeatRow>, AvailabilityError> {
        let booked = self.booked_seats(show_id).await?;
        Ok(Self::seat_map_from(&booked, &BTreeSet::new()))
    }

    pub fn seat_map_from(booked: &BTreeSet<SeatLabel>, held: &BTreeSet<SeatLabel>) -> Vec<SeatRow> {
        let mut rows: Vec<SeatRow> = Vec::new();
        for label in SeatLabel::all() {
            let cell = SeatCell {
                label,
                available: !booked.contains(&label),
                held: held.contains(&label),
            };
            match rows.last_mut() {
                Some(row) if row.row == label.row_letter() => row.seats.push(cell),
                _ => rows.push(SeatRow {
                    row: label.row_letter(),
                    seats: vec![cell],
                }),
            }
        }
        rows
    }

    /// Full availability summary. `held` is the hold snapshot supplied by the caller.
    pub async fn availability(
        &self,
        show_id: ShowId,
        held: impl IntoIterator<Item = SeatLabel>,
    ) -> Result<SeatAvailability, AvailabilityError> {
        let show = self.show(show_id).await?;
        let bookings = self.store.bookings_for_show(show_id).await?;
        let booked = Self::booked_from(&bookings);
        // A booked seat is never reported as held.
        let held: BTreeSet<SeatLabel> = held.into_iter().filter(|s| !booked.contains(s)).collect();

        Ok(SeatAvailability {
            show,
            seat_map: Self::seat_map_from(&booked, &held),
            total_booked_seats: booked.len(),
            available_seats: CAPACITY - booked.len(),
            booked: booked.into_iter().collect(),
            held: held.into_iter().collect(),
        })
    }
}
