//! Durable booking storage.
//!
//! The store is the single source of truth for which seats are sold. Its per-show
//! transaction is the mutual-exclusion primitive of the whole engine: while a
//! [`ShowTransaction`] is open, no other transaction on the same show can observe or change
//! that show's bookings, and nothing becomes visible until [`ShowTransaction::commit`]
//! succeeds. Dropping a transaction rolls it back.

use super::error::StoreError;
use crate::model::{Booking, BookingId, BookingStatus, SeatLabel, ShowId};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock as StdRwLock};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, warn};

#[async_trait]
pub trait BookingStore: Send + Sync + 'static {
    /// Opens a transaction scoped to `show_id`, waiting for any other open one on that show.
    async fn begin(&self, show_id: ShowId) -> Result<Box<dyn ShowTransaction>, StoreError>;

    /// Committed bookings of a show, in creation order.
    async fn bookings_for_show(&self, show_id: ShowId) -> Result<Vec<Booking>, StoreError>;

    /// Committed bookings of a user across all shows, newest first.
    async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError>;

    async fn find(&self, id: BookingId) -> Result<Option<Booking>, StoreError>;
}

/// Serializable unit of work over the bookings of one show.
#[async_trait]
pub trait ShowTransaction: Send {
    fn show_id(&self) -> ShowId;

    /// Every booking of the show as seen by this transaction, including its own writes.
    fn bookings(&self) -> Vec<Booking>;

    /// Inserts a booking unless one of its seats belongs to a confirmed booking.
    fn insert(&mut self, booking: Booking) -> Result<(), StoreError>;

    /// Marks a booking as cancelled and returns the updated record.
    fn cancel(&mut self, id: BookingId) -> Result<Booking, StoreError>;

    /// Makes every write of the transaction visible at once, or none of them.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// One show's bookings as last committed, plus the lock an open transaction holds.
///
/// Readers only ever touch `committed`, so they never wait for a transaction.
#[derive(Debug, Default)]
struct ShowLedger {
    writer: Arc<Mutex<()>>,
    committed: StdRwLock<Vec<Booking>>,
}

impl ShowLedger {
    fn snapshot(&self) -> Vec<Booking> {
        self.committed.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

type Ledger = Arc<ShowLedger>;

/// Booking store kept in memory, with one lock per show.
///
/// Transactions on different shows never wait for each other, and reads never wait for
/// any transaction.
#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    ledgers: RwLock<HashMap<ShowId, Ledger>>,
    failing_commits: Arc<AtomicUsize>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` commits fail with [`StoreError::Unavailable`].
    pub fn fail_next_commits(&self, count: usize) {
        self.failing_commits.store(count, Ordering::SeqCst);
    }

    async fn ledger(&self, show_id: ShowId) -> Ledger {
        if let Some(ledger) = self.ledgers.read().await.get(&show_id) {
            return Arc::clone(ledger);
        }
        let mut ledgers = self.ledgers.write().await;
        Arc::clone(ledgers.entry(show_id).or_default())
    }

    async fn all_ledgers(&self) -> Vec<Ledger> {
        self.ledgers.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn begin(&self, show_id: ShowId) -> Result<Box<dyn ShowTransaction>, StoreError> {
        let ledger = self.ledger(show_id).await;
        let writer = Arc::clone(&ledger.writer).lock_owned().await;
        let working = ledger.snapshot();
        Ok(Box::new(InMemoryTransaction {
            show_id,
            ledger,
            _writer: writer,
            working,
            failing_commits: Arc::clone(&self.failing_commits),
        }))
    }

    async fn bookings_for_show(&self, show_id: ShowId) -> Result<Vec<Booking>, StoreError> {
        let ledgers = self.ledgers.read().await;
        Ok(ledgers.get(&show_id).map(|l| l.snapshot()).unwrap_or_default())
    }

    async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError> {
        let mut found: Vec<Booking> = self
            .all_ledgers()
            .await
            .iter()
            .flat_map(|ledger| ledger.snapshot())
            .filter(|b| b.user_id == user_id)
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find(&self, id: BookingId) -> Result<Option<Booking>, StoreError> {
        Ok(self
            .all_ledgers()
            .await
            .iter()
            .find_map(|ledger| ledger.snapshot().into_iter().find(|b| b.id == id)))
    }
}

struct InMemoryTransaction {
    show_id: ShowId,
    ledger: Ledger,
    _writer: OwnedMutexGuard<()>,
    working: Vec<Booking>,
    failing_commits: Arc<AtomicUsize>,
}

impl InMemoryTransaction {
    fn confirmed_seats(&self) -> BTreeSet<SeatLabel> {
        self.working
            .iter()
            .filter(|b| b.is_confirmed())
            .flat_map(|b| b.seats.iter().copied())
            .collect()
    }
}

#[async_trait]
impl ShowTransaction for InMemoryTransaction {
    fn show_id(&self) -> ShowId {
        self.show_id
    }

    fn bookings(&self) -> Vec<Booking> {
        self.working.clone()
    }

    fn insert(&mut self, booking: Booking) -> Result<(), StoreError> {
        if booking.show_id != self.show_id {
            return Err(StoreError::OutOfScope(format!(
                "booking for {} in transaction for {}",
                booking.show_id, self.show_id
            )));
        }
        if booking.is_confirmed() {
            let taken = self.confirmed_seats();
            let clashes: Vec<SeatLabel> = booking.seats.intersection(&taken).copied().collect();
            if !clashes.is_empty() {
                return Err(StoreError::UniqueViolation(clashes));
            }
        }
        self.working.push(booking);
        Ok(())
    }

    fn cancel(&mut self, id: BookingId) -> Result<Booking, StoreError> {
        let booking = self
            .working
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        booking.status = BookingStatus::Cancelled;
        Ok(booking.clone())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let this = *self;
        let injected = this
            .failing_commits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            warn!(show_id = %this.show_id, "Commit failed, rolling back");
            return Err(StoreError::Unavailable("commit failed".to_string()));
        }

        let count = this.working.len();
        *this.ledger.committed.write().unwrap_or_else(|e| e.into_inner()) = this.working;
        debug!(show_id = %this.show_id, bookings = count, "Committed");
        Ok(())
    }
}
