//! # Observability & Tracing
//!
//! [`setup_tracing`] installs structured logging for the whole engine.
//!
//! The compact format hides the crate/module prefix (`with_target(false)`); every line
//! carries the structured fields of the operation instead (`show_id`, `holder_id`,
//! `booking_id`, `seats`), and spans opened by `#[instrument]` on the client entry points
//! appear inline.
//!
//! ## Usage
//!
//! ```bash
//! # State transitions only (holds granted/released/expired, bookings confirmed/cancelled)
//! RUST_LOG=info cargo run
//!
//! # Payloads, actor spawn/retire, per-event fan-out counts
//! RUST_LOG=debug cargo run
//!
//! # Only the actor framework
//! RUST_LOG=seat_reservation::framework=debug cargo run
//! ```
//!
//! ## Workflow Trace Example
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO hold:request_hold{show_id=ShowId(1) holder_id="alice" ttl=None}: Sending hold action to actor
//! INFO hold:request_hold{..}: Seats held show_id=show_1 holder_id=alice seats=[A1, A2]
//! INFO hold:request_hold{..}: Action ok show_1
//! INFO booking:create_booking{show_id=ShowId(1) user_id="alice"}: Booking confirmed booking_id=6f1c.. total_price=25.0
//! INFO Holds expired show_id=show_1 holder_id=bob seats=[B5]
//! ```
//!
//! **With `RUST_LOG=debug`** the same flow also shows the validated seats at each entry point,
//! the actor's `Action` dispatch, and `Published ... delivered=N` for every event.

/// Installs the global `tracing` subscriber, filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
