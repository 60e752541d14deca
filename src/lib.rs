//! # Seat Reservation Engine
//!
//! > **Per-show actors for soft seat holds, store transactions for hard bookings.**
//!
//! Many users browse the same show and pick seats at the same time. This crate lets them
//! hold seats while they decide, converts a selection into a booking that can never overlap
//! another one, and tells everybody watching the show what changed.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Two tiers of locking
//! - **Holds** are soft, expiring claims. They are owned by one actor per show, which makes
//!   every grant, release and expiry for that show sequential without any lock.
//! - **Bookings** are hard commitments. The booking store's per-show transaction, together
//!   with its unique `(show, seat)` check, is the only correctness boundary. Holds are never
//!   trusted when committing a booking.
//!
//! ### One actor per show
//! You'll see `ActorRegistry<ShowHolds>` in the hold client. The registry spawns a
//! `ResourceActor` the first time a show is touched and lets it retire once the show has had
//! no holds for a while, so idle shows cost nothing.
//!
//! ### Mocking: Testing without Pain
//! A show can be routed to a `MockClient` instead of a real actor, which makes failures of
//! the hold tier easy to inject. See the [`framework::mock`] module.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Each component owns a `thiserror` enum ([`model::SeatError`], [`store::StoreError`],
//! [`hold_actor::HoldError`], [`booking::BookingError`]). Actor entity errors travel boxed
//! through the framework and are downcast back by the hold client.
//!
//! ### 2. Async Context Injection
//! The hold actors receive their collaborators (availability aggregator and broadcaster)
//! through `run(context)`, not at construction time.
//!
//! ### 3. Observability
//! `tracing` everywhere with structured fields. See the [`lifecycle::tracing`] module.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! Generic per-key actors: mailbox, sequential loop, periodic tick, idle retirement.
//!
//! ### 2. The Data ([`model`], [`store`])
//! Seat labels and selection validation, shows, bookings, holds and events, plus the
//! catalog and booking store traits with in-memory implementations.
//!
//! ### 3. The Components ([`availability`], [`hold_actor`], [`booking`], [`broadcast`])
//! - [`AvailabilityAggregator`](availability::AvailabilityAggregator) derives booked seats from the store.
//! - [`ShowHolds`](model::ShowHolds) is the hold actor's entity.
//! - [`BookingCoordinator`](booking::BookingCoordinator) creates and cancels bookings.
//! - [`ShowBroadcaster`](broadcast::ShowBroadcaster) fans events out per show.
//!
//! ### 4. The Interface ([`clients`], [`lifecycle`])
//! [`HoldClient`](clients::HoldClient) wraps the registry; [`ReservationSystem`](lifecycle::ReservationSystem)
//! wires everything together and shuts it down.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo scenario with info logs
//! RUST_LOG=info cargo run
//!
//! # Run the tests
//! cargo test
//! ```

pub mod availability;
pub mod booking;
pub mod broadcast;
pub mod clients;
pub mod framework;
pub mod hold_actor;
pub mod lifecycle;
pub mod model;
pub mod store;
