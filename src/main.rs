use chrono::{Duration, Utc};
use seat_reservation::booking::BookingError;
use seat_reservation::lifecycle::{setup_tracing, ReservationConfig, ReservationSystem};
use seat_reservation::model::{Show, ShowId};
use seat_reservation::store::{InMemoryBookingStore, InMemoryShowCatalog};
use std::sync::Arc;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting reservation demo");

    let show_id = ShowId(1);
    let catalog = InMemoryShowCatalog::with_shows([Show::new(
        show_id,
        "The Grand Budapest Hotel",
        Utc::now() + Duration::hours(3),
        12.5,
    )]);
    let system = ReservationSystem::new(
        ReservationConfig::from_env(),
        Arc::new(catalog),
        Arc::new(InMemoryBookingStore::new()),
    );

    let mut watcher = system.subscribe(show_id, "lobby-screen");

    // Alice holds two seats, Bob tries to grab one of them.
    let span = tracing::info_span!("holds");
    async {
        let alice = system
            .holds
            .request_hold(show_id, "alice", &["A1", "A2"], None)
            .await
            .map_err(|e| e.to_string())?;
        info!(granted = ?alice.granted(), "Alice holds seats");

        let bob = system
            .holds
            .request_hold(show_id, "bob", &["a1", "A3"], None)
            .await
            .map_err(|e| e.to_string())?;
        info!(results = ?bob.results, "Bob's hold request answered");
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    // Both race for A3; exactly one booking wins.
    let span = tracing::info_span!("booking");
    async {
        let (alice, bob) = tokio::join!(
            system.bookings.create_booking(show_id, "alice", &["A1", "A2", "A3"]),
            system.bookings.create_booking(show_id, "bob", &["A3"]),
        );
        for (user, result) in [("alice", alice), ("bob", bob)] {
            match result {
                Ok(booking) => info!(user, booking_id = %booking.id, total = booking.total_price, "Booked"),
                Err(BookingError::Conflict { conflicts }) => info!(user, ?conflicts, "Lost the race"),
                Err(e) => error!(user, error = %e, "Booking failed"),
            }
        }
    }
    .instrument(span)
    .await;

    let availability = system
        .seat_availability(show_id)
        .await
        .map_err(|e| e.to_string())?;
    info!(
        booked = ?availability.booked,
        held = ?availability.held,
        available = availability.available_seats,
        "Availability"
    );

    while let Some(event) = watcher.try_recv() {
        info!(event = %event.to_json().map_err(|e| e.to_string())?, "Broadcast");
    }

    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
