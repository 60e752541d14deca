use crate::framework::{ActorRegistry, FrameworkError};
use crate::hold_actor::{HoldAction, HoldActionResult, HoldError};
use crate::lifecycle::ReservationConfig;
use crate::model::{parse_labels, validate_selection, HoldResponse, SeatLabel, ShowHolds, ShowId};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

/// Shortest hold a client may ask for.
const MIN_TTL: Duration = Duration::from_secs(1);

/// Client for the per-show Hold actors.
///
/// Validates raw seat labels before anything reaches an actor and routes each request to the
/// actor of its show through the registry.
#[derive(Clone)]
pub struct HoldClient {
    registry: ActorRegistry<ShowHolds>,
    default_ttl: Duration,
    max_ttl: Duration,
    max_seats: usize,
}

impl HoldClient {
    pub fn new(registry: ActorRegistry<ShowHolds>, config: &ReservationConfig) -> Self {
        Self {
            registry,
            default_ttl: config.hold.default_ttl(),
            max_ttl: config.hold.max_ttl().max(MIN_TTL),
            max_seats: config.booking.max_seats_per_booking,
        }
    }

    /// The registry behind this client. Tests use it to attach mock actors.
    pub fn registry(&self) -> &ActorRegistry<ShowHolds> {
        &self.registry
    }

    /// Requested TTL clamped to `[1s, max_ttl]`, or the default TTL.
    pub fn effective_ttl(&self, requested: Option<Duration>) -> Duration {
        requested.unwrap_or(self.default_ttl).clamp(MIN_TTL, self.max_ttl)
    }

    /// Holds `seats` for `holder_id`, seat by seat.
    #[instrument(skip(self, seats))]
    pub async fn request_hold<S: AsRef<str>>(
        &self,
        show_id: ShowId,
        holder_id: &str,
        seats: &[S],
        ttl: Option<Duration>,
    ) -> Result<HoldResponse, HoldError> {
        let seats = validate_selection(seats, self.max_seats)?;
        let ttl = self.effective_ttl(ttl);
        debug!(?seats, ?ttl, "request_hold called");

        let action = HoldAction::Request {
            holder_id: holder_id.to_string(),
            seats,
            ttl,
        };
        match self.send(show_id, action).await? {
            HoldActionResult::Request(response) => Ok(response),
            other => Err(Self::unexpected(other)),
        }
    }

    /// Releases the listed seats held by `holder_id`. Seats held by others are left alone.
    ///
    /// Only label syntax is checked: repeats and selections larger than a single request are
    /// accepted so a holder can always give back everything it holds.
    #[instrument(skip(self, seats))]
    pub async fn release<S: AsRef<str>>(
        &self,
        show_id: ShowId,
        holder_id: &str,
        seats: &[S],
    ) -> Result<Vec<SeatLabel>, HoldError> {
        let seats = parse_labels(seats)?;
        let action = HoldAction::Release {
            holder_id: holder_id.to_string(),
            seats,
        };
        match self.send(show_id, action).await? {
            HoldActionResult::Release(released) => Ok(released),
            other => Err(Self::unexpected(other)),
        }
    }

    /// Releases every hold of `holder_id` on the show.
    #[instrument(skip(self))]
    pub async fn release_all(&self, show_id: ShowId, holder_id: &str) -> Result<Vec<SeatLabel>, HoldError> {
        let action = HoldAction::ReleaseAll {
            holder_id: holder_id.to_string(),
        };
        match self.send(show_id, action).await? {
            HoldActionResult::ReleaseAll(released) => Ok(released),
            other => Err(Self::unexpected(other)),
        }
    }

    /// Drops the holds on seats that were just booked.
    #[instrument(skip(self, seats))]
    pub async fn booking_committed(&self, show_id: ShowId, seats: Vec<SeatLabel>) -> Result<usize, HoldError> {
        match self.send(show_id, HoldAction::BookingCommitted { seats }).await? {
            HoldActionResult::BookingCommitted(dropped) => Ok(dropped),
            other => Err(Self::unexpected(other)),
        }
    }

    /// Forces an expiry sweep on the show. Returns how many holds expired.
    pub async fn sweep(&self, show_id: ShowId) -> Result<usize, HoldError> {
        match self.send(show_id, HoldAction::Sweep).await? {
            HoldActionResult::Sweep(expired) => Ok(expired),
            other => Err(Self::unexpected(other)),
        }
    }

    /// Unexpired holds of the show, in grid order. Never spawns an actor.
    pub async fn held_seats(&self, show_id: ShowId) -> Result<Vec<SeatLabel>, HoldError> {
        let snapshot = self.registry.get(&show_id).await.map_err(Self::map_error)?;
        Ok(snapshot
            .map(|mut holds| {
                holds.take_expired(Instant::now());
                holds.held_seats()
            })
            .unwrap_or_default())
    }

    /// Number of shows with a live hold actor.
    pub async fn active_shows(&self) -> usize {
        self.registry.active().await
    }

    pub async fn shutdown(&self) -> Result<(), String> {
        self.registry.shutdown().await
    }

    async fn send(&self, show_id: ShowId, action: HoldAction) -> Result<HoldActionResult, HoldError> {
        info!(%show_id, "Sending hold action to actor");
        self.registry
            .perform_action(&show_id, action)
            .await
            .map_err(Self::map_error)
    }

    /// Map framework errors back to the Hold actor's own error type.
    fn map_error(e: FrameworkError) -> HoldError {
        match e {
            FrameworkError::EntityError(inner) => match inner.downcast::<HoldError>() {
                Ok(hold_error) => *hold_error,
                Err(other) => HoldError::ActorCommunicationError(other.to_string()),
            },
            other => HoldError::ActorCommunicationError(other.to_string()),
        }
    }

    fn unexpected(result: HoldActionResult) -> HoldError {
        HoldError::ActorCommunicationError(format!("Unexpected result: {:?}", result))
    }
}
