//! Configuration for the reservation engine.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::framework::ActorSettings;
use crate::model::MAX_SEATS_PER_REQUEST;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationConfig {
    pub hold: HoldConfig,
    pub booking: BookingConfig,
}

/// Hold manager configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldConfig {
    /// TTL used when a request names none, in seconds (default: 30)
    pub default_ttl_secs: u64,
    /// Upper bound for requested TTLs, in seconds (default: 600)
    pub max_ttl_secs: u64,
    /// Period of the expiry sweep, in milliseconds (default: 1000)
    pub sweep_interval_ms: u64,
    /// How long a show's actor lingers without holds before retiring, in seconds (default: 60)
    pub idle_grace_secs: u64,
    /// Mailbox capacity of each show actor (default: 32)
    pub mailbox_size: usize,
}

/// Booking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Maximum seats in one hold request or booking (default: 6)
    pub max_seats_per_booking: usize,
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: 30,
            max_ttl_secs: 600,
            sweep_interval_ms: 1000,
            idle_grace_secs: 60,
            mailbox_size: 32,
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            max_seats_per_booking: MAX_SEATS_PER_REQUEST,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

impl ReservationConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let hold = HoldConfig::default();
        let booking = BookingConfig::default();
        Self {
            hold: HoldConfig {
                default_ttl_secs: env_or("HOLD_TTL_SECS", hold.default_ttl_secs),
                max_ttl_secs: env_or("HOLD_MAX_TTL_SECS", hold.max_ttl_secs),
                sweep_interval_ms: env_or("HOLD_SWEEP_INTERVAL_MS", hold.sweep_interval_ms),
                idle_grace_secs: env_or("HOLD_IDLE_GRACE_SECS", hold.idle_grace_secs),
                mailbox_size: env_or("HOLD_MAILBOX_SIZE", hold.mailbox_size),
            },
            booking: BookingConfig {
                max_seats_per_booking: env_or("MAX_SEATS_PER_BOOKING", booking.max_seats_per_booking),
            },
        }
    }
}

impl HoldConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn max_ttl(&self) -> Duration {
        Duration::from_secs(self.max_ttl_secs)
    }

    /// Settings for the per-show actors. Zero values are bumped to the smallest usable ones.
    pub fn actor_settings(&self) -> ActorSettings {
        ActorSettings {
            buffer_size: self.mailbox_size.max(1),
            tick_interval: Duration::from_millis(self.sweep_interval_ms.max(1)),
            idle_grace: Duration::from_secs(self.idle_grace_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReservationConfig::default();
        assert_eq!(config.hold.default_ttl(), Duration::from_secs(30));
        assert_eq!(config.hold.max_ttl(), Duration::from_secs(600));
        assert_eq!(config.booking.max_seats_per_booking, 6);

        let settings = config.hold.actor_settings();
        assert_eq!(settings.buffer_size, 32);
        assert_eq!(settings.tick_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_from_env_falls_back_on_invalid_values() {
        env::set_var("HOLD_MAILBOX_SIZE", "not-a-number");
        env::set_var("HOLD_IDLE_GRACE_SECS", "5");
        let config = ReservationConfig::from_env();
        env::remove_var("HOLD_MAILBOX_SIZE");
        env::remove_var("HOLD_IDLE_GRACE_SECS");

        assert_eq!(config.hold.mailbox_size, 32);
        assert_eq!(config.hold.idle_grace_secs, 5);
    }
}
