//! Wiring, configuration and observability of the reservation engine.

pub mod config;
pub mod reservation_system;
pub mod tracing;

pub use config::*;
pub use reservation_system::*;
pub use self::tracing::setup_tracing;
