//! Storage collaborators: the show catalog and the transactional booking store.
//!
//! Both are traits so a database-backed implementation can replace the in-memory ones
//! without touching the reservation logic.

pub mod bookings;
pub mod catalog;
pub mod error;

pub use bookings::*;
pub use catalog::*;
pub use error::*;
