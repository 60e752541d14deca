//! Pure data structures: seats, shows, bookings, holds and the events describing their changes.

pub mod booking;
pub mod event;
pub mod hold;
pub mod seat;
pub mod show;

pub use booking::*;
pub use event::*;
pub use hold::*;
pub use seat::*;
pub use show::*;
