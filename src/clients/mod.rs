//! Type-safe wrappers around [`ActorRegistry`](crate::framework::ActorRegistry).

pub mod hold_client;

pub use hold_client::*;
