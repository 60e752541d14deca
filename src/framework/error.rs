//! # Framework Errors
//!
//! Common error types used throughout the actor framework, so that every client handles
//! transport failures the same way.

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    /// The actor was retiring and rejected the request without processing it.
    #[error("Actor retired before handling the request")]
    ActorRetired,
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// True when the request never reached a live actor and may be resent safely.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FrameworkError::ActorClosed | FrameworkError::ActorRetired)
    }
}
