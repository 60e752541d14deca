//! # Generic Messages
//!
//! This module defines the generic message types used for communication between
//! the `ResourceClient` and `ResourceActor`.

use super::entity::ActorEntity;
use super::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// Each actor owns a single entity, so messages carry no id:
///
/// - **Get**: Read a snapshot (clone) of the entity.
/// - **Action**: Execute a custom [`ActorEntity::Action`] against the entity.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Get {
        respond_to: Response<T>,
    },
    Action {
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

impl<T: ActorEntity> ResourceRequest<T> {
    /// Answers the request with `error` without touching the entity.
    pub(crate) fn reject(self, error: FrameworkError) {
        match self {
            ResourceRequest::Get { respond_to } => {
                let _ = respond_to.send(Err(error));
            }
            ResourceRequest::Action { respond_to, .. } => {
                let _ = respond_to.send(Err(error));
            }
        }
    }
}
