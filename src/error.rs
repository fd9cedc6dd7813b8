use thiserror::Error;

use crate::collision::BodyId;

/// Failures reported by a collision backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CollisionError {
    #[error("body {0:?} is locked and cannot be read")]
    BodyLocked(BodyId),
    #[error("body {0:?} does not exist")]
    UnknownBody(BodyId),
    #[error("capsule shape has a non-positive radius or negative height")]
    InvalidShape,
}

/// Failures surfaced by the player controller. Only `init` can fail; everything
/// that runs per tick degrades to a no-op instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("could not create the virtual character: {0}")]
    CharacterCreation(#[from] CollisionError),
}
