//! Error types for the session module

use thiserror::Error;

use crate::game::{entities::ParticipantId, state_machine::GameError};

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Session driver errors
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SessionError {
    /// The actor has stopped
    #[error("session is closed")]
    Closed,

    /// The state machine refused the submission
    #[error(transparent)]
    Rejected(#[from] GameError),

    /// Automated seats only act through the generator
    #[error("{0} is not the human seat")]
    NotHumanSeat(ParticipantId),

    /// Configuration failed validation
    #[error("invalid session config: {0}")]
    InvalidConfig(String),
}
