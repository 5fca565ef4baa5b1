mod test;

use crate::model::SubjectId;
use thiserror::Error;

/// Coarse failure classes every `PokerError` falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    Conflict,
    InvalidInput,
    Internal,
}

/// Errors raised by the room persistence layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Room not found")]
    NotFound,

    #[error("Room already exists")]
    AlreadyExists,

    #[error("Room changed concurrently (expected version {expected}, found {found})")]
    VersionConflict { expected: u64, found: u64 },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PokerError {
    #[error("Room not found")]
    RoomNotFound,

    #[error("Round not found for subject {0}")]
    RoundNotFound(SubjectId),

    #[error("Player '{0}' not found")]
    PlayerNotFound(String),

    #[error("Organizer authentication failed")]
    Unauthorized,

    #[error("Another round is still open")]
    RoundConflict,

    #[error("Invalid round or round is closed (subject {0})")]
    InvalidRound(SubjectId),

    #[error("Invalid move options: {0}")]
    InvalidMove(String),

    /// Wide enough to report ids that do not fit a `SubjectId`.
    #[error("Unknown subject {0}")]
    InvalidSubject(i64),

    #[error("Player name must not be empty")]
    EmptyPlayerName,

    #[error("Malformed request: {0}")]
    InvalidRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl PokerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PokerError::RoomNotFound
            | PokerError::RoundNotFound(_)
            | PokerError::PlayerNotFound(_) => ErrorKind::NotFound,
            PokerError::Unauthorized => ErrorKind::Unauthorized,
            PokerError::RoundConflict | PokerError::InvalidRound(_) => ErrorKind::Conflict,
            PokerError::InvalidMove(_)
            | PokerError::InvalidSubject(_)
            | PokerError::EmptyPlayerName
            | PokerError::InvalidRequest(_) => ErrorKind::InvalidInput,
            PokerError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<StoreError> for PokerError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => PokerError::RoomNotFound,
            other => PokerError::Internal(other.to_string()),
        }
    }
}
