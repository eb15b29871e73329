use thiserror::Error;
use uuid::Uuid;

use crate::models::Slot;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error(transparent)]
    Tournament(#[from] TournamentError),
}

/// Domain rule violations raised by tournament and bracket operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TournamentError {
    #[error("Match not found in tournament")]
    MatchNotFound,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("Match has already been finalized")]
    AlreadyFinalized,

    #[error("Winner must be one of the two match participants")]
    InvalidWinner,

    #[error("Slot {slot} of match {match_id} already holds a different participant")]
    SlotConflict { match_id: Uuid, slot: Slot },

    #[error("Malformed bracket: {0}")]
    MalformedBracket(String),

    #[error("{0}")]
    InvalidState(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }
}
