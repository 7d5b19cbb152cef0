//! Error taxonomy for the tournament engine: Validation, Conflict,
//! NotFound, Permission, Integrity, External, Internal.

use crate::ports::database::DbError;
use crate::utils::validation::ValidationErrors;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    IsJudge,
    CanRegister,
    CanSchedule,
    CanScore,
    CanReport,
    CanManageUsers,
}

#[derive(Debug, Error)]
pub enum CoreError {
    /// failed invariants; no state change
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// optimistic-concurrency version mismatch on heat/result
    #[error("conflict: stale version")]
    Conflict,

    /// requested entity absent or belongs to a different tournament
    #[error("not found")]
    NotFound,

    /// actor's role lacks the required capability
    #[error("permission denied: missing {0:?}")]
    Permission(Capability),

    /// unique-constraint violation surfaced as a conflict
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// file parse failure, malware-scan failure, SMS provider unreachable, etc.
    #[error("external error: {0}")]
    External(#[source] anyhow::Error),

    /// unexpected failure; logged structurally, never leaked to the caller verbatim
    #[error("internal error: {0}")]
    Internal(#[source] anyhow::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl From<DbError> for CoreError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::OptimisticLockConflict => CoreError::Conflict,
            DbError::NotFound => CoreError::NotFound,
            DbError::UniqueViolation(c) => {
                CoreError::Integrity(c.unwrap_or_else(|| "unique".to_string()))
            }
            DbError::ForeignKeyViolation(c) => {
                CoreError::Integrity(c.unwrap_or_else(|| "foreign_key".to_string()))
            }
            DbError::CheckViolation(c) => {
                CoreError::Integrity(c.unwrap_or_else(|| "check".to_string()))
            }
            DbError::SerializationFailure => CoreError::Conflict,
            DbError::Other(e) => CoreError::Internal(e),
        }
    }
}

impl CoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, CoreError::Conflict)
    }
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound)
    }
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Validation(ValidationErrors::single(code, message, None, None))
    }
}
