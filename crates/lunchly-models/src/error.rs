use thiserror::Error;

/// Errors returned by customer and reservation operations.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("No such customer: {0}")]
    CustomerNotFound(i64),
    #[error("No such reservation: {0}")]
    ReservationNotFound(i64),
}

impl ModelError {
    /// HTTP-equivalent status attached to the error, if any.
    ///
    /// Only not-found conditions carry a status (404). Database failures are
    /// passed through unannotated.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::CustomerNotFound(_) | Self::ReservationNotFound(_) => Some(404),
            Self::Database(_) => None,
        }
    }

    /// Returns `true` if the underlying database rejected a constraint
    /// (foreign key, `NOT NULL`, `CHECK`).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Database(rusqlite::Error::SqliteFailure(code, _))
                if code.code == rusqlite::ffi::ErrorCode::ConstraintViolation
        )
    }
}
