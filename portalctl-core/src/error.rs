/// Structured error types for portalctl-core.
///
/// Uses `thiserror` so the CLI can match on what went wrong (bad input,
/// duplicate registration, a refusal raised by a stored procedure) while
/// still printing a readable message for everything else.
use thiserror::Error;

use crate::models::ValidationError;

/// SQLSTATE for `unique_violation`.
const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE for `raise_exception` (plain `RAISE EXCEPTION` in PL/pgSQL).
const SQLSTATE_RAISE_EXCEPTION: &str = "P0001";

/// Main error type for portal operations
#[derive(Error, Debug)]
pub enum PortalError {
    /// User input rejected before touching the database
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// A unique constraint refused the write (CPF or e-mail already taken)
    #[error("already registered: {message}")]
    Conflict { message: String },

    /// A stored procedure refused the operation
    #[error("{message}")]
    Rejected { message: String },

    /// Any other database failure
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Configuration could not be loaded or is inconsistent
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for portal operations
pub type Result<T> = std::result::Result<T, PortalError>;

impl PortalError {
    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Map a SQLSTATE to a domain error, if it has one.
    fn from_sqlstate(code: Option<&str>, message: &str) -> Option<Self> {
        match code? {
            SQLSTATE_UNIQUE_VIOLATION => Some(Self::Conflict {
                message: message.to_owned(),
            }),
            SQLSTATE_RAISE_EXCEPTION => Some(Self::Rejected {
                message: message.to_owned(),
            }),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for PortalError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let code = db_err.code();
            if let Some(mapped) = Self::from_sqlstate(code.as_deref(), db_err.message()) {
                return mapped;
            }
        }
        Self::Database(err)
    }
}
