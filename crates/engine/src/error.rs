//! Errors the engine can surface.
//!
//! Every operation returns a typed error; the engine never formats
//! user-facing text. Transient store failures (connection loss, conflicting
//! concurrent commits) surface through [`Database`].
//!
//! [`Database`]: EngineError::Database

use sea_orm::DbErr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// No resolvable tenant for the current session. Writes are refused with
    /// this error; list reads degrade to an empty result instead.
    #[error("no authenticated tenant")]
    Unauthenticated,
    /// The transaction's target entity or the addressed record is absent (or
    /// archived, for new ledger entries). The whole operation aborts with no
    /// partial effect.
    #[error("\"{0}\" not found")]
    EntityNotFound(String),
    /// Malformed input, rejected before any I/O.
    #[error("invalid input: {0}")]
    Validation(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unauthenticated, Self::Unauthenticated) => true,
            (Self::EntityNotFound(a), Self::EntityNotFound(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
