use chrono::NaiveDateTime;
use thiserror::Error;

/// Recoverable failures reported by the desk core. Whenever one of these is
/// returned the in-memory state is unchanged.
#[derive(Debug, Error, PartialEq)]
pub enum DeskError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("slot {} is already booked", .0.format("%Y-%m-%d %H:%M"))]
    Collision(NaiveDateTime),
}

impl DeskError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DeskError::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        DeskError::NotFound(what.into())
    }
}
