//! Mirror errors

use thiserror::Error;

/// Result alias for mirror operations
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Errors raised by mirror operations
///
/// All errors are synchronous and unrecoverable at the point of failure:
/// the core performs no retries and no internal catching, and a failed
/// decoration aborts the remaining decorator sequence for that class.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MirrorError {
    /// A value required to be callable, or required to be an object, is not
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// What was expected and what was found
        message: String,
    },

    /// A mutation was attempted outside the phase in which it is legal
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Which transition or guard was violated
        message: String,
    },
}

impl MirrorError {
    /// Build an [`MirrorError::InvalidArgument`]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        MirrorError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Build an [`MirrorError::InvalidState`]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        MirrorError::InvalidState {
            message: message.into(),
        }
    }
}
