//! Client error types.

use thiserror::Error;

use crate::transport::TransportError;
use crate::types::ErrorCode;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// An operation ran before [`CodeAuth::initialize`](crate::CodeAuth::initialize).
    #[error("CodeAuth has not been initialized")]
    NotInitialized,

    /// [`CodeAuth::initialize`](crate::CodeAuth::initialize) was called a second time.
    #[error("CodeAuth has already been initialized")]
    AlreadyInitialized,

    /// The request never produced a usable response.
    #[error("connection error: {0}")]
    Connection(#[from] TransportError),

    /// The service reported an error code.
    #[error("CodeAuth error: {0}")]
    Remote(ErrorCode),
}

impl Error {
    /// Wire error code, or `None` for local lifecycle errors.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Error::NotInitialized | Error::AlreadyInitialized => None,
            Error::Connection(_) => Some(ErrorCode::ConnectionError),
            Error::Remote(code) => Some(code.clone()),
        }
    }

    /// Check if this is a lifecycle precondition failure.
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Error::NotInitialized | Error::AlreadyInitialized)
    }

    /// Check if this is a connection error.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::Remote(code) if code.is_rate_limited())
    }

    /// Check if the session token was rejected.
    pub fn is_bad_session(&self) -> bool {
        matches!(self, Error::Remote(ErrorCode::BadSessionToken))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
