//! Weather-specific error types.

use thiserror::Error;
use weathernow_core::{AppError, DatabaseError, NetworkError, WeatherError};

use crate::session::Phase;

/// Anything that kept a fetch from producing a snapshot.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Request failed: {0}")]
    Request(String),
}

impl TransportError {
    /// All fetch failures read the same to the user.
    pub fn user_message(&self) -> &'static str {
        "Something went wrong..."
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connection(e.to_string())
        } else if e.is_decode() {
            Self::Parse(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Status {
                status: status.as_u16(),
                body: e.to_string(),
            }
        } else {
            Self::Request(e.to_string())
        }
    }
}

/// Preference storage failures. Never fatal.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Preference storage unavailable: {0}")]
    Unavailable(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Unavailable(e.to_string())
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Unavailable(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    /// An event arrived that the current phase has no transition for.
    #[error("Invalid transition: {event} while {phase}")]
    InvalidTransition { phase: Phase, event: &'static str },

    #[error("Fetch result channel closed")]
    ChannelClosed,

    /// Waited for a fetch result with no fetch in flight.
    #[error("No fetch in flight")]
    NothingPending,
}

impl From<TransportError> for AppError {
    fn from(e: TransportError) -> Self {
        let network = match e {
            TransportError::Timeout => NetworkError::Timeout,
            TransportError::Connection(s) | TransportError::Request(s) => {
                NetworkError::ConnectionFailed(s)
            }
            TransportError::Status { status, body } => NetworkError::ServerError {
                status,
                message: body,
            },
            TransportError::Parse(s) => NetworkError::InvalidResponse(s),
        };
        AppError::Network(network)
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Unavailable(s) => AppError::Database(DatabaseError::Unavailable(s)),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::InvalidTransition { .. } => {
                AppError::Weather(WeatherError::InvalidTransition(e.to_string()))
            }
            SessionError::ChannelClosed => AppError::Weather(WeatherError::SessionClosed),
            SessionError::NothingPending => AppError::Weather(WeatherError::NothingPending),
        }
    }
}
