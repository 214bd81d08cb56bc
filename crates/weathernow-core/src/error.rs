//! Centralized error types for the WeatherNow application.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling throughout the codebase
//! - Provides user-friendly messages suitable for display
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// All errors surfaced by the binary should be convertible to this type.
/// Use `user_message()` to get a display-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Storage error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    ///
    /// Every fetch failure reads the same to the user; details go to the log.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Database(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Other(_) => "Something went wrong...",
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        // Transport failures collapse to one generic message.
        "Something went wrong..."
    }
}

/// Local preference storage errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl DatabaseError {
    pub fn user_message(&self) -> &'static str {
        match self {
            DatabaseError::Unavailable(_) => {
                "Unable to save your preferences. They will not be remembered."
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration file not found. Check the path.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Weather session errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Weather API key is not configured")]
    MissingApiKey,

    #[error("Invalid session transition: {0}")]
    InvalidTransition(String),

    #[error("Weather session closed")]
    SessionClosed,

    #[error("No weather fetch in flight")]
    NothingPending,
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::MissingApiKey => {
                "Weather API key is missing. Set WEATHER_API_KEY or edit your config."
            }
            WeatherError::InvalidTransition(_)
            | WeatherError::SessionClosed
            | WeatherError::NothingPending => {
                "Something went wrong..."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = [
            AppError::from(NetworkError::Timeout),
            AppError::from(DatabaseError::Unavailable("locked".into())),
            AppError::from(ConfigError::Invalid("test".into())),
            AppError::from(WeatherError::MissingApiKey),
            AppError::from(anyhow::anyhow!("boom")),
        ];

        for err in &errors {
            assert!(!err.user_message().is_empty(), "empty message for {err}");
        }
    }

    #[test]
    fn test_network_errors_share_generic_message() {
        let timeout = NetworkError::Timeout.user_message();
        let server = NetworkError::ServerError {
            status: 503,
            message: "down".into(),
        }
        .user_message();
        assert_eq!(timeout, server);
        assert_eq!(timeout, "Something went wrong...");
    }

    #[test]
    fn test_app_error_conversion() {
        let app_err: AppError = WeatherError::MissingApiKey.into();
        assert!(matches!(
            app_err,
            AppError::Weather(WeatherError::MissingApiKey)
        ));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Config(ConfigError::ParseError("line 3".into()));
        assert_eq!(
            app_err.user_message(),
            "Configuration file is malformed. Check your settings."
        );
    }
}
