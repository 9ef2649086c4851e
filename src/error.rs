//! Error types for coverage-map

use thiserror::Error;

/// Main error type for coverage-map operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    /// Transport failure or non-success response from the geocoding service.
    /// "No match" is not an error and never lands here.
    #[error("Geocoding error: {message}")]
    Geocoding {
        status: Option<u16>,
        message: String,
    },
}

impl Error {
    /// Build a geocoding failure carrying an HTTP status
    pub fn geocoding_status(status: u16, message: impl Into<String>) -> Self {
        Self::Geocoding {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Build a geocoding failure with no HTTP status (transport/parse)
    pub fn geocoding(message: impl Into<String>) -> Self {
        Self::Geocoding {
            status: None,
            message: message.into(),
        }
    }
}

/// Result type alias for coverage-map operations
pub type Result<T> = std::result::Result<T, Error>;
