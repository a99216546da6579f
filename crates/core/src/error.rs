//! Error types for license operations.

use thiserror::Error;

/// Every failure the engine, client and stores can surface.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Network/transport failure, non-2xx response or unparseable body.
    #[error("License server error: {0}")]
    Server(String),

    /// The server explicitly rejected the operation (`success: false`).
    #[error("{0}")]
    Validation(String),

    /// Nothing is stored locally to deactivate or refresh.
    #[error("No license key found")]
    NoLicenseKey,

    /// The local license store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LicenseError {
    /// Transient failures are worth falling back on; everything else needs user action.
    pub fn is_transient(&self) -> bool {
        matches!(self, LicenseError::Server(_))
    }
}

impl From<std::io::Error> for LicenseError {
    fn from(e: std::io::Error) -> Self {
        LicenseError::Storage(e.to_string())
    }
}

impl From<reqwest::Error> for LicenseError {
    fn from(e: reqwest::Error) -> Self {
        LicenseError::Server(e.to_string())
    }
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
