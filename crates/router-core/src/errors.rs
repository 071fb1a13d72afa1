//! Error types for the swap router

use thiserror::Error;

/// Core errors that can occur while routing
#[derive(Debug, Error)]
pub enum Error {
    #[error("Arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),

    #[error("Route error: {0}")]
    Route(#[from] RouteError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Fixed-point kernel failures. Fatal to the single calculation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Overflow in {operation}")]
    Overflow { operation: &'static str },
}

/// Request and artifact level failures
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Unknown token: {token}")]
    UnknownToken { token: String },

    #[error("Network {network} is not configured")]
    UnsupportedNetwork { network: String },

    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Failed to load route artifact from {path}: {message}")]
    ArtifactLoad { path: String, message: String },

    #[error("Unsupported route artifact format version {found} (expected {expected})")]
    ArtifactFormat { found: u32, expected: u32 },
}

/// Result type alias for router operations
pub type Result<T> = std::result::Result<T, Error>;

impl RouteError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownToken { .. } => "unknown_token",
            Self::UnsupportedNetwork { .. } => "network_not_supported",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::ArtifactLoad { .. } => "artifact_unavailable",
            Self::ArtifactFormat { .. } => "artifact_format",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnknownToken { .. } | Self::InvalidAmount { .. } => 400,
            Self::UnsupportedNetwork { .. } => 422,
            Self::ArtifactLoad { .. } | Self::ArtifactFormat { .. } => 503,
        }
    }
}

impl Error {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Arithmetic(ArithmeticError::DivisionByZero) => "division_by_zero",
            Self::Arithmetic(ArithmeticError::Overflow { .. }) => "arithmetic_overflow",
            Self::Route(e) => e.error_code(),
            Self::Config(_) => "config_error",
            Self::Serialization(_) => "serialization_error",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Arithmetic(_) => 422,
            Self::Route(e) => e.status_code(),
            Self::Config(_) | Self::Serialization(_) => 500,
        }
    }
}
