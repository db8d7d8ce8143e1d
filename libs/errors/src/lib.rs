//! Unified error handling for the Aodh client crates
//!
//! Every library crate in the workspace returns [`AodhError`]. HTTP error
//! responses are carried through with their status code and the server's
//! fault string; the client never retries or reinterprets them.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// ErrorInfo - Aodh API fault body
// ============================================================================

/// Fault description returned by the Aodh API
///
/// The server wraps it as `{"error_message": {"faultstring": ..., "faultcode": ...}}`.
/// Some deployments double-encode the inner object as a JSON string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Human readable fault message
    pub faultstring: String,
    /// "Client" or "Server"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faultcode: Option<String>,
    /// Server-side traceback, only present in debug deployments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debuginfo: Option<String>,
}

impl ErrorInfo {
    /// Parse the fault out of a response body, if it has one
    pub fn from_body(body: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(body).ok()?;
        match value.get("error_message")? {
            Value::Object(map) => serde_json::from_value(Value::Object(map.clone())).ok(),
            Value::String(inner) => serde_json::from_str::<Self>(inner)
                .ok()
                .or_else(|| {
                    Some(Self {
                        faultstring: inner.clone(),
                        ..Self::default()
                    })
                }),
            _ => None,
        }
    }
}

// ============================================================================
// AodhError - Main error type
// ============================================================================

/// Main error type for the Aodh client and CLI
#[derive(Debug, Error)]
pub enum AodhError {
    // ======================================
    // Configuration Errors
    // ======================================
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    // ======================================
    // API & HTTP Errors
    // ======================================
    /// Non-success HTTP response, passed through uninterpreted
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Conflict: {resource}")]
    Conflict { resource: String },

    // ======================================
    // Validation Errors
    // ======================================
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid parameter: {param}: {reason}")]
    InvalidParameter { param: String, reason: String },

    // ======================================
    // Serialization Errors
    // ======================================
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Result type alias using AodhError
pub type AodhResult<T> = Result<T, AodhError>;

impl AodhError {
    /// Build an error from a non-success HTTP response
    ///
    /// Prefers the server's `faultstring`, then the raw body, then the
    /// canonical reason phrase of the status code.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = match ErrorInfo::from_body(body) {
            Some(info) => info.faultstring,
            None if !body.trim().is_empty() => body.trim().to_string(),
            None => StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown status")
                .to_string(),
        };
        Self::Http { status, message }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(param: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            reason: reason.into(),
        }
    }

    /// True for a 404 from the server or a local lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Http { status: 404, .. })
    }

    /// Get the HTTP status code associated with this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Http { status, .. } => *status,

            Self::Validation(_) | Self::InvalidParameter { .. } => 400,

            Self::NotFound { .. } => 404,

            Self::Conflict { .. } => 409,

            Self::HttpClient(e) if e.is_timeout() => 504,
            Self::HttpClient(e) => e.status().map(|s| s.as_u16()).unwrap_or(502),

            Self::Configuration(_)
            | Self::InvalidConfig { .. }
            | Self::Serialization(_)
            | Self::Deserialization(_) => 500,
        }
    }

    /// Stable error code for logs and machine-readable output
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::Http { .. } => "HTTP_ERROR",
            Self::HttpClient(_) => "HTTP_CLIENT_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidParameter { .. } => "INVALID_PARAMETER",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Deserialization(_) => "DESERIALIZATION_ERROR",
        }
    }

    /// Classify the error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration(_) | Self::InvalidConfig { .. } => ErrorCategory::Configuration,

            Self::Http { status, .. } => ErrorCategory::from_status(*status),

            Self::HttpClient(e) if e.is_timeout() => ErrorCategory::Timeout,
            Self::HttpClient(e) => match e.status() {
                Some(status) => ErrorCategory::from_status(status.as_u16()),
                None => ErrorCategory::Network,
            },

            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Conflict { .. } => ErrorCategory::Conflict,

            Self::Validation(_) | Self::InvalidParameter { .. } => ErrorCategory::Validation,

            Self::Serialization(_) | Self::Deserialization(_) => ErrorCategory::Internal,
        }
    }
}

// Conversion traits for common error types
impl From<serde_json::Error> for AodhError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Io => Self::Serialization(err.to_string()),
            _ => Self::Deserialization(err.to_string()),
        }
    }
}

impl From<figment::Error> for AodhError {
    fn from(err: figment::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}

// Helper macros for creating errors
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::AodhError::Configuration($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::AodhError::Configuration(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::AodhError::Validation($msg.to_string())
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::AodhError::Validation(format!($fmt, $($arg)*))
    };
}

// ============================================================================
// Error categories
// ============================================================================

/// Error category enum - used for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    // Local
    Configuration,
    Validation,
    Internal,

    // Transport
    Network,
    Timeout,

    // Server responses
    NotFound,
    Conflict,
    Permission,
    ResourceExhausted,
    Server,

    Unknown,
}

impl ErrorCategory {
    /// Map an HTTP status code to a category
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::Validation,
            401 | 403 => Self::Permission,
            404 => Self::NotFound,
            409 => Self::Conflict,
            408 | 504 => Self::Timeout,
            413 | 429 => Self::ResourceExhausted,
            500..=599 => Self::Server,
            _ => Self::Unknown,
        }
    }
}
