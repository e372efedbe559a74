//! Layered error definitions
//!
//! Categorized by source: config / track precondition / statistics / io

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Track Preconditions =====
    /// Track has no observations
    #[error("track has no observations")]
    EmptyTrack,

    /// More than one identifier where a single trajectory is required
    #[error("expected a single track id, found {count}: {ids:?}")]
    MultipleTrackIds { count: usize, ids: Vec<String> },

    // ===== Statistical Errors =====
    /// Too few usable values for the requested operation
    #[error("insufficient data for {operation}: need at least {required}, found {found}")]
    InsufficientData {
        operation: String,
        required: usize,
        found: usize,
    },

    /// Step is not a positive finite duration
    #[error("invalid step: {message}")]
    InvalidStep { message: String },

    /// Pass parameter out of range
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    /// Unknown error label in a label column
    #[error("invalid error label '{label}'")]
    InvalidLabel { label: String },

    /// Numerical routine did not produce a solution
    #[error("numeric failure in {operation}: {message}")]
    Numeric { operation: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create insufficient data error
    pub fn insufficient_data(operation: impl Into<String>, required: usize, found: usize) -> Self {
        Self::InsufficientData {
            operation: operation.into(),
            required,
            found,
        }
    }

    /// Create invalid parameter error
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create numeric failure error
    pub fn numeric(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Numeric {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Whether the error reports too little data rather than a broken precondition
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}
