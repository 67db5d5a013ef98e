//! Error types for data point conversion and device commands

use thiserror::Error;

/// Result type for conversion and command operations
pub type TuyaResult<T> = Result<T, TuyaError>;

/// Errors raised while converting values or issuing commands
///
/// Configuration errors indicate a device profile that must be fixed and are
/// never retried. Validation errors are surfaced to the caller as-is.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TuyaError {
    /// A semantic value fell outside the data point's valid range
    #[error("{name} ({value}) must be between {min} and {max}")]
    ValueOutOfRange {
        name: String,
        value: String,
        min: String,
        max: String,
    },

    /// A value could not be converted to or from the data point's type
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },

    /// The device profile describes something this layer cannot handle
    #[error("configuration error: {0}")]
    Config(String),

    /// A packed binary format is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The entity has no data point able to perform the operation
    #[error("{operation} is not implemented for {entity}")]
    NotImplemented { entity: String, operation: String },

    /// The device session failed to accept the write
    #[error("device error: {0}")]
    Device(String),
}

impl TuyaError {
    /// Shorthand for an [`TuyaError::InvalidValue`]
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`TuyaError::NotImplemented`]
    pub fn not_implemented(entity: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::NotImplemented {
            entity: entity.into(),
            operation: operation.into(),
        }
    }
}
