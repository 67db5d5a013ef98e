//! Error types for device profile loading

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading device profiles or wiring platforms
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse YAML
    #[error("failed to parse YAML in {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Profile directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// No profile registered for a device type
    #[error("no device config found for type '{device_type}'")]
    UnknownDeviceType { device_type: String },

    /// A profile parsed but is inconsistent
    #[error("configuration validation failed: {message}")]
    ValidationFailed { message: String },

    /// No entity of the requested platform was enabled for the device
    #[error("{device} does not support use as a {platform} device.")]
    NotSupported { device: String, platform: String },
}

impl ConfigError {
    pub(crate) fn validation(device_type: &str, message: impl std::fmt::Display) -> Self {
        Self::ValidationFailed {
            message: format!("{}: {}", device_type, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_supported_message() {
        let err = ConfigError::NotSupported {
            device: "Kitchen heater".to_string(),
            platform: "vacuum".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Kitchen heater does not support use as a vacuum device."
        );
    }
}
