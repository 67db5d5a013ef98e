//! Error types for platform setup

use thiserror::Error;
use tuya_config::ConfigError;

/// Result type for platform setup
pub type PlatformResult<T> = Result<T, PlatformError>;

#[derive(Debug, Error)]
pub enum PlatformError {
    /// The device type or its entities could not be resolved
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The config entry does not describe a device
    #[error("invalid discovery info: {0}")]
    InvalidDiscovery(#[from] serde_json::Error),
}
