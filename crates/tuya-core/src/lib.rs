//! Core types for Tuya local devices
//!
//! This crate provides the fundamental types shared by the data point
//! conversion layer and the entity implementations: the device facade traits,
//! the write batch type, the error type and the host platform's vocabulary
//! (color modes, HVAC modes, feature flags).

pub mod color;
mod device;
mod error;
pub mod platform;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use device::{DeviceState, TuyaDevice};
pub use error::{TuyaError, TuyaResult};

/// A raw or semantic data point value.
///
/// Devices report booleans, integers, strings and occasionally JSON blobs, so
/// the JSON value model covers every wire type without loss.
pub type Value = serde_json::Value;

/// A batch of data point writes keyed by data point id.
///
/// Insertion order is preserved so the batch reads in the order the entity
/// composed it.
pub type Settings = indexmap::IndexMap<String, Value>;

/// Temperature unit reported by devices that do not expose one
pub const TEMP_CELSIUS: &str = "°C";

/// Fahrenheit temperature unit
pub const TEMP_FAHRENHEIT: &str = "°F";

/// State reported when a data point that defines the state is absent
pub const STATE_UNAVAILABLE: &str = "unavailable";
