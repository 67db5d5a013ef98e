//! Device profile loading for Tuya local devices
//!
//! Each supported device type is described by a YAML profile naming its
//! primary entity, any secondary entities, and the data points each of them
//! uses. This crate parses those profiles into [`tuya_dps`] descriptors,
//! validates them, and keeps them in a registry keyed by device type.
//!
//! # Example
//!
//! ```ignore
//! use tuya_config::DeviceConfigRegistry;
//!
//! let registry = DeviceConfigRegistry::from_dir("devices")?;
//! let config = registry.require("goldair_gpcv_heater")?;
//! println!("{} has {} entities", config.name, config.all_entities().count());
//! ```

mod device;
mod error;
mod loader;
mod validate;

pub use device::{DeviceConfig, Product};
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_device_config, parse_device_config, DeviceConfigRegistry};
pub use validate::validate;
