//! Platform wiring for Tuya local devices
//!
//! Given a device, its discovery info and a platform kind, resolves which
//! entities of the device's profile are enabled and builds them. The
//! primary entity is considered before the secondary entities.
//!
//! # Example
//!
//! ```ignore
//! let registry = DeviceConfigRegistry::from_dir("devices")?;
//! let discovery = DiscoveryInfo::new("abc123", "lefant_m213_vacuum").enable("vacuum");
//! let store = DeviceEntities::new();
//! let vacuums = setup_vacuums(&registry, device, &discovery, &store)?;
//! ```

mod discovery;
mod entity;
mod error;
mod setup;

pub use discovery::{DiscoveryInfo, EntryData};
pub use entity::{AnyEntity, EntityState};
pub use error::{PlatformError, PlatformResult};
pub use setup::{setup_device, setup_entry, setup_platform, setup_vacuums, DeviceEntities};
