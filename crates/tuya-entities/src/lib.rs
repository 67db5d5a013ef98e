//! Entities for Tuya local devices
//!
//! Each entity binds one [`tuya_dps::EntityDescriptor`] to a device and
//! presents its data points in the host platform's vocabulary. Behaviour
//! shared across kinds lives in [`EntityCore`] and the capability traits.

mod binary_sensor;
mod climate;
mod entity;
mod fan;
mod light;
mod lock;
mod number;
mod select;
mod sensor;
mod switch;
mod traits;
mod vacuum;

pub use binary_sensor::TuyaLocalBinarySensor;
pub use climate::TuyaLocalClimate;
pub use entity::{Attributes, EntityCore, TuyaEntity};
pub use fan::TuyaLocalFan;
pub use light::{TuyaLocalLight, TurnOnParams};
pub use lock::TuyaLocalLock;
pub use number::TuyaLocalNumber;
pub use select::TuyaLocalSelect;
pub use sensor::TuyaLocalSensor;
pub use switch::TuyaLocalSwitch;
pub use traits::{HasBrightness, HasColorMode, HasEffect, Switchable};
pub use vacuum::TuyaLocalVacuum;
