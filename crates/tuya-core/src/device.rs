//! Device facade traits
//!
//! The transport and session layer that talks to a physical device lives
//! outside this workspace. The conversion layer only ever sees it through
//! these two traits: a synchronous snapshot read and a single batched write.

use async_trait::async_trait;

use crate::{Settings, TuyaResult, Value, TEMP_CELSIUS};

/// Read-only view of a device's current data point snapshot
pub trait DeviceState: Send + Sync {
    /// Human readable device name, used as the base of entity names
    fn name(&self) -> &str;

    /// Current raw value of a data point, or `None` if the device has not
    /// reported it
    fn get_property(&self, dp_id: &str) -> Option<Value>;

    /// Whether the device session is currently connected
    fn available(&self) -> bool;

    /// Temperature unit to assume when an entity has no unit data point
    fn temperature_unit(&self) -> &str {
        TEMP_CELSIUS
    }
}

/// A device that accepts batched data point writes
///
/// Every user-initiated command results in exactly one call to
/// [`TuyaDevice::async_set_properties`] carrying all of the data points the
/// command touches.
#[async_trait]
pub trait TuyaDevice: DeviceState {
    /// Send a batch of raw data point values to the device
    async fn async_set_properties(&self, settings: Settings) -> TuyaResult<()>;
}
