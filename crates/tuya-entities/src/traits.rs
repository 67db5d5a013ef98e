//! Capability traits
//!
//! Entities compose their behaviour from these small traits rather than
//! inheriting it: a light is [`Switchable`] + [`HasBrightness`] +
//! [`HasColorMode`] + [`HasEffect`], a vacuum is only [`Switchable`].

use async_trait::async_trait;
use tuya_core::platform::ColorMode;
use tuya_core::TuyaResult;

use crate::entity::TuyaEntity;

/// Entities that can be switched on and off
#[async_trait]
pub trait Switchable: TuyaEntity {
    /// Whether the entity is on; `None` if the device has not reported it
    fn is_on(&self) -> Option<bool>;

    async fn async_turn_on(&self) -> TuyaResult<()>;

    async fn async_turn_off(&self) -> TuyaResult<()>;

    /// Turn off when on, otherwise turn on
    async fn async_toggle(&self) -> TuyaResult<()> {
        if self.is_on() == Some(true) {
            self.async_turn_off().await
        } else {
            self.async_turn_on().await
        }
    }
}

/// Entities with a 0-255 brightness
pub trait HasBrightness: TuyaEntity {
    fn brightness(&self) -> Option<u8>;
}

/// Entities with a host color mode
pub trait HasColorMode: TuyaEntity {
    /// Current color mode; never fails, degrading to `onoff` or `unknown`
    fn color_mode(&self) -> ColorMode;

    fn supported_color_modes(&self) -> Vec<ColorMode>;
}

/// Entities offering named effects
pub trait HasEffect: TuyaEntity {
    fn effect_list(&self) -> Vec<String>;

    fn effect(&self) -> Option<String>;
}
