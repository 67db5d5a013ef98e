//! Fan entity, also used for air purifiers
//!
//! Roles: `switch`, `speed`, `preset_mode`, `oscillate` and `direction`. The
//! speed data point's mapping scales its range onto 0..100 percent.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tuya_core::platform::fan::{SUPPORT_DIRECTION, SUPPORT_OSCILLATE, SUPPORT_PRESET_MODE, SUPPORT_SET_SPEED};
use tuya_core::{Settings, TuyaDevice, TuyaResult, Value};
use tuya_dps::value::{as_number, number_value, truthy, value_text};
use tuya_dps::EntityDescriptor;

use crate::entity::{Attributes, EntityCore, TuyaEntity};
use crate::traits::Switchable;

const SWITCH: &str = "switch";
const SPEED: &str = "speed";
const PRESET_MODE: &str = "preset_mode";
const OSCILLATE: &str = "oscillate";
const DIRECTION: &str = "direction";

const ROLES: &[&str] = &[SWITCH, SPEED, PRESET_MODE, OSCILLATE, DIRECTION];

#[derive(Debug)]
pub struct TuyaLocalFan {
    core: EntityCore,
}

impl TuyaLocalFan {
    pub fn new(device: Arc<dyn TuyaDevice>, config: &EntityDescriptor) -> Self {
        Self {
            core: EntityCore::new(device, config, ROLES),
        }
    }

    pub fn supported_features(&self) -> u32 {
        let mut features = 0;
        if self.core.dp(SPEED).is_some() {
            features |= SUPPORT_SET_SPEED;
        }
        if self.core.dp(OSCILLATE).is_some() {
            features |= SUPPORT_OSCILLATE;
        }
        if self.core.dp(DIRECTION).is_some() {
            features |= SUPPORT_DIRECTION;
        }
        if self.core.dp(PRESET_MODE).is_some() {
            features |= SUPPORT_PRESET_MODE;
        }
        features
    }

    /// Turn on, optionally setting speed and preset in the same write
    pub async fn async_turn_on_with(&self, percentage: Option<f64>, preset_mode: Option<&str>) -> TuyaResult<()> {
        let device = self.core.device();
        let mut settings = Settings::new();
        let switch = self
            .core
            .dp(SWITCH)
            .ok_or_else(|| self.core.not_implemented("turn_on"))?;
        settings.extend(switch.get_values_to_set(device, &json!(true))?);

        if let Some(percentage) = percentage {
            let dp = self
                .core
                .dp(SPEED)
                .ok_or_else(|| self.core.not_implemented("set_percentage"))?;
            settings.extend(dp.get_values_to_set(device, &number_value(percentage))?);
        }
        if let Some(preset) = preset_mode {
            let dp = self
                .core
                .dp(PRESET_MODE)
                .ok_or_else(|| self.core.not_implemented("set_preset_mode"))?;
            settings.extend(dp.get_values_to_set(device, &json!(preset))?);
        }
        self.core.write(settings).await
    }

    // =========================================================================
    // Speed
    // =========================================================================

    pub fn percentage(&self) -> Option<f64> {
        as_number(&self.core.value(SPEED)?)
    }

    /// Percentage covered by one step of the device's speed range
    pub fn percentage_step(&self) -> Option<f64> {
        self.core.dp(SPEED).map(|dp| dp.step(self.core.device(), true))
    }

    /// Number of distinct speeds; zero for fans without speed control
    pub fn speed_count(&self) -> u32 {
        match self.percentage_step() {
            Some(step) if step > 0.0 => (100.0 / step).round_ties_even() as u32,
            _ => 0,
        }
    }

    /// Set the speed; the value snaps to the nearest device step
    pub async fn async_set_percentage(&self, percentage: f64) -> TuyaResult<()> {
        self.core
            .set(SPEED, number_value(percentage), "set_percentage")
            .await
    }

    // =========================================================================
    // Presets, oscillation and direction
    // =========================================================================

    pub fn preset_mode(&self) -> Option<String> {
        self.core.value(PRESET_MODE).map(|v| value_text(&v))
    }

    pub fn preset_modes(&self) -> Vec<String> {
        self.core
            .dp(PRESET_MODE)
            .map(|dp| dp.values(self.core.device()).iter().map(value_text).collect())
            .unwrap_or_default()
    }

    pub async fn async_set_preset_mode(&self, preset_mode: &str) -> TuyaResult<()> {
        self.core.set(PRESET_MODE, json!(preset_mode), "set_preset_mode").await
    }

    pub fn oscillating(&self) -> bool {
        self.core.value(OSCILLATE).is_some_and(|v| truthy(&v))
    }

    pub async fn async_oscillate(&self, oscillating: bool) -> TuyaResult<()> {
        self.core.set(OSCILLATE, json!(oscillating), "oscillate").await
    }

    pub fn current_direction(&self) -> Option<String> {
        self.core.value(DIRECTION).map(|v| value_text(&v))
    }

    pub async fn async_set_direction(&self, direction: &str) -> TuyaResult<()> {
        self.core.set(DIRECTION, json!(direction), "set_direction").await
    }
}

impl TuyaEntity for TuyaLocalFan {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn state(&self) -> Value {
        match self.is_on() {
            Some(true) => json!("on"),
            Some(false) => json!("off"),
            None => Value::Null,
        }
    }

    fn state_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        if self.core.dp(SPEED).is_some() {
            attrs.insert("percentage".into(), json!(self.percentage()));
            attrs.insert("percentage_step".into(), json!(self.percentage_step()));
        }
        if self.core.dp(PRESET_MODE).is_some() {
            attrs.insert("preset_mode".into(), json!(self.preset_mode()));
            attrs.insert("preset_modes".into(), json!(self.preset_modes()));
        }
        if self.core.dp(OSCILLATE).is_some() {
            attrs.insert("oscillating".into(), json!(self.oscillating()));
        }
        if self.core.dp(DIRECTION).is_some() {
            attrs.insert("direction".into(), json!(self.current_direction()));
        }
        attrs.insert("supported_features".into(), json!(self.supported_features()));
        attrs
    }
}

#[async_trait]
impl Switchable for TuyaLocalFan {
    fn is_on(&self) -> Option<bool> {
        self.core.value(SWITCH).map(|v| truthy(&v))
    }

    async fn async_turn_on(&self) -> TuyaResult<()> {
        self.core.set(SWITCH, json!(true), "turn_on").await
    }

    async fn async_turn_off(&self) -> TuyaResult<()> {
        self.core.set(SWITCH, json!(false), "turn_off").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuya_core::testing::MockDevice;
    use tuya_dps::{DpConfig, DpType, EntityKind, MappingRule};

    fn pedestal_fan() -> EntityDescriptor {
        EntityDescriptor::new(EntityKind::Fan)
            .with_dp(DpConfig::new("1", "switch", DpType::Boolean))
            .with_dp(
                DpConfig::new("2", "preset_mode", DpType::String)
                    .with_mapping(MappingRule::map(json!("normal"), json!("normal")))
                    .with_mapping(MappingRule::map(json!("sleep"), json!("sleep"))),
            )
            .with_dp(
                DpConfig::new("3", "speed", DpType::Integer)
                    .with_range(1.0, 15.0)
                    .with_mapping(MappingRule::default_rule().with_scale(0.15).with_step(1.0)),
            )
            .with_dp(DpConfig::new("5", "oscillate", DpType::Boolean))
    }

    fn setup(payload: Value) -> (Arc<MockDevice>, TuyaLocalFan) {
        let device = Arc::new(MockDevice::new("Fan").with_payload(payload));
        let fan = TuyaLocalFan::new(device.clone(), &pedestal_fan());
        (device, fan)
    }

    #[test]
    fn test_speed_steps() {
        let (_, fan) = setup(json!({"3": "4"}));
        assert!((fan.percentage().unwrap() - 26.67).abs() < 0.01);
        assert!((fan.percentage_step().unwrap() - 6.67).abs() < 0.01);
        assert_eq!(fan.speed_count(), 15);
        assert_eq!(
            fan.supported_features(),
            SUPPORT_SET_SPEED | SUPPORT_OSCILLATE | SUPPORT_PRESET_MODE
        );
    }

    #[tokio::test]
    async fn test_set_percentage_snaps_to_step() {
        let (device, fan) = setup(json!({}));
        fan.async_set_percentage(33.0).await.unwrap();
        device.assert_single_batch(json!({"3": 5}));
        fan.async_set_percentage(64.0).await.unwrap();
        device.assert_single_batch(json!({"3": 10}));
    }

    #[tokio::test]
    async fn test_turn_on_with_speed_and_preset() {
        let (device, fan) = setup(json!({"1": false}));
        fan.async_turn_on_with(Some(100.0), Some("sleep")).await.unwrap();
        device.assert_single_batch(json!({"1": true, "3": 15, "2": "sleep"}));
    }

    #[tokio::test]
    async fn test_oscillation() {
        let (device, fan) = setup(json!({"5": true}));
        assert!(fan.oscillating());
        device.set_dp("5", Value::Null);
        assert!(!fan.oscillating());
        fan.async_oscillate(true).await.unwrap();
        device.assert_single_batch(json!({"5": true}));
    }

    #[tokio::test]
    async fn test_direction_not_supported() {
        let (device, fan) = setup(json!({}));
        assert!(fan.async_set_direction("reverse").await.is_err());
        device.assert_no_writes();
    }
}
