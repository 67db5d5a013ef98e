//! Climate entity: heaters, heat pumps and thermostats
//!
//! Roles: `hvac_mode`, `temperature`, `current_temperature`, `preset_mode`,
//! `hvac_action`, `temperature_unit`, `min_temperature`, `max_temperature`.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;
use tuya_core::platform::climate::{
    DEFAULT_MAX_TEMP, DEFAULT_MIN_TEMP, HVAC_MODE_AUTO, SUPPORT_PRESET_MODE, SUPPORT_TARGET_TEMPERATURE,
};
use tuya_core::{Settings, TuyaDevice, TuyaResult, Value, STATE_UNAVAILABLE, TEMP_CELSIUS, TEMP_FAHRENHEIT};
use tuya_dps::value::{as_number, number_value, value_text};
use tuya_dps::EntityDescriptor;

use crate::entity::{Attributes, EntityCore, TuyaEntity};

const HVAC_MODE: &str = "hvac_mode";
const TEMPERATURE: &str = "temperature";
const CURRENT_TEMPERATURE: &str = "current_temperature";
const PRESET_MODE: &str = "preset_mode";
const HVAC_ACTION: &str = "hvac_action";
const TEMPERATURE_UNIT: &str = "temperature_unit";
const MIN_TEMPERATURE: &str = "min_temperature";
const MAX_TEMPERATURE: &str = "max_temperature";

const ROLES: &[&str] = &[
    HVAC_MODE,
    TEMPERATURE,
    CURRENT_TEMPERATURE,
    PRESET_MODE,
    HVAC_ACTION,
    TEMPERATURE_UNIT,
    MIN_TEMPERATURE,
    MAX_TEMPERATURE,
];

#[derive(Debug)]
pub struct TuyaLocalClimate {
    core: EntityCore,
}

impl TuyaLocalClimate {
    pub fn new(device: Arc<dyn TuyaDevice>, config: &EntityDescriptor) -> Self {
        Self {
            core: EntityCore::new(device, config, ROLES),
        }
    }

    pub fn supported_features(&self) -> u32 {
        let mut features = 0;
        if self.core.dp(TEMPERATURE).is_some() {
            features |= SUPPORT_TARGET_TEMPERATURE;
        }
        if self.core.dp(PRESET_MODE).is_some() {
            features |= SUPPORT_PRESET_MODE;
        }
        features
    }

    // =========================================================================
    // Temperature
    // =========================================================================

    /// `°C` or `°F` from the unit data point, else the device default
    pub fn temperature_unit(&self) -> String {
        match self.core.value(TEMPERATURE_UNIT).as_ref().map(value_text).as_deref() {
            Some("C") => TEMP_CELSIUS.to_string(),
            Some("F") => TEMP_FAHRENHEIT.to_string(),
            _ => self.core.device().temperature_unit().to_string(),
        }
    }

    pub fn target_temperature(&self) -> Option<f64> {
        as_number(&self.core.value(TEMPERATURE)?)
    }

    pub fn target_temperature_step(&self) -> f64 {
        self.core
            .dp(TEMPERATURE)
            .map_or(1.0, |dp| dp.step(self.core.device(), true))
    }

    /// Lowest settable target: a reported limit, else the data point's range
    pub fn min_temp(&self) -> f64 {
        if let Some(min) = self.core.value(MIN_TEMPERATURE).as_ref().and_then(as_number) {
            return min;
        }
        self.core
            .dp(TEMPERATURE)
            .and_then(|dp| dp.scaled_range(self.core.device()))
            .map_or(DEFAULT_MIN_TEMP, |r| r.min)
    }

    /// Highest settable target: a reported limit, else the data point's range
    pub fn max_temp(&self) -> f64 {
        if let Some(max) = self.core.value(MAX_TEMPERATURE).as_ref().and_then(as_number) {
            return max;
        }
        self.core
            .dp(TEMPERATURE)
            .and_then(|dp| dp.scaled_range(self.core.device()))
            .map_or(DEFAULT_MAX_TEMP, |r| r.max)
    }

    pub fn current_temperature(&self) -> Option<f64> {
        as_number(&self.core.value(CURRENT_TEMPERATURE)?)
    }

    pub async fn async_set_target_temperature(&self, temperature: f64) -> TuyaResult<()> {
        self.core
            .set(TEMPERATURE, number_value(temperature), "set_target_temperature")
            .await
    }

    /// Set the target temperature and preset together in one write
    pub async fn async_set_temperature(&self, temperature: Option<f64>, preset_mode: Option<&str>) -> TuyaResult<()> {
        let device = self.core.device();
        let mut settings = Settings::new();

        if let Some(preset) = preset_mode {
            let dp = self
                .core
                .dp(PRESET_MODE)
                .ok_or_else(|| self.core.not_implemented("set_preset_mode"))?;
            settings.extend(dp.get_values_to_set(device, &json!(preset))?);
        }
        if let Some(temperature) = temperature {
            let dp = self
                .core
                .dp(TEMPERATURE)
                .ok_or_else(|| self.core.not_implemented("set_target_temperature"))?;
            settings.extend(dp.get_values_to_set(device, &number_value(temperature))?);
        }

        self.core.write(settings).await
    }

    // =========================================================================
    // Modes
    // =========================================================================

    /// Current HVAC mode; `unavailable` while the device has not reported it
    pub fn hvac_mode(&self) -> String {
        if self.core.dp(HVAC_MODE).is_none() {
            return HVAC_MODE_AUTO.to_string();
        }
        match self.core.value(HVAC_MODE) {
            Some(mode) => value_text(&mode),
            None => STATE_UNAVAILABLE.to_string(),
        }
    }

    pub fn hvac_modes(&self) -> Vec<String> {
        self.core
            .dp(HVAC_MODE)
            .map(|dp| dp.values(self.core.device()).iter().map(value_text).collect())
            .unwrap_or_default()
    }

    pub async fn async_set_hvac_mode(&self, hvac_mode: &str) -> TuyaResult<()> {
        debug!("{}: setting hvac mode to {}", self.name(), hvac_mode);
        self.core.set(HVAC_MODE, json!(hvac_mode), "set_hvac_mode").await
    }

    /// What the device is doing right now, e.g. `heating` or `idle`
    pub fn hvac_action(&self) -> Option<String> {
        self.core.value(HVAC_ACTION).map(|v| value_text(&v))
    }

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
}

impl TuyaEntity for TuyaLocalClimate {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn state(&self) -> Value {
        json!(self.hvac_mode())
    }

    fn state_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("hvac_modes".into(), json!(self.hvac_modes()));
        attrs.insert("hvac_action".into(), json!(self.hvac_action()));
        attrs.insert("current_temperature".into(), json!(self.current_temperature()));
        attrs.insert("temperature".into(), json!(self.target_temperature()));
        attrs.insert("target_temp_step".into(), json!(self.target_temperature_step()));
        attrs.insert("min_temp".into(), json!(self.min_temp()));
        attrs.insert("max_temp".into(), json!(self.max_temp()));
        attrs.insert("temperature_unit".into(), json!(self.temperature_unit()));
        if self.core.dp(PRESET_MODE).is_some() {
            attrs.insert("preset_mode".into(), json!(self.preset_mode()));
            attrs.insert("preset_modes".into(), json!(self.preset_modes()));
        }
        attrs.insert("supported_features".into(), json!(self.supported_features()));
        attrs
    }
}
