//! Light entity
//!
//! Roles: `switch`, `brightness`, `color_mode`, `color_temp`, `rgbhsv` and
//! `effect`. Lights without an effect data point emulate effects through the
//! color mode data point's non color mode values (`scene`, `music`, ...).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;
use tuya_core::color::{hs_to_rgb, rgb_to_hs};
use tuya_core::platform::light::{MAX_MIREDS, MIN_MIREDS, SUPPORT_EFFECT};
use tuya_core::platform::ColorMode;
use tuya_core::{Settings, TuyaDevice, TuyaError, TuyaResult, Value};
use tuya_dps::format::{pack, unpack};
use tuya_dps::value::{as_number, truthy, value_text};
use tuya_dps::EntityDescriptor;

use crate::entity::{Attributes, EntityCore, TuyaEntity};
use crate::traits::{HasBrightness, HasColorMode, HasEffect, Switchable};

const SWITCH: &str = "switch";
const BRIGHTNESS: &str = "brightness";
const COLOR_MODE: &str = "color_mode";
const COLOR_TEMP: &str = "color_temp";
const RGBHSV: &str = "rgbhsv";
const EFFECT: &str = "effect";

const ROLES: &[&str] = &[SWITCH, BRIGHTNESS, COLOR_MODE, COLOR_TEMP, RGBHSV, EFFECT];

/// Width of the host's mired scale
const MIRED_SPAN: f64 = (MAX_MIREDS - MIN_MIREDS) as f64;

/// Parameters of a turn on command; anything left `None` is not changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnOnParams {
    pub brightness: Option<u8>,
    pub color_mode: Option<String>,
    /// Colour temperature in mireds
    pub color_temp: Option<u32>,
    pub rgbw_color: Option<[u8; 4]>,
    pub effect: Option<String>,
}

impl TurnOnParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = Some(brightness);
        self
    }

    pub fn with_color_mode(mut self, mode: impl Into<String>) -> Self {
        self.color_mode = Some(mode.into());
        self
    }

    pub fn with_color_temp(mut self, mireds: u32) -> Self {
        self.color_temp = Some(mireds);
        self
    }

    pub fn with_rgbw(mut self, rgbw: [u8; 4]) -> Self {
        self.rgbw_color = Some(rgbw);
        self
    }

    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effect = Some(effect.into());
        self
    }
}

/// A Tuya light
#[derive(Debug)]
pub struct TuyaLocalLight {
    core: EntityCore,
}

impl TuyaLocalLight {
    pub fn new(device: Arc<dyn TuyaDevice>, config: &EntityDescriptor) -> Self {
        Self {
            core: EntityCore::new(device, config, ROLES),
        }
    }

    /// Colour temperature in mireds
    ///
    /// The device range is mapped linearly onto 153..=500 mireds; without a
    /// range the raw value is reported. The result is not clamped, so a
    /// range that does not start at zero can report values off that scale.
    pub fn color_temp(&self) -> Option<i64> {
        let dp = self.core.dp(COLOR_TEMP)?;
        let device = self.core.device();
        let raw = as_number(&dp.get_value(device)?)?;
        let mireds = match dp.range(device) {
            Some(range) if range.span() != 0.0 => {
                (raw * MIRED_SPAN / range.span() + f64::from(MIN_MIREDS) - range.min).round_ties_even()
            }
            _ => raw,
        } as i64;
        if !(i64::from(MIN_MIREDS)..=i64::from(MAX_MIREDS)).contains(&mireds) {
            debug!("{}: color temp {} is outside {}..={} mireds", self.name(), mireds, MIN_MIREDS, MAX_MIREDS);
        }
        Some(mireds)
    }

    /// Current colour as red, green, blue and white channels
    ///
    /// Red, green and blue come from the hue and saturation fields; white is
    /// the value field. Fails if a field's range does not start at zero.
    pub fn rgbw_color(&self) -> TuyaResult<Option<[u8; 4]>> {
        let Some(dp) = self.core.dp(RGBHSV) else {
            return Ok(None);
        };
        let Some(fields) = dp.format() else {
            return Ok(None);
        };
        let Some(data) = dp.decoded_value(self.core.device())? else {
            return Ok(None);
        };

        let (mut hue, mut saturation, mut value) = (None, None, None);
        for (field, (name, raw)) in fields.iter().zip(unpack(fields, &data)?) {
            let range = field.effective_range();
            if range.min != 0.0 {
                return Err(TuyaError::Config(format!(
                    "Unhandled minimum range for {} in RGBW value",
                    name
                )));
            }
            if range.max <= 0.0 {
                return Err(TuyaError::Config(format!("Empty range for {} in RGBW value", name)));
            }
            let scale = match name.as_str() {
                "h" => 360.0 / range.max,
                "s" => 100.0 / range.max,
                _ => 255.0 / range.max,
            };
            let scaled = (scale * f64::from(raw)).round_ties_even();
            match name.as_str() {
                "h" => hue = Some(scaled),
                "s" => saturation = Some(scaled),
                "v" => value = Some(scaled),
                _ => {}
            }
        }

        let (Some(hue), Some(saturation), Some(value)) = (hue, saturation, value) else {
            return Err(TuyaError::Config(format!(
                "{} format needs h, s and v fields for RGBW",
                dp.name()
            )));
        };
        let (r, g, b) = hs_to_rgb(hue, saturation);
        Ok(Some([r, g, b, value.clamp(0.0, 255.0) as u8]))
    }

    pub fn supported_features(&self) -> u32 {
        if self.effect_list().is_empty() {
            0
        } else {
            SUPPORT_EFFECT
        }
    }

    /// Turn the light on, applying whatever `params` asks for in one write
    pub async fn async_turn_on_with(&self, params: TurnOnParams) -> TuyaResult<()> {
        let device = self.core.device();
        let mut settings = Settings::new();
        let explicit_mode = params.color_mode.as_deref();
        let current_mode = self.color_mode();
        let mut color_mode = explicit_mode.unwrap_or(current_mode.as_str()).to_string();
        let color_mode_dp = self.core.dp(COLOR_MODE);
        let effect_dp = self.core.dp(EFFECT);

        let color_temp_dp = self.core.dp(COLOR_TEMP);
        let rgbhsv_dp = self.core.dp(RGBHSV);

        if let (Some(dp), Some(mireds)) = (color_temp_dp, params.color_temp) {
            if explicit_mode.is_none() {
                color_mode = ColorMode::White.to_string();
            }
            if let Some(mode_dp) = color_mode_dp {
                debug!("Auto setting color mode to {} for color temp", color_mode);
                settings.extend(mode_dp.get_values_to_set(device, &json!(color_mode))?);
            }
            let value = match dp.range(device) {
                Some(range) if mireds != 0 => {
                    ((f64::from(mireds) - f64::from(MIN_MIREDS) + range.min) * range.span() / MIRED_SPAN)
                        .round_ties_even()
                }
                _ => f64::from(mireds),
            };
            debug!("Setting color temp to {}", value);
            settings.extend(dp.get_values_to_set(device, &json!(value as i64))?);
        } else if let Some(dp) = rgbhsv_dp.filter(|_| {
            params.rgbw_color.is_some() || (params.brightness.is_some() && color_mode == ColorMode::Rgbw.as_str())
        }) {
            if explicit_mode.is_none() {
                color_mode = ColorMode::Rgbw.to_string();
            }
            if let Some(mode_dp) = color_mode_dp {
                debug!("Auto setting color mode to {}", color_mode);
                settings.extend(mode_dp.get_values_to_set(device, &json!(color_mode))?);
            }
            let rgbw = match params.rgbw_color {
                Some(rgbw) => rgbw,
                None => self.rgbw_color()?.unwrap_or_default(),
            };
            let brightness = params.brightness.unwrap_or(rgbw[3]);
            if let Some(fields) = dp.format() {
                let [r, g, b, _] = rgbw;
                let (h, s) = rgb_to_hs(r, g, b);
                debug!("Setting RGBW as {},{},{},{},{},{}", r, g, b, h, s, brightness);
                let mut ordered = Vec::with_capacity(fields.len());
                for field in fields {
                    let max = field.effective_range().max;
                    let channel = match field.name.as_str() {
                        "r" => f64::from(r) * max / 255.0,
                        "g" => f64::from(g) * max / 255.0,
                        "b" => f64::from(b) * max / 255.0,
                        "h" => h * max / 360.0,
                        "s" => s * max / 100.0,
                        "v" => f64::from(brightness) * max / 255.0,
                        other => {
                            return Err(TuyaError::Config(format!(
                                "Unhandled field {} in RGBW value",
                                other
                            )))
                        }
                    };
                    ordered.push(channel.round_ties_even().max(0.0) as u32);
                }
                let encoded = dp.encode_value(&pack(fields, &ordered)?)?;
                settings.extend(dp.get_values_to_set(device, &encoded)?);
            }
        } else if let (Some(mode_dp), Some(mode)) = (color_mode_dp, explicit_mode) {
            if !mode.is_empty() {
                debug!("Explicitly setting color mode to {}", mode);
                settings.extend(mode_dp.get_values_to_set(device, &json!(mode))?);
            } else if effect_dp.is_none() {
                if let Some(effect) = params.effect.as_deref().filter(|e| !e.is_empty()) {
                    debug!("Emulating effect using color mode of {}", effect);
                    settings.extend(mode_dp.get_values_to_set(device, &json!(effect))?);
                }
            }
        } else if let (Some(mode_dp), None, Some(effect)) = (color_mode_dp, effect_dp, params.effect.as_deref()) {
            if self.effect_list().iter().any(|e| e == effect) {
                debug!("Emulating effect using color mode of {}", effect);
                settings.extend(mode_dp.get_values_to_set(device, &json!(effect))?);
            }
        }

        if let (Some(bright), Some(dp)) = (params.brightness, self.core.dp(BRIGHTNESS)) {
            if color_mode != ColorMode::Rgbw.as_str() {
                debug!("Setting brightness to {}", bright);
                settings.extend(dp.get_values_to_set(device, &json!(bright))?);
            }
        }

        if let Some(dp) = self.core.dp(SWITCH) {
            settings.extend(dp.get_values_to_set(device, &json!(true))?);
        }

        if let (Some(dp), Some(effect)) = (effect_dp, params.effect.as_deref()) {
            if !effect.is_empty() {
                debug!("Setting effect to {}", effect);
                settings.extend(dp.get_values_to_set(device, &json!(effect))?);
            }
        }

        self.core.write(settings).await
    }
}

impl TuyaEntity for TuyaLocalLight {
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
        attrs.insert("color_mode".into(), json!(self.color_mode()));
        attrs.insert("supported_color_modes".into(), json!(self.supported_color_modes()));
        attrs.insert("brightness".into(), json!(self.brightness()));
        attrs.insert("color_temp".into(), json!(self.color_temp()));
        match self.rgbw_color() {
            Ok(rgbw) => {
                attrs.insert("rgbw_color".into(), json!(rgbw));
            }
            Err(e) => debug!("{}: rgbw_color unavailable: {}", self.name(), e),
        }
        attrs.insert("effect".into(), json!(self.effect()));
        attrs.insert("effect_list".into(), json!(self.effect_list()));
        attrs.insert("supported_features".into(), json!(self.supported_features()));
        attrs
    }
}

#[async_trait]
impl Switchable for TuyaLocalLight {
    /// The switch, else whether brightness is above zero, else availability
    fn is_on(&self) -> Option<bool> {
        if self.core.dp(SWITCH).is_some() {
            self.core.value(SWITCH).map(|v| truthy(&v))
        } else if self.core.dp(BRIGHTNESS).is_some() {
            Some(self.brightness().is_some_and(|b| b > 0))
        } else {
            Some(self.available())
        }
    }

    async fn async_turn_on(&self) -> TuyaResult<()> {
        self.async_turn_on_with(TurnOnParams::default()).await
    }

    async fn async_turn_off(&self) -> TuyaResult<()> {
        if self.core.dp(SWITCH).is_some() {
            self.core.set(SWITCH, json!(false), "turn_off").await
        } else if self.core.dp(BRIGHTNESS).is_some() {
            self.core.set(BRIGHTNESS, json!(0), "turn_off").await
        } else {
            Err(self.core.not_implemented("turn_off"))
        }
    }
}

impl HasBrightness for TuyaLocalLight {
    fn brightness(&self) -> Option<u8> {
        let value = as_number(&self.core.value(BRIGHTNESS)?)?;
        Some(value.round_ties_even().clamp(0.0, 255.0) as u8)
    }
}

impl HasColorMode for TuyaLocalLight {
    fn color_mode(&self) -> ColorMode {
        if let Some(mode) = self
            .core
            .value(COLOR_MODE)
            .and_then(|v| ColorMode::parse(&value_text(&v)))
        {
            return mode;
        }

        if self.core.dp(RGBHSV).is_some() {
            ColorMode::Rgbw
        } else if self.core.dp(COLOR_TEMP).is_some() {
            ColorMode::ColorTemp
        } else if self.core.dp(BRIGHTNESS).is_some() {
            ColorMode::Brightness
        } else if self.core.dp(SWITCH).is_some() {
            ColorMode::OnOff
        } else {
            ColorMode::Unknown
        }
    }

    fn supported_color_modes(&self) -> Vec<ColorMode> {
        if let Some(dp) = self.core.dp(COLOR_MODE) {
            return dp
                .values(self.core.device())
                .iter()
                .filter_map(|v| ColorMode::parse(&value_text(v)))
                .collect();
        }
        match self.color_mode() {
            ColorMode::Unknown => Vec::new(),
            mode => vec![mode],
        }
    }
}

impl HasEffect for TuyaLocalLight {
    fn effect_list(&self) -> Vec<String> {
        let device = self.core.device();
        if let Some(dp) = self.core.dp(EFFECT) {
            dp.values(device).iter().map(value_text).collect()
        } else if let Some(dp) = self.core.dp(COLOR_MODE) {
            dp.values(device)
                .iter()
                .map(value_text)
                .filter(|v| !ColorMode::is_valid(v))
                .collect()
        } else {
            Vec::new()
        }
    }

    fn effect(&self) -> Option<String> {
        if self.core.dp(EFFECT).is_some() {
            self.core.value(EFFECT).map(|v| value_text(&v))
        } else {
            self.core
                .value(COLOR_MODE)
                .map(|v| value_text(&v))
                .filter(|mode| !ColorMode::is_valid(mode))
        }
    }
}
