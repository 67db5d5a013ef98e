//! Host platform vocabulary
//!
//! Attribute names, color modes, HVAC modes and feature flags as the host
//! entity framework defines them. These are a fixed external contract and must
//! match the framework exactly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Light color modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    Unknown,
    #[serde(rename = "onoff")]
    OnOff,
    Brightness,
    ColorTemp,
    Hs,
    Xy,
    Rgb,
    Rgbw,
    Rgbww,
    White,
}

impl ColorMode {
    /// Every color mode token the host framework recognises
    pub const ALL: [ColorMode; 10] = [
        ColorMode::Unknown,
        ColorMode::OnOff,
        ColorMode::Brightness,
        ColorMode::ColorTemp,
        ColorMode::Hs,
        ColorMode::Xy,
        ColorMode::Rgb,
        ColorMode::Rgbw,
        ColorMode::Rgbww,
        ColorMode::White,
    ];

    /// The token used on the wire and in service data
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Unknown => "unknown",
            ColorMode::OnOff => "onoff",
            ColorMode::Brightness => "brightness",
            ColorMode::ColorTemp => "color_temp",
            ColorMode::Hs => "hs",
            ColorMode::Xy => "xy",
            ColorMode::Rgb => "rgb",
            ColorMode::Rgbw => "rgbw",
            ColorMode::Rgbww => "rgbww",
            ColorMode::White => "white",
        }
    }

    /// Parse a token, returning `None` for anything the framework does not
    /// recognise as a color mode
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == token)
    }

    /// Whether `token` is a recognised color mode
    pub fn is_valid(token: &str) -> bool {
        Self::parse(token).is_some()
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown color mode '{}'", s))
    }
}

/// Light service attributes and constants
pub mod light {
    pub const ATTR_BRIGHTNESS: &str = "brightness";
    pub const ATTR_COLOR_MODE: &str = "color_mode";
    pub const ATTR_COLOR_TEMP: &str = "color_temp";
    pub const ATTR_EFFECT: &str = "effect";
    pub const ATTR_RGBW_COLOR: &str = "rgbw_color";

    /// Lowest color temperature the framework uses, in mireds
    pub const MIN_MIREDS: u32 = 153;
    /// Highest color temperature the framework uses, in mireds
    pub const MAX_MIREDS: u32 = 500;

    pub const SUPPORT_EFFECT: u32 = 4;
}

/// Climate modes, actions and feature flags
pub mod climate {
    pub const HVAC_MODE_OFF: &str = "off";
    pub const HVAC_MODE_HEAT: &str = "heat";
    pub const HVAC_MODE_COOL: &str = "cool";
    pub const HVAC_MODE_HEAT_COOL: &str = "heat_cool";
    pub const HVAC_MODE_AUTO: &str = "auto";
    pub const HVAC_MODE_DRY: &str = "dry";
    pub const HVAC_MODE_FAN_ONLY: &str = "fan_only";

    pub const CURRENT_HVAC_OFF: &str = "off";
    pub const CURRENT_HVAC_HEAT: &str = "heating";
    pub const CURRENT_HVAC_COOL: &str = "cooling";
    pub const CURRENT_HVAC_IDLE: &str = "idle";

    pub const PRESET_ECO: &str = "eco";
    pub const PRESET_COMFORT: &str = "comfort";

    pub const SUPPORT_TARGET_TEMPERATURE: u32 = 1;
    pub const SUPPORT_PRESET_MODE: u32 = 16;

    pub const DEFAULT_MIN_TEMP: f64 = 7.0;
    pub const DEFAULT_MAX_TEMP: f64 = 35.0;
}

/// Fan feature flags
pub mod fan {
    pub const SUPPORT_SET_SPEED: u32 = 1;
    pub const SUPPORT_OSCILLATE: u32 = 2;
    pub const SUPPORT_DIRECTION: u32 = 4;
    pub const SUPPORT_PRESET_MODE: u32 = 8;
}

/// Vacuum states, service names and feature flags
pub mod vacuum {
    pub const STATE_CLEANING: &str = "cleaning";
    pub const STATE_DOCKED: &str = "docked";
    pub const STATE_RETURNING: &str = "returning";
    pub const STATE_ERROR: &str = "error";

    pub const SERVICE_RETURN_TO_BASE: &str = "return_to_base";
    pub const SERVICE_CLEAN_SPOT: &str = "clean_spot";

    pub const SUPPORT_TURN_ON: u32 = 1;
    pub const SUPPORT_TURN_OFF: u32 = 2;
    pub const SUPPORT_PAUSE: u32 = 4;
    pub const SUPPORT_STOP: u32 = 8;
    pub const SUPPORT_RETURN_HOME: u32 = 16;
    pub const SUPPORT_FAN_SPEED: u32 = 32;
    pub const SUPPORT_BATTERY: u32 = 64;
    pub const SUPPORT_STATUS: u32 = 128;
    pub const SUPPORT_SEND_COMMAND: u32 = 256;
    pub const SUPPORT_LOCATE: u32 = 512;
    pub const SUPPORT_CLEAN_SPOT: u32 = 1024;
    pub const SUPPORT_STATE: u32 = 4096;
    pub const SUPPORT_START: u32 = 8192;
}
