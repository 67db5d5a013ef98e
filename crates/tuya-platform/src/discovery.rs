//! Discovery info: which device type a device is and which of its entities
//! are enabled
//!
//! A config entry stores the device type under `type` and one boolean flag
//! per entity config id. Options saved later override the entry's data.

use serde::{Deserialize, Serialize};
use tuya_config::DeviceConfig;
use tuya_core::Value;

use crate::error::PlatformResult;

pub type EntryData = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryInfo {
    #[serde(default)]
    pub device_id: String,
    #[serde(rename = "type")]
    pub device_type: String,
    /// Entity flags and any other entry keys (host, local key, ...)
    #[serde(flatten)]
    pub flags: EntryData,
}

impl DiscoveryInfo {
    pub fn new(device_id: impl Into<String>, device_type: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            device_type: device_type.into(),
            flags: EntryData::new(),
        }
    }

    /// Discovery info with the primary entity and, if `secondary` is set,
    /// every secondary entity enabled
    pub fn with_defaults(device_id: impl Into<String>, config: &DeviceConfig, secondary: bool) -> Self {
        let mut info = Self::new(device_id, config.device_type.clone());
        for (config_id, enabled) in config.default_flags(secondary) {
            info.flags.insert(config_id, Value::Bool(enabled));
        }
        info
    }

    /// Merge a config entry's data with its options, options winning
    pub fn from_entry(data: &EntryData, options: &EntryData) -> PlatformResult<Self> {
        let mut merged = data.clone();
        merged.extend(options.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(serde_json::from_value(Value::Object(merged))?)
    }

    pub fn enable(mut self, config_id: impl Into<String>) -> Self {
        self.flags.insert(config_id.into(), Value::Bool(true));
        self
    }

    pub fn disable(mut self, config_id: impl Into<String>) -> Self {
        self.flags.insert(config_id.into(), Value::Bool(false));
        self
    }

    /// Whether the entity with this config id should be set up
    pub fn is_enabled(&self, config_id: &str) -> bool {
        matches!(self.flags.get(config_id), Some(Value::Bool(true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: Value) -> EntryData {
        match value {
            Value::Object(map) => map,
            _ => panic!("entry data must be an object"),
        }
    }

    #[test]
    fn test_options_override_data() {
        let data = entry(json!({
            "device_id": "abc",
            "type": "lefant_m213_vacuum",
            "host": "192.168.1.20",
            "vacuum": true,
            "sensor_clean_area": true,
        }));
        let options = entry(json!({"sensor_clean_area": false}));

        let info = DiscoveryInfo::from_entry(&data, &options).unwrap();
        assert_eq!(info.device_type, "lefant_m213_vacuum");
        assert!(info.is_enabled("vacuum"));
        assert!(!info.is_enabled("sensor_clean_area"));
        assert!(!info.is_enabled("sensor_clean_time"));
        assert_eq!(info.flags.get("host"), Some(&json!("192.168.1.20")));
    }

    #[test]
    fn test_missing_type_is_rejected() {
        let data = entry(json!({"device_id": "abc", "vacuum": true}));
        assert!(DiscoveryInfo::from_entry(&data, &EntryData::new()).is_err());
    }

    #[test]
    fn test_builder_flags() {
        let info = DiscoveryInfo::new("abc", "goldair_gpcv_heater")
            .enable("climate")
            .disable("lock_child_lock");
        assert!(info.is_enabled("climate"));
        assert!(!info.is_enabled("lock_child_lock"));
    }
}
