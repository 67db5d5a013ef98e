//! Shared helpers for the bundled profile tests
//!
//! Each test sets a profile up against a mock device seeded from
//! `tests/fixtures/<device_type>.json`, with every entity enabled.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tuya_config::DeviceConfigRegistry;
use tuya_core::testing::MockDevice;
use tuya_platform::{setup_device, AnyEntity, DeviceEntities, DiscoveryInfo};

/// Load a fixture file as a string
pub fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);

    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture '{}' from {:?}: {}", name, path, e))
}

/// Load a fixture file as JSON
pub fn load_json_fixture(name: &str) -> Value {
    let content = load_fixture(name);
    serde_json::from_str(&content).unwrap_or_else(|e| panic!("Failed to parse fixture '{}' as JSON: {}", name, e))
}

pub fn devices_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../devices")
}

/// A bundled profile set up against a mock device
pub struct TestDevice {
    pub device: Arc<MockDevice>,
    entities: DeviceEntities,
}

impl TestDevice {
    pub fn new(device_type: &str) -> Self {
        let registry = DeviceConfigRegistry::from_dir(devices_dir()).unwrap();
        let config = registry.require(device_type).unwrap();
        let payload = load_json_fixture(&format!("{}.json", device_type));
        let device = Arc::new(MockDevice::new(config.name.clone()).with_payload(payload));

        let discovery = DiscoveryInfo::with_defaults("0123456789abcdef", &config, true);
        let entities = DeviceEntities::new();
        setup_device(&registry, device.clone(), &discovery, &entities).unwrap();
        Self { device, entities }
    }

    /// Entity by config id; panics if the profile did not set it up
    pub fn entity(&self, config_id: &str) -> Arc<AnyEntity> {
        self.entities
            .get(config_id)
            .unwrap_or_else(|| panic!("no entity {} in {:?}", config_id, self.entities.config_ids()))
    }

    pub fn config_ids(&self) -> Vec<String> {
        self.entities.config_ids()
    }
}

pub fn approx_eq(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|a| (a - expected).abs() < 1e-6)
}
