//! Mock device for testing
//!
//! Provides an in-memory device whose data point snapshot can be edited
//! between assertions and which records every batched write instead of
//! sending it anywhere.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{DeviceState, Settings, TuyaDevice, TuyaResult, Value, TEMP_CELSIUS};

/// An in-memory device recording batched writes
#[derive(Debug)]
pub struct MockDevice {
    name: String,
    dps: Mutex<HashMap<String, Value>>,
    available: AtomicBool,
    temperature_unit: String,
    batches: Mutex<Vec<Settings>>,
}

impl MockDevice {
    /// Create a new mock device with an empty snapshot
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dps: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
            temperature_unit: TEMP_CELSIUS.to_string(),
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Seed the snapshot from a JSON object of `dp_id -> value`
    pub fn with_payload(self, payload: Value) -> Self {
        if let Value::Object(map) = payload {
            let mut dps = self.dps.lock().unwrap();
            for (id, value) in map {
                dps.insert(id, value);
            }
        }
        self
    }

    /// Set the device's default temperature unit
    pub fn with_temperature_unit(mut self, unit: impl Into<String>) -> Self {
        self.temperature_unit = unit.into();
        self
    }

    /// Set a data point value in the snapshot; `Value::Null` removes it
    pub fn set_dp(&self, id: &str, value: Value) {
        let mut dps = self.dps.lock().unwrap();
        if value.is_null() {
            dps.remove(id);
        } else {
            dps.insert(id.to_string(), value);
        }
    }

    /// Set whether the device reports itself as available
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// All batches written so far
    pub fn batches(&self) -> Vec<Settings> {
        self.batches.lock().unwrap().clone()
    }

    /// Take and clear the recorded batches
    pub fn take_batches(&self) -> Vec<Settings> {
        std::mem::take(&mut *self.batches.lock().unwrap())
    }

    /// Assert that exactly one batch was written since the last call and
    /// that it equals `expected` (a JSON object of `dp_id -> value`)
    pub fn assert_single_batch(&self, expected: Value) {
        let batches = self.take_batches();
        assert_eq!(
            batches.len(),
            1,
            "expected exactly one batched write, got {:?}",
            batches
        );
        let actual = serde_json::to_value(&batches[0]).unwrap();
        assert_eq!(actual, expected, "batched write differs");
    }

    /// Assert that nothing was written since the last call
    pub fn assert_no_writes(&self) {
        let batches = self.take_batches();
        assert!(batches.is_empty(), "expected no writes, got {:?}", batches);
    }
}

impl DeviceState for MockDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_property(&self, dp_id: &str) -> Option<Value> {
        self.dps.lock().unwrap().get(dp_id).cloned()
    }

    fn available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn temperature_unit(&self) -> &str {
        &self.temperature_unit
    }
}

#[async_trait]
impl TuyaDevice for MockDevice {
    async fn async_set_properties(&self, settings: Settings) -> TuyaResult<()> {
        self.batches.lock().unwrap().push(settings);
        Ok(())
    }
}
