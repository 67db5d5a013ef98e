//! A device backed by a fixed snapshot of data point values
//!
//! Writes are logged, applied to the snapshot and kept so the caller can
//! show what a command would have sent.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;
use tuya_core::{DeviceState, Settings, TuyaDevice, TuyaResult, Value};

#[derive(Debug)]
pub struct SnapshotDevice {
    name: String,
    dps: DashMap<String, Value>,
    writes: Mutex<Vec<Settings>>,
}

impl SnapshotDevice {
    pub fn new(name: impl Into<String>, payload: serde_json::Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            dps: payload.into_iter().filter(|(_, v)| !v.is_null()).collect(),
            writes: Mutex::new(Vec::new()),
        }
    }

    /// Every batch written so far, oldest first
    pub async fn writes(&self) -> Vec<Settings> {
        self.writes.lock().await.clone()
    }
}

impl DeviceState for SnapshotDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_property(&self, dp_id: &str) -> Option<Value> {
        self.dps.get(dp_id).map(|r| r.value().clone())
    }

    fn available(&self) -> bool {
        true
    }
}

#[async_trait]
impl TuyaDevice for SnapshotDevice {
    async fn async_set_properties(&self, settings: Settings) -> TuyaResult<()> {
        info!(device = %self.name, ?settings, "Writing data points");
        for (id, value) in &settings {
            self.dps.insert(id.clone(), value.clone());
        }
        self.writes.lock().await.push(settings);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> serde_json::Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    #[tokio::test]
    async fn test_writes_update_snapshot() {
        let device = SnapshotDevice::new("Plug", payload(json!({"1": false, "2": null})));
        assert_eq!(device.get_property("1"), Some(json!(false)));
        assert_eq!(device.get_property("2"), None);

        let mut settings = Settings::new();
        settings.insert("1".to_string(), json!(true));
        device.async_set_properties(settings).await.unwrap();

        assert_eq!(device.get_property("1"), Some(json!(true)));
        assert_eq!(device.writes().await.len(), 1);
    }
}
