mod common;

use serde_json::json;
use tuya_entities::{Switchable, TuyaEntity};

use common::TestDevice;

const SWITCH_DPS: &str = "1";
const LOCK_DPS: &str = "7";

fn setup() -> TestDevice {
    TestDevice::new("himox_h05_purifier")
}

#[tokio::test]
async fn test_purifier() {
    let t = setup();
    let entity = t.entity("fan");
    let fan = entity.as_fan().unwrap();

    assert_eq!(fan.is_on(), Some(true));
    assert_eq!(entity.snapshot().state, json!("on"));
    t.device.set_dp(SWITCH_DPS, json!(false));
    assert_eq!(entity.snapshot().state, json!("off"));

    assert_eq!(fan.preset_modes(), vec!["auto", "low", "mid", "high"]);
    fan.async_turn_on_with(None, Some("high")).await.unwrap();
    t.device.assert_single_batch(json!({"1": true, "4": "high"}));
}

#[test]
fn test_temperature_sensor() {
    let t = setup();
    let entity = t.entity("sensor_current_temperature");
    let sensor = entity.as_sensor().unwrap();

    assert_eq!(sensor.native_value(), Some(json!(21)));
    assert_eq!(sensor.native_unit_of_measurement().as_deref(), Some("°C"));
    assert_eq!(sensor.device_class(), Some("temperature"));
    assert_eq!(sensor.state_class(), Some("measurement"));
}

#[test]
fn test_snapshot_serializes() {
    let t = setup();
    let entity = t.entity("sensor_active_filter_life");
    let snapshot = serde_json::to_value(entity.snapshot()).unwrap();
    assert_eq!(snapshot["config_id"], json!("sensor_active_filter_life"));
    assert_eq!(snapshot["kind"], json!("sensor"));
    assert_eq!(snapshot["name"], json!("Himox H05 air purifier Active filter life"));
    assert_eq!(snapshot["state"], json!(90));
    assert_eq!(snapshot["icon"], json!("mdi:air-filter"));
    assert_eq!(snapshot["entity_category"], json!("diagnostic"));
    assert_eq!(snapshot["attributes"]["unit_of_measurement"], json!("%"));
    assert!(snapshot.get("device_class").is_none());
}

#[tokio::test]
async fn test_child_lock() {
    let t = setup();
    let entity = t.entity("lock_child_lock");
    let lock = entity.as_lock().unwrap();
    assert_eq!(lock.is_locked(), Some(false));
    t.device.set_dp(LOCK_DPS, json!(true));
    assert_eq!(lock.is_locked(), Some(true));
    lock.async_unlock().await.unwrap();
    t.device.assert_single_batch(json!({"7": false}));
}

#[test]
fn test_unmapped_air_quality_passes_through() {
    let t = setup();
    let entity = t.entity("sensor_air_quality");
    assert_eq!(entity.snapshot().state, json!("good"));
}
