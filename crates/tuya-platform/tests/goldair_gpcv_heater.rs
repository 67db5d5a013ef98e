mod common;

use serde_json::json;
use tuya_core::platform::climate::{HVAC_MODE_HEAT, HVAC_MODE_OFF};
use tuya_entities::TuyaEntity;

use common::{approx_eq, TestDevice};

const HVACMODE_DPS: &str = "1";
const LOCK_DPS: &str = "2";
const ERROR_DPS: &str = "6";

fn setup() -> TestDevice {
    TestDevice::new("goldair_gpcv_heater")
}

#[test]
fn test_entities() {
    let t = setup();
    assert_eq!(
        t.config_ids(),
        vec!["binary_sensor_error", "climate", "lock_child_lock", "number_timer"]
    );
}

#[tokio::test]
async fn test_climate() {
    let t = setup();
    let entity = t.entity("climate");
    let climate = entity.as_climate().unwrap();

    assert_eq!(climate.hvac_mode(), HVAC_MODE_HEAT);
    assert_eq!(climate.icon().as_deref(), Some("mdi:radiator"));
    t.device.set_dp(HVACMODE_DPS, json!(false));
    assert_eq!(climate.icon().as_deref(), Some("mdi:radiator-disabled"));
    assert_eq!(climate.hvac_mode(), HVAC_MODE_OFF);

    assert!(approx_eq(climate.target_temperature(), 22.0));
    assert_eq!(climate.min_temp(), 15.0);
    assert_eq!(climate.max_temp(), 35.0);
    assert_eq!(climate.preset_modes(), vec!["Low", "High"]);

    climate.async_set_temperature(Some(25.0), Some("High")).await.unwrap();
    t.device.assert_single_batch(json!({"7": "High", "3": 25}));

    let err = climate.async_set_target_temperature(14.0).await.unwrap_err();
    assert_eq!(err.to_string(), "temperature (14) must be between 15 and 35");
}

#[test]
fn test_extra_state_attributes() {
    let t = setup();
    let entity = t.entity("climate");
    assert_eq!(
        serde_json::Value::Object(entity.entity().extra_state_attributes()),
        json!({"error": "OK", "timer": 0})
    );
}

#[tokio::test]
async fn test_child_lock() {
    let t = setup();
    let entity = t.entity("lock_child_lock");
    let lock = entity.as_lock().unwrap();

    assert_eq!(lock.state(), json!("unlocked"));
    assert!(!lock.is_jammed());
    t.device.set_dp(LOCK_DPS, json!(true));
    assert_eq!(lock.state(), json!("locked"));
    t.device.set_dp(LOCK_DPS, serde_json::Value::Null);
    assert_eq!(lock.state(), serde_json::Value::Null);

    lock.async_lock().await.unwrap();
    t.device.assert_single_batch(json!({"2": true}));
}

#[tokio::test]
async fn test_timer() {
    let t = setup();
    let entity = t.entity("number_timer");
    let timer = entity.as_number().unwrap();

    assert_eq!(timer.min_value(), 0.0);
    assert_eq!(timer.max_value(), 24.0);
    assert_eq!(timer.step(), 1.0);
    assert_eq!(timer.unit().as_deref(), Some("h"));
    timer.async_set_value(2.0).await.unwrap();
    t.device.assert_single_batch(json!({"5": 2}));
    assert!(timer.async_set_value(25.0).await.is_err());
    t.device.assert_no_writes();
}

#[test]
fn test_error_sensor_default_rule() {
    let t = setup();
    let entity = t.entity("binary_sensor_error");
    let sensor = entity.as_binary_sensor().unwrap();
    assert_eq!(sensor.is_on(), Some(false));
    t.device.set_dp(ERROR_DPS, json!("E1"));
    assert_eq!(sensor.is_on(), Some(true));
}
