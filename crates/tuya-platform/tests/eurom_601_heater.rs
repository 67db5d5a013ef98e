mod common;

use serde_json::json;
use tuya_core::platform::climate::{HVAC_MODE_HEAT, PRESET_COMFORT, PRESET_ECO};
use tuya_entities::TuyaEntity;

use common::{approx_eq, TestDevice};

const PRESET_DPS: &str = "6";
const ERROR_DPS: &str = "13";

fn setup() -> TestDevice {
    TestDevice::new("eurom_601_heater")
}

#[test]
fn test_climate_state() {
    let t = setup();
    let entity = t.entity("climate");
    let climate = entity.as_climate().unwrap();

    assert_eq!(climate.hvac_mode(), HVAC_MODE_HEAT);
    assert!(approx_eq(climate.target_temperature(), 24.0));
    assert!(approx_eq(climate.current_temperature(), 21.0));
    assert_eq!(climate.min_temp(), 0.0);
    assert_eq!(climate.max_temp(), 37.0);
    assert_eq!(climate.name(), "Eurom Mon Soleil 601 heater");
}

#[tokio::test]
async fn test_boolean_preset() {
    let t = setup();
    let entity = t.entity("climate");
    let climate = entity.as_climate().unwrap();

    assert_eq!(climate.preset_mode().as_deref(), Some(PRESET_COMFORT));
    t.device.set_dp(PRESET_DPS, json!(true));
    assert_eq!(climate.preset_mode().as_deref(), Some(PRESET_ECO));
    assert_eq!(climate.preset_modes(), vec![PRESET_ECO, PRESET_COMFORT]);

    climate.async_set_preset_mode(PRESET_COMFORT).await.unwrap();
    t.device.assert_single_batch(json!({"6": false}));
}

#[test]
fn test_error() {
    let t = setup();
    let entity = t.entity("binary_sensor_error");
    assert_eq!(entity.snapshot().state, json!("off"));
    t.device.set_dp(ERROR_DPS, json!(4));
    assert_eq!(entity.snapshot().state, json!("on"));

    let climate = t.entity("climate");
    assert_eq!(
        serde_json::Value::Object(climate.entity().extra_state_attributes()),
        json!({"error": 4})
    );
}

#[test]
fn test_unavailable_device() {
    let t = setup();
    let entity = t.entity("climate");
    assert!(entity.snapshot().available);
    t.device.set_available(false);
    assert!(!entity.snapshot().available);
}
