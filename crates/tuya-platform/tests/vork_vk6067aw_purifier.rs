mod common;

use serde_json::json;
use tuya_core::platform::fan::SUPPORT_PRESET_MODE;
use tuya_core::platform::ColorMode;
use tuya_entities::{HasColorMode, Switchable, TuyaEntity};

use common::TestDevice;

const LIGHT_DPS: &str = "8";
const AIR_QUALITY_DPS: &str = "21";

fn setup() -> TestDevice {
    TestDevice::new("vork_vk6067aw_purifier")
}

#[test]
fn test_entities() {
    let t = setup();
    assert_eq!(
        t.config_ids(),
        vec![
            "binary_sensor_error",
            "fan",
            "light",
            "select_timer",
            "sensor_air_quality",
            "sensor_filter",
            "sensor_timer",
            "switch_filter_reset",
        ]
    );
}

#[tokio::test]
async fn test_purifier() {
    let t = setup();
    let entity = t.entity("fan");
    let fan = entity.as_fan().unwrap();

    assert_eq!(fan.supported_features(), SUPPORT_PRESET_MODE);
    assert_eq!(fan.speed_count(), 0);
    assert_eq!(fan.percentage(), None);
    assert_eq!(fan.icon().as_deref(), Some("mdi:air-purifier"));
    assert_eq!(fan.preset_mode().as_deref(), Some("Auto"));
    assert_eq!(fan.preset_modes(), vec!["Low", "Mid", "High", "Auto", "Sleep"]);

    fan.async_set_preset_mode("Sleep").await.unwrap();
    t.device.assert_single_batch(json!({"4": "sleep"}));
    assert!(fan.async_set_percentage(50.0).await.is_err());
    t.device.assert_no_writes();
}

#[tokio::test]
async fn test_display_light() {
    let t = setup();
    let entity = t.entity("light");
    let light = entity.as_light().unwrap();

    assert_eq!(light.name(), "Vork VK6067AW air purifier");
    assert_eq!(light.is_on(), Some(true));
    assert_eq!(light.color_mode(), ColorMode::OnOff);
    assert_eq!(light.supported_color_modes(), vec![ColorMode::OnOff]);

    light.async_turn_off().await.unwrap();
    t.device.assert_single_batch(json!({"8": false}));
    t.device.set_dp(LIGHT_DPS, json!(false));
    light.async_toggle().await.unwrap();
    t.device.assert_single_batch(json!({"8": true}));
}

#[test]
fn test_air_quality() {
    let t = setup();
    let entity = t.entity("sensor_air_quality");
    let sensor = entity.as_sensor().unwrap();
    assert_eq!(sensor.native_value(), Some(json!("Great")));
    t.device.set_dp(AIR_QUALITY_DPS, json!("severe"));
    assert_eq!(sensor.native_value(), Some(json!("Poor")));
    assert_eq!(sensor.entity_category(), None);
}

#[tokio::test]
async fn test_timer_and_filter() {
    let t = setup();
    let entity = t.entity("select_timer");
    let timer = entity.as_select().unwrap();
    assert_eq!(timer.current_option().as_deref(), Some("off"));
    timer.async_select_option("2 hours").await.unwrap();
    t.device.assert_single_batch(json!({"18": "2h"}));

    let entity = t.entity("sensor_timer");
    let remaining = entity.as_sensor().unwrap();
    assert_eq!(remaining.native_unit_of_measurement().as_deref(), Some("min"));

    let entity = t.entity("sensor_filter");
    assert_eq!(entity.snapshot().state, json!(80));

    let entity = t.entity("switch_filter_reset");
    entity.switchable().unwrap().async_turn_on().await.unwrap();
    t.device.assert_single_batch(json!({"11": true}));
}
