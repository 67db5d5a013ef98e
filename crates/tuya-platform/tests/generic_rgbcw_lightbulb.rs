mod common;

use serde_json::json;
use tuya_core::platform::light::SUPPORT_EFFECT;
use tuya_core::platform::ColorMode;
use tuya_entities::{HasBrightness, HasColorMode, HasEffect, TurnOnParams};

use common::TestDevice;

const COLOR_MODE_DPS: &str = "2";
const COLOR_TEMP_DPS: &str = "4";
const RGBHSV_DPS: &str = "5";

fn setup() -> TestDevice {
    TestDevice::new("generic_rgbcw_lightbulb")
}

#[test]
fn test_state() {
    let t = setup();
    let entity = t.entity("light");
    let light = entity.as_light().unwrap();

    assert_eq!(light.color_mode(), ColorMode::White);
    assert_eq!(
        light.supported_color_modes(),
        vec![ColorMode::White, ColorMode::Rgbw]
    );
    assert_eq!(light.brightness(), Some(255));
    assert_eq!(light.color_temp(), Some(153));
    t.device.set_dp(COLOR_TEMP_DPS, json!(255));
    assert_eq!(light.color_temp(), Some(500));
    assert_eq!(light.rgbw_color().unwrap(), Some([255, 0, 0, 255]));
}

#[test]
fn test_effects_come_from_color_mode() {
    let t = setup();
    let entity = t.entity("light");
    let light = entity.as_light().unwrap();

    assert_eq!(light.supported_features(), SUPPORT_EFFECT);
    assert_eq!(light.effect_list(), vec!["Scene", "Music"]);
    assert_eq!(light.effect(), None);
    t.device.set_dp(COLOR_MODE_DPS, json!("music"));
    assert_eq!(light.effect().as_deref(), Some("Music"));
}

#[tokio::test]
async fn test_turn_on_with_color_temp() {
    let t = setup();
    let entity = t.entity("light");
    let light = entity.as_light().unwrap();

    light
        .async_turn_on_with(TurnOnParams::new().with_color_temp(500))
        .await
        .unwrap();
    t.device.assert_single_batch(json!({"2": "white", "4": 255, "1": true}));
}

#[tokio::test]
async fn test_turn_on_with_brightness_in_white_mode() {
    let t = setup();
    let entity = t.entity("light");
    let light = entity.as_light().unwrap();

    light
        .async_turn_on_with(TurnOnParams::new().with_brightness(128))
        .await
        .unwrap();
    t.device.assert_single_batch(json!({"3": 128, "1": true}));

    let err = light
        .async_turn_on_with(TurnOnParams::new().with_brightness(10))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "brightness (10) must be between 25 and 255");
    t.device.assert_no_writes();
}

#[tokio::test]
async fn test_turn_on_with_brightness_in_colour_mode() {
    let t = setup();
    let entity = t.entity("light");
    let light = entity.as_light().unwrap();
    t.device.set_dp(COLOR_MODE_DPS, json!("colour"));
    t.device.set_dp(RGBHSV_DPS, json!("ff00000000ffc8"));

    light
        .async_turn_on_with(TurnOnParams::new().with_brightness(100))
        .await
        .unwrap();
    t.device.assert_single_batch(json!({"2": "colour", "5": "ff00000000ff64", "1": true}));

    t.device.set_dp(RGBHSV_DPS, serde_json::Value::Null);
    light
        .async_turn_on_with(TurnOnParams::new().with_brightness(100))
        .await
        .unwrap();
    t.device.assert_single_batch(json!({"2": "colour", "5": "00000000000064", "1": true}));
}

#[tokio::test]
async fn test_turn_on_with_rgbw() {
    let t = setup();
    let entity = t.entity("light");
    let light = entity.as_light().unwrap();

    light
        .async_turn_on_with(TurnOnParams::new().with_rgbw([0, 255, 0, 128]))
        .await
        .unwrap();
    t.device.assert_single_batch(json!({"2": "colour", "5": "00ff000078ff80", "1": true}));
}

#[tokio::test]
async fn test_turn_on_with_effect() {
    let t = setup();
    let entity = t.entity("light");
    let light = entity.as_light().unwrap();

    light
        .async_turn_on_with(TurnOnParams::new().with_effect("Scene"))
        .await
        .unwrap();
    t.device.assert_single_batch(json!({"2": "scene", "1": true}));
}
