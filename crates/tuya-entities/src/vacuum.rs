//! Robot vacuum entity
//!
//! Roles: `power`, `activate`, `status`, `command`, `direction_control`,
//! `battery`, `locate`, `error` and `fan_speed`. Devices without a separate
//! `command` data point take cleaning commands through `status`.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;
use tuya_core::platform::vacuum::*;
use tuya_core::{TuyaDevice, TuyaError, TuyaResult, Value};
use tuya_dps::value::{as_number, loose_eq, truthy, value_text};
use tuya_dps::{DpDescriptor, EntityDescriptor};

use crate::entity::{Attributes, EntityCore, TuyaEntity};
use crate::traits::Switchable;

const POWER: &str = "power";
const ACTIVATE: &str = "activate";
const STATUS: &str = "status";
const COMMAND: &str = "command";
const DIRECTION: &str = "direction_control";
const BATTERY: &str = "battery";
const LOCATE: &str = "locate";
const ERROR: &str = "error";
const FAN_SPEED: &str = "fan_speed";

const ROLES: &[&str] = &[POWER, ACTIVATE, STATUS, COMMAND, DIRECTION, BATTERY, LOCATE, ERROR, FAN_SPEED];

/// Statuses reported while sitting on the dock
const DOCKED_STATUSES: &[&str] = &["standby", "charging", "charged"];

#[derive(Debug)]
pub struct TuyaLocalVacuum {
    core: EntityCore,
}

impl TuyaLocalVacuum {
    pub fn new(device: Arc<dyn TuyaDevice>, config: &EntityDescriptor) -> Self {
        Self {
            core: EntityCore::new(device, config, ROLES),
        }
    }

    fn command_dp(&self) -> Option<DpDescriptor<'_>> {
        self.core.dp(COMMAND).or_else(|| self.core.dp(STATUS))
    }

    fn commands(&self) -> Vec<Value> {
        self.command_dp()
            .map(|dp| dp.values(self.core.device()))
            .unwrap_or_default()
    }

    fn has_command(&self, command: &str) -> bool {
        self.commands().iter().any(|v| loose_eq(v, &json!(command)))
    }

    pub fn supported_features(&self) -> u32 {
        let mut features = SUPPORT_STATE | SUPPORT_STATUS | SUPPORT_SEND_COMMAND;
        if self.core.dp(POWER).is_some() {
            features |= SUPPORT_TURN_ON | SUPPORT_TURN_OFF;
        }
        if self.core.dp(ACTIVATE).is_some() {
            features |= SUPPORT_START | SUPPORT_PAUSE;
        }
        if self.core.dp(LOCATE).is_some() {
            features |= SUPPORT_LOCATE;
        }
        if self.core.dp(BATTERY).is_some() {
            features |= SUPPORT_BATTERY;
        }
        if self.core.dp(FAN_SPEED).is_some() {
            features |= SUPPORT_FAN_SPEED;
        }
        if self.has_command(SERVICE_RETURN_TO_BASE) {
            features |= SUPPORT_RETURN_HOME;
        }
        if self.has_command(SERVICE_CLEAN_SPOT) {
            features |= SUPPORT_CLEAN_SPOT;
        }
        features
    }

    /// Detailed status as the device words it, e.g. `wall_follow`
    pub fn status(&self) -> Option<String> {
        self.core.value(STATUS).map(|v| value_text(&v))
    }

    pub fn battery_level(&self) -> Option<u8> {
        let level = as_number(&self.core.value(BATTERY)?)?;
        Some(level.round_ties_even().clamp(0.0, 100.0) as u8)
    }

    /// Host level state: error, returning, docked or cleaning
    pub fn vacuum_state(&self) -> &'static str {
        if self.core.value(ERROR).is_some_and(|e| truthy(&e)) {
            return STATE_ERROR;
        }
        let status = self.status();
        match status.as_deref() {
            Some(SERVICE_RETURN_TO_BASE) | Some("returning") => STATE_RETURNING,
            Some(s) if DOCKED_STATUSES.contains(&s) => STATE_DOCKED,
            _ if self.core.dp(POWER).is_some() && !self.core.value(POWER).is_some_and(|v| truthy(&v)) => {
                STATE_DOCKED
            }
            _ if self.core.dp(ACTIVATE).is_some() && !self.core.value(ACTIVATE).is_some_and(|v| truthy(&v)) => {
                STATE_DOCKED
            }
            _ => STATE_CLEANING,
        }
    }

    pub fn fan_speed(&self) -> Option<String> {
        self.core.value(FAN_SPEED).map(|v| value_text(&v))
    }

    pub fn fan_speed_list(&self) -> Vec<String> {
        self.core
            .dp(FAN_SPEED)
            .map(|dp| dp.values(self.core.device()).iter().map(value_text).collect())
            .unwrap_or_default()
    }

    pub async fn async_set_fan_speed(&self, fan_speed: &str) -> TuyaResult<()> {
        self.core.set(FAN_SPEED, json!(fan_speed), "set_fan_speed").await
    }

    pub async fn async_start(&self) -> TuyaResult<()> {
        self.core.set(ACTIVATE, json!(true), "start").await
    }

    pub async fn async_pause(&self) -> TuyaResult<()> {
        self.core.set(ACTIVATE, json!(false), "pause").await
    }

    pub async fn async_locate(&self) -> TuyaResult<()> {
        self.core.set(LOCATE, json!(true), "locate").await
    }

    pub async fn async_return_to_base(&self) -> TuyaResult<()> {
        self.send_cleaning_command(SERVICE_RETURN_TO_BASE).await
    }

    pub async fn async_clean_spot(&self) -> TuyaResult<()> {
        self.send_cleaning_command(SERVICE_CLEAN_SPOT).await
    }

    async fn send_cleaning_command(&self, command: &str) -> TuyaResult<()> {
        match self.command_dp() {
            Some(dp) if self.has_command(command) => dp.async_set_value(self.core.device(), json!(command)).await,
            _ => Err(self.core.not_implemented(command)),
        }
    }

    /// Send a cleaning mode or a manual direction
    ///
    /// Cleaning modes are the command data point's values; directions
    /// (`forward`, `reverse`, `left`, `right`, `stop`) go to the direction
    /// data point.
    pub async fn async_send_command(&self, command: &str) -> TuyaResult<()> {
        let device = self.core.device();
        if let Some(dp) = self.command_dp().filter(|_| self.has_command(command)) {
            debug!("{}: sending command {}", self.name(), command);
            return dp.async_set_value(device, json!(command)).await;
        }
        if let Some(dp) = self.core.dp(DIRECTION) {
            if dp.values(device).iter().any(|v| loose_eq(v, &json!(command))) {
                debug!("{}: moving {}", self.name(), command);
                return dp.async_set_value(device, json!(command)).await;
            }
        }
        Err(TuyaError::invalid(
            self.name(),
            format!("unknown command {}", command),
        ))
    }
}

impl TuyaEntity for TuyaLocalVacuum {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn state(&self) -> Value {
        json!(self.vacuum_state())
    }

    fn state_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("status".into(), json!(self.status()));
        attrs.insert("battery_level".into(), json!(self.battery_level()));
        if self.core.dp(FAN_SPEED).is_some() {
            attrs.insert("fan_speed".into(), json!(self.fan_speed()));
            attrs.insert("fan_speed_list".into(), json!(self.fan_speed_list()));
        }
        attrs.insert("supported_features".into(), json!(self.supported_features()));
        attrs
    }
}

#[async_trait]
impl Switchable for TuyaLocalVacuum {
    fn is_on(&self) -> Option<bool> {
        self.core.value(POWER).map(|v| truthy(&v))
    }

    async fn async_turn_on(&self) -> TuyaResult<()> {
        self.core.set(POWER, json!(true), "turn_on").await
    }

    async fn async_turn_off(&self) -> TuyaResult<()> {
        self.core.set(POWER, json!(false), "turn_off").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuya_core::testing::MockDevice;
    use tuya_dps::{DpConfig, DpType, EntityKind, MappingRule};

    fn robot() -> EntityDescriptor {
        EntityDescriptor::new(EntityKind::Vacuum)
            .with_dp(DpConfig::new("1", "power", DpType::Boolean))
            .with_dp(DpConfig::new("2", "activate", DpType::Boolean))
            .with_dp(
                DpConfig::new("3", "status", DpType::String)
                    .with_mapping(MappingRule::map(json!("standby"), json!("standby")))
                    .with_mapping(MappingRule::map(json!("smart"), json!("smart")))
                    .with_mapping(MappingRule::map(json!("chargego"), json!("return_to_base")))
                    .with_mapping(MappingRule::map(json!("spiral"), json!("clean_spot"))),
            )
            .with_dp(
                DpConfig::new("4", "direction_control", DpType::String)
                    .with_mapping(MappingRule::map(json!("forward"), json!("forward")))
                    .with_mapping(MappingRule::map(json!("backward"), json!("reverse")))
                    .with_mapping(MappingRule::map(json!("turn_left"), json!("left")))
                    .with_mapping(MappingRule::map(json!("stop"), json!("stop"))),
            )
            .with_dp(DpConfig::new("6", "battery", DpType::Integer).readonly())
            .with_dp(DpConfig::new("18", "error", DpType::Integer).readonly())
    }

    fn setup(payload: Value) -> (Arc<MockDevice>, TuyaLocalVacuum) {
        let device = Arc::new(MockDevice::new("Robot").with_payload(payload));
        let vacuum = TuyaLocalVacuum::new(device.clone(), &robot());
        (device, vacuum)
    }

    #[test]
    fn test_state() {
        let (device, vacuum) = setup(json!({"1": true, "2": true, "18": 0, "3": "chargego"}));
        assert_eq!(vacuum.vacuum_state(), STATE_RETURNING);
        device.set_dp("3", json!("standby"));
        assert_eq!(vacuum.vacuum_state(), STATE_DOCKED);
        device.set_dp("3", json!("random"));
        assert_eq!(vacuum.vacuum_state(), STATE_CLEANING);
        device.set_dp("1", json!(false));
        assert_eq!(vacuum.vacuum_state(), STATE_DOCKED);
        device.set_dp("1", json!(true));
        device.set_dp("2", json!(false));
        assert_eq!(vacuum.vacuum_state(), STATE_DOCKED);
        device.set_dp("18", json!(1));
        assert_eq!(vacuum.vacuum_state(), STATE_ERROR);
    }

    #[test]
    fn test_supported_features() {
        let (_, vacuum) = setup(json!({}));
        assert_eq!(
            vacuum.supported_features(),
            SUPPORT_STATE
                | SUPPORT_STATUS
                | SUPPORT_SEND_COMMAND
                | SUPPORT_BATTERY
                | SUPPORT_TURN_ON
                | SUPPORT_TURN_OFF
                | SUPPORT_START
                | SUPPORT_PAUSE
                | SUPPORT_RETURN_HOME
                | SUPPORT_CLEAN_SPOT
        );
    }

    #[tokio::test]
    async fn test_commands() {
        let (device, vacuum) = setup(json!({"1": false}));
        vacuum.async_toggle().await.unwrap();
        device.assert_single_batch(json!({"1": true}));
        vacuum.async_pause().await.unwrap();
        device.assert_single_batch(json!({"2": false}));
        vacuum.async_return_to_base().await.unwrap();
        device.assert_single_batch(json!({"3": "chargego"}));
        vacuum.async_clean_spot().await.unwrap();
        device.assert_single_batch(json!({"3": "spiral"}));
    }

    #[tokio::test]
    async fn test_send_command() {
        let (device, vacuum) = setup(json!({}));
        vacuum.async_send_command("smart").await.unwrap();
        device.assert_single_batch(json!({"3": "smart"}));
        vacuum.async_send_command("reverse").await.unwrap();
        device.assert_single_batch(json!({"4": "backward"}));
        vacuum.async_send_command("left").await.unwrap();
        device.assert_single_batch(json!({"4": "turn_left"}));

        let err = vacuum.async_send_command("dance").await.unwrap_err();
        assert!(matches!(err, TuyaError::InvalidValue { .. }));
        device.assert_no_writes();
    }

    #[tokio::test]
    async fn test_locate_needs_dp() {
        let (device, vacuum) = setup(json!({}));
        let err = vacuum.async_locate().await.unwrap_err();
        assert!(matches!(err, TuyaError::NotImplemented { .. }));
        device.assert_no_writes();
    }
}
