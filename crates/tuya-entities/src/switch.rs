//! Switch entity

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tuya_core::{TuyaDevice, TuyaResult, Value};
use tuya_dps::value::{as_number, truthy};
use tuya_dps::EntityDescriptor;

use crate::entity::{Attributes, EntityCore, TuyaEntity};
use crate::traits::Switchable;

const SWITCH: &str = "switch";
const CURRENT_POWER_W: &str = "current_power_w";

const ROLES: &[&str] = &[SWITCH, CURRENT_POWER_W];

/// A switch or smart plug
#[derive(Debug)]
pub struct TuyaLocalSwitch {
    core: EntityCore,
}

impl TuyaLocalSwitch {
    pub fn new(device: Arc<dyn TuyaDevice>, config: &EntityDescriptor) -> Self {
        Self {
            core: EntityCore::new(device, config, ROLES),
        }
    }

    /// Power draw in watts, for plugs that measure it
    pub fn current_power_w(&self) -> Option<f64> {
        as_number(&self.core.value(CURRENT_POWER_W)?)
    }
}

impl TuyaEntity for TuyaLocalSwitch {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn state(&self) -> Value {
        match self.is_on() {
            Some(true) => json!("on"),
            Some(false) => json!("off"),
            None => Value::Null,
        }
    }

    fn state_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        if self.core.dp(CURRENT_POWER_W).is_some() {
            attrs.insert("current_power_w".into(), json!(self.current_power_w()));
        }
        attrs
    }
}

#[async_trait]
impl Switchable for TuyaLocalSwitch {
    fn is_on(&self) -> Option<bool> {
        self.core.value(SWITCH).map(|v| truthy(&v))
    }

    async fn async_turn_on(&self) -> TuyaResult<()> {
        self.core.set(SWITCH, json!(true), "turn_on").await
    }

    async fn async_turn_off(&self) -> TuyaResult<()> {
        self.core.set(SWITCH, json!(false), "turn_off").await
    }
}
