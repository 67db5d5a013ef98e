//! Binary sensor entity

use std::sync::Arc;

use serde_json::json;
use tuya_core::{TuyaDevice, Value};
use tuya_dps::value::truthy;
use tuya_dps::EntityDescriptor;

use crate::entity::{EntityCore, TuyaEntity};

const SENSOR: &str = "sensor";

const ROLES: &[&str] = &[SENSOR];

#[derive(Debug)]
pub struct TuyaLocalBinarySensor {
    core: EntityCore,
}

impl TuyaLocalBinarySensor {
    pub fn new(device: Arc<dyn TuyaDevice>, config: &EntityDescriptor) -> Self {
        Self {
            core: EntityCore::new(device, config, ROLES),
        }
    }

    /// Mapped reading as a boolean; numbers and strings count by truthiness
    pub fn is_on(&self) -> Option<bool> {
        match self.core.value(SENSOR)? {
            Value::Bool(on) => Some(on),
            other => Some(truthy(&other)),
        }
    }
}

impl TuyaEntity for TuyaLocalBinarySensor {
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
}
