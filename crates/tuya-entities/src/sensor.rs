//! Read-only sensor entity

use std::sync::Arc;

use serde_json::json;
use tuya_core::{TuyaDevice, Value};
use tuya_dps::EntityDescriptor;

use crate::entity::{Attributes, EntityCore, TuyaEntity};

const SENSOR: &str = "sensor";
const UNIT: &str = "unit";

const ROLES: &[&str] = &[SENSOR, UNIT];

#[derive(Debug)]
pub struct TuyaLocalSensor {
    core: EntityCore,
}

impl TuyaLocalSensor {
    pub fn new(device: Arc<dyn TuyaDevice>, config: &EntityDescriptor) -> Self {
        Self {
            core: EntityCore::new(device, config, ROLES),
        }
    }

    pub fn native_value(&self) -> Option<Value> {
        self.core.value(SENSOR)
    }

    pub fn native_unit_of_measurement(&self) -> Option<String> {
        if let Some(Value::String(unit)) = self.core.value(UNIT) {
            return Some(unit);
        }
        self.core.dp(SENSOR)?.unit().map(str::to_string)
    }

    /// How the host should aggregate readings, e.g. `measurement`
    pub fn state_class(&self) -> Option<&str> {
        self.core.dp(SENSOR)?.class()
    }
}

impl TuyaEntity for TuyaLocalSensor {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn state(&self) -> Value {
        self.native_value().unwrap_or(Value::Null)
    }

    fn state_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("unit_of_measurement".into(), json!(self.native_unit_of_measurement()));
        attrs.insert("state_class".into(), json!(self.state_class()));
        attrs
    }
}
