//! Number entity: a single numeric setting such as a temperature limit

use std::sync::Arc;

use serde_json::json;
use tuya_core::{TuyaDevice, TuyaResult, Value};
use tuya_dps::value::{as_number, number_value};
use tuya_dps::EntityDescriptor;

use crate::entity::{Attributes, EntityCore, TuyaEntity};

const VALUE: &str = "value";
const UNIT: &str = "unit";

const ROLES: &[&str] = &[VALUE, UNIT];

const DEFAULT_MIN_VALUE: f64 = 0.0;
const DEFAULT_MAX_VALUE: f64 = 100.0;

#[derive(Debug)]
pub struct TuyaLocalNumber {
    core: EntityCore,
}

impl TuyaLocalNumber {
    pub fn new(device: Arc<dyn TuyaDevice>, config: &EntityDescriptor) -> Self {
        Self {
            core: EntityCore::new(device, config, ROLES),
        }
    }

    pub fn value(&self) -> Option<f64> {
        as_number(&self.core.value(VALUE)?)
    }

    pub fn min_value(&self) -> f64 {
        self.core
            .dp(VALUE)
            .and_then(|dp| dp.scaled_range(self.core.device()))
            .map_or(DEFAULT_MIN_VALUE, |r| r.min)
    }

    pub fn max_value(&self) -> f64 {
        self.core
            .dp(VALUE)
            .and_then(|dp| dp.scaled_range(self.core.device()))
            .map_or(DEFAULT_MAX_VALUE, |r| r.max)
    }

    pub fn step(&self) -> f64 {
        self.core
            .dp(VALUE)
            .map_or(1.0, |dp| dp.step(self.core.device(), true))
    }

    /// Unit from a unit data point if there is one, else the configured unit
    pub fn unit(&self) -> Option<String> {
        if let Some(Value::String(unit)) = self.core.value(UNIT) {
            return Some(unit);
        }
        self.core.dp(VALUE)?.unit().map(str::to_string)
    }

    /// Range checked and snapped to the step before it is written
    pub async fn async_set_value(&self, value: f64) -> TuyaResult<()> {
        self.core.set(VALUE, number_value(value), "set_value").await
    }
}

impl TuyaEntity for TuyaLocalNumber {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn state(&self) -> Value {
        json!(self.value())
    }

    fn state_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("min".into(), json!(self.min_value()));
        attrs.insert("max".into(), json!(self.max_value()));
        attrs.insert("step".into(), json!(self.step()));
        attrs.insert("unit_of_measurement".into(), json!(self.unit()));
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuya_core::testing::MockDevice;
    use tuya_core::TuyaError;
    use tuya_dps::{DpConfig, DpType, EntityKind, MappingRule};

    fn limit() -> EntityDescriptor {
        EntityDescriptor::new(EntityKind::Number)
            .with_name("Low temperature limit")
            .with_dp(
                DpConfig::new("26", "value", DpType::Integer)
                    .with_unit("°C")
                    .with_range(50.0, 350.0)
                    .with_mapping(MappingRule::default_rule().with_scale(10.0).with_step(10.0)),
            )
    }

    #[tokio::test]
    async fn test_scaled_number() {
        let device = Arc::new(MockDevice::new("Thermostat").with_payload(json!({"26": 100})));
        let number = TuyaLocalNumber::new(device.clone(), &limit());

        assert_eq!(number.value(), Some(10.0));
        assert_eq!(number.min_value(), 5.0);
        assert_eq!(number.max_value(), 35.0);
        assert_eq!(number.step(), 1.0);
        assert_eq!(number.unit().as_deref(), Some("°C"));

        number.async_set_value(12.0).await.unwrap();
        device.assert_single_batch(json!({"26": 120}));
    }

    #[tokio::test]
    async fn test_out_of_range_value() {
        let device = Arc::new(MockDevice::new("Thermostat"));
        let number = TuyaLocalNumber::new(device.clone(), &limit());
        let err = number.async_set_value(40.0).await.unwrap_err();
        assert!(matches!(err, TuyaError::ValueOutOfRange { .. }));
        device.assert_no_writes();
    }
}
