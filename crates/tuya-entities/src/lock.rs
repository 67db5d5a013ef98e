//! Lock entity, mostly child locks on appliances

use std::sync::Arc;

use serde_json::json;
use tuya_core::{TuyaDevice, TuyaResult, Value};
use tuya_dps::value::truthy;
use tuya_dps::EntityDescriptor;

use crate::entity::{Attributes, EntityCore, TuyaEntity};

const LOCK: &str = "lock";
const JAMMED: &str = "jammed";

const ROLES: &[&str] = &[LOCK, JAMMED];

#[derive(Debug)]
pub struct TuyaLocalLock {
    core: EntityCore,
}

impl TuyaLocalLock {
    pub fn new(device: Arc<dyn TuyaDevice>, config: &EntityDescriptor) -> Self {
        Self {
            core: EntityCore::new(device, config, ROLES),
        }
    }

    pub fn is_locked(&self) -> Option<bool> {
        self.core.value(LOCK).map(|v| truthy(&v))
    }

    /// Whether the lock reports a jam; `false` when it cannot tell
    pub fn is_jammed(&self) -> bool {
        self.core.value(JAMMED).is_some_and(|v| truthy(&v))
    }

    pub async fn async_lock(&self) -> TuyaResult<()> {
        self.core.set(LOCK, json!(true), "lock").await
    }

    pub async fn async_unlock(&self) -> TuyaResult<()> {
        self.core.set(LOCK, json!(false), "unlock").await
    }
}

impl TuyaEntity for TuyaLocalLock {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn state(&self) -> Value {
        if self.is_jammed() {
            return json!("jammed");
        }
        match self.is_locked() {
            Some(true) => json!("locked"),
            Some(false) => json!("unlocked"),
            None => Value::Null,
        }
    }

    fn state_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("is_locked".into(), json!(self.is_locked()));
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuya_core::testing::MockDevice;
    use tuya_dps::{DpConfig, DpType, EntityKind, MappingRule};

    fn child_lock() -> EntityDescriptor {
        EntityDescriptor::new(EntityKind::Lock)
            .with_name("Child lock")
            .with_dp(
                DpConfig::new("2", "lock", DpType::Boolean)
                    .with_mapping(MappingRule::when(json!(true)).with_icon("mdi:hand-back-right-off", None))
                    .with_mapping(MappingRule::when(json!(false)).with_icon("mdi:hand-back-right", None)),
            )
    }

    #[tokio::test]
    async fn test_lock_and_unlock() {
        let device = Arc::new(MockDevice::new("Heater").with_payload(json!({"2": true})));
        let lock = TuyaLocalLock::new(device.clone(), &child_lock());

        assert_eq!(lock.name(), "Heater Child lock");
        assert_eq!(lock.is_locked(), Some(true));
        assert_eq!(lock.state(), json!("locked"));
        assert_eq!(lock.icon().as_deref(), Some("mdi:hand-back-right-off"));

        tokio_test::assert_ok!(lock.async_unlock().await);
        device.assert_single_batch(json!({"2": false}));

        device.set_dp("2", json!(false));
        assert_eq!(lock.icon().as_deref(), Some("mdi:hand-back-right"));
        tokio_test::assert_ok!(lock.async_lock().await);
        device.assert_single_batch(json!({"2": true}));
    }
}
