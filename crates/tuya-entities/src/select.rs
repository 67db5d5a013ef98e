//! Select entity: one data point, a fixed list of options

use std::sync::Arc;

use serde_json::json;
use tuya_core::{TuyaDevice, TuyaError, TuyaResult, Value};
use tuya_dps::value::value_text;
use tuya_dps::EntityDescriptor;

use crate::entity::{Attributes, EntityCore, TuyaEntity};

const OPTION: &str = "option";

const ROLES: &[&str] = &[OPTION];

#[derive(Debug)]
pub struct TuyaLocalSelect {
    core: EntityCore,
}

impl TuyaLocalSelect {
    pub fn new(device: Arc<dyn TuyaDevice>, config: &EntityDescriptor) -> Self {
        Self {
            core: EntityCore::new(device, config, ROLES),
        }
    }

    pub fn options(&self) -> Vec<String> {
        self.core
            .dp(OPTION)
            .map(|dp| dp.values(self.core.device()).iter().map(value_text).collect())
            .unwrap_or_default()
    }

    pub fn current_option(&self) -> Option<String> {
        self.core.value(OPTION).map(|v| value_text(&v))
    }

    /// Select one of [`Self::options`]
    pub async fn async_select_option(&self, option: &str) -> TuyaResult<()> {
        if !self.options().iter().any(|o| o == option) {
            return Err(TuyaError::invalid(
                self.name(),
                format!("{} is not one of {:?}", option, self.options()),
            ));
        }
        self.core.set(OPTION, json!(option), "select_option").await
    }
}

impl TuyaEntity for TuyaLocalSelect {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn state(&self) -> Value {
        json!(self.current_option())
    }

    fn state_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("options".into(), json!(self.options()));
        attrs
    }
}
