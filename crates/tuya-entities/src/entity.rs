//! Entity base shared by every platform kind
//!
//! An entity owns its [`EntityDescriptor`] and a handle to the device. Data
//! points are looked up by role name on every call; nothing decoded is
//! cached, so each getter reflects the device's current snapshot.

use std::fmt;
use std::sync::Arc;

use tracing::debug;
use tuya_core::{Settings, TuyaDevice, TuyaError, TuyaResult, Value};
use tuya_dps::{DpDescriptor, EntityDescriptor, EntityKind, NO_ICON_PRIORITY};

/// Attribute map reported alongside an entity's state
pub type Attributes = serde_json::Map<String, Value>;

/// State and plumbing common to all entities
pub struct EntityCore {
    device: Arc<dyn TuyaDevice>,
    config: EntityDescriptor,
    roles: &'static [&'static str],
}

impl EntityCore {
    /// Bind an entity descriptor to a device
    ///
    /// `roles` names the data points the entity interprets itself; every
    /// other visible data point is reported as an extra attribute.
    pub fn new(device: Arc<dyn TuyaDevice>, config: &EntityDescriptor, roles: &'static [&'static str]) -> Self {
        Self {
            device,
            config: config.clone(),
            roles,
        }
    }

    pub fn device(&self) -> &dyn TuyaDevice {
        self.device.as_ref()
    }

    pub fn config(&self) -> &EntityDescriptor {
        &self.config
    }

    pub fn kind(&self) -> EntityKind {
        self.config.entity
    }

    /// Data point playing `role`, if the profile defines one
    pub fn dp(&self, role: &str) -> Option<DpDescriptor<'_>> {
        self.config.find_dps(role)
    }

    /// Current semantic value of the data point playing `role`
    pub fn value(&self, role: &str) -> Option<Value> {
        self.dp(role)?.get_value(self.device())
    }

    /// Device name, followed by the entity's own name if it has one
    pub fn name(&self) -> String {
        let device = self.device.name();
        match self.config.name.as_deref() {
            Some(name) if !name.is_empty() => format!("{} {}", device, name),
            _ => device.to_string(),
        }
    }

    pub fn config_id(&self) -> String {
        self.config.config_id()
    }

    pub fn available(&self) -> bool {
        self.device.available()
    }

    /// Icon with the strongest claim: the configured icon, overridden by any
    /// data point rule with a lower priority
    pub fn icon(&self) -> Option<String> {
        let device = self.device();
        let mut icon = self.config.icon.as_deref();
        let mut priority = self.config.icon_priority.unwrap_or(NO_ICON_PRIORITY);

        for dp in self.config.dps() {
            if let (rule_priority, Some(rule_icon)) = dp.icon_rule(device) {
                if rule_priority < priority {
                    icon = Some(rule_icon);
                    priority = rule_priority;
                }
            }
        }
        icon.map(str::to_string)
    }

    /// Visible data points the entity does not interpret, keyed by name
    pub fn extra_state_attributes(&self) -> Attributes {
        let device = self.device();
        self.config
            .dps()
            .filter(|dp| !dp.hidden() && !self.roles.contains(&dp.name()))
            .map(|dp| (dp.name().to_string(), dp.get_value(device).unwrap_or(Value::Null)))
            .collect()
    }

    /// Error for a command the entity has no data point for
    pub fn not_implemented(&self, operation: &str) -> TuyaError {
        TuyaError::not_implemented(self.name(), operation)
    }

    /// Write `value` through the data point playing `role`
    pub async fn set(&self, role: &str, value: Value, operation: &str) -> TuyaResult<()> {
        let dp = self.dp(role).ok_or_else(|| self.not_implemented(operation))?;
        debug!("{}: {} sets {} to {}", self.name(), operation, dp.name(), value);
        dp.async_set_value(self.device(), value).await
    }

    /// Send an accumulated batch as one write
    pub async fn write(&self, settings: Settings) -> TuyaResult<()> {
        if settings.is_empty() {
            debug!("{}: nothing to write", self.name());
            return Ok(());
        }
        debug!("{}: writing {:?}", self.name(), settings);
        self.device.async_set_properties(settings).await
    }
}

impl fmt::Debug for EntityCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCore")
            .field("device", &self.device.name())
            .field("config_id", &self.config.config_id())
            .finish_non_exhaustive()
    }
}

/// Base trait for every entity
pub trait TuyaEntity: Send + Sync {
    fn core(&self) -> &EntityCore;

    /// Primary state as the host displays it
    fn state(&self) -> Value;

    /// Kind specific attributes reported with the state
    fn state_attributes(&self) -> Attributes {
        Attributes::new()
    }

    fn kind(&self) -> EntityKind {
        self.core().kind()
    }

    fn name(&self) -> String {
        self.core().name()
    }

    fn config_id(&self) -> String {
        self.core().config_id()
    }

    fn available(&self) -> bool {
        self.core().available()
    }

    fn icon(&self) -> Option<String> {
        self.core().icon()
    }

    fn device_class(&self) -> Option<&str> {
        self.core().config().class.as_deref()
    }

    fn entity_category(&self) -> Option<&str> {
        self.core().config().category.as_deref()
    }

    fn extra_state_attributes(&self) -> Attributes {
        self.core().extra_state_attributes()
    }
}
