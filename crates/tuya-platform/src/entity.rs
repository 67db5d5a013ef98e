//! Entities of every platform behind one type

use std::sync::Arc;

use serde::Serialize;
use tuya_core::{TuyaDevice, Value};
use tuya_dps::{EntityDescriptor, EntityKind};
use tuya_entities::{
    Attributes, Switchable, TuyaEntity, TuyaLocalBinarySensor, TuyaLocalClimate, TuyaLocalFan, TuyaLocalLight,
    TuyaLocalLock, TuyaLocalNumber, TuyaLocalSelect, TuyaLocalSensor, TuyaLocalSwitch, TuyaLocalVacuum,
};

/// An entity of any platform
#[derive(Debug)]
pub enum AnyEntity {
    BinarySensor(TuyaLocalBinarySensor),
    Climate(TuyaLocalClimate),
    Fan(TuyaLocalFan),
    Light(TuyaLocalLight),
    Lock(TuyaLocalLock),
    Number(TuyaLocalNumber),
    Select(TuyaLocalSelect),
    Sensor(TuyaLocalSensor),
    Switch(TuyaLocalSwitch),
    Vacuum(TuyaLocalVacuum),
}

impl AnyEntity {
    /// Build the entity implementation matching the descriptor's kind
    pub fn build(device: Arc<dyn TuyaDevice>, config: &EntityDescriptor) -> Self {
        match config.entity {
            EntityKind::BinarySensor => Self::BinarySensor(TuyaLocalBinarySensor::new(device, config)),
            EntityKind::Climate => Self::Climate(TuyaLocalClimate::new(device, config)),
            EntityKind::Fan => Self::Fan(TuyaLocalFan::new(device, config)),
            EntityKind::Light => Self::Light(TuyaLocalLight::new(device, config)),
            EntityKind::Lock => Self::Lock(TuyaLocalLock::new(device, config)),
            EntityKind::Number => Self::Number(TuyaLocalNumber::new(device, config)),
            EntityKind::Select => Self::Select(TuyaLocalSelect::new(device, config)),
            EntityKind::Sensor => Self::Sensor(TuyaLocalSensor::new(device, config)),
            EntityKind::Switch => Self::Switch(TuyaLocalSwitch::new(device, config)),
            EntityKind::Vacuum => Self::Vacuum(TuyaLocalVacuum::new(device, config)),
        }
    }

    pub fn entity(&self) -> &dyn TuyaEntity {
        match self {
            Self::BinarySensor(e) => e,
            Self::Climate(e) => e,
            Self::Fan(e) => e,
            Self::Light(e) => e,
            Self::Lock(e) => e,
            Self::Number(e) => e,
            Self::Select(e) => e,
            Self::Sensor(e) => e,
            Self::Switch(e) => e,
            Self::Vacuum(e) => e,
        }
    }

    /// The entity as something that can be turned on and off, if it can
    pub fn switchable(&self) -> Option<&dyn Switchable> {
        match self {
            Self::Fan(e) => Some(e),
            Self::Light(e) => Some(e),
            Self::Switch(e) => Some(e),
            Self::Vacuum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_binary_sensor(&self) -> Option<&TuyaLocalBinarySensor> {
        match self {
            Self::BinarySensor(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_climate(&self) -> Option<&TuyaLocalClimate> {
        match self {
            Self::Climate(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_fan(&self) -> Option<&TuyaLocalFan> {
        match self {
            Self::Fan(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_light(&self) -> Option<&TuyaLocalLight> {
        match self {
            Self::Light(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_lock(&self) -> Option<&TuyaLocalLock> {
        match self {
            Self::Lock(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&TuyaLocalNumber> {
        match self {
            Self::Number(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_select(&self) -> Option<&TuyaLocalSelect> {
        match self {
            Self::Select(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_sensor(&self) -> Option<&TuyaLocalSensor> {
        match self {
            Self::Sensor(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_switch(&self) -> Option<&TuyaLocalSwitch> {
        match self {
            Self::Switch(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_vacuum(&self) -> Option<&TuyaLocalVacuum> {
        match self {
            Self::Vacuum(e) => Some(e),
            _ => None,
        }
    }

    /// Everything the host would show for this entity right now
    pub fn snapshot(&self) -> EntityState {
        let entity = self.entity();
        EntityState {
            config_id: entity.config_id(),
            kind: entity.kind(),
            name: entity.name(),
            available: entity.available(),
            state: entity.state(),
            icon: entity.icon(),
            device_class: entity.device_class().map(str::to_string),
            entity_category: entity.entity_category().map(str::to_string),
            attributes: entity.state_attributes(),
            extra_state_attributes: entity.extra_state_attributes(),
        }
    }
}

/// Serializable view of an entity's current state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityState {
    pub config_id: String,
    pub kind: EntityKind,
    pub name: String,
    pub available: bool,
    pub state: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_category: Option<String>,
    #[serde(skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Attributes::is_empty")]
    pub extra_state_attributes: Attributes,
}
