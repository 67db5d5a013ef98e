//! Device profile model

use serde::{Deserialize, Serialize};
use tuya_dps::{EntityDescriptor, EntityKind};

/// A product known to use a device profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A device profile: one primary entity plus optional secondary entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<Product>,
    pub primary_entity: EntityDescriptor,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_entities: Vec<EntityDescriptor>,
    /// Registry key, taken from the profile's file stem
    #[serde(skip)]
    pub device_type: String,
}

impl DeviceConfig {
    /// Every entity, primary first
    pub fn all_entities(&self) -> impl Iterator<Item = &EntityDescriptor> {
        std::iter::once(&self.primary_entity).chain(self.secondary_entities.iter())
    }

    /// Entities of one platform kind, primary first
    pub fn entities_of(&self, kind: EntityKind) -> impl Iterator<Item = &EntityDescriptor> {
        self.all_entities().filter(move |e| e.entity == kind)
    }

    /// Entity by its config id, e.g. `lock_child_lock`
    pub fn find_entity(&self, config_id: &str) -> Option<&EntityDescriptor> {
        self.all_entities().find(|e| e.config_id() == config_id)
    }

    /// Whether this profile lists the given product id
    pub fn matches_product(&self, product_id: &str) -> bool {
        self.products.iter().any(|p| p.id == product_id)
    }

    /// Discovery flags enabling the primary entity and, if `secondary` is set,
    /// every secondary entity
    pub fn default_flags(&self, secondary: bool) -> Vec<(String, bool)> {
        let mut flags = vec![(self.primary_entity.config_id(), true)];
        flags.extend(
            self.secondary_entities
                .iter()
                .map(|e| (e.config_id(), secondary)),
        );
        flags
    }
}
