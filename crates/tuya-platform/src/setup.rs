//! Platform setup
//!
//! For one device and one platform kind, resolves the enabled entities of
//! that kind from the device's profile: the primary entity first, then any
//! secondary entities. Created entities are kept in the device's
//! [`DeviceEntities`] so later lookups by config id find them.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, instrument, warn};
use tuya_config::{ConfigError, DeviceConfigRegistry};
use tuya_core::TuyaDevice;
use tuya_dps::EntityKind;

use crate::discovery::{DiscoveryInfo, EntryData};
use crate::entity::AnyEntity;
use crate::error::PlatformResult;

/// Entities set up for one device, keyed by config id
#[derive(Debug, Default)]
pub struct DeviceEntities {
    entities: DashMap<String, Arc<AnyEntity>>,
}

impl DeviceEntities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, config_id: &str) -> Option<Arc<AnyEntity>> {
        self.entities.get(config_id).map(|r| Arc::clone(r.value()))
    }

    pub fn insert(&self, config_id: impl Into<String>, entity: Arc<AnyEntity>) {
        self.entities.insert(config_id.into(), entity);
    }

    /// Config ids of every entity set up so far, sorted
    pub fn config_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entities.iter().map(|r| r.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Set up every enabled entity of `kind` for a device
///
/// Fails if the device type has no profile, or if the profile has no
/// enabled entity of this kind.
#[instrument(skip(registry, device, discovery, store), fields(device_type = %discovery.device_type))]
pub fn setup_platform(
    registry: &DeviceConfigRegistry,
    device: Arc<dyn TuyaDevice>,
    discovery: &DiscoveryInfo,
    kind: EntityKind,
    store: &DeviceEntities,
) -> PlatformResult<Vec<Arc<AnyEntity>>> {
    let config = registry.require(&discovery.device_type)?;
    let mut added = Vec::new();

    for ecfg in config.entities_of(kind) {
        let config_id = ecfg.config_id();
        if !discovery.is_enabled(&config_id) {
            continue;
        }
        if let Some(message) = ecfg.deprecation_message(device.name()) {
            warn!("{}", message);
        }
        debug!("Adding {} for {}/{}", kind, device.name(), config_id);

        let entity = Arc::new(AnyEntity::build(Arc::clone(&device), ecfg));
        store.insert(config_id, Arc::clone(&entity));
        added.push(entity);
    }

    if added.is_empty() {
        return Err(ConfigError::NotSupported {
            device: device.name().to_string(),
            platform: kind.to_string(),
        }
        .into());
    }
    Ok(added)
}

/// Set up the vacuum entities of a device
pub fn setup_vacuums(
    registry: &DeviceConfigRegistry,
    device: Arc<dyn TuyaDevice>,
    discovery: &DiscoveryInfo,
    store: &DeviceEntities,
) -> PlatformResult<Vec<Arc<AnyEntity>>> {
    setup_platform(registry, device, discovery, EntityKind::Vacuum, store)
}

/// Set up a platform from a config entry's data and options
pub fn setup_entry(
    registry: &DeviceConfigRegistry,
    device: Arc<dyn TuyaDevice>,
    data: &EntryData,
    options: &EntryData,
    kind: EntityKind,
    store: &DeviceEntities,
) -> PlatformResult<Vec<Arc<AnyEntity>>> {
    let discovery = DiscoveryInfo::from_entry(data, options)?;
    setup_platform(registry, device, &discovery, kind, store)
}

/// Set up every platform the device's profile uses
///
/// Platforms with no enabled entity are skipped rather than failing.
pub fn setup_device(
    registry: &DeviceConfigRegistry,
    device: Arc<dyn TuyaDevice>,
    discovery: &DiscoveryInfo,
    store: &DeviceEntities,
) -> PlatformResult<Vec<Arc<AnyEntity>>> {
    let config = registry.require(&discovery.device_type)?;
    let mut kinds: Vec<EntityKind> = Vec::new();
    for ecfg in config.all_entities() {
        if !kinds.contains(&ecfg.entity) {
            kinds.push(ecfg.entity);
        }
    }

    let mut added = Vec::new();
    for kind in kinds {
        match setup_platform(registry, Arc::clone(&device), discovery, kind, store) {
            Ok(entities) => added.extend(entities),
            Err(crate::PlatformError::Config(ConfigError::NotSupported { .. })) => {
                debug!("No {} entities enabled for {}", kind, device.name());
            }
            Err(e) => return Err(e),
        }
    }
    Ok(added)
}
