//! Device profile loading and the device type registry
//!
//! Profiles are YAML files, one per device type, registered under their file
//! stem: `devices/goldair_gpcv_heater.yaml` is device type
//! `goldair_gpcv_heater`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, info, trace};

use crate::device::DeviceConfig;
use crate::error::{ConfigError, ConfigResult};
use crate::validate::validate;

/// Parse and validate a profile from a string
pub fn parse_device_config(content: &str, device_type: &str, source_path: &Path) -> ConfigResult<DeviceConfig> {
    let mut config: DeviceConfig = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseYaml {
        path: source_path.to_path_buf(),
        source: e,
    })?;
    config.device_type = device_type.to_string();
    validate(&config)?;
    Ok(config)
}

/// Load and validate a single profile file
pub fn load_device_config(path: impl AsRef<Path>) -> ConfigResult<DeviceConfig> {
    let path = path.as_ref();
    debug!("Loading device config: {:?}", path);

    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_device_config(&content, &device_type_of(path), path)
}

fn device_type_of(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Registry of device profiles keyed by device type
///
/// Profiles are stored as `Arc<DeviceConfig>` so entities can share them.
#[derive(Debug, Default)]
pub struct DeviceConfigRegistry {
    configs: DashMap<String, Arc<DeviceConfig>>,
}

impl DeviceConfigRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every profile in `dir`
    pub fn from_dir(dir: impl AsRef<Path>) -> ConfigResult<Self> {
        let registry = Self::new();
        registry.load_dir(dir)?;
        Ok(registry)
    }

    /// Load every `*.yaml`/`*.yml` file in `dir`, returning how many loaded
    ///
    /// The first invalid profile aborts the load.
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> ConfigResult<usize> {
        let dir = dir.as_ref();
        let files = yaml_files(dir)?;
        for file in &files {
            trace!("Found profile {:?}", file);
            let config = load_device_config(file)?;
            self.insert(config);
        }
        info!("Loaded {} device configs from {:?}", files.len(), dir);
        Ok(files.len())
    }

    /// Register a profile under its device type, replacing any previous one
    pub fn insert(&self, config: DeviceConfig) {
        debug!(
            "Registered device type {} ({} entities)",
            config.device_type,
            config.all_entities().count()
        );
        self.configs
            .insert(config.device_type.clone(), Arc::new(config));
    }

    /// Profile for a device type
    pub fn get_config(&self, device_type: &str) -> Option<Arc<DeviceConfig>> {
        self.configs.get(device_type).map(|r| Arc::clone(r.value()))
    }

    /// Profile for a device type, failing if it is not registered
    pub fn require(&self, device_type: &str) -> ConfigResult<Arc<DeviceConfig>> {
        self.get_config(device_type)
            .ok_or_else(|| ConfigError::UnknownDeviceType {
                device_type: device_type.to_string(),
            })
    }

    /// Registered device types, sorted
    pub fn device_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.configs.iter().map(|r| r.key().clone()).collect();
        types.sort();
        types
    }

    /// Device types whose profile lists the given product id
    pub fn types_for_product(&self, product_id: &str) -> Vec<String> {
        let mut types: Vec<String> = self
            .configs
            .iter()
            .filter(|r| r.value().matches_product(product_id))
            .map(|r| r.key().clone())
            .collect();
        types.sort();
        types
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

/// All YAML files in a directory, sorted by name
fn yaml_files(dir: &Path) -> ConfigResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ConfigError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| ConfigError::ReadFile {
            path: dir.to_path_buf(),
            source: e,
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext == "yaml" || ext == "yml")
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}
