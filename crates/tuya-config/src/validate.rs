//! Consistency checks run once a profile has parsed
//!
//! The conversion layer trusts its configuration, so anything it would
//! otherwise only discover while handling a command is rejected here.

use std::collections::HashSet;

use tuya_dps::{DpConfig, EntityDescriptor};

use crate::device::DeviceConfig;
use crate::error::{ConfigError, ConfigResult};

/// Validate a parsed device profile
pub fn validate(config: &DeviceConfig) -> ConfigResult<()> {
    let device_type = config.device_type.as_str();
    let mut config_ids = HashSet::new();

    for entity in config.all_entities() {
        let config_id = entity.config_id();
        if !config_ids.insert(config_id.clone()) {
            return Err(ConfigError::validation(
                device_type,
                format!("duplicate entity {}", config_id),
            ));
        }
        validate_entity(device_type, entity)?;
    }
    Ok(())
}

fn validate_entity(device_type: &str, entity: &EntityDescriptor) -> ConfigResult<()> {
    let config_id = entity.config_id();
    let mut ids = HashSet::new();
    let mut names = HashSet::new();

    for dp in &entity.dps {
        if !ids.insert(dp.id.as_str()) {
            return Err(ConfigError::validation(
                device_type,
                format!("{} uses data point {} twice", config_id, dp.id),
            ));
        }
        if !names.insert(dp.name.as_str()) {
            return Err(ConfigError::validation(
                device_type,
                format!("{} has two data points named {}", config_id, dp.name),
            ));
        }
        validate_dp(device_type, entity, dp)?;
    }
    Ok(())
}

fn validate_dp(device_type: &str, entity: &EntityDescriptor, dp: &DpConfig) -> ConfigResult<()> {
    let context = format!("{}.{}", entity.config_id(), dp.name);
    let fail = |message: String| Err(ConfigError::validation(device_type, format!("{}: {}", context, message)));

    if let Some(range) = dp.range {
        if range.min > range.max {
            return fail(format!("range min {} exceeds max {}", range.min, range.max));
        }
    }

    if let Some(fields) = &dp.format {
        if !dp.dp_type.is_binary() {
            return fail(format!("format given for a {} data point", dp.dp_type));
        }
        for field in fields {
            if !matches!(field.bytes, 1 | 2 | 4) {
                return fail(format!("field {} must be 1, 2 or 4 bytes wide", field.name));
            }
            let range = field.effective_range();
            if range.min != 0.0 {
                return fail(format!("field {} range must start at 0, not {}", field.name, range.min));
            }
            if range.max <= 0.0 {
                return fail(format!("field {} range max must be above 0", field.name));
            }
        }
    }

    let resolvable = |name: &str| entity.dps.iter().any(|d| d.name == name);
    for rule in &dp.mapping {
        if rule.scale == Some(0.0) || rule.conditions.iter().any(|c| c.scale == Some(0.0)) {
            return fail("scale must not be zero".to_string());
        }
        if let Some(constraint) = rule.constraint.as_deref() {
            if !resolvable(constraint) {
                return fail(format!("constraint {} is not a data point of this entity", constraint));
            }
        } else if !rule.conditions.is_empty() {
            return fail("conditions given without a constraint".to_string());
        }
        let redirects = rule
            .value_redirect
            .iter()
            .chain(rule.conditions.iter().filter_map(|c| c.value_redirect.as_ref()));
        for target in redirects {
            if target == &dp.name {
                return fail("redirects to itself".to_string());
            }
            if !resolvable(target) {
                return fail(format!("redirect target {} is not a data point of this entity", target));
            }
        }
    }
    Ok(())
}
