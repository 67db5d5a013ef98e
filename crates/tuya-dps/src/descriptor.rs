//! Data point conversion
//!
//! A [`DpDescriptor`] binds one data point's configuration to the entity it
//! belongs to, so that redirects and constraints can resolve sibling data
//! points by name. Every operation takes the device snapshot explicitly and
//! re-evaluates against it; nothing is cached.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{debug, warn};
use tuya_core::{DeviceState, Settings, TuyaDevice, TuyaError, TuyaResult, Value};

use crate::config::{Condition, DpConfig, DpType, EntityDescriptor, FormatField, MappingRule, Range};
use crate::value::{as_number, float_value, format_bound, loose_eq, number_value, parse_number, truthy, value_text};

/// Icon priority of a data point without an icon
pub const NO_ICON_PRIORITY: u32 = 100;
/// Icon priority of a rule that sets an icon without its own priority
pub const DEFAULT_ICON_PRIORITY: u32 = 10;

/// One data point of an entity
#[derive(Debug, Clone, Copy)]
pub struct DpDescriptor<'a> {
    entity: &'a EntityDescriptor,
    config: &'a DpConfig,
}

impl<'a> DpDescriptor<'a> {
    pub fn new(entity: &'a EntityDescriptor, config: &'a DpConfig) -> Self {
        Self { entity, config }
    }

    pub fn id(&self) -> &'a str {
        &self.config.id
    }

    pub fn name(&self) -> &'a str {
        &self.config.name
    }

    pub fn dp_type(&self) -> DpType {
        self.config.dp_type
    }

    pub fn readonly(&self) -> bool {
        self.config.readonly
    }

    pub fn hidden(&self) -> bool {
        self.config.hidden
    }

    pub fn optional(&self) -> bool {
        self.config.optional
    }

    pub fn unit(&self) -> Option<&'a str> {
        self.config.unit.as_deref()
    }

    pub fn class(&self) -> Option<&'a str> {
        self.config.class.as_deref()
    }

    pub fn format(&self) -> Option<&'a [FormatField]> {
        self.config.format.as_deref()
    }

    pub fn config(&self) -> &'a DpConfig {
        self.config
    }

    fn sibling(&self, name: &str) -> Option<DpDescriptor<'a>> {
        self.entity.find_dps(name)
    }

    // =========================================================================
    // Rule selection
    // =========================================================================

    /// Rule matching a raw device value, falling back to the default rule
    fn find_map_for_dps(&self, raw: Option<&Value>) -> Option<&'a MappingRule> {
        let mut default = None;
        for rule in &self.config.mapping {
            match (&rule.dps_val, raw) {
                (None, _) => default = Some(rule),
                (Some(dps_val), Some(raw)) if loose_eq(dps_val, raw) => return Some(rule),
                (Some(Value::Null), None) => return Some(rule),
                _ => {}
            }
        }
        default
    }

    /// Rule producing a semantic value, falling back to the default rule
    fn find_map_for_value(&self, value: &Value) -> Option<&'a MappingRule> {
        let mut default = None;
        for rule in &self.config.mapping {
            if rule.dps_val.is_none() {
                default = Some(rule);
            }
            if rule.value.as_ref().is_some_and(|v| loose_eq(v, value)) {
                return Some(rule);
            }
            if rule
                .conditions
                .iter()
                .any(|c| c.value.as_ref().is_some_and(|v| loose_eq(v, value)))
            {
                return Some(rule);
            }
        }
        default
    }

    /// Condition of `rule` selected by the current value of its constraint
    ///
    /// When `value` is given and a condition produces it, that condition wins
    /// over the currently active one, since writing `value` will switch the
    /// constraint over to it.
    fn active_condition<D>(&self, rule: &'a MappingRule, device: &D, value: Option<&Value>) -> Option<&'a Condition>
    where
        D: DeviceState + ?Sized,
    {
        let constraint = rule.constraint.as_deref()?;
        if rule.conditions.is_empty() {
            return None;
        }
        let current = self
            .sibling(constraint)
            .and_then(|dp| device.get_property(dp.id()));

        let mut matched = None;
        for cond in &rule.conditions {
            match (&current, &cond.dps_val) {
                (Some(current), Some(dps_val)) if loose_eq(current, dps_val) => matched = Some(cond),
                (None, Some(Value::Null)) => matched = Some(cond),
                _ => {}
            }
            if let (Some(value), Some(cond_value)) = (value, &cond.value) {
                if loose_eq(value, cond_value) {
                    return Some(cond);
                }
            }
        }
        matched
    }

    fn raw_value<D: DeviceState + ?Sized>(&self, device: &D) -> Option<Value> {
        device.get_property(self.id()).filter(|v| !v.is_null())
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Current semantic value of this data point
    pub fn get_value<D: DeviceState + ?Sized>(&self, device: &D) -> Option<Value> {
        let raw = self.raw_value(device)?;
        self.map_from_dps(raw, device)
    }

    /// Translate a raw device value into its semantic value
    pub fn map_from_dps<D: DeviceState + ?Sized>(&self, raw: Value, device: &D) -> Option<Value> {
        if raw.is_null() {
            return None;
        }
        let raw = self.normalize_raw(raw);
        let Some(rule) = self.find_map_for_dps(Some(&raw)) else {
            return Some(raw);
        };
        if rule.invalid {
            return None;
        }

        let mut result = rule.value.clone().unwrap_or(raw);
        let mut scale = rule.scale.unwrap_or(1.0);
        let mut redirect = rule.value_redirect.as_deref();

        if let Some(cond) = self.active_condition(rule, device, None) {
            if cond.invalid {
                return None;
            }
            if let Some(value) = &cond.value {
                result = value.clone();
            }
            scale = cond.scale.unwrap_or(scale);
            redirect = cond.value_redirect.as_deref().or(redirect);
            for m in &cond.mapping {
                if m.dps_val.as_ref().is_some_and(|v| loose_eq(v, &result)) {
                    if let Some(value) = &m.value {
                        result = value.clone();
                    }
                }
            }
        }

        if let Some(target) = redirect {
            return match self.sibling(target) {
                Some(dp) => {
                    debug!(from = self.name(), to = target, "Redirecting read");
                    dp.get_value(device)
                }
                None => {
                    warn!(dp = self.name(), redirect = target, "Redirect target not found");
                    None
                }
            };
        }

        if rule.invert {
            if let (Some(n), Some(range)) = (as_number(&result), self.config.range) {
                result = number_value(range.min + range.max - n);
            }
        }
        if scale != 1.0 {
            if let Some(n) = as_number(&result) {
                result = float_value(n / scale);
            }
        }
        Some(result)
    }

    /// Numeric data points sometimes report their value as a string
    fn normalize_raw(&self, raw: Value) -> Value {
        match (self.config.dp_type, &raw) {
            (DpType::Integer | DpType::Float, Value::String(_)) => {
                parse_number(&raw).map(number_value).unwrap_or(raw)
            }
            _ => raw,
        }
    }

    /// Current value decoded from its hex or base64 wire form
    pub fn decoded_value<D: DeviceState + ?Sized>(&self, device: &D) -> TuyaResult<Option<Vec<u8>>> {
        let Some(value) = self.get_value(device) else {
            return Ok(None);
        };
        let Value::String(text) = &value else {
            return Err(TuyaError::invalid(self.name(), format!("{} is not an encoded string", value)));
        };
        let bytes = match self.config.dp_type {
            DpType::Hex => hex::decode(text).map_err(|e| TuyaError::invalid(self.name(), e.to_string()))?,
            DpType::Base64 => BASE64
                .decode(text)
                .map_err(|e| TuyaError::invalid(self.name(), e.to_string()))?,
            other => {
                return Err(TuyaError::UnsupportedFormat(format!(
                    "{} is of type {}, not hex or base64",
                    self.name(),
                    other
                )))
            }
        };
        Ok(Some(bytes))
    }

    /// Encode binary content in this data point's wire form
    pub fn encode_value(&self, data: &[u8]) -> TuyaResult<Value> {
        match self.config.dp_type {
            DpType::Hex => Ok(Value::String(hex::encode(data))),
            DpType::Base64 => Ok(Value::String(BASE64.encode(data))),
            other => Err(TuyaError::UnsupportedFormat(format!(
                "{} is of type {}, not hex or base64",
                self.name(),
                other
            ))),
        }
    }

    // =========================================================================
    // Writing
    // =========================================================================

    /// Raw writes needed to set this data point to the semantic `value`
    pub fn get_values_to_set<D: DeviceState + ?Sized>(&self, device: &D, value: &Value) -> TuyaResult<Settings> {
        let mut settings = Settings::new();
        if self.readonly() {
            debug!(dp = self.name(), "Ignoring write to read-only data point");
            return Ok(settings);
        }

        let mut result = value.clone();
        if let Some(rule) = self.find_map_for_value(value) {
            let mut scale = rule.scale.unwrap_or(1.0);
            let mut step = rule.step;
            let mut redirect = rule.value_redirect.as_deref();

            if let Some(dps_val) = &rule.dps_val {
                if !rule.hidden {
                    result = dps_val.clone();
                }
            }

            if let Some(cond) = self.active_condition(rule, device, Some(value)) {
                if cond.value.as_ref().is_some_and(|v| loose_eq(v, value)) {
                    // Selecting this value also switches the constraint over
                    if let Some(constraint) = rule.constraint.as_deref().and_then(|c| self.sibling(c)) {
                        let raw = cond
                            .dps_val
                            .clone()
                            .or_else(|| device.get_property(constraint.id()));
                        if let Some(c_value) = raw.and_then(|raw| constraint.map_from_dps(raw, device)) {
                            settings.extend(constraint.get_values_to_set(device, &c_value)?);
                        }
                    }
                }
                for m in &cond.mapping {
                    if m.value.as_ref().is_some_and(|v| loose_eq(v, value)) {
                        if let Some(dps_val) = &m.dps_val {
                            result = dps_val.clone();
                        }
                    }
                }
                scale = cond.scale.unwrap_or(scale);
                step = cond.step.or(step);
                redirect = cond.value_redirect.as_deref().or(redirect);
            }

            if let Some(target) = redirect {
                let dp = self
                    .sibling(target)
                    .ok_or_else(|| TuyaError::Config(format!("{} redirects to unknown data point {}", self.name(), target)))?;
                debug!(from = self.name(), to = target, "Redirecting write");
                settings.extend(dp.get_values_to_set(device, value)?);
                return Ok(settings);
            }

            if scale != 1.0 {
                if let Some(n) = as_number(&result) {
                    debug!(dp = self.name(), value = n, scale, "Scaling value");
                    result = number_value(n * scale);
                    result = self.remap(rule, result);
                }
            }
            if let Some(step) = step.filter(|s| *s != 0.0) {
                if let Some(n) = as_number(&result) {
                    debug!(dp = self.name(), value = n, step, "Stepping value");
                    result = number_value(step * (n / step).round_ties_even());
                    result = self.remap(rule, result);
                }
            }
        }

        if let (Some(range), Some(n)) = (self.range(device), as_number(&result)) {
            let rounded = n.round_ties_even();
            if !range.contains(rounded) {
                let scaled = self.scale(device) != 1.0;
                let bounds = self.scaled_range(device).unwrap_or(range);
                return Err(TuyaError::ValueOutOfRange {
                    name: self.name().to_string(),
                    value: value_text(value),
                    min: format_bound(bounds.min, scaled),
                    max: format_bound(bounds.max, scaled),
                });
            }
        }

        let result = self.coerce(result)?;
        debug!(dp = self.name(), id = self.id(), value = %result, "Prepared data point write");
        settings.insert(self.id().to_string(), result);
        Ok(settings)
    }

    /// After scaling or stepping, a value may land on another rule's label
    fn remap(&self, rule: &MappingRule, result: Value) -> Value {
        if rule.dps_val.is_some() {
            return result;
        }
        match self.find_map_for_value(&result).and_then(|m| m.dps_val.clone()) {
            Some(dps_val) => dps_val,
            None => result,
        }
    }

    /// Convert a value to this data point's declared type
    fn coerce(&self, value: Value) -> TuyaResult<Value> {
        match self.config.dp_type {
            DpType::Integer => {
                let n = match &value {
                    Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
                    other => parse_number(other),
                };
                n.map(|n| Value::from(n.round_ties_even() as i64))
                    .ok_or_else(|| TuyaError::invalid(self.name(), format!("{} is not an integer", value_text(&value))))
            }
            DpType::Float => parse_number(&value)
                .map(float_value)
                .ok_or_else(|| TuyaError::invalid(self.name(), format!("{} is not a number", value_text(&value)))),
            DpType::Boolean => Ok(Value::Bool(truthy(&value))),
            DpType::String if !value.is_null() => Ok(Value::String(value_text(&value))),
            _ => Ok(value),
        }
    }

    /// Write the semantic `value` to the device as a single batch
    pub async fn async_set_value<D: TuyaDevice + ?Sized>(&self, device: &D, value: Value) -> TuyaResult<()> {
        let settings = self.get_values_to_set(device, &value)?;
        device.async_set_properties(settings).await
    }

    // =========================================================================
    // Derived attributes
    // =========================================================================

    /// Valid range in device units, given the current device state
    pub fn range<D: DeviceState + ?Sized>(&self, device: &D) -> Option<Range> {
        let raw = self.raw_value(device);
        if let Some(rule) = self.find_map_for_dps(raw.as_ref()) {
            if let Some(range) = self.active_condition(rule, device, None).and_then(|c| c.range) {
                return Some(range);
            }
            if rule.range.is_some() {
                return rule.range;
            }
        }
        self.config.range
    }

    /// Valid range in semantic units
    pub fn scaled_range<D: DeviceState + ?Sized>(&self, device: &D) -> Option<Range> {
        let range = self.range(device)?;
        let scale = self.scale(device);
        Some(Range::new(range.min / scale, range.max / scale))
    }

    /// Divisor between device and semantic units
    pub fn scale<D: DeviceState + ?Sized>(&self, device: &D) -> f64 {
        let raw = self.raw_value(device);
        let Some(rule) = self.find_map_for_dps(raw.as_ref()) else {
            return 1.0;
        };
        let scale = rule.scale.unwrap_or(1.0);
        self.active_condition(rule, device, None)
            .and_then(|c| c.scale)
            .unwrap_or(scale)
    }

    /// Write granularity, in semantic units when `scaled`
    pub fn step<D: DeviceState + ?Sized>(&self, device: &D, scaled: bool) -> f64 {
        let raw = self.raw_value(device);
        let (mut step, mut scale) = (1.0, 1.0);
        if let Some(rule) = self.find_map_for_dps(raw.as_ref()) {
            step = rule.step.unwrap_or(1.0);
            scale = rule.scale.unwrap_or(1.0);
            if let Some(cond) = self.active_condition(rule, device, None) {
                step = cond.step.unwrap_or(step);
                scale = cond.scale.unwrap_or(scale);
            }
        }
        if scaled {
            step / scale
        } else {
            step
        }
    }

    /// Semantic values this data point can be set to, in declaration order
    pub fn values<D: DeviceState + ?Sized>(&self, _device: &D) -> Vec<Value> {
        let mut values: Vec<Value> = Vec::new();
        let mut push = |value: &Value| {
            if !values.iter().any(|v| v == value) {
                values.push(value.clone());
            }
        };
        for rule in &self.config.mapping {
            if let Some(value) = &rule.value {
                if !rule.hidden {
                    push(value);
                }
            }
            for cond in &rule.conditions {
                if let Some(value) = &cond.value {
                    push(value);
                }
            }
        }
        values
    }

    /// Icon this data point asks for and how strongly, lower wins
    pub fn icon_rule<D: DeviceState + ?Sized>(&self, device: &D) -> (u32, Option<&'a str>) {
        let raw = self.raw_value(device);
        let Some(rule) = self.find_map_for_dps(raw.as_ref()) else {
            return (NO_ICON_PRIORITY, None);
        };
        let mut icon = rule.icon.as_deref();
        let mut priority = rule.icon_priority.unwrap_or(if icon.is_some() {
            DEFAULT_ICON_PRIORITY
        } else {
            NO_ICON_PRIORITY
        });
        if let Some(cond) = self.active_condition(rule, device, None) {
            if cond.icon_priority.unwrap_or(DEFAULT_ICON_PRIORITY) < priority {
                icon = cond.icon.as_deref().or(icon);
                priority = cond.icon_priority.unwrap_or(if icon.is_some() {
                    DEFAULT_ICON_PRIORITY
                } else {
                    NO_ICON_PRIORITY
                });
            }
        }
        (priority, icon)
    }
}
