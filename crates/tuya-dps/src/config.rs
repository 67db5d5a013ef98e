//! Typed data point and entity descriptors
//!
//! These structures are plain data: they deserialize from device profiles
//! and can equally be built in code through the `with_*` builders. All of
//! the conversion behaviour lives in [`crate::DpDescriptor`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use tuya_core::Value;

use crate::descriptor::DpDescriptor;

// =============================================================================
// Serde helpers
// =============================================================================

/// Distinguish a missing key (`None`) from an explicit null (`Some(Null)`)
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Data point ids are written as numbers in most profiles
fn dp_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "data point id must be a string or number, got {}",
            other
        ))),
    }
}

// =============================================================================
// Data point types
// =============================================================================

/// Declared type of a data point's raw value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DpType {
    Boolean,
    Integer,
    Float,
    String,
    Base64,
    Hex,
    Json,
}

impl DpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DpType::Boolean => "boolean",
            DpType::Integer => "integer",
            DpType::Float => "float",
            DpType::String => "string",
            DpType::Base64 => "base64",
            DpType::Hex => "hex",
            DpType::Json => "json",
        }
    }

    /// Whether values of this type carry packed binary content
    pub fn is_binary(&self) -> bool {
        matches!(self, DpType::Base64 | DpType::Hex)
    }
}

impl fmt::Display for DpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive numeric range in device units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Simple `dps_val <-> value` override nested in a condition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueMapping {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub dps_val: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Alternative behaviour selected by the value of a constraint data point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub dps_val: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    #[serde(default)]
    pub invalid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_redirect: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mapping: Vec<ValueMapping>,
}

impl Condition {
    /// A condition active while the constraint reads `dps_val`
    pub fn when(dps_val: Value) -> Self {
        Self {
            dps_val: Some(dps_val),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some(Range::new(min, max));
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>, priority: Option<u32>) -> Self {
        self.icon = Some(icon.into());
        self.icon_priority = priority;
        self
    }

    pub fn with_redirect(mut self, target: impl Into<String>) -> Self {
        self.value_redirect = Some(target.into());
        self
    }

    pub fn invalid(mut self) -> Self {
        self.invalid = true;
        self
    }
}

/// One rule of a data point's mapping list
///
/// A rule without `dps_val` is the default rule: it applies to any raw
/// value that no other rule matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingRule {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub dps_val: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default)]
    pub invert: bool,
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_redirect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl MappingRule {
    /// A rule translating the raw value `dps_val` to `value`
    pub fn map(dps_val: Value, value: Value) -> Self {
        Self {
            dps_val: Some(dps_val),
            value: Some(value),
            ..Default::default()
        }
    }

    /// A rule matching the raw value `dps_val` without replacing it
    pub fn when(dps_val: Value) -> Self {
        Self {
            dps_val: Some(dps_val),
            ..Default::default()
        }
    }

    /// A default rule, applying to every unmatched raw value
    pub fn default_rule() -> Self {
        Self::default()
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some(Range::new(min, max));
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>, priority: Option<u32>) -> Self {
        self.icon = Some(icon.into());
        self.icon_priority = priority;
        self
    }

    pub fn with_redirect(mut self, target: impl Into<String>) -> Self {
        self.value_redirect = Some(target.into());
        self
    }

    pub fn with_conditions(mut self, constraint: impl Into<String>, conditions: Vec<Condition>) -> Self {
        self.constraint = Some(constraint.into());
        self.conditions = conditions;
        self
    }

    pub fn inverted(mut self) -> Self {
        self.invert = true;
        self
    }

    pub fn invalid(mut self) -> Self {
        self.invalid = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// One field of a packed binary value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatField {
    pub name: String,
    #[serde(default = "default_field_bytes")]
    pub bytes: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

fn default_field_bytes() -> u8 {
    1
}

impl FormatField {
    pub fn new(name: impl Into<String>, bytes: u8) -> Self {
        Self {
            name: name.into(),
            bytes,
            range: None,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some(Range::new(min, max));
        self
    }

    /// Declared range, defaulting to the full unsigned width of the field
    pub fn effective_range(&self) -> Range {
        self.range.unwrap_or_else(|| {
            let max = 256f64.powi(i32::from(self.bytes)) - 1.0;
            Range::new(0.0, max)
        })
    }
}

/// Configuration of one data point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpConfig {
    #[serde(deserialize_with = "dp_id")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub dp_type: DpType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mapping: Vec<MappingRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Vec<FormatField>>,
    #[serde(default)]
    pub readonly: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl DpConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>, dp_type: DpType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            dp_type,
            range: None,
            mapping: Vec::new(),
            format: None,
            readonly: false,
            hidden: false,
            optional: false,
            unit: None,
            class: None,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.range = Some(Range::new(min, max));
        self
    }

    pub fn with_mapping(mut self, rule: MappingRule) -> Self {
        self.mapping.push(rule);
        self
    }

    pub fn with_format(mut self, fields: Vec<FormatField>) -> Self {
        self.format = Some(fields);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

// =============================================================================
// Entities
// =============================================================================

/// Entity platforms a device can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EntityKind {
    BinarySensor,
    Climate,
    Fan,
    Light,
    Lock,
    Number,
    Select,
    Sensor,
    Switch,
    Vacuum,
}

impl EntityKind {
    pub const ALL: [EntityKind; 10] = [
        EntityKind::BinarySensor,
        EntityKind::Climate,
        EntityKind::Fan,
        EntityKind::Light,
        EntityKind::Lock,
        EntityKind::Number,
        EntityKind::Select,
        EntityKind::Sensor,
        EntityKind::Switch,
        EntityKind::Vacuum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::BinarySensor => "binary_sensor",
            EntityKind::Climate => "climate",
            EntityKind::Fan => "fan",
            EntityKind::Light => "light",
            EntityKind::Lock => "lock",
            EntityKind::Number => "number",
            EntityKind::Select => "select",
            EntityKind::Sensor => "sensor",
            EntityKind::Switch => "switch",
            EntityKind::Vacuum => "vacuum",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown entity kind '{}'", s))
    }
}

impl TryFrom<String> for EntityKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EntityKind> for String {
    fn from(kind: EntityKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One entity of a device: its platform, naming and data points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub entity: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Name of the entity that replaces this one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
    #[serde(default)]
    pub dps: Vec<DpConfig>,
}

impl EntityDescriptor {
    pub fn new(entity: EntityKind) -> Self {
        Self {
            entity,
            name: None,
            class: None,
            icon: None,
            icon_priority: None,
            category: None,
            deprecated: None,
            dps: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_dp(mut self, dp: DpConfig) -> Self {
        self.dps.push(dp);
        self
    }

    pub fn deprecated_by(mut self, replacement: impl Into<String>) -> Self {
        self.deprecated = Some(replacement.into());
        self
    }

    /// Identifier of this entity within its device, e.g. `lock_child_lock`
    pub fn config_id(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => format!("{}_{}", self.entity, slugify(name)),
            _ => self.entity.to_string(),
        }
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated.is_some()
    }

    /// Warning logged when a deprecated entity is set up
    pub fn deprecation_message(&self, device_name: &str) -> Option<String> {
        self.deprecated.as_ref().map(|replacement| {
            format!(
                "The use of {} for {} is deprecated and should be replaced by {}.",
                self.entity, device_name, replacement
            )
        })
    }

    /// Data point with the given role name
    pub fn find_dps(&self, name: &str) -> Option<DpDescriptor<'_>> {
        self.dps
            .iter()
            .find(|dp| dp.name == name)
            .map(|config| DpDescriptor::new(self, config))
    }

    /// All data points, bound to this entity
    pub fn dps(&self) -> impl Iterator<Item = DpDescriptor<'_>> {
        self.dps.iter().map(move |config| DpDescriptor::new(self, config))
    }
}

/// Lowercase, with every run of non-alphanumerics collapsed to `_`
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_sep = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}
