//! Data point descriptors for Tuya local devices
//!
//! Devices expose their state as a flat set of numbered data points. This
//! crate describes what each data point means and converts between the raw
//! values the device speaks and the semantic values entities present:
//!
//! - [`DpConfig`] / [`EntityDescriptor`]: typed configuration
//! - [`DpDescriptor`]: reading, writing, ranges, steps and icons
//! - [`format`]: packed binary fields such as colour blobs

mod config;
mod descriptor;
pub mod format;
pub mod value;

pub use config::{
    slugify, Condition, DpConfig, DpType, EntityDescriptor, EntityKind, FormatField, MappingRule, Range,
    ValueMapping,
};
pub use descriptor::{DpDescriptor, DEFAULT_ICON_PRIORITY, NO_ICON_PRIORITY};
