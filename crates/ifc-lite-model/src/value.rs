// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw attribute values and property views
//!
//! Graph backends hand out entities as loosely typed attribute bags. The same
//! logical value can show up bare (`0.3`), wrapped (`{"value": 0.3}`), as a
//! reference handle (`{"type": 5, "value": 812}`) or resolved into a nested
//! entity. [`RawValue`] is the closed set of those shapes.

use crate::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value-type code the graph uses for reference handles
pub const REFERENCE_VALUE_TYPE: u32 = 5;

/// One raw attribute value
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Null or absent value
    #[default]
    Null,
    /// Boolean primitive
    Bool(bool),
    /// Numeric primitive
    Number(f64),
    /// Text primitive
    Text(String),
    /// List of values (property lists, set references, type objects)
    List(Vec<RawValue>),
    /// Object: a wrapper, a reference handle or a nested entity
    Object(PropertyView),
}

impl RawValue {
    /// Explicit reference handle (`{"type": 5, "value": id}`)
    pub fn as_reference(&self) -> Option<EntityId> {
        match self {
            RawValue::Object(view) => view.as_reference(),
            _ => None,
        }
    }

    /// Borrow as a nested view
    pub fn as_view(&self) -> Option<&PropertyView> {
        match self {
            RawValue::Object(view) => Some(view),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_list(&self) -> Option<&[RawValue]> {
        match self {
            RawValue::List(list) => Some(list),
            _ => None,
        }
    }

    /// Bare or wrapped number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) if n.is_finite() => Some(*n),
            RawValue::Object(view) if view.is_wrapper() => view.attributes.get("value")?.as_number(),
            _ => None,
        }
    }

    /// Bare or wrapped text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            RawValue::Object(view) if view.is_wrapper() => view.attributes.get("value")?.as_text(),
            _ => None,
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<PropertyView> for RawValue {
    fn from(view: PropertyView) -> Self {
        RawValue::Object(view)
    }
}

/// Attribute bag of one entity (or one wrapper object)
///
/// `type` carries the entity's type code for entities and the value-type code
/// for wrappers. `psets` and `types` are only filled on indirect views.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyView {
    /// Express ID, when the object is an entity
    #[serde(rename = "expressID", default, skip_serializing_if = "Option::is_none")]
    pub express_id: Option<u32>,
    /// Type code (entity class or wrapped value type)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_code: Option<u32>,
    /// Property and quantity sets attached by an indirect lookup
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub psets: Vec<RawValue>,
    /// Type objects attached by an indirect lookup
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<RawValue>,
    /// Remaining named attributes
    #[serde(flatten)]
    pub attributes: BTreeMap<String, RawValue>,
}

impl PropertyView {
    /// Create an empty entity view
    pub fn entity(id: u32, type_code: u32) -> Self {
        Self {
            express_id: Some(id),
            type_code: Some(type_code),
            ..Self::default()
        }
    }

    /// Builder-style attribute insertion
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Get attribute by name
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.attributes.get(name)
    }

    /// Text attribute, bare or wrapped
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.as_text())
    }

    /// Numeric attribute, bare or wrapped
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|v| v.as_number())
    }

    /// Entity id of this view
    pub fn id(&self) -> Option<EntityId> {
        self.express_id.map(EntityId)
    }

    /// A wrapper is a non-entity object with a `value` attribute; metadata
    /// keys next to it (`name`, `label`, ...) are ignored
    pub fn is_wrapper(&self) -> bool {
        self.express_id.is_none() && self.attributes.contains_key("value")
    }

    /// Explicit reference handle
    pub fn as_reference(&self) -> Option<EntityId> {
        if self.type_code != Some(REFERENCE_VALUE_TYPE) || !self.is_wrapper() {
            return None;
        }
        match self.attributes.get("value")? {
            RawValue::Number(n) if *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64 => {
                Some(EntityId(*n as u32))
            }
            _ => None,
        }
    }
}

/// Build an explicit reference handle
pub fn reference(id: u32) -> RawValue {
    RawValue::Object(PropertyView {
        type_code: Some(REFERENCE_VALUE_TYPE),
        ..PropertyView::default()
    }
    .with("value", id as f64))
}
