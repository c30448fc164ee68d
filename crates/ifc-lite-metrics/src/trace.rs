// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Field source trace

use serde::Serialize;
use std::fmt;

/// Where a metric field's value came from
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "camelCase")]
pub enum FieldSource {
    /// Category-specific quantity set, e.g. `Qto_SlabBaseQuantities`
    QuantitySet(String),
    BaseQuantities,
    AdapterSet(String),
    /// Any other property set, matched by name
    PropertySet(String),
    /// Direct entity attribute, e.g. `OverallWidth`
    Attribute(String),
    /// Parsed from the element or type display name
    DisplayName,
    /// Computed from other resolved fields
    Derived,
}

impl fmt::Display for FieldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSource::QuantitySet(name) => write!(f, "quantity set {}", name),
            FieldSource::BaseQuantities => f.write_str("BaseQuantities"),
            FieldSource::AdapterSet(name) => write!(f, "adapter set {}", name),
            FieldSource::PropertySet(name) => write!(f, "property set {}", name),
            FieldSource::Attribute(name) => write!(f, "attribute {}", name),
            FieldSource::DisplayName => f.write_str("display name"),
            FieldSource::Derived => f.write_str("derived"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub field: String,
    pub source: FieldSource,
}

/// Per-field sources of one extraction, in resolution order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SourceTrace {
    entries: Vec<TraceEntry>,
}

impl SourceTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a field source; a later record for the same field replaces it
    pub fn record(&mut self, field: &str, source: FieldSource) {
        log::debug!("{} <- {}", field, source);
        match self.entries.iter_mut().find(|e| e.field == field) {
            Some(entry) => entry.source = source,
            None => self.entries.push(TraceEntry {
                field: field.to_string(),
                source,
            }),
        }
    }

    pub fn source_of(&self, field: &str) -> Option<&FieldSource> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| &e.source)
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
