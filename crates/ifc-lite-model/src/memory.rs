// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory graph over a JSON snapshot
//!
//! The snapshot format mirrors what browser-side IFC tooling exports:
//!
//! ```json
//! {
//!   "modelId": 0,
//!   "typeNames": { "1529196076": "IFCSLAB" },
//!   "entities": [ { "expressID": 12, "type": 1529196076, "Name": { "type": 1, "value": "Floor" } } ],
//!   "propertySets": { "12": [40, 41] },
//!   "typeObjects": { "12": [60] }
//! }
//! ```
//!
//! Reference handles inside entities are `{ "type": 5, "value": <id> }`.

use crate::{ElementRef, EntityId, GraphAccess, GraphError, PropertyView, RawValue, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serialized form of a [`MemoryGraph`]
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    /// Model handle the snapshot answers for
    #[serde(default)]
    pub model_id: u32,
    /// Type code -> type name
    #[serde(default)]
    pub type_names: BTreeMap<u32, String>,
    /// All entities, each with an `expressID`
    #[serde(default)]
    pub entities: Vec<PropertyView>,
    /// Element id -> property/quantity set ids
    #[serde(default)]
    pub property_sets: BTreeMap<u32, Vec<u32>>,
    /// Element id -> type object ids
    #[serde(default)]
    pub type_objects: BTreeMap<u32, Vec<u32>>,
}

/// Graph access backed by an in-memory entity table
pub struct MemoryGraph {
    model_id: u32,
    entities: FxHashMap<u32, PropertyView>,
    type_names: FxHashMap<u32, String>,
    property_sets: FxHashMap<u32, Vec<EntityId>>,
    type_objects: FxHashMap<u32, Vec<EntityId>>,
    /// How many reference hops an indirect lookup resolves
    resolve_depth: usize,
}

impl MemoryGraph {
    /// Create an empty graph for a model handle
    pub fn new(model_id: u32) -> Self {
        Self {
            model_id,
            entities: FxHashMap::default(),
            type_names: FxHashMap::default(),
            property_sets: FxHashMap::default(),
            type_objects: FxHashMap::default(),
            resolve_depth: 1,
        }
    }

    /// Build from a decoded snapshot
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self> {
        let mut graph = Self::new(snapshot.model_id);
        for view in snapshot.entities {
            graph.insert(view)?;
        }
        graph.type_names.extend(snapshot.type_names);
        for (element, sets) in snapshot.property_sets {
            graph
                .property_sets
                .insert(element, sets.into_iter().map(EntityId).collect());
        }
        for (element, types) in snapshot.type_objects {
            graph
                .type_objects
                .insert(element, types.into_iter().map(EntityId).collect());
        }
        Ok(graph)
    }

    /// Parse a JSON snapshot
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_snapshot(serde_json::from_str(json)?)
    }

    /// Build from an already parsed JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Self::from_snapshot(serde_json::from_value(value)?)
    }

    /// Set how many reference hops an indirect lookup resolves
    ///
    /// Property sets are attached one hop below the element, so with the
    /// default depth of 1 their members stay as reference handles.
    pub fn with_resolve_depth(mut self, depth: usize) -> Self {
        self.resolve_depth = depth;
        self
    }

    /// Add an entity; the view must carry an express ID
    pub fn insert(&mut self, view: PropertyView) -> Result<()> {
        let id = view
            .express_id
            .ok_or_else(|| GraphError::snapshot("entity without expressID"))?;
        self.entities.insert(id, view);
        Ok(())
    }

    /// Attach a property or quantity set to an element
    pub fn link_property_set(&mut self, element: u32, set: u32) {
        self.property_sets
            .entry(element)
            .or_default()
            .push(EntityId(set));
    }

    /// Attach a type object to an element
    pub fn link_type_object(&mut self, element: u32, type_object: u32) {
        self.type_objects
            .entry(element)
            .or_default()
            .push(EntityId(type_object));
    }

    /// Register a type code name
    pub fn name_type(&mut self, code: u32, name: impl Into<String>) {
        self.type_names.insert(code, name.into());
    }

    /// Number of stored entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    fn lookup(&self, element: ElementRef) -> Result<&PropertyView> {
        if element.model_id != self.model_id {
            return Err(GraphError::ModelNotLoaded(element.model_id));
        }
        self.entities
            .get(&element.id.0)
            .ok_or(GraphError::EntityNotFound(element.id))
    }

    fn resolve_value(&self, value: &RawValue, depth: usize) -> RawValue {
        if depth == 0 {
            return value.clone();
        }
        if let Some(id) = value.as_reference() {
            return match self.entities.get(&id.0) {
                Some(target) => RawValue::Object(self.resolve_view(target, depth - 1)),
                None => {
                    log::debug!("dangling reference {} left unresolved", id);
                    value.clone()
                }
            };
        }
        match value {
            RawValue::List(items) => RawValue::List(
                items
                    .iter()
                    .map(|item| self.resolve_value(item, depth))
                    .collect(),
            ),
            _ => value.clone(),
        }
    }

    fn resolve_view(&self, view: &PropertyView, depth: usize) -> PropertyView {
        let attributes = view
            .attributes
            .iter()
            .map(|(name, value)| (name.clone(), self.resolve_value(value, depth)))
            .collect();
        PropertyView {
            attributes,
            ..view.clone()
        }
    }

    fn linked_views(&self, links: Option<&Vec<EntityId>>, depth: usize) -> Vec<RawValue> {
        links
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| match self.entities.get(&id.0) {
                        Some(view) => Some(RawValue::Object(self.resolve_view(view, depth))),
                        None => {
                            log::debug!("linked entity {} missing from snapshot", id);
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl GraphAccess for MemoryGraph {
    fn properties(&self, element: ElementRef, resolve_indirect: bool) -> Result<PropertyView> {
        let view = self.lookup(element)?;
        if !resolve_indirect {
            return Ok(view.clone());
        }

        let nested_depth = self.resolve_depth.saturating_sub(1);
        let mut resolved = self.resolve_view(view, self.resolve_depth);
        resolved.psets = self.linked_views(self.property_sets.get(&element.id.0), nested_depth);
        resolved.types = self.linked_views(self.type_objects.get(&element.id.0), nested_depth);
        Ok(resolved)
    }

    fn item_properties(&self, element: ElementRef) -> Result<PropertyView> {
        self.lookup(element).cloned()
    }

    fn type_code_to_name(&self, code: u32) -> Result<String> {
        self.type_names
            .get(&code)
            .cloned()
            .ok_or(GraphError::UnknownTypeCode(code))
    }
}
