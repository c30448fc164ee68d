// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property and quantity set resolution
//!
//! Walks the sets attached to one element (instance sets first, then the
//! sets of its type objects), follows reference handles through the graph,
//! and flattens every entry into a name + [`Scalar`] pair.

use ifc_lite_model::{ElementRef, EntityId, GraphAccess, PropertyView, RawValue};
use serde::Serialize;
use std::borrow::Cow;

/// Attributes a value can hide behind, typed measure wrappers first
const VALUE_KEYS: &[&str] = &[
    "AreaValue",
    "LengthValue",
    "VolumeValue",
    "CountValue",
    "WeightValue",
    "NominalValue",
    "value",
    "EnumerationValues",
    "ListValues",
];

/// Fully resolved primitive value of a property entry
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Scalar {
    /// Numeric value; text is parsed
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Scalar::Bool(_) => None,
        }
    }

    /// Text value, without conversion
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean value; STEP logicals and yes/no strings are accepted
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            Scalar::Text(s) => match s.trim().trim_matches('.').to_uppercase().as_str() {
                "T" | "TRUE" | "YES" | "Y" | "1" => Some(true),
                "F" | "FALSE" | "NO" | "N" | "0" => Some(false),
                _ => None,
            },
            Scalar::Number(n) => Some(*n != 0.0),
        }
    }

    /// Display form of the value
    pub fn to_text(&self) -> String {
        match self {
            Scalar::Text(s) => s.clone(),
            Scalar::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn scalar_of_primitive(value: &RawValue) -> Option<Scalar> {
    match value {
        RawValue::Number(n) if n.is_finite() => Some(Scalar::Number(*n)),
        RawValue::Text(s) if !s.is_empty() => Some(Scalar::Text(s.clone())),
        RawValue::Bool(b) => Some(Scalar::Bool(*b)),
        _ => None,
    }
}

/// Resolve any raw value shape to a scalar
///
/// Order: typed measure wrapper, `NominalValue`, `value`, enumeration and list
/// values, then the bare primitive.
pub fn resolve_scalar(value: &RawValue) -> Option<Scalar> {
    match value {
        RawValue::Object(view) => scalar_of_view(view),
        RawValue::List(items) => items.iter().find_map(resolve_scalar),
        _ => scalar_of_primitive(value),
    }
}

fn scalar_of_view(view: &PropertyView) -> Option<Scalar> {
    VALUE_KEYS
        .iter()
        .filter_map(|key| view.get(key))
        .find_map(resolve_scalar)
}

/// Whether a set carries quantities or descriptive properties
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SetKind {
    Quantity,
    Property,
}

/// Where a set was attached
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SetOrigin {
    Instance,
    TypeObject,
}

/// One named entry of a set
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedEntry {
    pub name: String,
    pub value: Scalar,
}

/// One property or quantity set with its entries resolved
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSet {
    pub name: String,
    pub kind: SetKind,
    pub origin: SetOrigin,
    pub entries: Vec<ResolvedEntry>,
}

impl ResolvedSet {
    /// Entry by exact, case-insensitive name
    pub fn exact(&self, field: &str) -> Option<&Scalar> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(field))
            .map(|e| &e.value)
    }

    /// Entry whose squashed name contains the squashed field name
    pub fn fuzzy(&self, field: &str) -> Option<&Scalar> {
        let needle = squash(field);
        if needle.len() < FUZZY_MIN_LEN {
            return None;
        }
        self.entries
            .iter()
            .find(|e| squash(&e.name).contains(&needle))
            .map(|e| &e.value)
    }

    /// Exact match, then fuzzy
    pub fn find(&self, field: &str) -> Option<&Scalar> {
        self.exact(field).or_else(|| self.fuzzy(field))
    }

    pub fn is_base_quantities(&self) -> bool {
        is_base_quantities_name(&self.name)
    }
}

/// Field names shorter than this never match fuzzily
const FUZZY_MIN_LEN: usize = 4;

/// Lower-case, with spaces, underscores and hyphens removed
pub fn squash(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_base_quantities_name(name: &str) -> bool {
    let squashed = squash(name);
    let stripped = ["ifc", "pset", "qto"]
        .iter()
        .find_map(|prefix| squashed.strip_prefix(prefix))
        .unwrap_or(squashed.as_str());
    stripped == "basequantities"
}

/// Well-known fields of the BaseQuantities set, raw (unnormalized)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BaseQuantities {
    pub gross_area: Option<f64>,
    pub net_area: Option<f64>,
    pub projected_area: Option<f64>,
    pub perimeter: Option<f64>,
    pub width: Option<f64>,
    pub depth: Option<f64>,
    pub length: Option<f64>,
    pub height: Option<f64>,
    pub thickness: Option<f64>,
    pub gross_volume: Option<f64>,
    pub net_volume: Option<f64>,
    pub volume: Option<f64>,
}

impl BaseQuantities {
    fn from_set(set: &ResolvedSet) -> Option<Self> {
        let number = |field: &str| set.exact(field).and_then(Scalar::as_number);
        let quantities = Self {
            gross_area: number("GrossArea"),
            net_area: number("NetArea"),
            projected_area: number("ProjectedArea"),
            perimeter: number("Perimeter"),
            width: number("Width"),
            depth: number("Depth"),
            length: number("Length"),
            height: number("Height"),
            thickness: number("Thickness"),
            gross_volume: number("GrossVolume"),
            net_volume: number("NetVolume"),
            volume: number("Volume"),
        };
        (quantities != Self::default()).then_some(quantities)
    }

    /// Field by its quantity name
    pub fn get(&self, field: &str) -> Option<f64> {
        match squash(field).as_str() {
            "grossarea" => self.gross_area,
            "netarea" => self.net_area,
            "projectedarea" => self.projected_area,
            "perimeter" => self.perimeter,
            "width" => self.width,
            "depth" => self.depth,
            "length" => self.length,
            "height" => self.height,
            "thickness" => self.thickness,
            "grossvolume" => self.gross_volume,
            "netvolume" => self.net_volume,
            "volume" => self.volume,
            _ => None,
        }
    }
}

/// All sets of one element, instance sets ahead of type-object sets
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementSets {
    sets: Vec<ResolvedSet>,
}

impl ElementSets {
    pub fn new(sets: Vec<ResolvedSet>) -> Self {
        Self { sets }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedSet> {
        self.sets.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// First set with this exact (case-insensitive) name
    pub fn named(&self, set_name: &str) -> Option<&ResolvedSet> {
        self.sets
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(set_name))
    }

    /// Exact field lookup scoped to one named set
    pub fn find_in(&self, set_name: &str, field: &str) -> Option<&Scalar> {
        self.sets
            .iter()
            .filter(|s| s.name.eq_ignore_ascii_case(set_name))
            .find_map(|s| s.exact(field))
    }

    /// Exact field lookup across all sets, with the set it came from
    pub fn find_exact(&self, field: &str) -> Option<(&ResolvedSet, &Scalar)> {
        self.sets
            .iter()
            .find_map(|s| s.exact(field).map(|v| (s, v)))
    }

    /// Fuzzy field lookup across all sets, with the set it came from
    pub fn find_fuzzy(&self, field: &str) -> Option<(&ResolvedSet, &Scalar)> {
        self.sets
            .iter()
            .find_map(|s| s.fuzzy(field).map(|v| (s, v)))
    }

    /// Exact across all sets, then fuzzy across all sets
    pub fn find(&self, field: &str) -> Option<&Scalar> {
        self.find_exact(field)
            .or_else(|| self.find_fuzzy(field))
            .map(|(_, v)| v)
    }

    /// First exactly named field, across all sets, as text
    pub fn text_exact(&self, fields: &[&str]) -> Option<String> {
        fields
            .iter()
            .find_map(|f| self.find_exact(f))
            .map(|(_, v)| v.to_text())
            .filter(|s| !s.trim().is_empty())
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.find(field).and_then(Scalar::as_number)
    }

    /// Parsed BaseQuantities set
    pub fn base_quantities(&self) -> Option<BaseQuantities> {
        self.sets
            .iter()
            .filter(|s| s.is_base_quantities())
            .find_map(BaseQuantities::from_set)
    }

    /// Sets whose name contains the adapter hint
    pub fn adapter_sets<'a>(&'a self, hint: &str) -> impl Iterator<Item = &'a ResolvedSet> + 'a {
        let hint = squash(hint);
        self.sets
            .iter()
            .filter(move |s| !hint.is_empty() && squash(&s.name).contains(&hint))
    }
}

/// Resolves the sets of one element through a graph
pub struct PropertyResolver<'g> {
    graph: &'g dyn GraphAccess,
    element: ElementRef,
    threshold: f64,
}

impl<'g> PropertyResolver<'g> {
    pub fn new(graph: &'g dyn GraphAccess, element: ElementRef, threshold: f64) -> Self {
        Self {
            graph,
            element,
            threshold,
        }
    }

    /// Bare integral numbers and plain `{value: n}` objects above the
    /// threshold; a wrapper carrying other keys is a literal
    fn implicit_reference(&self, value: &RawValue) -> Option<EntityId> {
        let n = match value {
            RawValue::Number(n) => *n,
            RawValue::Object(view) if view.is_wrapper() && view.attributes.len() == 1 => {
                match view.get("value")? {
                    RawValue::Number(n) => *n,
                    _ => return None,
                }
            }
            _ => return None,
        };
        (n.fract() == 0.0 && n > self.threshold && n <= u32::MAX as f64)
            .then_some(EntityId(n as u32))
    }

    fn fetch(&self, id: EntityId) -> Option<PropertyView> {
        match self.graph.item_properties(self.element.with_id(id)) {
            Ok(view) => Some(view),
            Err(e) => {
                log::debug!(
                    "reference {} of element {} not resolved: {}",
                    id,
                    self.element,
                    e
                );
                None
            }
        }
    }

    /// Turn a set member or set link into an entity view
    ///
    /// Explicit handles and integral ids above the threshold are looked up;
    /// a failed lookup leaves the entry as a literal.
    pub fn resolve_entry<'v>(&self, raw: &'v RawValue) -> Option<Cow<'v, PropertyView>> {
        let id = raw.as_reference().or_else(|| self.implicit_reference(raw));
        if let Some(id) = id {
            if let Some(view) = self.fetch(id) {
                return Some(Cow::Owned(view));
            }
        }
        raw.as_view().map(Cow::Borrowed)
    }

    fn resolve_set(&self, raw: &RawValue, origin: SetOrigin) -> Option<ResolvedSet> {
        let view = self.resolve_entry(raw)?;
        let name = view.text("Name")?.to_string();

        let (kind, members) = match (view.get("Quantities"), view.get("HasProperties")) {
            (Some(q), _) => (SetKind::Quantity, q),
            (None, Some(p)) => (SetKind::Property, p),
            (None, None) => return None,
        };

        let entries = members
            .as_list()
            .unwrap_or_default()
            .iter()
            .filter_map(|member| {
                let entry = self.resolve_entry(member)?;
                let name = entry.text("Name")?.to_string();
                let value = scalar_of_view(&entry)?;
                Some(ResolvedEntry { name, value })
            })
            .collect();

        Some(ResolvedSet {
            name,
            kind,
            origin,
            entries,
        })
    }

    /// Type objects linked to the element, resolved to views
    pub fn type_objects(&self, full: &PropertyView) -> Vec<PropertyView> {
        full.types
            .iter()
            .filter_map(|raw| self.resolve_entry(raw).map(Cow::into_owned))
            .collect()
    }

    /// Instance sets, then the `HasPropertySets` of each type object
    pub fn load_sets(&self, full: &PropertyView, type_objects: &[PropertyView]) -> ElementSets {
        let mut sets: Vec<ResolvedSet> = full
            .psets
            .iter()
            .filter_map(|raw| self.resolve_set(raw, SetOrigin::Instance))
            .collect();

        for type_object in type_objects {
            if let Some(links) = type_object.get("HasPropertySets").and_then(|v| v.as_list()) {
                sets.extend(
                    links
                        .iter()
                        .filter_map(|raw| self.resolve_set(raw, SetOrigin::TypeObject)),
                );
            }
        }

        log::debug!("element {} resolved {} sets", self.element, sets.len());
        ElementSets::new(sets)
    }
}
