// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Category extractors
//!
//! Every extractor follows the same template: load the element context once
//! (views, type objects, resolved sets, identity), then pull each field
//! through [`FieldReader`] in priority order:
//!
//! 1. the category's named quantity sets
//! 2. BaseQuantities
//! 3. adapter property sets
//! 4. any set, exact name
//! 5. any set, fuzzy name
//!
//! and finally attributes, the parsed display name, or a derived value.

mod framing;
mod furnishing;
mod openings;
mod railing;
mod roof;
mod slab;
mod stair;
mod wall;

use crate::classify::ElementCategory;
use crate::error::{MetricsError, MetricsResult};
use crate::identity::{identity_from_parts, ElementIdentity};
use crate::metrics::{
    CaseworkMetrics, FramingMetrics, MassMetrics, OpeningMetrics, RailingMetrics, RoofMetrics,
    SlabMetrics, StairMetrics, StandardizedMetrics, TracedMetrics, WallMetrics,
};
use crate::resolver::{BaseQuantities, ElementSets, PropertyResolver, Scalar, SetKind};
use crate::router::MetricsExtractor;
use crate::trace::{FieldSource, SourceTrace};
use ifc_lite_model::{ElementRef, PropertyView};

/// Everything fetched for one element before extraction
pub(crate) struct ElementContext {
    pub base: PropertyView,
    pub full: PropertyView,
    pub sets: ElementSets,
    pub identity: ElementIdentity,
    /// Fractional-inch denominator from the configuration
    pub denominator: u32,
}

impl ElementContext {
    pub fn load(extractor: &MetricsExtractor, element: ElementRef) -> MetricsResult<Self> {
        let graph = extractor.graph();
        let config = extractor.config();

        let base = graph.properties(element, false)?;
        let full = graph.properties(element, true)?;
        let code = base
            .type_code
            .or(full.type_code)
            .ok_or(MetricsError::MissingTypeCode(element))?;
        let class_name = extractor.class_name_for_code(code);

        let resolver = PropertyResolver::new(graph, element, config.reference_id_threshold);
        let type_objects = resolver.type_objects(&full);
        let sets = resolver.load_sets(&full, &type_objects);

        let identity = identity_from_parts(
            element,
            &class_name,
            &base,
            &full,
            &type_objects,
            &sets,
            &config.classification,
        );

        Ok(Self {
            base,
            full,
            sets,
            identity,
            denominator: config.fraction_denominator,
        })
    }

    /// Positive numeric attribute, resolved view first
    pub fn attr_number(&self, name: &str) -> Option<f64> {
        self.full
            .number(name)
            .or_else(|| self.base.number(name))
            .filter(|n| *n > 0.0)
    }

    pub fn attr_text(&self, name: &str) -> Option<String> {
        self.full
            .text(name)
            .or_else(|| self.base.text(name))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// Element name, then type name
    pub fn display_texts(&self) -> impl Iterator<Item = &str> {
        [self.identity.name.as_deref(), self.identity.type_name.as_deref()]
            .into_iter()
            .flatten()
    }

    pub fn class_is(&self, class_name: &str) -> bool {
        self.identity.class_name.eq_ignore_ascii_case(class_name)
    }
}

/// Priority-ordered field lookup over one element's sets
pub(crate) struct FieldReader<'a> {
    sets: &'a ElementSets,
    quantity_sets: &'static [&'static str],
    base: Option<BaseQuantities>,
    adapter_hint: &'a str,
    trace: Option<SourceTrace>,
}

impl<'a> FieldReader<'a> {
    pub fn new(
        sets: &'a ElementSets,
        quantity_sets: &'static [&'static str],
        adapter_hint: &'a str,
        debug_trace: bool,
    ) -> Self {
        Self {
            sets,
            quantity_sets,
            base: sets.base_quantities(),
            adapter_hint,
            trace: debug_trace.then(SourceTrace::new),
        }
    }

    /// Note a field source; no-op unless tracing
    pub fn record(&mut self, field: &str, source: FieldSource) {
        if let Some(trace) = self.trace.as_mut() {
            trace.record(field, source);
        }
    }

    pub fn into_trace(self) -> Option<SourceTrace> {
        self.trace
    }

    fn lookup<T>(
        &self,
        names: &[&str],
        fuzzy: bool,
        base: impl Fn(&BaseQuantities, &str) -> Option<T>,
        convert: impl Fn(&Scalar) -> Option<T>,
    ) -> Option<(T, FieldSource)> {
        for set_name in self.quantity_sets {
            for name in names {
                if let Some(v) = self.sets.find_in(set_name, name).and_then(&convert) {
                    return Some((v, FieldSource::QuantitySet(set_name.to_string())));
                }
            }
        }

        if let Some(quantities) = &self.base {
            if let Some(v) = names.iter().find_map(|name| base(quantities, name)) {
                return Some((v, FieldSource::BaseQuantities));
            }
        }

        for set in self.sets.adapter_sets(self.adapter_hint) {
            for name in names {
                let hit = if fuzzy { set.find(name) } else { set.exact(name) };
                if let Some(v) = hit.and_then(&convert) {
                    return Some((v, FieldSource::AdapterSet(set.name.clone())));
                }
            }
        }

        for set in self.sets.iter() {
            for name in names {
                if let Some(v) = set.exact(name).and_then(&convert) {
                    return Some((v, FieldSource::PropertySet(set.name.clone())));
                }
            }
        }

        if fuzzy {
            for set in self.sets.iter() {
                for name in names {
                    if let Some(v) = set.fuzzy(name).and_then(&convert) {
                        return Some((v, FieldSource::PropertySet(set.name.clone())));
                    }
                }
            }
        }

        None
    }

    fn positive(value: &Scalar) -> Option<f64> {
        value.as_number().filter(|n| *n > 0.0)
    }

    fn number_with(&mut self, field: &str, names: &[&str], fuzzy: bool) -> Option<f64> {
        let (value, source) = self.lookup(
            names,
            fuzzy,
            |base, name| base.get(name).filter(|n| *n > 0.0),
            Self::positive,
        )?;
        self.record(field, source);
        Some(value)
    }

    /// First positive number under any of `names`, raw (unnormalized)
    pub fn number(&mut self, field: &str, names: &[&str]) -> Option<f64> {
        self.number_with(field, names, true)
    }

    /// Like [`number`](Self::number) with exact name matching only
    pub fn exact_number(&mut self, field: &str, names: &[&str]) -> Option<f64> {
        self.number_with(field, names, false)
    }

    /// Number from the category's quantity sets or BaseQuantities only
    pub fn quantity_number(&mut self, field: &str, names: &[&str]) -> Option<f64> {
        let found = self
            .quantity_sets
            .iter()
            .find_map(|set_name| {
                names.iter().find_map(|name| {
                    let v = self.sets.find_in(set_name, name).and_then(Self::positive)?;
                    Some((v, FieldSource::QuantitySet(set_name.to_string())))
                })
            })
            .or_else(|| {
                let base = self.base.as_ref()?;
                let v = names
                    .iter()
                    .find_map(|name| base.get(name).filter(|n| *n > 0.0))?;
                Some((v, FieldSource::BaseQuantities))
            });
        let (value, source) = found?;
        self.record(field, source);
        Some(value)
    }

    /// Number from descriptive property sets only, exact names
    pub fn property_number(&mut self, field: &str, names: &[&str]) -> Option<f64> {
        let (value, set_name) = self
            .sets
            .iter()
            .filter(|set| set.kind == SetKind::Property)
            .find_map(|set| {
                names.iter().find_map(|name| {
                    let v = set.exact(name).and_then(Self::positive)?;
                    Some((v, set.name.clone()))
                })
            })?;
        self.record(field, FieldSource::PropertySet(set_name));
        Some(value)
    }

    /// Whole count, e.g. number of risers
    pub fn count(&mut self, field: &str, names: &[&str]) -> Option<u32> {
        self.number(field, names)
            .map(f64::round)
            .filter(|n| *n >= 1.0 && *n <= u32::MAX as f64)
            .map(|n| n as u32)
    }

    pub fn text(&mut self, field: &str, names: &[&str]) -> Option<String> {
        let (value, source) = self.lookup(
            names,
            true,
            |_, _| None,
            |v| Some(v.to_text()).filter(|s| !s.trim().is_empty()),
        )?;
        self.record(field, source);
        Some(value)
    }

    /// Raw scalar, for fields that can be numeric or textual
    pub fn scalar(&mut self, field: &str, names: &[&str]) -> Option<Scalar> {
        let (value, source) = self.lookup(names, true, |_, _| None, |v| Some(v.clone()))?;
        self.record(field, source);
        Some(value)
    }

    /// Text from adapter sets only
    pub fn adapter_text(&mut self, field: &str, names: &[&str]) -> Option<String> {
        let found = self.sets.adapter_sets(self.adapter_hint).find_map(|set| {
            names.iter().find_map(|name| {
                set.exact(name)
                    .map(Scalar::to_text)
                    .filter(|s| !s.trim().is_empty())
                    .map(|v| (v, set.name.clone()))
            })
        });
        let (value, set_name) = found?;
        self.record(field, FieldSource::AdapterSet(set_name));
        Some(value)
    }

    /// Number from a direct attribute, recorded as such
    pub fn attribute(&mut self, ctx: &ElementContext, field: &str, name: &str) -> Option<f64> {
        let value = ctx.attr_number(name)?;
        self.record(field, FieldSource::Attribute(name.to_string()));
        Some(value)
    }

    /// Mark a field as computed from others
    pub fn derived(&mut self, field: &str, value: f64) -> Option<f64> {
        if !(value.is_finite() && value > 0.0) {
            return None;
        }
        self.record(field, FieldSource::Derived);
        Some(value)
    }
}

/// The twelve category extractors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Extractor {
    Roof,
    Slab,
    Wall,
    Door,
    Window,
    Footing,
    Column,
    Beam,
    Railing,
    Mass,
    Stair,
    Casework,
}

impl Extractor {
    pub fn for_category(category: ElementCategory) -> Option<Self> {
        let extractor = match category {
            ElementCategory::Roof => Extractor::Roof,
            ElementCategory::Slab | ElementCategory::Floor | ElementCategory::Deck => {
                Extractor::Slab
            }
            ElementCategory::Footing => Extractor::Footing,
            ElementCategory::Wall => Extractor::Wall,
            ElementCategory::Door => Extractor::Door,
            ElementCategory::Window => Extractor::Window,
            ElementCategory::Column => Extractor::Column,
            ElementCategory::Beam => Extractor::Beam,
            ElementCategory::Railing => Extractor::Railing,
            ElementCategory::Stair => Extractor::Stair,
            ElementCategory::Mass => Extractor::Mass,
            ElementCategory::Casework => Extractor::Casework,
            ElementCategory::Other => return None,
        };
        Some(extractor)
    }

    pub fn category(self) -> ElementCategory {
        match self {
            Extractor::Roof => ElementCategory::Roof,
            Extractor::Slab => ElementCategory::Slab,
            Extractor::Wall => ElementCategory::Wall,
            Extractor::Door => ElementCategory::Door,
            Extractor::Window => ElementCategory::Window,
            Extractor::Footing => ElementCategory::Footing,
            Extractor::Column => ElementCategory::Column,
            Extractor::Beam => ElementCategory::Beam,
            Extractor::Railing => ElementCategory::Railing,
            Extractor::Mass => ElementCategory::Mass,
            Extractor::Stair => ElementCategory::Stair,
            Extractor::Casework => ElementCategory::Casework,
        }
    }

    /// Category pinned onto the record: the slab extractor keeps floor and
    /// deck classifications
    fn record_category(self, classified: ElementCategory) -> ElementCategory {
        match (self, classified) {
            (
                Extractor::Slab,
                ElementCategory::Slab | ElementCategory::Floor | ElementCategory::Deck,
            ) => classified,
            _ => self.category(),
        }
    }

    fn quantity_sets(self, ctx: &ElementContext) -> &'static [&'static str] {
        match self {
            Extractor::Roof => roof::QUANTITY_SETS,
            Extractor::Slab => slab::SLAB_QUANTITY_SETS,
            Extractor::Footing => slab::FOOTING_QUANTITY_SETS,
            Extractor::Wall => wall::QUANTITY_SETS,
            Extractor::Door => openings::DOOR_QUANTITY_SETS,
            Extractor::Window => openings::WINDOW_QUANTITY_SETS,
            Extractor::Column => framing::COLUMN_QUANTITY_SETS,
            Extractor::Beam => framing::BEAM_QUANTITY_SETS,
            Extractor::Railing => railing::QUANTITY_SETS,
            Extractor::Stair => stair::quantity_sets(ctx),
            Extractor::Mass => furnishing::MASS_QUANTITY_SETS,
            Extractor::Casework => furnishing::CASEWORK_QUANTITY_SETS,
        }
    }

    fn extract(self, ctx: &ElementContext, fields: &mut FieldReader<'_>) -> StandardizedMetrics {
        let mut identity = ctx.identity.clone();
        identity.element_category = self.record_category(identity.element_category);

        match self {
            Extractor::Roof => StandardizedMetrics::Roof(roof::extract(ctx, fields, identity)),
            Extractor::Slab | Extractor::Footing => {
                let category = identity.element_category;
                StandardizedMetrics::slab_like(category, slab::extract(ctx, fields, identity))
            }
            Extractor::Wall => StandardizedMetrics::Wall(wall::extract(ctx, fields, identity)),
            Extractor::Door => StandardizedMetrics::Door(openings::extract(ctx, fields, identity)),
            Extractor::Window => {
                StandardizedMetrics::Window(openings::extract(ctx, fields, identity))
            }
            Extractor::Column => {
                StandardizedMetrics::Column(framing::extract(ctx, fields, identity))
            }
            Extractor::Beam => StandardizedMetrics::Beam(framing::extract(ctx, fields, identity)),
            Extractor::Railing => {
                StandardizedMetrics::Railing(railing::extract(ctx, fields, identity))
            }
            Extractor::Stair => StandardizedMetrics::Stair(stair::extract(ctx, fields, identity)),
            Extractor::Mass => {
                StandardizedMetrics::Mass(furnishing::extract_mass(ctx, fields, identity))
            }
            Extractor::Casework => {
                StandardizedMetrics::Casework(furnishing::extract_casework(ctx, fields, identity))
            }
        }
    }

    /// Record carrying only the given identity
    pub fn fallback(self, mut identity: ElementIdentity) -> StandardizedMetrics {
        identity.element_category = self.record_category(identity.element_category);
        match self {
            Extractor::Roof => StandardizedMetrics::Roof(RoofMetrics::new(identity)),
            Extractor::Slab | Extractor::Footing => {
                let category = identity.element_category;
                StandardizedMetrics::slab_like(category, SlabMetrics::new(identity))
            }
            Extractor::Wall => StandardizedMetrics::Wall(WallMetrics::new(identity)),
            Extractor::Door => StandardizedMetrics::Door(OpeningMetrics::new(identity)),
            Extractor::Window => StandardizedMetrics::Window(OpeningMetrics::new(identity)),
            Extractor::Column => StandardizedMetrics::Column(FramingMetrics::new(identity)),
            Extractor::Beam => StandardizedMetrics::Beam(FramingMetrics::new(identity)),
            Extractor::Railing => StandardizedMetrics::Railing(RailingMetrics::new(identity)),
            Extractor::Stair => StandardizedMetrics::Stair(StairMetrics::new(identity)),
            Extractor::Mass => StandardizedMetrics::Mass(MassMetrics::new(identity)),
            Extractor::Casework => StandardizedMetrics::Casework(CaseworkMetrics::new(identity)),
        }
    }
}

impl MetricsExtractor {
    /// Run one extractor over a loaded context
    ///
    /// Extraction itself cannot fail: every graph access happens in
    /// [`ElementContext::load`], and missing fields stay `None`.
    pub(crate) fn run_loaded(&self, ctx: &ElementContext, extractor: Extractor) -> TracedMetrics {
        let config = self.config();
        let mut fields = FieldReader::new(
            &ctx.sets,
            extractor.quantity_sets(ctx),
            &config.adapter_set_hint,
            config.debug_trace,
        );
        let metrics = extractor.extract(ctx, &mut fields);
        TracedMetrics {
            metrics,
            trace: fields.into_trace(),
        }
    }

    fn run(&self, element: ElementRef, extractor: Extractor) -> StandardizedMetrics {
        match ElementContext::load(self, element) {
            Ok(ctx) => self.run_loaded(&ctx, extractor).metrics,
            Err(e) => {
                log::warn!(
                    "{} extraction failed for element {}: {}",
                    extractor.category(),
                    element,
                    e
                );
                let identity =
                    ElementIdentity::minimal(self.resolve_class_name(element), element.id.0);
                extractor.fallback(identity)
            }
        }
    }

    pub fn extract_roof(&self, element: ElementRef) -> StandardizedMetrics {
        self.run(element, Extractor::Roof)
    }

    /// Slab, floor or deck, depending on the element's classification
    pub fn extract_slab(&self, element: ElementRef) -> StandardizedMetrics {
        self.run(element, Extractor::Slab)
    }

    pub fn extract_wall(&self, element: ElementRef) -> StandardizedMetrics {
        self.run(element, Extractor::Wall)
    }

    pub fn extract_door(&self, element: ElementRef) -> StandardizedMetrics {
        self.run(element, Extractor::Door)
    }

    pub fn extract_window(&self, element: ElementRef) -> StandardizedMetrics {
        self.run(element, Extractor::Window)
    }

    pub fn extract_footing(&self, element: ElementRef) -> StandardizedMetrics {
        self.run(element, Extractor::Footing)
    }

    pub fn extract_column(&self, element: ElementRef) -> StandardizedMetrics {
        self.run(element, Extractor::Column)
    }

    pub fn extract_beam(&self, element: ElementRef) -> StandardizedMetrics {
        self.run(element, Extractor::Beam)
    }

    pub fn extract_railing(&self, element: ElementRef) -> StandardizedMetrics {
        self.run(element, Extractor::Railing)
    }

    pub fn extract_mass(&self, element: ElementRef) -> StandardizedMetrics {
        self.run(element, Extractor::Mass)
    }

    pub fn extract_stair(&self, element: ElementRef) -> StandardizedMetrics {
        self.run(element, Extractor::Stair)
    }

    pub fn extract_casework(&self, element: ElementRef) -> StandardizedMetrics {
        self.run(element, Extractor::Casework)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{ResolvedEntry, ResolvedSet, SetKind, SetOrigin};

    fn set(name: &str, entries: &[(&str, f64)]) -> ResolvedSet {
        ResolvedSet {
            name: name.to_string(),
            kind: SetKind::Quantity,
            origin: SetOrigin::Instance,
            entries: entries
                .iter()
                .map(|(n, v)| ResolvedEntry {
                    name: n.to_string(),
                    value: Scalar::Number(*v),
                })
                .collect(),
        }
    }

    #[test]
    fn test_priority_chain() {
        let sets = ElementSets::new(vec![
            set("Pset_Custom", &[("Gross Area", 1.0), ("Width", 4.0)]),
            set("BaseQuantities", &[("GrossArea", 2.0), ("Width", 3.0)]),
            set("Takeoff Adapter", &[("Width", 5.0), ("Height", 6.0)]),
            set("Qto_SlabBaseQuantities", &[("GrossArea", 11.15)]),
        ]);
        let mut fields = FieldReader::new(&sets, &["Qto_SlabBaseQuantities"], "adapter", true);

        assert_eq!(fields.number("area", &["GrossArea"]), Some(11.15));
        assert_eq!(fields.number("width", &["Width"]), Some(3.0));
        assert_eq!(fields.number("height", &["Height"]), Some(6.0));
        assert_eq!(fields.number("perimeter", &["Perimeter"]), None);

        let trace = fields.into_trace().unwrap();
        assert_eq!(
            trace.source_of("area"),
            Some(&FieldSource::QuantitySet("Qto_SlabBaseQuantities".into()))
        );
        assert_eq!(trace.source_of("width"), Some(&FieldSource::BaseQuantities));
        assert_eq!(
            trace.source_of("height"),
            Some(&FieldSource::AdapterSet("Takeoff Adapter".into()))
        );
    }

    #[test]
    fn test_fuzzy_is_last_resort() {
        let sets = ElementSets::new(vec![set("Dimensions", &[("Gross Area", 7.0)])]);
        let mut fields = FieldReader::new(&sets, &[], "adapter", false);
        assert_eq!(fields.number("area", &["GrossArea"]), Some(7.0));
        assert_eq!(fields.exact_number("area", &["GrossArea"]), None);
        assert!(fields.into_trace().is_none());
    }

    #[test]
    fn test_scoped_lookups() {
        let mut dimensions = set("Dimensions", &[("Width", 10.0)]);
        dimensions.kind = SetKind::Property;
        let sets = ElementSets::new(vec![
            set("Qto_SlabBaseQuantities", &[("Width", 0.5)]),
            dimensions,
        ]);
        let mut fields = FieldReader::new(&sets, &["Qto_SlabBaseQuantities"], "adapter", true);

        assert_eq!(fields.quantity_number("thickness", &["Width"]), Some(0.5));
        assert_eq!(fields.property_number("width", &["Width"]), Some(10.0));
        assert_eq!(fields.property_number("depth", &["Depth"]), None);
        assert_eq!(fields.quantity_number("height", &["Height"]), None);

        let trace = fields.into_trace().unwrap();
        assert_eq!(
            trace.source_of("thickness"),
            Some(&FieldSource::QuantitySet("Qto_SlabBaseQuantities".into()))
        );
        assert_eq!(
            trace.source_of("width"),
            Some(&FieldSource::PropertySet("Dimensions".into()))
        );
    }

    #[test]
    fn test_zero_is_missing() {
        let sets = ElementSets::new(vec![
            set("Qto_WallBaseQuantities", &[("Length", 0.0)]),
            set("BaseQuantities", &[("Length", 12.0)]),
        ]);
        let mut fields = FieldReader::new(&sets, &["Qto_WallBaseQuantities"], "adapter", false);
        assert_eq!(fields.number("length", &["Length"]), Some(12.0));
    }

    #[test]
    fn test_category_mapping() {
        assert_eq!(Extractor::for_category(ElementCategory::Deck), Some(Extractor::Slab));
        assert_eq!(Extractor::for_category(ElementCategory::Other), None);
        assert_eq!(
            Extractor::Slab.record_category(ElementCategory::Floor),
            ElementCategory::Floor
        );
        assert_eq!(
            Extractor::Slab.record_category(ElementCategory::Roof),
            ElementCategory::Slab
        );
        assert_eq!(
            Extractor::Footing.record_category(ElementCategory::Slab),
            ElementCategory::Footing
        );

        let record = Extractor::Door.fallback(ElementIdentity::minimal("IfcDoor", 3));
        assert_eq!(record.category(), ElementCategory::Door);
        assert_eq!(record.identity().element_category, ElementCategory::Door);
    }
}
