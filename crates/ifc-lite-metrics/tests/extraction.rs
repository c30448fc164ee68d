// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end extraction over in-memory graph snapshots.

use approx::assert_relative_eq;
use ifc_lite_metrics::{
    ClassificationTable, ElementCategory, ExtractorConfig, FieldSource, MetricsExtractor,
    StandardizedMetrics,
};
use ifc_lite_model::{ElementRef, GraphAccess, GraphError, MemoryGraph, PropertyView};
use serde_json::{json, Value};
use std::sync::Arc;

const IFCSLAB: u32 = 1529196076;
const IFCROOF: u32 = 2016517767;
const IFCWALLSTANDARDCASE: u32 = 3512223829;
const IFCDOOR: u32 = 395920057;
const IFCBEAM: u32 = 753842376;
const IFCSTAIRFLIGHT: u32 = 4252922144;
const IFCPROXY: u32 = 1095909175;
const IFCWINDOW: u32 = 3304561284;
const IFCCOLUMN: u32 = 843113511;
const IFCRAILING: u32 = 2262370178;
const IFCFOOTING: u32 = 900683007;
const IFCWALLTYPE: u32 = 1898987631;
const IFCDOORTYPE: u32 = 2323601079;
const IFCPROPERTYSET: u32 = 1451395588;
const IFCELEMENTQUANTITY: u32 = 1883228015;
const IFCPROPERTYSINGLEVALUE: u32 = 3650150729;

fn label(text: &str) -> Value {
    json!({ "type": 1, "value": text })
}

fn handle(id: u32) -> Value {
    json!({ "type": 5, "value": id })
}

fn quantity(id: u32, name: &str, key: &str, value: f64) -> Value {
    json!({
        "expressID": id,
        "type": 2044713172u32,
        "Name": label(name),
        key: { "type": 4, "value": value }
    })
}

fn property(id: u32, name: &str, value: Value) -> Value {
    json!({
        "expressID": id,
        "type": IFCPROPERTYSINGLEVALUE,
        "Name": label(name),
        "NominalValue": { "type": 1, "value": value }
    })
}

fn quantity_set(id: u32, name: &str, members: &[u32]) -> Value {
    json!({
        "expressID": id,
        "type": IFCELEMENTQUANTITY,
        "Name": label(name),
        "Quantities": members.iter().map(|m| handle(*m)).collect::<Vec<_>>()
    })
}

fn property_set(id: u32, name: &str, members: &[u32]) -> Value {
    json!({
        "expressID": id,
        "type": IFCPROPERTYSET,
        "Name": label(name),
        "HasProperties": members.iter().map(|m| handle(*m)).collect::<Vec<_>>()
    })
}

fn graph(entities: Vec<Value>, property_sets: Value, type_objects: Value) -> Arc<MemoryGraph> {
    let graph = MemoryGraph::from_value(json!({
        "modelId": 0,
        "typeNames": {
            "1529196076": "IFCSLAB",
            "2016517767": "IFCROOF",
            "3512223829": "IFCWALLSTANDARDCASE",
            "395920057": "IFCDOOR",
            "753842376": "IFCBEAM",
            "4252922144": "IFCSTAIRFLIGHT",
            "1095909175": "IFCBUILDINGELEMENTPROXY",
            "3304561284": "IFCWINDOW",
            "843113511": "IFCCOLUMN",
            "2262370178": "IFCRAILING",
            "900683007": "IFCFOOTING"
        },
        "entities": entities,
        "propertySets": property_sets,
        "typeObjects": type_objects
    }))
    .unwrap();
    Arc::new(graph)
}

fn slab_graph() -> Arc<MemoryGraph> {
    graph(
        vec![
            json!({ "expressID": 100, "type": IFCSLAB, "GlobalId": label("0LV8Pf$6v2s8Ys3dWmr1xl"),
                    "Name": label("Slab on Grade:6\" Concrete") }),
            quantity_set(200, "Qto_SlabBaseQuantities", &[201]),
            quantity(201, "GrossArea", "AreaValue", 11.15),
            quantity_set(300, "BaseQuantities", &[301, 302]),
            quantity(301, "GrossArea", "AreaValue", 20.0),
            quantity(302, "GrossVolume", "VolumeValue", 1.5),
        ],
        json!({ "100": [200, 300] }),
        json!({}),
    )
}

fn record(metrics: &StandardizedMetrics) -> Value {
    serde_json::to_value(metrics).unwrap()
}

#[test]
fn quantity_set_beats_base_quantities() {
    let extractor = MetricsExtractor::with_config(
        slab_graph(),
        ExtractorConfig::default().with_debug_trace(true),
    );
    let traced = extractor.extract_traced(ElementRef::new(0, 100)).unwrap();
    let json = record(&traced.metrics);

    assert_eq!(json["elementCategory"], "slab");
    assert_eq!(json["className"], "IfcSlab");
    assert_eq!(json["globalId"], "0LV8Pf$6v2s8Ys3dWmr1xl");
    assert_relative_eq!(json["area"]["value"].as_f64().unwrap(), 120.0186, epsilon = 1e-6);
    assert_eq!(json["area"]["display"], "120 SF");
    assert_eq!(json["volume"]["display"], "53 CF");
    assert_eq!(json["cubicYards"]["display"], "1.96 CY");

    let trace = traced.trace.unwrap();
    assert_eq!(
        trace.source_of("area"),
        Some(&FieldSource::QuantitySet("Qto_SlabBaseQuantities".into()))
    );
    assert_eq!(trace.source_of("volume"), Some(&FieldSource::BaseQuantities));
}

#[test]
fn trace_is_absent_by_default() {
    let extractor = MetricsExtractor::new(slab_graph());
    let traced = extractor.extract_traced(ElementRef::new(0, 100)).unwrap();
    assert!(traced.trace.is_none());
}

#[test]
fn extraction_is_deterministic() {
    let extractor = MetricsExtractor::new(slab_graph());
    let first = serde_json::to_string(&extractor.extract(ElementRef::new(0, 100))).unwrap();
    let second = serde_json::to_string(&extractor.extract(ElementRef::new(0, 100))).unwrap();
    assert_eq!(first, second);
}

#[test]
fn roof_surface_from_footprint_and_pitch() {
    let graph = graph(
        vec![
            json!({ "expressID": 10, "type": IFCROOF, "Name": label("Basic Roof") }),
            property_set(20, "Pset_RoofCommon", &[21]),
            property(21, "Slope", json!(26.57)),
            quantity_set(30, "BaseQuantities", &[31]),
            quantity(31, "ProjectedArea", "AreaValue", 1000.0),
        ],
        json!({ "10": [20, 30] }),
        json!({}),
    );
    let extractor = MetricsExtractor::new(graph);
    let StandardizedMetrics::Roof(roof) = extractor.extract(ElementRef::new(0, 10)).unwrap() else {
        panic!("expected a roof record");
    };

    assert_eq!(roof.slope_display.as_deref(), Some("6\"/12\""));
    let surface = roof.surface_area.unwrap();
    assert_relative_eq!(surface.value(), 1118.0, epsilon = 0.5);
    assert_eq!(surface.display(), "1,118 SF");
    assert_eq!(roof.footprint_area.unwrap().display(), "1,000 SF");
}

#[test]
fn wall_fills_gaps_along_the_chain() {
    let graph = graph(
        vec![
            json!({ "expressID": 10, "type": IFCWALLSTANDARDCASE, "Name": label("Generic - 8\"") }),
            quantity_set(20, "Qto_WallBaseQuantities", &[21, 22, 23]),
            quantity(21, "Length", "LengthValue", 20.0),
            quantity(22, "Height", "LengthValue", 10.0),
            quantity(23, "Width", "LengthValue", 0.6667),
        ],
        json!({ "10": [20] }),
        json!({}),
    );
    let extractor = MetricsExtractor::new(graph);
    let json = record(&extractor.extract(ElementRef::new(0, 10)).unwrap());

    assert_eq!(json["elementCategory"], "wall");
    assert_eq!(json["length"]["display"], "20'");
    assert_eq!(json["thickness"]["display"], "8\"");
    assert_eq!(json["area"]["display"], "200 SF");
    assert_eq!(json["areaBothSides"]["display"], "400 SF");
    assert_eq!(json["volume"]["display"], "133 CF");
}

fn door_graph() -> Arc<MemoryGraph> {
    graph(
        vec![
            json!({ "expressID": 10, "type": IFCDOOR, "Name": label("Single-Flush:36\" x 84\":184467"),
                    "OperationType": { "type": 3, "value": "SINGLE_SWING_LEFT" } }),
            property_set(20, "Pset_DoorCommon", &[21]),
            property(21, "FireRating", json!("20 MIN")),
            json!({ "expressID": 30, "type": IFCDOORTYPE, "Name": label("Single-Flush:36\" x 84\""),
                    "HasPropertySets": [handle(40)] }),
            property_set(40, "Identity Data", &[41, 42]),
            property(41, "Type Mark", json!("D1")),
            property(42, "FireRating", json!("45 MIN")),
            json!({ "expressID": 50, "type": IFCDOOR, "Name": label("Bifold 60\" x 80\""),
                    "OverallWidth": 2.5, "OverallHeight": 6.75 }),
        ],
        json!({ "10": [20] }),
        json!({ "10": [30] }),
    )
}

#[test]
fn door_size_from_display_name() {
    let extractor = MetricsExtractor::new(door_graph());
    let StandardizedMetrics::Door(door) = extractor.extract(ElementRef::new(0, 10)).unwrap() else {
        panic!("expected a door record");
    };

    assert_eq!(door.identity.type_name.as_deref(), Some("Single-Flush:36\" x 84\""));
    assert_eq!(door.identity.type_mark.as_deref(), Some("D1"));
    assert_eq!(door.size_display.as_deref(), Some("3'-0\" x 7'-0\" (36\" x 84\")"));
    assert_eq!(door.area.unwrap().display(), "21 SF");
    assert_eq!(door.operation_type.as_deref(), Some("SINGLE_SWING_LEFT"));
    // instance set before type set
    assert_eq!(door.fire_rating.as_deref(), Some("20 MIN"));
}

#[test]
fn door_attributes_beat_display_name() {
    let extractor = MetricsExtractor::new(door_graph());
    let StandardizedMetrics::Door(door) = extractor.extract(ElementRef::new(0, 50)).unwrap() else {
        panic!("expected a door record");
    };
    assert_eq!(door.size_display.as_deref(), Some("2'-6\" x 6'-9\" (30\" x 81\")"));
}

#[test]
fn adapter_size_label_beats_computed_label() {
    let graph = graph(
        vec![
            json!({ "expressID": 10, "type": IFCBEAM, "Name": label("Header") }),
            quantity_set(20, "Qto_BeamBaseQuantities", &[21, 22, 23]),
            quantity(21, "Width", "LengthValue", 0.75),
            quantity(22, "Depth", "LengthValue", 1.5),
            quantity(23, "Length", "LengthValue", 12.0),
            property_set(30, "Takeoff Adapter", &[31]),
            property(31, "Size", json!("(2) 2x12")),
            json!({ "expressID": 11, "type": IFCBEAM, "Name": label("Header") }),
        ],
        json!({ "10": [20, 30], "11": [20] }),
        json!({}),
    );
    let extractor = MetricsExtractor::new(graph);

    let StandardizedMetrics::Beam(adapted) = extractor.extract(ElementRef::new(0, 10)).unwrap() else {
        panic!("expected a beam record");
    };
    assert_eq!(adapted.size_label.as_deref(), Some("(2) 2x12"));

    let StandardizedMetrics::Beam(computed) = extractor.extract(ElementRef::new(0, 11)).unwrap() else {
        panic!("expected a beam record");
    };
    assert_eq!(computed.size_label.as_deref(), Some("9\" x 18\""));
    let section = computed.cross_section_area.unwrap();
    assert_relative_eq!(section.value(), 162.0);
    assert_eq!(section.display(), "162.0 sq in");
}

#[test]
fn proxy_framing_routes_to_beam() {
    let graph = graph(
        vec![
            json!({ "expressID": 10, "type": IFCPROXY, "Name": label("Floor Joist"),
                    "ObjectType": label("W10x33") }),
            property_set(20, "Other", &[21]),
            property(21, "Category", json!("Structural Framing")),
        ],
        json!({ "10": [20] }),
        json!({}),
    );
    let extractor = MetricsExtractor::new(graph);
    let metrics = extractor.extract(ElementRef::new(0, 10)).unwrap();
    assert_eq!(metrics.category(), ElementCategory::Beam);
    let StandardizedMetrics::Beam(beam) = metrics else {
        panic!("expected a beam record");
    };
    assert_eq!(beam.size_label.as_deref(), Some("W10x33"));
}

#[test]
fn stair_computes_missing_values() {
    let graph = graph(
        vec![
            json!({ "expressID": 10, "type": IFCSTAIRFLIGHT, "Name": label("Run 1") }),
            property_set(20, "Pset_StairFlightCommon", &[21, 22, 23]),
            property(21, "NumberOfRiser", json!(14)),
            property(22, "NumberOfTreads", json!(13)),
            property(23, "RiserHeight", json!(0.5833)),
            quantity_set(30, "Qto_StairFlightBaseQuantities", &[31, 32]),
            quantity(31, "Length", "LengthValue", 13.0),
            quantity(32, "Width", "LengthValue", 3.5),
        ],
        json!({ "10": [20, 30] }),
        json!({}),
    );
    let extractor = MetricsExtractor::new(graph);
    let StandardizedMetrics::Stair(stair) = extractor.extract(ElementRef::new(0, 10)).unwrap() else {
        panic!("expected a stair record");
    };

    assert_eq!(stair.riser_count, Some(14));
    assert_eq!(stair.tread_count, Some(13));
    assert_eq!(stair.riser_height.as_ref().map(|m| m.display()), Some("7\""));
    assert_eq!(stair.tread_depth.as_ref().map(|m| m.display()), Some("12\""));
    assert!(stair.tread_depth_computed);
    assert_eq!(stair.area.as_ref().map(|m| m.display()), Some("46 SF"));
    assert!(stair.area_computed);
    assert_eq!(stair.total_rise.as_ref().map(|m| m.display()), Some("8' 2\""));
}

#[test]
fn casework_kind_and_size() {
    let graph = graph(
        vec![
            json!({ "expressID": 10, "type": IFCPROXY, "Name": label("Base Cabinet 36\" x 24\"") }),
            property_set(20, "Other", &[21, 22]),
            property(21, "Category", json!("Casework")),
            property(22, "Height", json!(2.875)),
        ],
        json!({ "10": [20] }),
        json!({}),
    );
    let extractor = MetricsExtractor::new(graph);
    let json = record(&extractor.extract(ElementRef::new(0, 10)).unwrap());

    assert_eq!(json["elementCategory"], "casework");
    assert_eq!(json["kind"], "base");
    assert_eq!(json["sizeDisplay"], "36\" W x 24\" D x 34-1/2\" H");
}

#[test]
fn classification_table_is_configurable() {
    let config = ExtractorConfig::default().with_classification(
        ClassificationTable::empty().with_class("IfcRoof", ElementCategory::Roof),
    );
    let extractor = MetricsExtractor::with_config(slab_graph(), config);
    assert!(extractor.extract(ElementRef::new(0, 100)).is_none());

    // category methods bypass classification
    let metrics = extractor.extract_slab(ElementRef::new(0, 100));
    assert_eq!(metrics.category(), ElementCategory::Slab);
}

#[test]
fn concurrent_extraction_matches_sequential() {
    let extractor = Arc::new(MetricsExtractor::new(door_graph()));
    let elements = [10u32, 50, 10, 50];

    let sequential: Vec<String> = elements
        .iter()
        .map(|id| serde_json::to_string(&extractor.extract(ElementRef::new(0, *id))).unwrap())
        .collect();

    let concurrent: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = elements
            .iter()
            .map(|id| {
                let extractor = Arc::clone(&extractor);
                scope.spawn(move || {
                    serde_json::to_string(&extractor.extract(ElementRef::new(0, *id))).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, concurrent);
}

#[test]
fn metadata_on_value_wrappers_is_ignored() {
    let graph = graph(
        vec![
            json!({ "expressID": 100, "type": IFCSLAB,
                    "GlobalId": { "type": 1, "name": "IFCGLOBALLYUNIQUEID", "value": "2O2Fr$t4X7Zf8NOew3FLOH" },
                    "Name": { "type": 1, "name": "IFCLABEL", "value": "Slab A" },
                    "PredefinedType": { "type": 3, "name": "IFCSLABTYPEENUM", "value": "FLOOR" } }),
            json!({ "expressID": 200, "type": IFCELEMENTQUANTITY,
                    "Name": { "type": 1, "name": "IFCLABEL", "value": "Qto_SlabBaseQuantities" },
                    "Quantities": [{ "type": 5, "name": "IFCQUANTITYAREA", "value": 201 }] }),
            json!({ "expressID": 201, "type": 2044713172u32,
                    "Name": { "type": 1, "name": "IFCLABEL", "value": "GrossArea" },
                    "AreaValue": { "type": 4, "name": "IFCAREAMEASURE", "value": 11.15 } }),
        ],
        json!({ "100": [200] }),
        json!({}),
    );
    let extractor = MetricsExtractor::new(graph);
    let metrics = extractor.extract(ElementRef::new(0, 100)).unwrap();
    assert_eq!(metrics.category(), ElementCategory::Floor);

    let identity = metrics.identity();
    assert_eq!(identity.name.as_deref(), Some("Slab A"));
    assert_eq!(identity.global_id.as_deref(), Some("2O2Fr$t4X7Zf8NOew3FLOH"));
    assert_eq!(identity.predefined_type.as_deref(), Some("FLOOR"));
    assert_eq!(record(&metrics)["area"]["display"], "120 SF");
}

#[test]
fn window_size_and_area_from_quantities() {
    let graph = graph(
        vec![
            json!({ "expressID": 10, "type": IFCWINDOW, "Name": label("Fixed:36\" x 48\"") }),
            quantity_set(20, "Qto_WindowBaseQuantities", &[21, 22]),
            quantity(21, "Width", "LengthValue", 3.0),
            quantity(22, "Height", "LengthValue", 4.0),
        ],
        json!({ "10": [20] }),
        json!({}),
    );
    let extractor = MetricsExtractor::new(graph);
    let routed = extractor.extract(ElementRef::new(0, 10)).unwrap();
    assert_eq!(routed, extractor.extract_window(ElementRef::new(0, 10)));

    let StandardizedMetrics::Window(window) = routed else {
        panic!("expected a window record");
    };
    assert_eq!(window.identity.element_category, ElementCategory::Window);
    assert_eq!(window.size_display.as_deref(), Some("3'-0\" x 4'-0\" (36\" x 48\")"));
    assert_eq!(window.area.unwrap().display(), "12 SF");
}

#[test]
fn column_section_from_cross_section_area() {
    let graph = graph(
        vec![
            json!({ "expressID": 10, "type": IFCCOLUMN, "Name": label("Steel Column"),
                    "ObjectType": label("W8x31") }),
            quantity_set(20, "Qto_ColumnBaseQuantities", &[21, 22]),
            quantity(21, "Length", "LengthValue", 10.0),
            quantity(22, "CrossSectionArea", "AreaValue", 0.0232),
        ],
        json!({ "10": [20] }),
        json!({}),
    );
    let extractor = MetricsExtractor::with_config(
        graph,
        ExtractorConfig::default().with_debug_trace(true),
    );
    let traced = extractor.extract_traced(ElementRef::new(0, 10)).unwrap();
    let StandardizedMetrics::Column(column) = traced.metrics else {
        panic!("expected a column record");
    };

    assert_eq!(column.size_label.as_deref(), Some("W8x31"));
    assert_eq!(column.length.unwrap().display(), "10'");
    let section = column.cross_section_area.unwrap();
    assert_relative_eq!(section.value(), 35.96, epsilon = 0.01);
    assert_eq!(section.display(), "36.0 sq in");
    assert_eq!(column.volume.unwrap().display(), "2.5 CF");
    assert_eq!(traced.trace.unwrap().source_of("volume"), Some(&FieldSource::Derived));

    let direct = extractor.extract_column(ElementRef::new(0, 10));
    assert_eq!(direct.category(), ElementCategory::Column);
}

#[test]
fn railing_length_and_height() {
    let graph = graph(
        vec![
            json!({ "expressID": 10, "type": IFCRAILING, "Name": label("Guardrail") }),
            quantity_set(20, "Qto_RailingBaseQuantities", &[21]),
            quantity(21, "Length", "LengthValue", 12.5),
            property_set(30, "Pset_RailingCommon", &[31]),
            property(31, "Height", json!(3.5)),
        ],
        json!({ "10": [20, 30] }),
        json!({}),
    );
    let extractor = MetricsExtractor::new(graph);
    let json = record(&extractor.extract_railing(ElementRef::new(0, 10)));

    assert_eq!(json["elementCategory"], "railing");
    assert_eq!(json["length"]["display"], "12' 6\"");
    assert_eq!(json["height"]["display"], "3' 6\"");
}

#[test]
fn massing_proxy_routes_to_mass() {
    let graph = graph(
        vec![
            json!({ "expressID": 10, "type": IFCPROXY, "Name": label("Massing Study") }),
            quantity_set(20, "Qto_BuildingElementProxyQuantities", &[21, 22, 23]),
            quantity(21, "GrossFloorArea", "AreaValue", 2500.0),
            quantity(22, "GrossVolume", "VolumeValue", 25000.0),
            quantity(23, "Height", "LengthValue", 10.0),
        ],
        json!({ "10": [20] }),
        json!({}),
    );
    let extractor = MetricsExtractor::new(graph);
    let metrics = extractor.extract(ElementRef::new(0, 10)).unwrap();
    assert_eq!(metrics, extractor.extract_mass(ElementRef::new(0, 10)));

    let StandardizedMetrics::Mass(mass) = metrics else {
        panic!("expected a mass record");
    };
    assert_eq!(mass.floor_area.unwrap().display(), "2,500 SF");
    assert_eq!(mass.volume.unwrap().display(), "25,000 CF");
    assert_eq!(mass.height.unwrap().display(), "10'");
    assert!(mass.surface_area.is_none());
}

#[test]
fn footing_width_is_across_the_footing() {
    let graph = graph(
        vec![
            json!({ "expressID": 10, "type": IFCFOOTING, "Name": label("Wall Footing") }),
            quantity_set(20, "Qto_FootingBaseQuantities", &[21, 22, 23, 24]),
            quantity(21, "Length", "LengthValue", 20.0),
            quantity(22, "Width", "LengthValue", 2.0),
            quantity(23, "Height", "LengthValue", 1.0),
            quantity(24, "GrossVolume", "VolumeValue", 40.0),
        ],
        json!({ "10": [20] }),
        json!({}),
    );
    let extractor = MetricsExtractor::new(graph);
    let metrics = extractor.extract(ElementRef::new(0, 10)).unwrap();
    assert_eq!(metrics, extractor.extract_footing(ElementRef::new(0, 10)));

    let StandardizedMetrics::Footing(footing) = metrics else {
        panic!("expected a footing record");
    };
    assert_eq!(footing.size_display.as_deref(), Some("20' x 2'"));
    assert_eq!(footing.thickness.unwrap().display(), "12\"");
    assert_eq!(footing.volume.unwrap().display(), "40 CF");
    assert_eq!(footing.cubic_yards.unwrap().display(), "1.48 CY");
}

#[test]
fn floor_and_deck_share_the_slab_record() {
    let graph = graph(
        vec![
            json!({ "expressID": 10, "type": IFCSLAB, "Name": label("Level 2"),
                    "PredefinedType": { "type": 3, "value": "FLOOR" } }),
            json!({ "expressID": 11, "type": IFCSLAB, "Name": label("Rear Deck") }),
            quantity_set(20, "Qto_SlabBaseQuantities", &[21]),
            quantity(21, "GrossArea", "AreaValue", 300.0),
        ],
        json!({ "10": [20], "11": [20] }),
        json!({}),
    );
    let extractor = MetricsExtractor::new(graph);

    let floor = extractor.extract(ElementRef::new(0, 10)).unwrap();
    assert!(matches!(floor, StandardizedMetrics::Floor(_)));
    assert_eq!(record(&floor)["elementCategory"], "floor");
    assert_eq!(record(&floor)["area"]["display"], "300 SF");

    let deck = extractor.extract_slab(ElementRef::new(0, 11));
    assert!(matches!(deck, StandardizedMetrics::Deck(_)));
    assert_eq!(record(&deck)["elementCategory"], "deck");
}

#[test]
fn slab_width_quantity_is_thickness() {
    let graph = graph(
        vec![
            json!({ "expressID": 10, "type": IFCSLAB, "Name": label("Garage Slab") }),
            quantity_set(20, "Qto_SlabBaseQuantities", &[21, 22, 23]),
            quantity(21, "Width", "LengthValue", 0.5),
            quantity(22, "Perimeter", "LengthValue", 56.0),
            quantity(23, "GrossArea", "AreaValue", 192.0),
            json!({ "expressID": 11, "type": IFCSLAB, "Name": label("Patio Slab") }),
            quantity_set(30, "Qto_SlabBaseQuantities", &[31]),
            quantity(31, "Length", "LengthValue", 20.0),
            property_set(40, "Dimensions", &[41]),
            property(41, "Width", json!(10.0)),
        ],
        json!({ "10": [20], "11": [30, 40] }),
        json!({}),
    );
    let extractor = MetricsExtractor::with_config(
        graph,
        ExtractorConfig::default().with_debug_trace(true),
    );

    let traced = extractor.extract_traced(ElementRef::new(0, 10)).unwrap();
    let StandardizedMetrics::Slab(slab) = traced.metrics else {
        panic!("expected a slab record");
    };
    assert_eq!(slab.thickness.unwrap().display(), "6\"");
    // plan size solved from perimeter and area
    assert_eq!(slab.size_display.as_deref(), Some("16' x 12'"));
    assert_eq!(slab.volume.unwrap().display(), "96 CF");
    let trace = traced.trace.unwrap();
    assert_eq!(
        trace.source_of("thickness"),
        Some(&FieldSource::QuantitySet("Qto_SlabBaseQuantities".into()))
    );
    assert_eq!(trace.source_of("size"), Some(&FieldSource::Derived));

    let StandardizedMetrics::Slab(patio) = extractor.extract_slab(ElementRef::new(0, 11)) else {
        panic!("expected a slab record");
    };
    assert_eq!(patio.size_display.as_deref(), Some("20' x 10'"));
    assert!(patio.thickness.is_none());
}

#[test]
fn roof_footprint_from_length_and_width() {
    let graph = graph(
        vec![
            json!({ "expressID": 10, "type": IFCROOF, "Name": label("Gable Roof") }),
            quantity_set(20, "Qto_RoofBaseQuantities", &[21, 22]),
            quantity(21, "Length", "LengthValue", 40.0),
            quantity(22, "Width", "LengthValue", 25.0),
            property_set(30, "Pset_RoofCommon", &[31]),
            property(31, "Slope", json!("6/12")),
        ],
        json!({ "10": [20, 30] }),
        json!({}),
    );
    let extractor = MetricsExtractor::with_config(
        graph,
        ExtractorConfig::default().with_debug_trace(true),
    );
    let traced = extractor.extract_traced(ElementRef::new(0, 10)).unwrap();
    let StandardizedMetrics::Roof(roof) = traced.metrics else {
        panic!("expected a roof record");
    };

    assert_eq!(roof.slope_display.as_deref(), Some("6/12"));
    assert_relative_eq!(roof.slope_ratio.unwrap(), 0.5);
    assert_eq!(roof.footprint_area.unwrap().display(), "1,000 SF");
    assert_eq!(roof.surface_area.unwrap().display(), "1,118 SF");

    let trace = traced.trace.unwrap();
    assert_eq!(trace.source_of("footprintArea"), Some(&FieldSource::Derived));
    assert_eq!(trace.source_of("surfaceArea"), Some(&FieldSource::Derived));

    let direct = extractor.extract_roof(ElementRef::new(0, 10));
    assert_eq!(direct.category(), ElementCategory::Roof);
}

/// Memory graph whose single-entity lookups fail for some ids
struct FlakyGraph {
    inner: MemoryGraph,
    unreachable: Vec<u32>,
}

impl GraphAccess for FlakyGraph {
    fn properties(
        &self,
        element: ElementRef,
        resolve_indirect: bool,
    ) -> ifc_lite_model::Result<PropertyView> {
        self.inner.properties(element, resolve_indirect)
    }

    fn item_properties(&self, element: ElementRef) -> ifc_lite_model::Result<PropertyView> {
        if self.unreachable.contains(&element.id.0) {
            return Err(GraphError::other("backend offline"));
        }
        self.inner.item_properties(element)
    }

    fn type_code_to_name(&self, code: u32) -> ifc_lite_model::Result<String> {
        self.inner.type_code_to_name(code)
    }
}

#[test]
fn failed_lookups_leave_literals_in_place() {
    let inner = MemoryGraph::from_value(json!({
        "modelId": 0,
        "entities": [
            { "expressID": 10, "type": IFCWALLSTANDARDCASE, "Name": label("Exterior Wall") },
            quantity_set(20, "Qto_WallBaseQuantities", &[21, 22]),
            quantity(21, "Length", "LengthValue", 20.0),
            quantity(22, "Height", "LengthValue", 10.0),
            { "expressID": 30, "type": IFCWALLTYPE, "Name": label("Basic Wall:Exterior"),
              "HasPropertySets": [
                  handle(40),
                  handle(41),
                  { "Name": label("Dimensions"),
                    "HasProperties": [
                        { "Name": label("Width"), "NominalValue": { "type": 4, "value": 0.6667 } }
                    ] }
              ] },
            property_set(40, "Pset_WallCommon", &[]),
            property_set(41, "Identity Data", &[42]),
            property(42, "Type Mark", json!("W1")),
        ],
        "propertySets": { "10": [20] },
        "typeObjects": { "10": [30] }
    }))
    .unwrap();
    let graph = FlakyGraph {
        inner,
        unreachable: vec![21, 40],
    };

    let extractor = MetricsExtractor::new(Arc::new(graph));
    let StandardizedMetrics::Wall(wall) = extractor.extract(ElementRef::new(0, 10)).unwrap() else {
        panic!("expected a wall record");
    };

    assert!(wall.length.is_none());
    assert_eq!(wall.height.unwrap().display(), "10'");
    // inline set kept as written
    assert_eq!(wall.thickness.unwrap().display(), "8\"");
    assert_eq!(wall.identity.type_mark.as_deref(), Some("W1"));
    assert_eq!(wall.identity.type_name.as_deref(), Some("Basic Wall:Exterior"));
}
