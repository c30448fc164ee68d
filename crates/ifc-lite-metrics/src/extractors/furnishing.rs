// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mass and casework extraction

use super::{ElementContext, FieldReader};
use crate::dimensions::{casework_kind, parse_name_dimensions};
use crate::identity::ElementIdentity;
use crate::metrics::{CaseworkMetrics, MassMetrics, Measured};
use crate::trace::FieldSource;
use crate::units::{format_inches_fraction, normalize_area, normalize_length, normalize_volume};

pub(super) const MASS_QUANTITY_SETS: &[&str] = &["Qto_BuildingElementProxyQuantities"];
pub(super) const CASEWORK_QUANTITY_SETS: &[&str] = &[
    "Qto_FurnitureBaseQuantities",
    "Qto_BuildingElementProxyQuantities",
];

pub(super) fn extract_mass(
    _ctx: &ElementContext,
    fields: &mut FieldReader<'_>,
    identity: ElementIdentity,
) -> MassMetrics {
    let mut mass = MassMetrics::new(identity);
    mass.floor_area = fields
        .number("floorArea", &["GrossFloorArea", "FloorArea"])
        .map(normalize_area)
        .map(Measured::square_feet);
    mass.surface_area = fields
        .number("surfaceArea", &["GrossSurfaceArea", "SurfaceArea"])
        .map(normalize_area)
        .map(Measured::square_feet);
    mass.volume = fields
        .number("volume", &["GrossVolume", "Volume"])
        .map(normalize_volume)
        .map(Measured::cubic_feet);
    mass.height = fields
        .exact_number("height", &["Height"])
        .map(normalize_length)
        .map(Measured::feet);
    mass
}

/// `36" W x 24" D x 34-1/2" H`, from whichever parts are known
fn casework_size(
    width: Option<f64>,
    depth: Option<f64>,
    height: Option<f64>,
    denominator: u32,
) -> Option<String> {
    let parts: Vec<String> = [(width, "W"), (depth, "D"), (height, "H")]
        .into_iter()
        .filter_map(|(value, axis)| {
            value.map(|ft| format!("{} {}", format_inches_fraction(ft, denominator), axis))
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join(" x "))
}

pub(super) fn extract_casework(
    ctx: &ElementContext,
    fields: &mut FieldReader<'_>,
    identity: ElementIdentity,
) -> CaseworkMetrics {
    let kind = casework_kind(&[identity.name.as_deref(), identity.type_name.as_deref()]);
    let mut casework = CaseworkMetrics::new(identity);
    casework.kind = Some(kind);

    let mut width = fields.number("width", &["Width"]).map(normalize_length);
    let mut depth = fields.number("depth", &["Depth"]).map(normalize_length);
    let height = fields
        .exact_number("height", &["Height"])
        .map(normalize_length);

    // A name like `Base Cabinet 36" x 24"` reads as width x depth
    if width.is_none() || depth.is_none() {
        if let Some((w, d)) = ctx.display_texts().find_map(parse_name_dimensions) {
            if width.is_none() {
                fields.record("width", FieldSource::DisplayName);
                width = Some(w);
            }
            if depth.is_none() {
                fields.record("depth", FieldSource::DisplayName);
                depth = Some(d);
            }
        }
    }

    casework.width = width.map(Measured::feet);
    casework.depth = depth.map(Measured::feet);
    casework.height = height.map(Measured::feet);
    casework.size_display = casework_size(width, depth, height, ctx.denominator);

    casework
}
