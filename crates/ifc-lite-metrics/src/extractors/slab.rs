// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Slab, floor, deck and footing extraction

use super::{ElementContext, FieldReader};
use crate::classify::ElementCategory;
use crate::dimensions::solve_rectangle;
use crate::identity::ElementIdentity;
use crate::metrics::{Measured, SlabMetrics};
use crate::trace::FieldSource;
use crate::units::{cubic_feet_to_yards, normalize_area, normalize_length, normalize_volume};

pub(super) const SLAB_QUANTITY_SETS: &[&str] = &["Qto_SlabBaseQuantities"];
pub(super) const FOOTING_QUANTITY_SETS: &[&str] =
    &["Qto_FootingBaseQuantities", "Qto_SlabBaseQuantities"];

pub(super) fn extract(
    ctx: &ElementContext,
    fields: &mut FieldReader<'_>,
    identity: ElementIdentity,
) -> SlabMetrics {
    let mut slab = SlabMetrics::new(identity);

    // Slab quantity sets measure `Width` through the slab; footing sets
    // measure it across the footing and carry the depth as `Height`
    let footing = slab.identity.element_category == ElementCategory::Footing;
    let thickness = if footing {
        fields.number("thickness", &["Thickness", "Depth", "Height"])
    } else {
        fields
            .number("thickness", &["Thickness", "Depth"])
            .or_else(|| fields.quantity_number("thickness", &["Width"]))
    }
    .map(normalize_length);
    let area = fields
        .number("area", &["GrossArea", "NetArea", "Area"])
        .map(normalize_area);
    let perimeter = fields
        .number("perimeter", &["Perimeter"])
        .map(normalize_length);

    let volume = fields
        .number("volume", &["GrossVolume", "NetVolume", "Volume"])
        .map(normalize_volume)
        .or_else(|| fields.derived("volume", area? * thickness?));

    slab.thickness = thickness.map(|ft| Measured::inches(ft, ctx.denominator));
    slab.area = area.map(Measured::square_feet);
    slab.perimeter = perimeter.map(Measured::feet);
    slab.volume = volume.map(Measured::cubic_feet);
    slab.cubic_yards = volume.map(cubic_feet_to_yards).map(Measured::cubic_yards);

    let length = fields.exact_number("length", &["Length"]).map(normalize_length);
    let width = if footing {
        fields.exact_number("width", &["Width"])
    } else {
        fields.property_number("width", &["Width"])
    }
    .map(normalize_length);
    match (length, width) {
        (Some(length), Some(width)) => slab.set_size(length, width),
        _ => {
            let solved = perimeter
                .zip(area)
                .and_then(|(p, a)| solve_rectangle(p, a));
            if let Some((length, width)) = solved {
                fields.record("size", FieldSource::Derived);
                slab.set_size(length, width);
            }
        }
    }

    slab
}
