// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stair and stair flight extraction

use super::{ElementContext, FieldReader};
use crate::identity::ElementIdentity;
use crate::metrics::{Measured, StairMetrics};
use crate::units::{normalize_area, normalize_length};

const FLIGHT_FIRST: &[&str] = &["Qto_StairFlightBaseQuantities", "Qto_StairBaseQuantities"];
const STAIR_FIRST: &[&str] = &["Qto_StairBaseQuantities", "Qto_StairFlightBaseQuantities"];

/// Quantity set order follows the element's class
pub(super) fn quantity_sets(ctx: &ElementContext) -> &'static [&'static str] {
    if ctx.class_is("IfcStairFlight") {
        FLIGHT_FIRST
    } else {
        STAIR_FIRST
    }
}

fn count(
    ctx: &ElementContext,
    fields: &mut FieldReader<'_>,
    field: &str,
    names: &[&str],
    attribute: &str,
) -> Option<u32> {
    fields.count(field, names).or_else(|| {
        fields
            .attribute(ctx, field, attribute)
            .map(f64::round)
            .filter(|n| *n >= 1.0 && *n <= u32::MAX as f64)
            .map(|n| n as u32)
    })
}

pub(super) fn extract(
    ctx: &ElementContext,
    fields: &mut FieldReader<'_>,
    identity: ElementIdentity,
) -> StairMetrics {
    let mut stair = StairMetrics::new(identity);

    let risers = count(
        ctx,
        fields,
        "riserCount",
        &["NumberOfRiser", "NumberOfRisers", "Actual Number of Risers"],
        "NumberOfRisers",
    );
    let treads = count(
        ctx,
        fields,
        "treadCount",
        &["NumberOfTreads", "Actual Number of Treads"],
        "NumberOfTreads",
    );

    let riser_height = fields
        .number("riserHeight", &["RiserHeight", "Actual Riser Height"])
        .or_else(|| fields.attribute(ctx, "riserHeight", "RiserHeight"))
        .map(normalize_length);
    let width = fields
        .number("width", &["Width", "Actual Run Width"])
        .map(normalize_length);
    let run = fields
        .exact_number("runLength", &["Length", "Run Length", "RunLength"])
        .map(normalize_length);

    let mut tread_depth = fields
        .number("treadDepth", &["TreadLength", "TreadDepth", "Actual Tread Depth"])
        .or_else(|| fields.attribute(ctx, "treadDepth", "TreadLength"))
        .map(normalize_length);
    if tread_depth.is_none() {
        tread_depth = run
            .zip(treads)
            .and_then(|(r, n)| fields.derived("treadDepth", r / n as f64));
        stair.tread_depth_computed = tread_depth.is_some();
    }

    let total_rise = fields
        .exact_number("totalRise", &["Height", "Actual Stair Height"])
        .map(normalize_length)
        .or_else(|| {
            let (n, h) = risers.zip(riser_height)?;
            fields.derived("totalRise", n as f64 * h)
        });

    let mut area = fields
        .number("area", &["Area", "GrossArea"])
        .map(normalize_area);
    if area.is_none() {
        area = width.zip(run).and_then(|(w, r)| fields.derived("area", w * r));
        stair.area_computed = area.is_some();
    }

    stair.riser_count = risers;
    stair.tread_count = treads;
    stair.riser_height = riser_height.map(|ft| Measured::inches(ft, ctx.denominator));
    stair.tread_depth = tread_depth.map(|ft| Measured::inches(ft, ctx.denominator));
    stair.width = width.map(Measured::feet);
    stair.run_length = run.map(Measured::feet);
    stair.total_rise = total_rise.map(Measured::feet);
    stair.area = area.map(Measured::square_feet);

    stair
}
