// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{ElementContext, FieldReader};
use crate::identity::ElementIdentity;
use crate::metrics::{Measured, WallMetrics};
use crate::units::{cubic_feet_to_yards, normalize_area, normalize_length, normalize_volume};

pub(super) const QUANTITY_SETS: &[&str] = &["Qto_WallBaseQuantities"];

pub(super) fn extract(
    ctx: &ElementContext,
    fields: &mut FieldReader<'_>,
    identity: ElementIdentity,
) -> WallMetrics {
    let mut wall = WallMetrics::new(identity);

    let mut length = fields.number("length", &["Length"]).map(normalize_length);
    let mut height = fields
        .number("height", &["Height", "Unconnected Height"])
        .map(normalize_length);
    let mut thickness = fields
        .number("thickness", &["Thickness", "Width"])
        .map(normalize_length);
    let mut area = fields
        .number("area", &["GrossSideArea", "NetSideArea", "Area"])
        .map(normalize_area);
    let mut volume = fields
        .number("volume", &["GrossVolume", "NetVolume", "Volume"])
        .map(normalize_volume);

    // Each gap is filled from what is already known, in chain order
    if length.is_none() {
        length = area
            .zip(height)
            .and_then(|(a, h)| fields.derived("length", a / h));
    }
    if height.is_none() {
        height = area
            .zip(length)
            .and_then(|(a, l)| fields.derived("height", a / l));
    }
    if thickness.is_none() {
        thickness = volume
            .zip(area)
            .and_then(|(v, a)| fields.derived("thickness", v / a));
    }
    if area.is_none() {
        area = length
            .zip(height)
            .and_then(|(l, h)| fields.derived("area", l * h));
    }
    if volume.is_none() {
        volume = area
            .zip(thickness)
            .and_then(|(a, t)| fields.derived("volume", a * t));
    }

    wall.length = length.map(Measured::feet);
    wall.height = height.map(Measured::feet);
    wall.thickness = thickness.map(|ft| Measured::inches(ft, ctx.denominator));
    wall.area = area.map(Measured::square_feet);
    wall.area_both_sides = area.map(|a| Measured::square_feet(a * 2.0));
    wall.volume = volume.map(Measured::cubic_feet);
    wall.cubic_yards = volume.map(cubic_feet_to_yards).map(Measured::cubic_yards);

    wall
}
