// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{ElementContext, FieldReader};
use crate::dimensions::parse_slope;
use crate::identity::ElementIdentity;
use crate::metrics::{Measured, RoofMetrics};
use crate::units::{normalize_area, normalize_length, normalize_volume};

pub(super) const QUANTITY_SETS: &[&str] = &["Qto_RoofBaseQuantities"];

/// Below this cosine the pitch is too steep to derive a surface from
const MIN_PITCH_COSINE: f64 = 1e-3;

/// Sloped surface area over a horizontal footprint
pub(super) fn surface_from_footprint(footprint: f64, degrees: f64) -> Option<f64> {
    let cosine = degrees.to_radians().cos();
    (cosine >= MIN_PITCH_COSINE).then(|| footprint / cosine)
}

pub(super) fn extract(
    ctx: &ElementContext,
    fields: &mut FieldReader<'_>,
    identity: ElementIdentity,
) -> RoofMetrics {
    let mut roof = RoofMetrics::new(identity);

    let slope = fields
        .scalar("slope", &["Slope", "Pitch", "Roof Slope", "PitchAngle"])
        .and_then(|value| parse_slope(&value));
    if let Some(slope) = &slope {
        roof.slope_display = Some(slope.display.clone());
        roof.slope_degrees = slope.degrees;
        roof.slope_ratio = slope.ratio;
    }

    let surface = fields
        .number("surfaceArea", &["GrossArea", "NetArea"])
        .map(normalize_area);

    let footprint = fields
        .number("footprintArea", &["ProjectedArea"])
        .map(normalize_area)
        .or_else(|| {
            let length = fields.number("length", &["Length"]).map(normalize_length)?;
            let width = fields.number("width", &["Width"]).map(normalize_length)?;
            fields.derived("footprintArea", length * width)
        });

    let surface = surface.or_else(|| {
        let degrees = slope.as_ref()?.degrees?;
        let derived = surface_from_footprint(footprint?, degrees)?;
        fields.derived("surfaceArea", derived)
    });

    roof.surface_area = surface.map(Measured::square_feet);
    roof.footprint_area = footprint.map(Measured::square_feet);
    roof.perimeter = fields
        .number("perimeter", &["Perimeter"])
        .map(normalize_length)
        .map(Measured::feet);
    roof.thickness = fields
        .number("thickness", &["Thickness", "Depth"])
        .map(normalize_length)
        .map(|ft| Measured::inches(ft, ctx.denominator));
    roof.volume = fields
        .number("volume", &["GrossVolume", "NetVolume", "Volume"])
        .map(normalize_volume)
        .map(Measured::cubic_feet);

    roof
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_surface_from_footprint() {
        let surface = surface_from_footprint(1000.0, 26.57).unwrap();
        assert_relative_eq!(surface, 1118.0, epsilon = 0.5);
        assert_eq!(surface_from_footprint(1000.0, 90.0), None);
        assert_relative_eq!(surface_from_footprint(500.0, 0.0).unwrap(), 500.0);
    }
}
