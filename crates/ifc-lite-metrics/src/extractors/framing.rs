// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Column and beam extraction

use super::{ElementContext, FieldReader};
use crate::dimensions::parse_framing_label;
use crate::identity::ElementIdentity;
use crate::metrics::{FramingMetrics, Measured};
use crate::trace::FieldSource;
use crate::units::{
    format_inches_fraction, normalize_length, normalize_volume, SQ_METERS_TO_SQ_FEET,
};

pub(super) const COLUMN_QUANTITY_SETS: &[&str] = &["Qto_ColumnBaseQuantities"];
pub(super) const BEAM_QUANTITY_SETS: &[&str] =
    &["Qto_BeamBaseQuantities", "Qto_MemberBaseQuantities"];

const SQ_INCHES_PER_SQ_FOOT: f64 = 144.0;

/// Section areas are always exported in square metres
fn section_sq_inches(raw_sq_m: f64) -> f64 {
    raw_sq_m * SQ_METERS_TO_SQ_FEET * SQ_INCHES_PER_SQ_FOOT
}

pub(super) fn extract(
    ctx: &ElementContext,
    fields: &mut FieldReader<'_>,
    identity: ElementIdentity,
) -> FramingMetrics {
    let mut framing = FramingMetrics::new(identity);

    let length = fields.number("length", &["Length"]).map(normalize_length);
    let width = fields.number("width", &["Width"]).map(normalize_length);
    let depth = fields
        .number("depth", &["Depth", "Height"])
        .map(normalize_length);

    let section = fields
        .number("crossSectionArea", &["CrossSectionArea"])
        .map(section_sq_inches)
        .or_else(|| {
            let (w, d) = width.zip(depth)?;
            fields.derived("crossSectionArea", w * d * SQ_INCHES_PER_SQ_FOOT)
        });

    let volume = fields
        .number("volume", &["GrossVolume", "NetVolume", "Volume"])
        .map(normalize_volume)
        .or_else(|| {
            let (s, l) = section.zip(length)?;
            fields.derived("volume", s / SQ_INCHES_PER_SQ_FOOT * l)
        });

    framing.size_label = fields
        .adapter_text("sizeLabel", &["Size", "Size Label", "SizeLabel"])
        .or_else(|| {
            let label = [ctx.identity.type_name.as_deref(), ctx.identity.name.as_deref()]
                .into_iter()
                .flatten()
                .find_map(parse_framing_label)?;
            fields.record("sizeLabel", FieldSource::DisplayName);
            Some(label)
        })
        .or_else(|| {
            let (w, d) = width.zip(depth)?;
            fields.record("sizeLabel", FieldSource::Derived);
            Some(format!(
                "{} x {}",
                format_inches_fraction(w, ctx.denominator),
                format_inches_fraction(d, ctx.denominator)
            ))
        });

    framing.length = length.map(Measured::feet);
    framing.width = width.map(|ft| Measured::inches(ft, ctx.denominator));
    framing.depth = depth.map(|ft| Measured::inches(ft, ctx.denominator));
    framing.cross_section_area = section.map(Measured::square_inches);
    framing.volume = volume.map(Measured::cubic_feet);

    framing
}
