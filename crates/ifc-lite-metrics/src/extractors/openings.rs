// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door and window extraction

use super::{ElementContext, FieldReader};
use crate::dimensions::parse_name_dimensions;
use crate::identity::ElementIdentity;
use crate::metrics::{Measured, OpeningMetrics};
use crate::trace::FieldSource;
use crate::units::{format_size_display, normalize_area, normalize_length};

pub(super) const DOOR_QUANTITY_SETS: &[&str] = &["Qto_DoorBaseQuantities"];
pub(super) const WINDOW_QUANTITY_SETS: &[&str] = &["Qto_WindowBaseQuantities"];

pub(super) fn extract(
    ctx: &ElementContext,
    fields: &mut FieldReader<'_>,
    identity: ElementIdentity,
) -> OpeningMetrics {
    let mut opening = OpeningMetrics::new(identity);

    let mut width = fields
        .number("width", &["Width"])
        .or_else(|| fields.attribute(ctx, "width", "OverallWidth"))
        .map(normalize_length);
    let mut height = fields
        .number("height", &["Height"])
        .or_else(|| fields.attribute(ctx, "height", "OverallHeight"))
        .map(normalize_length);

    if width.is_none() || height.is_none() {
        if let Some((w, h)) = ctx.display_texts().find_map(parse_name_dimensions) {
            if width.is_none() {
                fields.record("width", FieldSource::DisplayName);
                width = Some(w);
            }
            if height.is_none() {
                fields.record("height", FieldSource::DisplayName);
                height = Some(h);
            }
        }
    }

    let area = fields
        .number("area", &["Area", "GrossArea"])
        .map(normalize_area)
        .or_else(|| {
            let (w, h) = width.zip(height)?;
            fields.derived("area", w * h)
        });

    opening.width = width.map(Measured::feet);
    opening.height = height.map(Measured::feet);
    opening.area = area.map(Measured::square_feet);
    opening.size_display = width.zip(height).map(|(w, h)| format_size_display(w, h));
    opening.operation_type = fields
        .text("operationType", &["OperationType"])
        .or_else(|| ctx.attr_text("OperationType"));
    opening.fire_rating = fields.text("fireRating", &["FireRating"]);

    opening
}
