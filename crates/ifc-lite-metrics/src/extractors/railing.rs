// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::{ElementContext, FieldReader};
use crate::identity::ElementIdentity;
use crate::metrics::{Measured, RailingMetrics};
use crate::units::normalize_length;

pub(super) const QUANTITY_SETS: &[&str] = &["Qto_RailingBaseQuantities"];

pub(super) fn extract(
    _ctx: &ElementContext,
    fields: &mut FieldReader<'_>,
    identity: ElementIdentity,
) -> RailingMetrics {
    let mut railing = RailingMetrics::new(identity);
    railing.length = fields
        .number("length", &["Length"])
        .map(normalize_length)
        .map(Measured::feet);
    railing.height = fields
        .number("height", &["Height"])
        .map(normalize_length)
        .map(Measured::feet);
    railing
}
