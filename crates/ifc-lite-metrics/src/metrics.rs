// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Standardized metric records
//!
//! Every numeric field is a [`Measured`]: a value in the canonical unit (feet,
//! square feet, cubic feet, cubic yards, square inches) and its display string.
//! The display can only be produced from the value, so the two never disagree.

use crate::classify::ElementCategory;
use crate::dimensions::CaseworkKind;
use crate::identity::ElementIdentity;
use crate::trace::SourceTrace;
use crate::units;
use serde::Serialize;

/// Canonical value with its display string
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Measured {
    value: f64,
    display: String,
}

impl Measured {
    /// Length in feet, shown as feet-inches
    pub fn feet(value: f64) -> Self {
        Self {
            value,
            display: units::length_to_feet_inches(value),
        }
    }

    /// Length in feet, shown as fractional inches
    pub fn inches(value: f64, denominator: u32) -> Self {
        Self {
            value,
            display: units::format_inches_fraction(value, denominator),
        }
    }

    pub fn square_feet(value: f64) -> Self {
        Self {
            value,
            display: units::format_square_feet(value),
        }
    }

    pub fn cubic_feet(value: f64) -> Self {
        Self {
            value,
            display: units::format_cubic_feet(value),
        }
    }

    pub fn cubic_yards(value: f64) -> Self {
        Self {
            value,
            display: units::format_cubic_yards(value),
        }
    }

    pub fn square_inches(value: f64) -> Self {
        Self {
            value,
            display: units::format_square_inches(value),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn display(&self) -> &str {
        &self.display
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoofMetrics {
    #[serde(flatten)]
    pub identity: ElementIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope_degrees: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slope_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface_area: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footprint_area: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perimeter: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thickness: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Measured>,
}

/// Slab, floor, deck and footing record
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlabMetrics {
    #[serde(flatten)]
    pub identity: ElementIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thickness: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perimeter: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cubic_yards: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_display: Option<String>,
}

impl SlabMetrics {
    /// Set length and width, deriving the size label from them
    pub fn set_size(&mut self, length_ft: f64, width_ft: f64) {
        self.length = Some(Measured::feet(length_ft));
        self.width = Some(Measured::feet(width_ft));
        self.size_display = Some(format!(
            "{} x {}",
            units::length_to_feet_inches(length_ft),
            units::length_to_feet_inches(width_ft)
        ));
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WallMetrics {
    #[serde(flatten)]
    pub identity: ElementIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thickness: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_both_sides: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cubic_yards: Option<Measured>,
}

/// Door and window record
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningMetrics {
    #[serde(flatten)]
    pub identity: ElementIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fire_rating: Option<String>,
}

/// Column and beam record
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FramingMetrics {
    #[serde(flatten)]
    pub identity: ElementIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_section_area: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Measured>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RailingMetrics {
    #[serde(flatten)]
    pub identity: ElementIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Measured>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StairMetrics {
    #[serde(flatten)]
    pub identity: ElementIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub riser_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tread_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub riser_height: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tread_depth: Option<Measured>,
    /// Tread depth came from run / tread count
    pub tread_depth_computed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_length: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rise: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<Measured>,
    /// Area came from width x run
    pub area_computed: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MassMetrics {
    #[serde(flatten)]
    pub identity: ElementIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_area: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface_area: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Measured>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseworkMetrics {
    #[serde(flatten)]
    pub identity: ElementIdentity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<CaseworkKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Measured>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_display: Option<String>,
}

macro_rules! record_constructors {
    ($($ty:ident),* $(,)?) => {
        $(
            impl $ty {
                /// Record with identity only
                pub fn new(identity: ElementIdentity) -> Self {
                    Self {
                        identity,
                        ..Self::default()
                    }
                }
            }
        )*
    };
}

record_constructors!(
    RoofMetrics,
    SlabMetrics,
    WallMetrics,
    OpeningMetrics,
    FramingMetrics,
    RailingMetrics,
    StairMetrics,
    MassMetrics,
    CaseworkMetrics,
);

/// One standardized record per element
///
/// Serialized flat; the `elementCategory` field of the identity tells the
/// variants apart.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StandardizedMetrics {
    Roof(RoofMetrics),
    Slab(SlabMetrics),
    Floor(SlabMetrics),
    Deck(SlabMetrics),
    Footing(SlabMetrics),
    Wall(WallMetrics),
    Door(OpeningMetrics),
    Window(OpeningMetrics),
    Column(FramingMetrics),
    Beam(FramingMetrics),
    Railing(RailingMetrics),
    Stair(StairMetrics),
    Mass(MassMetrics),
    Casework(CaseworkMetrics),
}

impl StandardizedMetrics {
    pub fn identity(&self) -> &ElementIdentity {
        match self {
            StandardizedMetrics::Roof(m) => &m.identity,
            StandardizedMetrics::Slab(m)
            | StandardizedMetrics::Floor(m)
            | StandardizedMetrics::Deck(m)
            | StandardizedMetrics::Footing(m) => &m.identity,
            StandardizedMetrics::Wall(m) => &m.identity,
            StandardizedMetrics::Door(m) | StandardizedMetrics::Window(m) => &m.identity,
            StandardizedMetrics::Column(m) | StandardizedMetrics::Beam(m) => &m.identity,
            StandardizedMetrics::Railing(m) => &m.identity,
            StandardizedMetrics::Stair(m) => &m.identity,
            StandardizedMetrics::Mass(m) => &m.identity,
            StandardizedMetrics::Casework(m) => &m.identity,
        }
    }

    /// Category of the variant
    pub fn category(&self) -> ElementCategory {
        match self {
            StandardizedMetrics::Roof(_) => ElementCategory::Roof,
            StandardizedMetrics::Slab(_) => ElementCategory::Slab,
            StandardizedMetrics::Floor(_) => ElementCategory::Floor,
            StandardizedMetrics::Deck(_) => ElementCategory::Deck,
            StandardizedMetrics::Footing(_) => ElementCategory::Footing,
            StandardizedMetrics::Wall(_) => ElementCategory::Wall,
            StandardizedMetrics::Door(_) => ElementCategory::Door,
            StandardizedMetrics::Window(_) => ElementCategory::Window,
            StandardizedMetrics::Column(_) => ElementCategory::Column,
            StandardizedMetrics::Beam(_) => ElementCategory::Beam,
            StandardizedMetrics::Railing(_) => ElementCategory::Railing,
            StandardizedMetrics::Stair(_) => ElementCategory::Stair,
            StandardizedMetrics::Mass(_) => ElementCategory::Mass,
            StandardizedMetrics::Casework(_) => ElementCategory::Casework,
        }
    }

    /// Slab-family variant for a category; anything else is a slab
    pub fn slab_like(category: ElementCategory, metrics: SlabMetrics) -> Self {
        match category {
            ElementCategory::Floor => StandardizedMetrics::Floor(metrics),
            ElementCategory::Deck => StandardizedMetrics::Deck(metrics),
            ElementCategory::Footing => StandardizedMetrics::Footing(metrics),
            _ => StandardizedMetrics::Slab(metrics),
        }
    }
}

/// A record with the sources of its fields
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TracedMetrics {
    pub metrics: StandardizedMetrics,
    /// Present when debug tracing is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<SourceTrace>,
}
