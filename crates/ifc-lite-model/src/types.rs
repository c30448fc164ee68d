// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for IFC element identification
//!
//! This module defines entity ids, element handles and the IFC class names the
//! metrics engine knows about.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe entity identifier
///
/// Wraps the raw IFC express ID (e.g., #123 becomes EntityId(123))
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Default)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Handle to one element inside one loaded model
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ElementRef {
    /// Model handle assigned by the graph backend
    pub model_id: u32,
    /// Express ID of the element
    pub id: EntityId,
}

impl ElementRef {
    pub fn new(model_id: u32, id: u32) -> Self {
        Self {
            model_id,
            id: EntityId(id),
        }
    }

    /// Same model, different entity (used for single-hop reference lookups)
    pub fn with_id(&self, id: EntityId) -> Self {
        Self {
            model_id: self.model_id,
            id,
        }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.model_id, self.id)
    }
}

/// IFC class enumeration
///
/// Covers the building elements and property containers the metrics engine
/// deals with. Unknown classes are captured with their original name.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum IfcType {
    // ========================================================================
    // Building Elements
    // ========================================================================
    IfcWall,
    IfcWallStandardCase,
    IfcWallElementedCase,
    IfcCurtainWall,
    IfcSlab,
    IfcSlabStandardCase,
    IfcRoof,
    IfcBeam,
    IfcBeamStandardCase,
    IfcColumn,
    IfcColumnStandardCase,
    IfcMember,
    IfcDoor,
    IfcDoorStandardCase,
    IfcWindow,
    IfcWindowStandardCase,
    IfcStair,
    IfcStairFlight,
    IfcRailing,
    IfcFooting,
    IfcCovering,
    IfcPlate,
    IfcBuildingElementProxy,
    IfcFurnishingElement,
    IfcFurniture,

    // ========================================================================
    // Property Containers
    // ========================================================================
    IfcPropertySet,
    IfcElementQuantity,
    IfcPropertySingleValue,
    IfcQuantityLength,
    IfcQuantityArea,
    IfcQuantityVolume,
    IfcQuantityCount,

    /// Unknown type - stores the original type name string
    Unknown(String),
}

/// Type codes as assigned by the common web-ifc schema tables.
///
/// Used as a secondary lookup when the graph backend cannot name a code.
const TYPE_CODES: &[(u32, IfcType)] = &[
    (2391406946, IfcType::IfcWall),
    (3512223829, IfcType::IfcWallStandardCase),
    (3495092785, IfcType::IfcCurtainWall),
    (1529196076, IfcType::IfcSlab),
    (2016517767, IfcType::IfcRoof),
    (753842376, IfcType::IfcBeam),
    (843113511, IfcType::IfcColumn),
    (1073191201, IfcType::IfcMember),
    (395920057, IfcType::IfcDoor),
    (3304561284, IfcType::IfcWindow),
    (331165859, IfcType::IfcStair),
    (4252922144, IfcType::IfcStairFlight),
    (2262370178, IfcType::IfcRailing),
    (900683007, IfcType::IfcFooting),
    (1973544240, IfcType::IfcCovering),
    (3171933400, IfcType::IfcPlate),
    (1095909175, IfcType::IfcBuildingElementProxy),
    (263784265, IfcType::IfcFurnishingElement),
    (1451395588, IfcType::IfcPropertySet),
    (1883228015, IfcType::IfcElementQuantity),
    (3650150729, IfcType::IfcPropertySingleValue),
    (931644368, IfcType::IfcQuantityLength),
    (2044713172, IfcType::IfcQuantityArea),
    (2405470396, IfcType::IfcQuantityVolume),
    (2093928680, IfcType::IfcQuantityCount),
];

impl FromStr for IfcType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl IfcType {
    /// Parse a type name string into an IfcType
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "IFCWALL" => IfcType::IfcWall,
            "IFCWALLSTANDARDCASE" => IfcType::IfcWallStandardCase,
            "IFCWALLELEMENTEDCASE" => IfcType::IfcWallElementedCase,
            "IFCCURTAINWALL" => IfcType::IfcCurtainWall,
            "IFCSLAB" => IfcType::IfcSlab,
            "IFCSLABSTANDARDCASE" => IfcType::IfcSlabStandardCase,
            "IFCROOF" => IfcType::IfcRoof,
            "IFCBEAM" => IfcType::IfcBeam,
            "IFCBEAMSTANDARDCASE" => IfcType::IfcBeamStandardCase,
            "IFCCOLUMN" => IfcType::IfcColumn,
            "IFCCOLUMNSTANDARDCASE" => IfcType::IfcColumnStandardCase,
            "IFCMEMBER" => IfcType::IfcMember,
            "IFCDOOR" => IfcType::IfcDoor,
            "IFCDOORSTANDARDCASE" => IfcType::IfcDoorStandardCase,
            "IFCWINDOW" => IfcType::IfcWindow,
            "IFCWINDOWSTANDARDCASE" => IfcType::IfcWindowStandardCase,
            "IFCSTAIR" => IfcType::IfcStair,
            "IFCSTAIRFLIGHT" => IfcType::IfcStairFlight,
            "IFCRAILING" => IfcType::IfcRailing,
            "IFCFOOTING" => IfcType::IfcFooting,
            "IFCCOVERING" => IfcType::IfcCovering,
            "IFCPLATE" => IfcType::IfcPlate,
            "IFCBUILDINGELEMENTPROXY" => IfcType::IfcBuildingElementProxy,
            "IFCFURNISHINGELEMENT" => IfcType::IfcFurnishingElement,
            "IFCFURNITURE" => IfcType::IfcFurniture,
            "IFCPROPERTYSET" => IfcType::IfcPropertySet,
            "IFCELEMENTQUANTITY" => IfcType::IfcElementQuantity,
            "IFCPROPERTYSINGLEVALUE" => IfcType::IfcPropertySingleValue,
            "IFCQUANTITYLENGTH" => IfcType::IfcQuantityLength,
            "IFCQUANTITYAREA" => IfcType::IfcQuantityArea,
            "IFCQUANTITYVOLUME" => IfcType::IfcQuantityVolume,
            "IFCQUANTITYCOUNT" => IfcType::IfcQuantityCount,
            _ => IfcType::Unknown(s.trim().to_string()),
        }
    }

    /// Look up a type by its numeric schema code
    pub fn from_type_code(code: u32) -> Option<Self> {
        TYPE_CODES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, t)| t.clone())
    }

    /// Numeric schema code, if known
    pub fn type_code(&self) -> Option<u32> {
        TYPE_CODES.iter().find(|(_, t)| t == self).map(|(c, _)| *c)
    }

    /// Class name in schema casing (e.g. `IfcWallStandardCase`)
    ///
    /// Unknown upper-case names are camel-cased generically: `IFCFOO` becomes
    /// `IfcFoo`. Names that already carry lower-case letters are kept.
    pub fn class_name(&self) -> String {
        let known = match self {
            IfcType::IfcWall => "IfcWall",
            IfcType::IfcWallStandardCase => "IfcWallStandardCase",
            IfcType::IfcWallElementedCase => "IfcWallElementedCase",
            IfcType::IfcCurtainWall => "IfcCurtainWall",
            IfcType::IfcSlab => "IfcSlab",
            IfcType::IfcSlabStandardCase => "IfcSlabStandardCase",
            IfcType::IfcRoof => "IfcRoof",
            IfcType::IfcBeam => "IfcBeam",
            IfcType::IfcBeamStandardCase => "IfcBeamStandardCase",
            IfcType::IfcColumn => "IfcColumn",
            IfcType::IfcColumnStandardCase => "IfcColumnStandardCase",
            IfcType::IfcMember => "IfcMember",
            IfcType::IfcDoor => "IfcDoor",
            IfcType::IfcDoorStandardCase => "IfcDoorStandardCase",
            IfcType::IfcWindow => "IfcWindow",
            IfcType::IfcWindowStandardCase => "IfcWindowStandardCase",
            IfcType::IfcStair => "IfcStair",
            IfcType::IfcStairFlight => "IfcStairFlight",
            IfcType::IfcRailing => "IfcRailing",
            IfcType::IfcFooting => "IfcFooting",
            IfcType::IfcCovering => "IfcCovering",
            IfcType::IfcPlate => "IfcPlate",
            IfcType::IfcBuildingElementProxy => "IfcBuildingElementProxy",
            IfcType::IfcFurnishingElement => "IfcFurnishingElement",
            IfcType::IfcFurniture => "IfcFurniture",
            IfcType::IfcPropertySet => "IfcPropertySet",
            IfcType::IfcElementQuantity => "IfcElementQuantity",
            IfcType::IfcPropertySingleValue => "IfcPropertySingleValue",
            IfcType::IfcQuantityLength => "IfcQuantityLength",
            IfcType::IfcQuantityArea => "IfcQuantityArea",
            IfcType::IfcQuantityVolume => "IfcQuantityVolume",
            IfcType::IfcQuantityCount => "IfcQuantityCount",
            IfcType::Unknown(s) => return camel_case_class(s),
        };
        known.to_string()
    }

    /// Check if this is the generic proxy element
    pub fn is_proxy(&self) -> bool {
        matches!(self, IfcType::IfcBuildingElementProxy)
    }
}

fn camel_case_class(raw: &str) -> String {
    if raw.is_empty() || raw.chars().any(|c| c.is_ascii_lowercase()) {
        return raw.to_string();
    }
    let rest = raw.strip_prefix("IFC").unwrap_or(raw);
    let mut chars = rest.chars();
    match chars.next() {
        Some(first) => format!(
            "Ifc{}{}",
            first.to_ascii_uppercase(),
            chars.as_str().to_ascii_lowercase()
        ),
        None => raw.to_string(),
    }
}

impl Default for IfcType {
    fn default() -> Self {
        IfcType::Unknown(String::new())
    }
}

impl fmt::Display for IfcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class_name())
    }
}
