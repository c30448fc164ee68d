// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element classification
//!
//! Maps an IFC class, its predefined subtype and a handful of free-text fields
//! to one logical [`ElementCategory`]. The class table is a plain value owned
//! by the configuration, so tests and hosts can swap or extend it.

use ifc_lite_model::IfcType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Normalized logical category of an element
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementCategory {
    Roof,
    Slab,
    Floor,
    Deck,
    Wall,
    Door,
    Window,
    Column,
    Beam,
    Footing,
    Railing,
    Stair,
    Mass,
    Casework,
    #[default]
    Other,
}

impl ElementCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementCategory::Roof => "roof",
            ElementCategory::Slab => "slab",
            ElementCategory::Floor => "floor",
            ElementCategory::Deck => "deck",
            ElementCategory::Wall => "wall",
            ElementCategory::Door => "door",
            ElementCategory::Window => "window",
            ElementCategory::Column => "column",
            ElementCategory::Beam => "beam",
            ElementCategory::Footing => "footing",
            ElementCategory::Railing => "railing",
            ElementCategory::Stair => "stair",
            ElementCategory::Mass => "mass",
            ElementCategory::Casework => "casework",
            ElementCategory::Other => "other",
        }
    }
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category rule for one IFC class
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassRule {
    /// Category when no subtype entry matches
    #[serde(default)]
    pub default: Option<ElementCategory>,
    /// Predefined subtype (upper-case) -> category
    #[serde(default)]
    pub subtypes: BTreeMap<String, ElementCategory>,
}

/// Class -> subtype -> category table
///
/// Keys are stored upper-case (`IFCSLAB`, `BASESLAB`), lookups are
/// case-insensitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, ClassRule>", into = "BTreeMap<String, ClassRule>")]
pub struct ClassificationTable {
    rules: BTreeMap<String, ClassRule>,
}

impl From<BTreeMap<String, ClassRule>> for ClassificationTable {
    fn from(raw: BTreeMap<String, ClassRule>) -> Self {
        let rules = raw
            .into_iter()
            .map(|(class, rule)| {
                let subtypes = rule
                    .subtypes
                    .into_iter()
                    .map(|(subtype, category)| (subtype.to_uppercase(), category))
                    .collect();
                (
                    class.to_uppercase(),
                    ClassRule {
                        default: rule.default,
                        subtypes,
                    },
                )
            })
            .collect();
        Self { rules }
    }
}

impl From<ClassificationTable> for BTreeMap<String, ClassRule> {
    fn from(table: ClassificationTable) -> Self {
        table.rules
    }
}

impl Default for ClassificationTable {
    fn default() -> Self {
        use ElementCategory::*;

        Self::empty()
            .with_class("IFCROOF", Roof)
            .with_class("IFCSLAB", Slab)
            .with_subtype("IFCSLAB", "FLOOR", Floor)
            .with_subtype("IFCSLAB", "BASESLAB", Footing)
            .with_subtype("IFCSLAB", "ROOF", Roof)
            .with_class("IFCSLABSTANDARDCASE", Slab)
            .with_subtype("IFCSLABSTANDARDCASE", "FLOOR", Floor)
            .with_subtype("IFCSLABSTANDARDCASE", "BASESLAB", Footing)
            .with_subtype("IFCSLABSTANDARDCASE", "ROOF", Roof)
            .with_class("IFCWALL", Wall)
            .with_class("IFCWALLSTANDARDCASE", Wall)
            .with_class("IFCWALLELEMENTEDCASE", Wall)
            .with_class("IFCCURTAINWALL", Wall)
            .with_class("IFCDOOR", Door)
            .with_class("IFCDOORSTANDARDCASE", Door)
            .with_class("IFCWINDOW", Window)
            .with_class("IFCWINDOWSTANDARDCASE", Window)
            .with_class("IFCCOLUMN", Column)
            .with_class("IFCCOLUMNSTANDARDCASE", Column)
            .with_class("IFCBEAM", Beam)
            .with_class("IFCBEAMSTANDARDCASE", Beam)
            .with_class("IFCMEMBER", Beam)
            .with_class("IFCFOOTING", Footing)
            .with_class("IFCRAILING", Railing)
            .with_class("IFCSTAIR", Stair)
            .with_class("IFCSTAIRFLIGHT", Stair)
    }
}

/// Fields the classifier looks at
#[derive(Clone, Copy, Debug, Default)]
pub struct ClassifyInput<'a> {
    pub class: &'a str,
    pub predefined_type: Option<&'a str>,
    pub category_name: Option<&'a str>,
    pub family_name: Option<&'a str>,
    pub type_name: Option<&'a str>,
    pub name: Option<&'a str>,
}

impl<'a> ClassifyInput<'a> {
    /// Input with only a class and optional subtype
    pub fn class(class: &'a str, predefined_type: Option<&'a str>) -> Self {
        Self {
            class,
            predefined_type,
            ..Self::default()
        }
    }
}

const MASS_TOKENS: &[&str] = &["mass", "massing"];
const CASEWORK_TOKENS: &[&str] = &["casework", "cabinet", "vanity"];
const FRAMING_TOKENS: &[&str] = &["structural framing", "beam", "girder", "joist"];
const DECK_TOKENS: &[&str] = &["deck", "porch", "patio", "balcony"];

/// Lower-cased concatenation of the free-text fields
struct FreeText(String);

impl FreeText {
    fn new(input: &ClassifyInput<'_>) -> Self {
        let joined = [
            input.category_name,
            input.family_name,
            input.type_name,
            input.name,
        ]
        .iter()
        .flatten()
        .map(|s| s.to_lowercase())
        .collect::<Vec<_>>()
        .join(" | ");
        Self(joined)
    }

    fn has(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    fn has_any(&self, tokens: &[&str]) -> bool {
        tokens.iter().any(|t| self.has(t))
    }
}

fn normalize_key(raw: &str) -> String {
    raw.trim().trim_matches('.').to_uppercase()
}

impl ClassificationTable {
    /// Table with no rules
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Set the default category of a class
    pub fn with_class(mut self, class: &str, category: ElementCategory) -> Self {
        self.rules.entry(normalize_key(class)).or_default().default = Some(category);
        self
    }

    /// Set the category of a class + predefined subtype pair
    pub fn with_subtype(mut self, class: &str, subtype: &str, category: ElementCategory) -> Self {
        self.rules
            .entry(normalize_key(class))
            .or_default()
            .subtypes
            .insert(normalize_key(subtype), category);
        self
    }

    /// Plain table lookup, subtype entries first
    pub fn lookup(&self, class: &str, predefined_type: Option<&str>) -> Option<ElementCategory> {
        let rule = self.rules.get(&normalize_key(class))?;
        predefined_type
            .and_then(|subtype| rule.subtypes.get(&normalize_key(subtype)))
            .copied()
            .or(rule.default)
    }

    /// Classify an element
    ///
    /// Steps, in precedence order: table lookup, proxy refinement by free
    /// text, slab/floor/deck refinement, base-slab footing pin.
    pub fn classify(&self, input: &ClassifyInput<'_>) -> Option<ElementCategory> {
        let class = normalize_key(input.class);
        let subtype = input.predefined_type.map(normalize_key);
        let text = FreeText::new(input);

        let mut category = self.lookup(&class, subtype.as_deref());

        if IfcType::parse(input.class).is_proxy() {
            if text.has_any(MASS_TOKENS) {
                category = Some(ElementCategory::Mass);
            } else if text.has_any(CASEWORK_TOKENS) {
                category = Some(ElementCategory::Casework);
            } else if text.has_any(FRAMING_TOKENS) {
                category = Some(ElementCategory::Beam);
            }
        }

        if matches!(
            category,
            Some(ElementCategory::Slab) | Some(ElementCategory::Floor)
        ) {
            if text.has_any(DECK_TOKENS) {
                category = Some(ElementCategory::Deck);
            } else if subtype.as_deref() == Some("FLOOR")
                || (text.has("floor") && !text.has("slab"))
            {
                category = Some(ElementCategory::Floor);
            }
        }

        if class.starts_with("IFCSLAB") && subtype.as_deref() == Some("BASESLAB") {
            category = Some(ElementCategory::Footing);
        }

        category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(input: ClassifyInput<'_>) -> Option<ElementCategory> {
        ClassificationTable::default().classify(&input)
    }

    #[test]
    fn test_slab_subtypes() {
        assert_eq!(
            classify(ClassifyInput::class("IfcSlab", Some("BASESLAB"))),
            Some(ElementCategory::Footing)
        );
        assert_eq!(
            classify(ClassifyInput::class("IfcSlab", Some("FLOOR"))),
            Some(ElementCategory::Floor)
        );
        assert_eq!(
            classify(ClassifyInput::class("IfcSlab", Some("LANDING"))),
            Some(ElementCategory::Slab)
        );
        assert_eq!(
            classify(ClassifyInput::class("IFCSLAB", Some(".FLOOR."))),
            Some(ElementCategory::Floor)
        );
    }

    #[test]
    fn test_class_defaults() {
        assert_eq!(
            classify(ClassifyInput::class("IfcWallStandardCase", None)),
            Some(ElementCategory::Wall)
        );
        assert_eq!(
            classify(ClassifyInput::class("IfcStairFlight", None)),
            Some(ElementCategory::Stair)
        );
        assert_eq!(classify(ClassifyInput::class("IfcFlowTerminal", None)), None);
    }

    #[test]
    fn test_proxy_refinement() {
        let casework = ClassifyInput {
            category_name: Some("Casework"),
            ..ClassifyInput::class("IfcBuildingElementProxy", None)
        };
        assert_eq!(classify(casework), Some(ElementCategory::Casework));

        let mass = ClassifyInput {
            family_name: Some("Massing Block"),
            ..ClassifyInput::class("IfcBuildingElementProxy", None)
        };
        assert_eq!(classify(mass), Some(ElementCategory::Mass));

        let joist = ClassifyInput {
            category_name: Some("Structural Framing"),
            type_name: Some("2x10 Joist"),
            ..ClassifyInput::class("IfcBuildingElementProxy", None)
        };
        assert_eq!(classify(joist), Some(ElementCategory::Beam));

        assert_eq!(
            classify(ClassifyInput::class("IfcBuildingElementProxy", None)),
            None
        );
    }

    #[test]
    fn test_slab_text_refinement() {
        let deck = ClassifyInput {
            name: Some("Rear Deck"),
            ..ClassifyInput::class("IfcSlab", Some("FLOOR"))
        };
        assert_eq!(classify(deck), Some(ElementCategory::Deck));

        let floor = ClassifyInput {
            type_name: Some("Floor: Wood Joist 10\""),
            ..ClassifyInput::class("IfcSlab", None)
        };
        assert_eq!(classify(floor), Some(ElementCategory::Floor));

        let slab = ClassifyInput {
            type_name: Some("Floor: Slab on Grade 4\""),
            ..ClassifyInput::class("IfcSlab", None)
        };
        assert_eq!(classify(slab), Some(ElementCategory::Slab));

        // Base slabs stay footings whatever the text says
        let footing = ClassifyInput {
            name: Some("Patio Floor"),
            ..ClassifyInput::class("IfcSlab", Some("BASESLAB"))
        };
        assert_eq!(classify(footing), Some(ElementCategory::Footing));
    }

    #[test]
    fn test_table_is_swappable() {
        let table = ClassificationTable::empty().with_class("IfcCovering", ElementCategory::Floor);
        assert_eq!(
            table.classify(&ClassifyInput::class("IFCCOVERING", None)),
            Some(ElementCategory::Floor)
        );
        assert_eq!(table.classify(&ClassifyInput::class("IfcWall", None)), None);
    }

    #[test]
    fn test_table_deserializes_case_insensitively() {
        let table: ClassificationTable = serde_json::from_str(
            r#"{ "IfcCovering": { "default": "floor", "subtypes": { "roofing": "roof" } } }"#,
        )
        .unwrap();
        assert_eq!(
            table.lookup("IFCCOVERING", Some("ROOFING")),
            Some(ElementCategory::Roof)
        );
    }
}
