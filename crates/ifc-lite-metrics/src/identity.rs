// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Common identity fields shared by every metric record

use crate::classify::{ClassificationTable, ClassifyInput, ElementCategory};
use crate::resolver::{squash, ElementSets};
use ifc_lite_model::{ElementRef, PropertyView};
use serde::{Deserialize, Serialize};

/// Identity of one element
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementIdentity {
    pub class_name: String,
    pub express_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_mark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_mark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_external: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predefined_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_code: Option<String>,
    pub element_category: ElementCategory,
}

impl ElementIdentity {
    /// Degraded identity: class and id only
    pub fn minimal(class_name: impl Into<String>, express_id: u32) -> Self {
        Self {
            class_name: class_name.into(),
            express_id,
            ..Self::default()
        }
    }

    /// The fields the classifier reads
    pub fn classify_input(&self) -> ClassifyInput<'_> {
        ClassifyInput {
            class: &self.class_name,
            predefined_type: self.predefined_type.as_deref(),
            category_name: self.category_name.as_deref(),
            family_name: self.family_name.as_deref(),
            type_name: self.type_name.as_deref(),
            name: self.name.as_deref(),
        }
    }
}

const TYPE_NAME_FIELDS: &[&str] = &["Type Name", "TypeName", "Type"];
const TYPE_MARK_FIELDS: &[&str] = &["Type Mark", "TypeMark"];
const LEVEL_FIELDS: &[&str] = &["Level", "Base Constraint", "Reference Level", "Schedule Level"];
const PHASE_FIELDS: &[&str] = &["Phase Created", "Phase"];
const FAMILY_FIELDS: &[&str] = &["Family", "Family Name", "FamilyName"];
const CATEGORY_FIELDS: &[&str] = &["Category", "Category Name", "CategoryName"];
const CLASSIFICATION_FIELDS: &[&str] = &[
    "Assembly Code",
    "OmniClass Number",
    "Classification",
    "ClassificationCode",
];

fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `PredefinedType`, with `NOTDEFINED` dropped and `USERDEFINED` replaced by
/// `ObjectType`
fn predefined_type(base: &PropertyView, full: &PropertyView) -> Option<String> {
    let raw = [base, full]
        .iter()
        .find_map(|view| non_empty(view.text("PredefinedType")))?;
    match raw.trim_matches('.').to_uppercase().as_str() {
        "NOTDEFINED" => None,
        "USERDEFINED" => [base, full]
            .iter()
            .find_map(|view| non_empty(view.text("ObjectType"))),
        subtype => Some(subtype.to_string()),
    }
}

/// Type name from the linked type object, then identity/common sets, then
/// `ObjectType`
fn type_name(
    base: &PropertyView,
    full: &PropertyView,
    type_objects: &[PropertyView],
    sets: &ElementSets,
) -> Option<String> {
    type_objects
        .iter()
        .find_map(|t| non_empty(t.text("Name")))
        .or_else(|| {
            sets.iter()
                .filter(|s| {
                    let name = squash(&s.name);
                    name.contains("identity") || name.contains("common")
                })
                .find_map(|s| {
                    TYPE_NAME_FIELDS
                        .iter()
                        .find_map(|f| s.exact(f))
                        .map(|v| v.to_text())
                })
                .filter(|s| !s.trim().is_empty())
        })
        .or_else(|| non_empty(base.text("ObjectType")))
        .or_else(|| non_empty(full.text("ObjectType")))
}

/// Assemble an identity from already fetched views and sets
///
/// The classifier runs last, once every refining field is known.
pub fn identity_from_parts(
    element: ElementRef,
    class_name: &str,
    base: &PropertyView,
    full: &PropertyView,
    type_objects: &[PropertyView],
    sets: &ElementSets,
    table: &ClassificationTable,
) -> ElementIdentity {
    let text_attr = |name: &str| non_empty(base.text(name)).or_else(|| non_empty(full.text(name)));

    let mut identity = ElementIdentity {
        class_name: class_name.to_string(),
        express_id: element.id.0,
        global_id: text_attr("GlobalId"),
        name: text_attr("Name"),
        type_name: type_name(base, full, type_objects, sets),
        type_mark: sets.text_exact(TYPE_MARK_FIELDS),
        instance_mark: sets.text_exact(&["Mark"]).or_else(|| text_attr("Tag")),
        level: sets.text_exact(LEVEL_FIELDS),
        phase: sets.text_exact(PHASE_FIELDS),
        is_external: sets
            .find_exact("IsExternal")
            .and_then(|(_, v)| v.as_bool()),
        predefined_type: predefined_type(base, full),
        family_name: sets.text_exact(FAMILY_FIELDS),
        category_name: sets.text_exact(CATEGORY_FIELDS),
        classification_code: sets.text_exact(CLASSIFICATION_FIELDS),
        element_category: ElementCategory::Other,
    };

    identity.element_category = table
        .classify(&identity.classify_input())
        .unwrap_or(ElementCategory::Other);
    identity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{ResolvedEntry, ResolvedSet, Scalar, SetKind, SetOrigin};
    use ifc_lite_model::RawValue;

    fn property_set(name: &str, entries: &[(&str, Scalar)]) -> ResolvedSet {
        ResolvedSet {
            name: name.to_string(),
            kind: SetKind::Property,
            origin: SetOrigin::Instance,
            entries: entries
                .iter()
                .map(|(n, v)| ResolvedEntry {
                    name: n.to_string(),
                    value: v.clone(),
                })
                .collect(),
        }
    }

    fn text(s: &str) -> Scalar {
        Scalar::Text(s.to_string())
    }

    #[test]
    fn test_full_identity() {
        let base = PropertyView::entity(12, 1095909175)
            .with("GlobalId", "2O2Fr$t4X7Zf8NOew3FLOH")
            .with("Name", "Base Cabinet:36\":123456")
            .with("ObjectType", "Base Cabinet:36\"")
            .with("Tag", "123456");
        let sets = ElementSets::new(vec![
            property_set(
                "Identity Data",
                &[
                    ("Type Mark", text("B1")),
                    ("Mark", Scalar::Number(7.0)),
                    ("Assembly Code", text("C1030")),
                ],
            ),
            property_set(
                "Other",
                &[
                    ("Category", text("Casework")),
                    ("Family", text("Base Cabinet")),
                    ("Level", text("Level 1")),
                    ("Phase Created", text("New Construction")),
                    ("IsExternal", text(".F.")),
                ],
            ),
        ]);

        let identity = identity_from_parts(
            ElementRef::new(0, 12),
            "IfcBuildingElementProxy",
            &base,
            &base,
            &[],
            &sets,
            &ClassificationTable::default(),
        );

        assert_eq!(identity.type_name.as_deref(), Some("Base Cabinet:36\""));
        assert_eq!(identity.type_mark.as_deref(), Some("B1"));
        assert_eq!(identity.instance_mark.as_deref(), Some("7"));
        assert_eq!(identity.level.as_deref(), Some("Level 1"));
        assert_eq!(identity.phase.as_deref(), Some("New Construction"));
        assert_eq!(identity.is_external, Some(false));
        assert_eq!(identity.classification_code.as_deref(), Some("C1030"));
        assert_eq!(identity.element_category, ElementCategory::Casework);
    }

    #[test]
    fn test_predefined_type_rules() {
        let base = PropertyView::entity(5, 1529196076).with("PredefinedType", ".NOTDEFINED.");
        assert_eq!(predefined_type(&base, &base), None);

        let user = PropertyView::entity(5, 1529196076)
            .with("PredefinedType", "USERDEFINED")
            .with("ObjectType", "Topping");
        assert_eq!(predefined_type(&user, &user).as_deref(), Some("Topping"));

        // Only the resolved view still carries it
        let stripped = PropertyView::entity(5, 1529196076);
        let full = PropertyView::entity(5, 1529196076).with(
            "PredefinedType",
            RawValue::Object(PropertyView::default().with("value", "BASESLAB")),
        );
        assert_eq!(predefined_type(&stripped, &full).as_deref(), Some("BASESLAB"));
    }

    #[test]
    fn test_type_object_name_wins() {
        let base = PropertyView::entity(9, 3512223829).with("ObjectType", "Generic - 8\"");
        let type_object = PropertyView::entity(60, 1).with("Name", "Exterior - Brick on CMU");
        let identity = identity_from_parts(
            ElementRef::new(0, 9),
            "IfcWallStandardCase",
            &base,
            &base,
            &[type_object],
            &ElementSets::default(),
            &ClassificationTable::default(),
        );
        assert_eq!(identity.type_name.as_deref(), Some("Exterior - Brick on CMU"));
        assert_eq!(identity.element_category, ElementCategory::Wall);
    }
}
