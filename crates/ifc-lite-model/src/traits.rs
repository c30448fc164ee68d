// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Graph access trait
//!
//! This is the seam between the metrics engine and whatever holds the model
//! (a viewer's web-ifc instance, a parsed STEP file, a JSON export).

use crate::{ElementRef, PropertyView, Result};

/// Read access to an IFC property graph
///
/// Implementations must tolerate being called many times per element; the
/// metrics engine places no caching obligation on them.
///
/// # Example
///
/// ```ignore
/// use ifc_lite_model::{ElementRef, GraphAccess};
///
/// fn element_name(graph: &dyn GraphAccess, element: ElementRef) -> Option<String> {
///     let view = graph.properties(element, false).ok()?;
///     view.text("Name").map(str::to_string)
/// }
/// ```
pub trait GraphAccess: Send + Sync {
    /// Get the attribute view of an element
    ///
    /// # Arguments
    /// * `element` - The element to look up
    /// * `resolve_indirect` - When true, reference handles are resolved into
    ///   nested views and the element's property sets (`psets`) and type
    ///   objects (`types`) are attached. When false, the view is returned as
    ///   stored, with its type code intact.
    fn properties(&self, element: ElementRef, resolve_indirect: bool) -> Result<PropertyView>;

    /// Single-hop lookup of one entity, references left unresolved
    fn item_properties(&self, element: ElementRef) -> Result<PropertyView>;

    /// Name of a numeric type code (e.g. `IFCSLAB`)
    fn type_code_to_name(&self, code: u32) -> Result<String>;
}
