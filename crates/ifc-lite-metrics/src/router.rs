// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extraction router
//!
//! Resolves an element's class from its type code, classifies it and hands it
//! to the matching category extractor.

use crate::classify::ClassifyInput;
use crate::config::ExtractorConfig;
use crate::extractors::{ElementContext, Extractor};
use crate::identity::ElementIdentity;
use crate::metrics::{StandardizedMetrics, TracedMetrics};
use ifc_lite_model::{ElementRef, GraphAccess, IfcType};
use std::sync::Arc;

/// Metrics engine over one graph
///
/// Holds no mutable state; share it across threads to extract distinct
/// elements concurrently.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use ifc_lite_metrics::MetricsExtractor;
/// use ifc_lite_model::{ElementRef, MemoryGraph};
///
/// let graph = MemoryGraph::from_json(r#"{
///     "modelId": 0,
///     "typeNames": { "3512223829": "IFCWALLSTANDARDCASE" },
///     "entities": [ { "expressID": 7, "type": 3512223829, "Name": "Wall" } ]
/// }"#).unwrap();
///
/// let extractor = MetricsExtractor::new(Arc::new(graph));
/// let metrics = extractor.extract(ElementRef::new(0, 7)).unwrap();
/// assert_eq!(metrics.identity().class_name, "IfcWallStandardCase");
/// ```
#[derive(Clone)]
pub struct MetricsExtractor {
    graph: Arc<dyn GraphAccess>,
    config: ExtractorConfig,
}

impl MetricsExtractor {
    /// Create an extractor with the default configuration
    pub fn new(graph: Arc<dyn GraphAccess>) -> Self {
        Self::with_config(graph, ExtractorConfig::default())
    }

    pub fn with_config(graph: Arc<dyn GraphAccess>, config: ExtractorConfig) -> Self {
        Self { graph, config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn graph(&self) -> &dyn GraphAccess {
        self.graph.as_ref()
    }

    /// Class name of a type code
    ///
    /// Graph lookup first, then the static code table, then `Type N`.
    pub fn class_name_for_code(&self, code: u32) -> String {
        match self.graph.type_code_to_name(code) {
            Ok(name) => IfcType::parse(&name).class_name(),
            Err(e) => {
                log::warn!("type code {} not resolved by graph: {}", code, e);
                IfcType::from_type_code(code)
                    .map(|t| t.class_name())
                    .unwrap_or_else(|| format!("Type {}", code))
            }
        }
    }

    /// Class name of an element; `Unknown` when it cannot be looked up
    pub fn resolve_class_name(&self, element: ElementRef) -> String {
        match self.graph.item_properties(element) {
            Ok(view) => match view.type_code {
                Some(code) => self.class_name_for_code(code),
                None => "Unknown".to_string(),
            },
            Err(e) => {
                log::debug!("element {} has no readable view: {}", element, e);
                "Unknown".to_string()
            }
        }
    }

    /// Identity of an element without metrics
    ///
    /// A failed fetch yields the class + id identity.
    pub fn identity(&self, element: ElementRef) -> ElementIdentity {
        match ElementContext::load(self, element) {
            Ok(ctx) => ctx.identity,
            Err(e) => {
                log::warn!("identity of element {} degraded: {}", element, e);
                ElementIdentity::minimal(self.resolve_class_name(element), element.id.0)
            }
        }
    }

    /// Standardized metrics of an element, `None` when its class has no
    /// extractor
    pub fn extract(&self, element: ElementRef) -> Option<StandardizedMetrics> {
        self.extract_traced(element).map(|traced| traced.metrics)
    }

    /// Like [`extract`](Self::extract), with field sources attached when
    /// `debug_trace` is enabled
    pub fn extract_traced(&self, element: ElementRef) -> Option<TracedMetrics> {
        let ctx = match ElementContext::load(self, element) {
            Ok(ctx) => ctx,
            Err(e) => {
                let class_name = self.resolve_class_name(element);
                let category = self
                    .config
                    .classification
                    .classify(&ClassifyInput::class(&class_name, None));
                let Some(extractor) = category.and_then(Extractor::for_category) else {
                    log::warn!(
                        "no extractor available for {} (element {}): {}",
                        class_name,
                        element,
                        e
                    );
                    return None;
                };
                log::warn!(
                    "{} extraction failed for element {}: {}",
                    extractor.category(),
                    element,
                    e
                );
                let identity = ElementIdentity::minimal(class_name, element.id.0);
                return Some(TracedMetrics {
                    metrics: extractor.fallback(identity),
                    trace: None,
                });
            }
        };

        let category = ctx.identity.element_category;
        let Some(extractor) = Extractor::for_category(category) else {
            log::warn!(
                "no extractor available for {} (element {})",
                ctx.identity.class_name,
                element
            );
            return None;
        };

        log::debug!(
            "element {} ({}) routed to {} extractor",
            element,
            ctx.identity.class_name,
            extractor.category()
        );
        Some(self.run_loaded(&ctx, extractor))
    }
}
