// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Lite Metrics - Standardized quantities for IFC building elements
//!
//! Authoring tools export the same quantity under different set names, entry
//! names, value shapes and units. This crate reconciles them into one typed,
//! display-ready record per element.
//!
//! # Features
//!
//! - **Classification** of class + predefined type + free text into a logical
//!   category, driven by a swappable [`ClassificationTable`]
//! - **Set resolution** with reference following, fuzzy names and a fixed
//!   source priority (quantity set, BaseQuantities, adapter set, any set)
//! - **Unit reconciliation** by magnitude, with feet-inch and fractional-inch
//!   displays
//! - **Source tracing** of every field on request
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ifc_lite_metrics::MetricsExtractor;
//! use ifc_lite_model::{ElementRef, MemoryGraph};
//!
//! let graph = MemoryGraph::from_json(snapshot_json)?;
//! let extractor = MetricsExtractor::new(Arc::new(graph));
//!
//! if let Some(metrics) = extractor.extract(ElementRef::new(0, 812)) {
//!     println!("{}", serde_json::to_string_pretty(&metrics)?);
//! }
//! ```

pub mod classify;
pub mod config;
pub mod dimensions;
pub mod error;
mod extractors;
pub mod identity;
pub mod metrics;
pub mod resolver;
mod router;
pub mod trace;
pub mod units;

pub use classify::{ClassRule, ClassificationTable, ClassifyInput, ElementCategory};
pub use config::ExtractorConfig;
pub use dimensions::CaseworkKind;
pub use error::{MetricsError, MetricsResult};
pub use identity::ElementIdentity;
pub use metrics::*;
pub use resolver::{resolve_scalar, BaseQuantities, ElementSets, PropertyResolver, Scalar};
pub use router::MetricsExtractor;
pub use trace::{FieldSource, SourceTrace, TraceEntry};
