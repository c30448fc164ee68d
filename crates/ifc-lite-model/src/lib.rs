// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Lite Model - Property graph access for IFC elements
//!
//! This crate provides the abstractions the metrics engine consumes when it
//! reads element data out of an IFC property graph. The graph itself lives
//! elsewhere (a viewer, a parser, a JSON export); this crate only describes
//! how it is accessed and what shapes its values can take.
//!
//! # Architecture
//!
//! - [`GraphAccess`] - Element property views, single-hop item lookup and
//!   type-code names
//! - [`PropertyView`] - Attribute bag of one entity as the graph hands it out
//! - [`RawValue`] - Closed set of raw value shapes found in those bags
//! - [`IfcType`] - Known IFC class names and type codes
//! - [`MemoryGraph`] - In-memory graph over a JSON snapshot
//!
//! # Example
//!
//! ```ignore
//! use ifc_lite_model::{ElementRef, GraphAccess, MemoryGraph};
//!
//! let graph = MemoryGraph::from_json(snapshot_json)?;
//! let view = graph.properties(ElementRef::new(0, 42), true)?;
//! println!("Element name: {:?}", view.text("Name"));
//! ```

pub mod error;
pub mod memory;
pub mod traits;
pub mod types;
pub mod value;

// Re-export all public types
pub use error::*;
pub use memory::*;
pub use traits::*;
pub use types::*;
pub use value::*;
