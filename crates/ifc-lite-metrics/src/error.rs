// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for metric extraction
//!
//! These stay inside the engine. Public entry points turn them into a less
//! complete record (or `None`) and a log line.

use ifc_lite_model::{ElementRef, GraphError};
use thiserror::Error;

/// Result type alias for extraction internals
pub type MetricsResult<T> = std::result::Result<T, MetricsError>;

/// Errors raised while assembling a metric record
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Graph backend failed
    #[error("Graph access failed: {0}")]
    Graph(#[from] GraphError),

    /// Element view carries no type code
    #[error("Element {0} has no type code")]
    MissingTypeCode(ElementRef),

    /// Configuration could not be decoded
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
