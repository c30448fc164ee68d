// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for property graph access

use crate::EntityId;
use thiserror::Error;

/// Result type alias for graph access operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors a graph access backend can report
#[derive(Error, Debug)]
pub enum GraphError {
    /// Entity not found in the graph
    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),

    /// Model handle is not loaded
    #[error("Model {0} is not loaded")]
    ModelNotLoaded(u32),

    /// Type code has no known name
    #[error("Unknown type code {0}")]
    UnknownTypeCode(u32),

    /// Snapshot content could not be interpreted
    #[error("Invalid graph snapshot: {0}")]
    InvalidSnapshot(String),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl GraphError {
    /// Create a new snapshot error
    pub fn snapshot(msg: impl Into<String>) -> Self {
        GraphError::InvalidSnapshot(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        GraphError::Other(msg.into())
    }
}
