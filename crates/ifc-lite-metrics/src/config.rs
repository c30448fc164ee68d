// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extractor configuration

use crate::classify::ClassificationTable;
use crate::error::MetricsResult;
use crate::units::DEFAULT_DENOMINATOR;
use serde::{Deserialize, Serialize};

/// Tunables for [`MetricsExtractor`](crate::MetricsExtractor)
///
/// Every field has a default, so a partial JSON document is a valid config:
///
/// ```
/// use ifc_lite_metrics::ExtractorConfig;
///
/// let config = ExtractorConfig::from_json(r#"{ "debugTrace": true }"#).unwrap();
/// assert!(config.debug_trace);
/// assert_eq!(config.fraction_denominator, 16);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractorConfig {
    /// Record which source supplied each field
    pub debug_trace: bool,
    /// Bare integers above this are treated as entity references
    pub reference_id_threshold: f64,
    /// Fractional-inch denominator for thickness and section displays
    pub fraction_denominator: u32,
    /// Substring identifying the preprocessing tool's override set
    pub adapter_set_hint: String,
    /// Class -> category table
    pub classification: ClassificationTable,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            debug_trace: false,
            reference_id_threshold: 10.0,
            fraction_denominator: DEFAULT_DENOMINATOR,
            adapter_set_hint: "adapter".to_string(),
            classification: ClassificationTable::default(),
        }
    }
}

impl ExtractorConfig {
    /// Decode from JSON, missing fields take their defaults
    pub fn from_json(json: &str) -> MetricsResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_debug_trace(mut self, enabled: bool) -> Self {
        self.debug_trace = enabled;
        self
    }

    pub fn with_reference_id_threshold(mut self, threshold: f64) -> Self {
        self.reference_id_threshold = threshold;
        self
    }

    pub fn with_fraction_denominator(mut self, denominator: u32) -> Self {
        self.fraction_denominator = denominator;
        self
    }

    pub fn with_adapter_set_hint(mut self, hint: impl Into<String>) -> Self {
        self.adapter_set_hint = hint.into();
        self
    }

    pub fn with_classification(mut self, table: ClassificationTable) -> Self {
        self.classification = table;
        self
    }
}
