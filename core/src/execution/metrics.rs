//! Per-algorithm outcomes and the metrics reported with them
//!
//! Metric values are measured by the service and treated here as opaque
//! numbers; the client never derives or corrects them.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Performance facts reported for one execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub execution_time_ms: f64,
    pub memory_used_kb: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_peak_kb: Option<f64>,
    pub comparisons: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swaps: Option<f64>,
    pub input_size: f64,
}

/// Result of running one algorithm
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Success { result: Value, metadata: Metrics },
    Failure { error: String },
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Success { .. })
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        match self {
            ExecutionOutcome::Success { metadata, .. } => Some(metadata),
            ExecutionOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ExecutionOutcome::Success { .. } => None,
            ExecutionOutcome::Failure { error } => Some(error),
        }
    }
}

/// Format a metric without a trailing `.0` for whole numbers
pub fn format_metric(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
