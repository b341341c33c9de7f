//! Execution history kept by the service
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::algorithm::AlgorithmKey;

/// One past execution as recorded by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub algorithm: AlgorithmKey,
    pub input_size: u64,
    /// The `{result, metadata}` object the run produced
    #[serde(default)]
    pub result: Value,
}

impl HistoryEntry {
    /// Execution time recorded with the entry, if the service included it
    pub fn execution_time_ms(&self) -> Option<f64> {
        self.result
            .get("metadata")
            .and_then(|metadata| metadata.get("execution_time_ms"))
            .and_then(Value::as_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_service_entry() {
        let entry: HistoryEntry = serde_json::from_value(json!({
            "algorithm": "bubble_sort",
            "input_size": 8,
            "result": {"result": [1, 2], "metadata": {"execution_time_ms": 0.25}},
            "timestamp": null
        }))
        .unwrap();
        assert_eq!(entry.algorithm.as_str(), "bubble_sort");
        assert_eq!(entry.execution_time_ms(), Some(0.25));
    }

    #[test]
    fn missing_metadata_has_no_time() {
        let entry: HistoryEntry =
            serde_json::from_value(json!({"algorithm": "x", "input_size": 0})).unwrap();
        assert_eq!(entry.execution_time_ms(), None);
    }
}
