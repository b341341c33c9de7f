//! Reconciliation of service responses into the view model
//!
//! The service answers a single run with one outcome and a comparison with a
//! mapping from algorithm key to outcome. Both are normalised here into
//! [`ExecutionOutcome`] and [`ComparisonView`], which the textual renderer and
//! the chart presenter consume unchanged.
//!
//! Comparison entries keep the key order of the response body (the service
//! preserves selection order); nothing here re-sorts them.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::{debug, warn};
use serde_json::{Map, Value};

use super::metrics::{ExecutionOutcome, Metrics};
use super::request::RunMode;
use crate::algorithm::AlgorithmKey;
use crate::backend::envelope::{self, ResponseKind};
use crate::error::ClientError;

/// One algorithm's slot in a comparison
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonEntry {
    pub key: AlgorithmKey,
    pub outcome: ExecutionOutcome,
}

/// Ordered per-algorithm outcomes of a comparison
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonView {
    entries: Vec<ComparisonEntry>,
}

/// Some, but not all, algorithms of a comparison failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialFailure {
    pub failed: Vec<AlgorithmKey>,
    pub total: usize,
}

impl ComparisonView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: AlgorithmKey, outcome: ExecutionOutcome) {
        self.entries.push(ComparisonEntry { key, outcome });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComparisonEntry> {
        self.entries.iter()
    }

    pub fn get(&self, key: &AlgorithmKey) -> Option<&ExecutionOutcome> {
        self.entries
            .iter()
            .find(|entry| &entry.key == key)
            .map(|entry| &entry.outcome)
    }

    pub fn keys(&self) -> impl Iterator<Item = &AlgorithmKey> {
        self.entries.iter().map(|entry| &entry.key)
    }

    /// Successful entries with their metrics, in view order
    pub fn successes(&self) -> impl Iterator<Item = (&AlgorithmKey, &Metrics)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.outcome.metrics().map(|metrics| (&entry.key, metrics)))
    }

    /// Failed entries with their messages, in view order
    pub fn failures(&self) -> impl Iterator<Item = (&AlgorithmKey, &str)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.outcome.error().map(|error| (&entry.key, error)))
    }

    pub fn partial_failure(&self) -> Option<PartialFailure> {
        let failed: Vec<AlgorithmKey> = self.failures().map(|(key, _)| key.clone()).collect();
        if failed.is_empty() || failed.len() == self.entries.len() {
            return None;
        }
        Some(PartialFailure {
            failed,
            total: self.entries.len(),
        })
    }

    pub fn all_failed(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(|entry| !entry.outcome.is_success())
    }
}

impl<'a> IntoIterator for &'a ComparisonView {
    type Item = &'a ComparisonEntry;
    type IntoIter = std::slice::Iter<'a, ComparisonEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Normalised response of either mode
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciled {
    Single(ExecutionOutcome),
    Comparison(ComparisonView),
}

/// Stateless mapping from raw response bodies to view models
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultReconciler;

impl ResultReconciler {
    pub fn reconcile(raw: Value, mode: RunMode) -> Result<Reconciled, ClientError> {
        match mode {
            RunMode::Single => Self::reconcile_single(raw).map(Reconciled::Single),
            RunMode::Comparison => Self::reconcile_comparison(raw).map(Reconciled::Comparison),
        }
    }

    /// `{ success, result: { result, metadata } }`
    pub fn reconcile_single(raw: Value) -> Result<ExecutionOutcome, ClientError> {
        let mut body = envelope::open(raw, ResponseKind::Run)?;
        let result = body
            .remove("result")
            .ok_or_else(|| ClientError::MalformedResponse("response has no result".into()))?;
        let Value::Object(entry) = result else {
            return Err(ClientError::MalformedResponse("result is not an object".into()));
        };
        outcome_from_entry(entry).map_err(ClientError::MalformedResponse)
    }

    /// `{ success, results: { key: {result, metadata} | {error} } }`
    pub fn reconcile_comparison(raw: Value) -> Result<ComparisonView, ClientError> {
        let mut body = envelope::open(raw, ResponseKind::Compare)?;
        let results = match body.remove("results") {
            Some(Value::Object(results)) => results,
            Some(_) => return Err(ClientError::MalformedResponse("results is not an object".into())),
            None => return Err(ClientError::MalformedResponse("response has no results".into())),
        };

        let mut view = ComparisonView::new();
        for (key, entry) in results {
            let outcome = match entry {
                Value::Object(entry) => outcome_from_entry(entry).unwrap_or_else(|reason| {
                    warn!("Malformed comparison entry for {}: {}", key, reason);
                    ExecutionOutcome::Failure {
                        error: format!("malformed result: {}", reason),
                    }
                }),
                other => ExecutionOutcome::Failure {
                    error: format!("malformed result: expected an object, got {}", other),
                },
            };
            view.push(AlgorithmKey::from(key), outcome);
        }

        if let Some(partial) = view.partial_failure() {
            warn!(
                "{} of {} algorithms failed in comparison",
                partial.failed.len(),
                partial.total
            );
        }
        debug!("Reconciled comparison with {} entries", view.len());
        Ok(view)
    }
}

/// Classify one `{result, metadata}` / `{error}` object
fn outcome_from_entry(mut entry: Map<String, Value>) -> Result<ExecutionOutcome, String> {
    match entry.remove("error") {
        Some(Value::Null) | None => {}
        Some(Value::String(error)) => return Ok(ExecutionOutcome::Failure { error }),
        Some(other) => return Ok(ExecutionOutcome::Failure { error: other.to_string() }),
    }

    let metadata = entry
        .remove("metadata")
        .ok_or_else(|| "missing metadata".to_string())?;
    let metadata: Metrics =
        serde_json::from_value(metadata).map_err(|e| format!("invalid metadata: {}", e))?;
    let result = entry.remove("result").unwrap_or(Value::Null);
    Ok(ExecutionOutcome::Success { result, metadata })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata() -> Value {
        json!({
            "execution_time_ms": 2,
            "memory_used_kb": 10,
            "memory_peak_kb": 12,
            "comparisons": 5,
            "swaps": 3,
            "input_size": 4
        })
    }

    #[test]
    fn single_success_is_identity() {
        let raw = json!({"success": true, "result": {"result": [1, 3, 4, 5], "metadata": metadata()}});
        let outcome = ResultReconciler::reconcile_single(raw).unwrap();
        match outcome {
            ExecutionOutcome::Success { result, metadata } => {
                assert_eq!(result, json!([1, 3, 4, 5]));
                assert_eq!(metadata.swaps, Some(3.0));
                assert_eq!(metadata.memory_peak_kb, Some(12.0));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn single_success_without_metadata_is_malformed() {
        let raw = json!({"success": true, "result": {"result": [1, 2]}});
        let err = ResultReconciler::reconcile_single(raw).unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(ref m) if m.contains("metadata")));
    }

    #[test]
    fn backend_refusal_carries_message() {
        let raw = json!({"success": false, "error": "Algorithm 'nope' not found"});
        let err = ResultReconciler::reconcile(raw, RunMode::Single).unwrap_err();
        assert!(matches!(err, ClientError::Backend(ref m) if m == "Algorithm 'nope' not found"));

        let raw = json!({"success": false});
        let err = ResultReconciler::reconcile(raw, RunMode::Comparison).unwrap_err();
        assert!(matches!(err, ClientError::Backend(ref m) if m == "error comparing algorithms"));
    }

    #[test]
    fn comparison_separates_success_and_failure_in_order() {
        let raw = json!({
            "success": true,
            "results": {
                "a": {"result": [1, 2], "metadata": metadata()},
                "b": {"error": "boom"}
            }
        });
        let view = ResultReconciler::reconcile_comparison(raw).unwrap();
        let keys: Vec<_> = view.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
        assert!(view.get(&"a".into()).unwrap().is_success());
        assert_eq!(view.get(&"b".into()).unwrap().error(), Some("boom"));

        let partial = view.partial_failure().unwrap();
        assert_eq!(partial.failed, vec![AlgorithmKey::new("b")]);
        assert_eq!(partial.total, 2);
    }

    #[test]
    fn comparison_order_follows_response_not_alphabet() {
        let raw = json!({
            "success": true,
            "results": {
                "selection_sort": {"result": [], "metadata": metadata()},
                "bubble_sort": {"result": [], "metadata": metadata()},
                "merge_sort": {"error": "recursion limit"}
            }
        });
        let view = ResultReconciler::reconcile_comparison(raw).unwrap();
        let keys: Vec<_> = view.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["selection_sort", "bubble_sort", "merge_sort"]);
    }

    #[test]
    fn malformed_comparison_entry_fails_only_that_entry() {
        let raw = json!({
            "success": true,
            "results": {
                "a": {"result": [1]},
                "b": {"result": [2], "metadata": metadata()},
                "c": 17
            }
        });
        let view = ResultReconciler::reconcile_comparison(raw).unwrap();
        assert!(view.get(&"a".into()).unwrap().error().unwrap().contains("missing metadata"));
        assert!(view.get(&"b".into()).unwrap().is_success());
        assert!(view.get(&"c".into()).unwrap().error().unwrap().starts_with("malformed result"));
    }

    #[test]
    fn all_failed_is_not_partial() {
        let raw = json!({"success": true, "results": {"a": {"error": "x"}, "b": {"error": "y"}}});
        let view = ResultReconciler::reconcile_comparison(raw).unwrap();
        assert!(view.all_failed());
        assert!(view.partial_failure().is_none());
        assert_eq!(view.successes().count(), 0);
    }

    #[test]
    fn non_envelope_body_is_malformed() {
        let err = ResultReconciler::reconcile(json!([1, 2, 3]), RunMode::Single).unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse(_)));
    }
}
