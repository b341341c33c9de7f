//! Execution requests and their wire payloads
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::algorithm::AlgorithmKey;
use crate::error::ValidationError;

/// Whether a run targets one algorithm or compares several
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunMode {
    Single,
    Comparison,
}

impl RunMode {
    /// Endpoint path under `/api`
    pub fn endpoint(self) -> &'static str {
        match self {
            RunMode::Single => "run",
            RunMode::Comparison => "compare",
        }
    }
}

/// Validated user input, not yet bound to a set of algorithms
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInput {
    pub data: Vec<Value>,
    pub target: Option<Number>,
}

/// A request to execute one or more algorithms on the same data.
///
/// Only [`ExecutionRequestBuilder`] constructs requests, so the algorithm
/// list is never empty and a single-run request names exactly one key.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRequest {
    mode: RunMode,
    /// Selection order
    algorithms: Vec<AlgorithmKey>,
    data: Vec<Value>,
    target: Option<Number>,
}

/// Body of `POST /api/run`
#[derive(Debug, Serialize)]
pub struct RunPayload<'a> {
    pub algorithm: &'a AlgorithmKey,
    pub data: &'a [Value],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<&'a Number>,
}

/// Body of `POST /api/compare`
#[derive(Debug, Serialize)]
pub struct ComparePayload<'a> {
    pub algorithms: &'a [AlgorithmKey],
    pub data: &'a [Value],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<&'a Number>,
}

/// Mode-specific request body
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum WirePayload<'a> {
    Run(RunPayload<'a>),
    Compare(ComparePayload<'a>),
}

impl ExecutionRequest {
    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn algorithms(&self) -> &[AlgorithmKey] {
        &self.algorithms
    }

    pub fn data(&self) -> &[Value] {
        &self.data
    }

    pub fn target(&self) -> Option<&Number> {
        self.target.as_ref()
    }

    /// Wire body for this request. Single runs use the singular `algorithm`
    /// field, comparisons the ordered `algorithms` list.
    pub fn payload(&self) -> WirePayload<'_> {
        let target = self.target.as_ref();
        match self.mode {
            RunMode::Single => WirePayload::Run(RunPayload {
                algorithm: &self.algorithms[0],
                data: &self.data,
                target,
            }),
            RunMode::Comparison => WirePayload::Compare(ComparePayload {
                algorithms: &self.algorithms,
                data: &self.data,
                target,
            }),
        }
    }

    pub fn endpoint(&self) -> &'static str {
        self.mode.endpoint()
    }
}

/// Binds resolved input to the selected algorithms for one mode
#[derive(Debug, Clone, Copy)]
pub struct ExecutionRequestBuilder {
    mode: RunMode,
}

impl ExecutionRequestBuilder {
    pub fn new(mode: RunMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn build(
        &self,
        selected: &[AlgorithmKey],
        input: ResolvedInput,
    ) -> Result<ExecutionRequest, ValidationError> {
        if selected.is_empty() {
            return Err(ValidationError::NoAlgorithmSelected);
        }
        if self.mode == RunMode::Single && selected.len() != 1 {
            return Err(ValidationError::TooManyAlgorithms(selected.len()));
        }
        Ok(ExecutionRequest {
            mode: self.mode,
            algorithms: selected.to_vec(),
            data: input.data,
            target: input.target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(target: Option<i64>) -> ResolvedInput {
        ResolvedInput {
            data: vec![json!(5), json!(3), json!(1)],
            target: target.map(Number::from),
        }
    }

    #[test]
    fn single_run_uses_singular_field() {
        let request = ExecutionRequestBuilder::new(RunMode::Single)
            .build(&["quick_sort".into()], input(None))
            .unwrap();
        let body = serde_json::to_value(request.payload()).unwrap();
        assert_eq!(body, json!({"algorithm": "quick_sort", "data": [5, 3, 1]}));
        assert_eq!(request.endpoint(), "run");
    }

    #[test]
    fn comparison_uses_ordered_plural_field() {
        let keys = vec!["merge_sort".into(), "binary_search".into(), "bubble_sort".into()];
        let request = ExecutionRequestBuilder::new(RunMode::Comparison)
            .build(&keys, input(Some(3)))
            .unwrap();
        let body = serde_json::to_value(request.payload()).unwrap();
        assert_eq!(
            body,
            json!({
                "algorithms": ["merge_sort", "binary_search", "bubble_sort"],
                "data": [5, 3, 1],
                "target": 3
            })
        );
        assert_eq!(request.endpoint(), "compare");
    }

    #[test]
    fn empty_selection_is_rejected() {
        let err = ExecutionRequestBuilder::new(RunMode::Comparison)
            .build(&[], input(None))
            .unwrap_err();
        assert_eq!(err, ValidationError::NoAlgorithmSelected);
    }

    #[test]
    fn single_mode_takes_one_key() {
        let err = ExecutionRequestBuilder::new(RunMode::Single)
            .build(&["a".into(), "b".into()], input(None))
            .unwrap_err();
        assert_eq!(err, ValidationError::TooManyAlgorithms(2));
    }

    #[test]
    fn built_request_exposes_validated_fields() {
        let request = ExecutionRequestBuilder::new(RunMode::Single)
            .build(&["binary_search".into()], input(Some(1)))
            .unwrap();
        assert_eq!(request.mode(), RunMode::Single);
        assert_eq!(request.algorithms(), [AlgorithmKey::new("binary_search")]);
        assert_eq!(request.data(), [json!(5), json!(3), json!(1)]);
        assert_eq!(request.target(), Some(&Number::from(1)));
    }
}
