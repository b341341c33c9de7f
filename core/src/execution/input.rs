//! Validation and normalisation of user input
//!
//! Raw text from the data, target and size fields is turned into a request
//! here. Everything rejected by this module is rejected before anything is
//! sent to the service.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::request::{ExecutionRequest, ExecutionRequestBuilder, ResolvedInput, RunMode};
use crate::algorithm::{AlgorithmCatalog, AlgorithmKey};
use crate::backend::Backend;
use crate::error::{GenerationError, ValidationError};

/// Shapes of data the service can generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationKind {
    Random,
    Sorted,
    Reverse,
    NearlySorted,
    Strings,
}

impl GenerationKind {
    pub const ALL: [GenerationKind; 5] = [
        GenerationKind::Random,
        GenerationKind::Sorted,
        GenerationKind::Reverse,
        GenerationKind::NearlySorted,
        GenerationKind::Strings,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GenerationKind::Random => "random",
            GenerationKind::Sorted => "sorted",
            GenerationKind::Reverse => "reverse",
            GenerationKind::NearlySorted => "nearly_sorted",
            GenerationKind::Strings => "strings",
        }
    }
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| format!("unsupported data type '{}'", s))
    }
}

/// Body of `POST /api/generate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    #[serde(rename = "type")]
    pub kind: GenerationKind,
    pub size: usize,
}

/// Turns raw field text into execution requests for one mode
#[derive(Debug, Clone, Copy)]
pub struct InputResolver {
    builder: ExecutionRequestBuilder,
    default_generate_size: usize,
}

impl InputResolver {
    pub fn new(mode: RunMode, default_generate_size: usize) -> Self {
        Self {
            builder: ExecutionRequestBuilder::new(mode),
            default_generate_size,
        }
    }

    pub fn mode(&self) -> RunMode {
        self.builder.mode()
    }

    /// Validate the fields and build a request for the selected algorithms
    pub fn resolve(
        &self,
        raw_data: &str,
        raw_target: &str,
        selected: &[AlgorithmKey],
        catalog: &AlgorithmCatalog,
    ) -> Result<ExecutionRequest, ValidationError> {
        if selected.is_empty() {
            return Err(ValidationError::NoAlgorithmSelected);
        }
        let wants_target = catalog.any_requires_target(selected);
        let input = Self::resolve_input(raw_data, raw_target, wants_target)?;
        self.builder.build(selected, input)
    }

    /// Parse the data field and, when `wants_target`, the target field
    pub fn resolve_input(
        raw_data: &str,
        raw_target: &str,
        wants_target: bool,
    ) -> Result<ResolvedInput, ValidationError> {
        let data = parse_data(raw_data)?;
        let target = if wants_target { parse_target(raw_target)? } else { None };
        debug!(
            "Resolved input: {} elements, target {:?}",
            data.len(),
            target
        );
        Ok(ResolvedInput { data, target })
    }

    /// Size from the size field, or the configured default when it is not a
    /// positive integer
    pub fn parse_size(&self, raw_size: &str) -> usize {
        match raw_size.trim().parse::<usize>() {
            Ok(size) if size > 0 => size,
            _ => self.default_generate_size,
        }
    }

    /// Ask the service for generated data and return it as the JSON text to
    /// place into the data field
    pub async fn generate(
        &self,
        backend: &dyn Backend,
        kind: GenerationKind,
        raw_size: &str,
    ) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            kind,
            size: self.parse_size(raw_size),
        };
        debug!("Generating {} data of size {}", request.kind, request.size);
        let data = backend.generate(&request).await?;
        Ok(serde_json::to_string(&data)?)
    }
}

fn parse_data(raw: &str) -> Result<Vec<Value>, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::NoData);
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => Ok(items),
        _ => Err(ValidationError::InvalidDataFormat),
    }
}

/// A single numeric parse: integers stay integers on the wire, anything that
/// is not a JSON number is rejected
fn parse_target(raw: &str) -> Result<Option<Number>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Number(number)) => Ok(Some(number)),
        _ => Err(ValidationError::InvalidTarget(raw.to_string())),
    }
}
