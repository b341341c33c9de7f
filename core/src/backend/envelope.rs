//! The `{ success, ... }` envelope wrapped around every service response
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::algorithm::{AlgorithmDescriptor, AlgorithmKey};
use crate::error::ClientError;
use crate::execution::HistoryEntry;

/// Which operation a response belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Catalog,
    Generate,
    Run,
    Compare,
    History,
}

impl ResponseKind {
    /// Message used when the service refuses without saying why
    pub fn default_error(self) -> &'static str {
        match self {
            ResponseKind::Catalog => "error loading available algorithms",
            ResponseKind::Generate => "error generating data",
            ResponseKind::Run => "error running algorithm",
            ResponseKind::Compare => "error comparing algorithms",
            ResponseKind::History => "error loading execution history",
        }
    }
}

/// Check the envelope and return the remaining fields of a successful response
pub fn open(raw: Value, kind: ResponseKind) -> Result<Map<String, Value>, ClientError> {
    let Value::Object(mut body) = raw else {
        return Err(ClientError::MalformedResponse("response is not a JSON object".into()));
    };
    match body.remove("success") {
        Some(Value::Bool(true)) => Ok(body),
        Some(Value::Bool(false)) => {
            let message = match body.remove("error") {
                Some(Value::String(message)) if !message.trim().is_empty() => message,
                _ => kind.default_error().to_string(),
            };
            Err(ClientError::Backend(message))
        }
        _ => Err(ClientError::MalformedResponse("response has no success flag".into())),
    }
}

#[derive(Debug, Deserialize)]
struct WireDescriptor {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    requires_target: Option<bool>,
}

/// `{ success, algorithms: { key: {name, description} } }`
pub fn parse_catalog(raw: Value) -> Result<Vec<AlgorithmDescriptor>, ClientError> {
    let mut body = open(raw, ResponseKind::Catalog)?;
    let Some(Value::Object(algorithms)) = body.remove("algorithms") else {
        return Err(ClientError::MalformedResponse("response has no algorithms mapping".into()));
    };
    algorithms
        .into_iter()
        .map(|(key, entry)| {
            let wire: WireDescriptor = serde_json::from_value(entry).map_err(|e| {
                ClientError::MalformedResponse(format!("invalid descriptor for {}: {}", key, e))
            })?;
            Ok(AlgorithmDescriptor::new(
                AlgorithmKey::from(key),
                wire.name,
                wire.description,
                wire.requires_target,
            ))
        })
        .collect()
}

/// `{ success, data: [...] }`
pub fn parse_generated(raw: Value) -> Result<Vec<Value>, ClientError> {
    let mut body = open(raw, ResponseKind::Generate)?;
    match body.remove("data") {
        Some(Value::Array(data)) => Ok(data),
        _ => Err(ClientError::MalformedResponse("response has no data array".into())),
    }
}

/// `{ success, history: [...] }`
pub fn parse_history(raw: Value) -> Result<Vec<HistoryEntry>, ClientError> {
    let mut body = open(raw, ResponseKind::History)?;
    let history = body
        .remove("history")
        .ok_or_else(|| ClientError::MalformedResponse("response has no history".into()))?;
    serde_json::from_value(history)
        .map_err(|e| ClientError::MalformedResponse(format!("invalid history: {}", e)))
}
