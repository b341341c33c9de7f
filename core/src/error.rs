//! Error taxonomy for the algoscope client
//!
//! Failures fall into four groups: input that never leaves the client
//! (`ValidationError`), failures to reach or decode the service
//! (`ClientError::Transport`), explicit refusals by the service
//! (`ClientError::Backend`) and responses that parse but do not have the
//! expected shape (`ClientError::MalformedResponse`). A comparison in which
//! only some algorithms failed is not an error at all; see
//! [`crate::execution::reconcile::PartialFailure`].
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use thiserror::Error;

use crate::algorithm::AlgorithmKey;

/// Problems with user-supplied input, detected before any request is built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no data provided")]
    NoData,

    #[error("invalid data format: data must be a JSON array")]
    InvalidDataFormat,

    #[error("invalid target value: {0:?} is not a number")]
    InvalidTarget(String),

    #[error("no algorithm selected")]
    NoAlgorithmSelected,

    #[error("single-run mode takes exactly one algorithm, got {0}")]
    TooManyAlgorithms(usize),

    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(AlgorithmKey),

    #[error("the algorithm catalog has not been loaded")]
    CatalogNotLoaded,
}

/// Errors surfaced by any operation that talks to the execution service
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not reach the algorithm service: {0}")]
    Transport(String),

    #[error("{0}")]
    Backend(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Transport(format!("undecodable response body: {}", err))
    }
}

impl ClientError {
    /// Whether the failure happened before anything was sent
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

/// Failure to load the algorithm catalog
pub type FetchError = ClientError;

/// Failure to generate input data through the service
pub type GenerationError = ClientError;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_match_user_facing_wording() {
        assert_eq!(ValidationError::NoData.to_string(), "no data provided");
        assert!(ValidationError::InvalidDataFormat
            .to_string()
            .starts_with("invalid data format"));
    }

    #[test]
    fn backend_error_displays_message_verbatim() {
        let err = ClientError::Backend("algorithm 'x' not found".into());
        assert_eq!(err.to_string(), "algorithm 'x' not found");
        assert!(!err.is_validation());
    }

    #[test]
    fn validation_converts_into_client_error() {
        let err: ClientError = ValidationError::NoAlgorithmSelected.into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "no algorithm selected");
    }
}
