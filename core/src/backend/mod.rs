//! Access to the algorithm-execution service
//!
//! The service is only known through its HTTP/JSON contract. [`Backend`] is
//! the seam the rest of the client talks to; [`HttpBackend`] implements it
//! with `reqwest`, and tests substitute their own implementations.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod envelope;
mod http;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use self::http::HttpBackend;

use async_trait::async_trait;
use serde_json::Value;

use crate::algorithm::AlgorithmDescriptor;
use crate::error::ClientError;
use crate::execution::{ExecutionRequest, GenerateRequest, HistoryEntry};

/// Operations offered by the execution service
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /api/algorithms`, in the order the service lists them
    async fn list_algorithms(&self) -> Result<Vec<AlgorithmDescriptor>, ClientError>;

    /// `POST /api/generate`
    async fn generate(&self, request: &GenerateRequest) -> Result<Vec<Value>, ClientError>;

    /// `POST /api/run` or `POST /api/compare` depending on the request mode.
    ///
    /// Returns the raw response envelope; interpreting it is the job of
    /// [`crate::execution::ResultReconciler`].
    async fn execute(&self, request: &ExecutionRequest) -> Result<Value, ClientError>;

    /// `GET /api/history?limit=N`
    async fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>, ClientError>;
}
