//! Execution pipeline: input resolution, request building and reconciliation
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod history;
pub mod input;
pub mod metrics;
pub mod reconcile;
pub mod request;
pub mod sequence;

pub use self::history::HistoryEntry;
pub use self::input::{GenerateRequest, GenerationKind, InputResolver};
pub use self::metrics::{format_metric, ExecutionOutcome, Metrics};
pub use self::reconcile::{ComparisonEntry, ComparisonView, PartialFailure, Reconciled, ResultReconciler};
pub use self::request::{ExecutionRequest, ExecutionRequestBuilder, ResolvedInput, RunMode, WirePayload};
pub use self::sequence::{RequestSequencer, RequestToken, TriggerPoint};
