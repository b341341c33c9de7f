//! Scripted in-memory backend for tests
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::Backend;
use crate::algorithm::AlgorithmDescriptor;
use crate::error::ClientError;
use crate::execution::{ExecutionRequest, GenerateRequest, HistoryEntry};

/// A scripted reply to one `execute` call
#[derive(Debug, Clone)]
pub struct ScriptedReply {
    pub delay: Duration,
    pub body: Result<Value, String>,
}

/// Backend answering from canned data and recording every request it sees
#[derive(Debug, Default)]
pub struct MockBackend {
    catalog: Option<Result<Vec<AlgorithmDescriptor>, String>>,
    catalog_outages: Mutex<VecDeque<String>>,
    generated: Option<Result<Vec<Value>, String>>,
    generate_delay: Duration,
    history: Option<Result<Vec<HistoryEntry>, String>>,
    replies: Mutex<VecDeque<ScriptedReply>>,
    executed: Mutex<Vec<ExecutionRequest>>,
    generate_requests: Mutex<Vec<GenerateRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, descriptors: Vec<AlgorithmDescriptor>) -> Self {
        self.catalog = Some(Ok(descriptors));
        self
    }

    /// Catalog requests are refused with `message`
    pub fn failing_catalog(mut self, message: &str) -> Self {
        self.catalog = Some(Err(message.to_string()));
        self
    }

    /// The next catalog request is refused with `message`; later ones are
    /// answered as configured
    pub fn catalog_outage(self, message: &str) -> Self {
        self.catalog_outages.lock().unwrap().push_back(message.to_string());
        self
    }

    pub fn with_generated(mut self, data: Vec<Value>) -> Self {
        self.generated = Some(Ok(data));
        self
    }

    /// Delay every `generate` reply by `delay`
    pub fn generate_after(mut self, delay: Duration) -> Self {
        self.generate_delay = delay;
        self
    }

    pub fn failing_generate(mut self, message: &str) -> Self {
        self.generated = Some(Err(message.to_string()));
        self
    }

    pub fn with_history(mut self, history: Vec<HistoryEntry>) -> Self {
        self.history = Some(Ok(history));
        self
    }

    /// Queue a response envelope for the next `execute` call
    pub fn reply(self, body: Value) -> Self {
        self.reply_after(Duration::ZERO, body)
    }

    /// Queue a response envelope delivered after `delay`
    pub fn reply_after(self, delay: Duration, body: Value) -> Self {
        self.push(ScriptedReply { delay, body: Ok(body) })
    }

    /// Queue a transport failure for the next `execute` call
    pub fn reply_unreachable(self, message: &str) -> Self {
        self.push(ScriptedReply {
            delay: Duration::ZERO,
            body: Err(message.to_string()),
        })
    }

    fn push(self, reply: ScriptedReply) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    /// Requests passed to `execute`, in call order
    pub fn executed(&self) -> Vec<ExecutionRequest> {
        self.executed.lock().unwrap().clone()
    }

    pub fn generate_requests(&self) -> Vec<GenerateRequest> {
        self.generate_requests.lock().unwrap().clone()
    }
}

fn unreachable() -> ClientError {
    ClientError::Transport("connection refused".into())
}

#[async_trait]
impl Backend for MockBackend {
    async fn list_algorithms(&self) -> Result<Vec<AlgorithmDescriptor>, ClientError> {
        let outage = self.catalog_outages.lock().unwrap().pop_front();
        if let Some(message) = outage {
            return Err(ClientError::Backend(message));
        }
        match &self.catalog {
            Some(Ok(descriptors)) => Ok(descriptors.clone()),
            Some(Err(message)) => Err(ClientError::Backend(message.clone())),
            None => Err(unreachable()),
        }
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<Vec<Value>, ClientError> {
        self.generate_requests.lock().unwrap().push(request.clone());
        if !self.generate_delay.is_zero() {
            tokio::time::sleep(self.generate_delay).await;
        }
        match &self.generated {
            Some(Ok(data)) => Ok(data.clone()),
            Some(Err(message)) => Err(ClientError::Backend(message.clone())),
            None => Err(unreachable()),
        }
    }

    async fn execute(&self, request: &ExecutionRequest) -> Result<Value, ClientError> {
        self.executed.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        let Some(reply) = reply else {
            return Err(unreachable());
        };
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.body.map_err(ClientError::Transport)
    }

    async fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>, ClientError> {
        match &self.history {
            Some(Ok(history)) => {
                let skip = history.len().saturating_sub(limit);
                Ok(history[skip..].to_vec())
            }
            Some(Err(message)) => Err(ClientError::Backend(message.clone())),
            None => Err(unreachable()),
        }
    }
}
