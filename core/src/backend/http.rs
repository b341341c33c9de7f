//! `reqwest` implementation of the service contract
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use super::envelope;
use super::Backend;
use crate::algorithm::AlgorithmDescriptor;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::execution::{ExecutionRequest, GenerateRequest, HistoryEntry};

/// Service client over HTTP/JSON
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send and decode the JSON body.
    ///
    /// The service reports refusals with 4xx/5xx statuses and a regular
    /// envelope, so the body is decoded whatever the status; only a body that
    /// is not JSON turns a bad status into a transport error.
    async fn send(&self, request: RequestBuilder) -> Result<Value, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(body) => {
                if !status.is_success() {
                    debug!("Service answered HTTP {} with an envelope", status);
                }
                Ok(body)
            }
            Err(err) if status.is_success() => Err(err.into()),
            Err(_) => {
                let text = String::from_utf8_lossy(&bytes);
                warn!("Service answered HTTP {} without a JSON body", status);
                Err(ClientError::Transport(format!("HTTP {}: {}", status, text.trim())))
            }
        }
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_algorithms(&self) -> Result<Vec<AlgorithmDescriptor>, ClientError> {
        let url = self.config.endpoint("algorithms");
        let body = self.send(self.client.get(&url)).await?;
        envelope::parse_catalog(body)
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<Vec<Value>, ClientError> {
        let url = self.config.endpoint("generate");
        let body = self.send(self.client.post(&url).json(request)).await?;
        envelope::parse_generated(body)
    }

    async fn execute(&self, request: &ExecutionRequest) -> Result<Value, ClientError> {
        let url = self.config.endpoint(request.endpoint());
        debug!("POST {} with {} algorithm(s)", url, request.algorithms().len());
        self.send(self.client.post(&url).json(&request.payload())).await
    }

    async fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>, ClientError> {
        let url = self.config.endpoint("history");
        let request = self.client.get(&url).query(&[("limit", limit)]);
        let body = self.send(request).await?;
        envelope::parse_history(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::{ExecutionRequestBuilder, GenerationKind, ResolvedInput, RunMode};
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned response and hand back the raw request that was received
    async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&chunk[..n]);
                if request_complete(&received) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&received).into_owned()
        });
        (base_url, handle)
    }

    fn request_complete(received: &[u8]) -> bool {
        let text = String::from_utf8_lossy(received);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        received.len() >= header_end + 4 + content_length
    }

    fn backend(base_url: String) -> HttpBackend {
        HttpBackend::new(ClientConfig {
            base_url,
            timeout_secs: 5,
            ..Default::default()
        })
        .unwrap()
    }

    fn request_body(raw: &str) -> Value {
        let (_, body) = raw.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[tokio::test]
    async fn compare_posts_plural_payload() {
        let reply = json!({"success": true, "results": {}}).to_string();
        let (base_url, server) = serve_once("200 OK", reply).await;

        let request = ExecutionRequestBuilder::new(RunMode::Comparison)
            .build(
                &["bubble_sort".into(), "binary_search".into()],
                ResolvedInput { data: vec![json!(3), json!(1)], target: Some(1.into()) },
            )
            .unwrap();
        let body = backend(base_url).execute(&request).await.unwrap();
        assert_eq!(body, json!({"success": true, "results": {}}));

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/compare "));
        assert_eq!(
            request_body(&raw),
            json!({"algorithms": ["bubble_sort", "binary_search"], "data": [3, 1], "target": 1})
        );
    }

    #[tokio::test]
    async fn error_status_with_envelope_is_a_backend_refusal() {
        let reply = json!({"success": false, "error": "size must be between 1 and 100000"}).to_string();
        let (base_url, server) = serve_once("400 Bad Request", reply).await;

        let err = backend(base_url)
            .generate(&GenerateRequest { kind: GenerationKind::Random, size: 0 })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Backend(ref m) if m.starts_with("size must be")));

        let raw = server.await.unwrap();
        assert_eq!(request_body(&raw), json!({"type": "random", "size": 0}));
    }

    #[tokio::test]
    async fn error_status_without_json_is_transport() {
        let (base_url, server) = serve_once("502 Bad Gateway", "upstream down".to_string()).await;
        let err = backend(base_url).list_algorithms().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(ref m) if m.contains("502")));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn history_sends_limit_query() {
        let reply = json!({"success": true, "history": []}).to_string();
        let (base_url, server) = serve_once("200 OK", reply).await;
        let history = backend(base_url).history(3).await.unwrap();
        assert!(history.is_empty());
        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /api/history?limit=3 "));
    }

    #[tokio::test]
    async fn unreachable_service_is_transport() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);
        let err = backend(base_url).list_algorithms().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
