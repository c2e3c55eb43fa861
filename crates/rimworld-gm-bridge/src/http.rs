//! HTTP transport implementation on reqwest

use crate::config::RemoteConfig;
use crate::transport::{HttpMethod, RemoteClient, RemoteResponse};
use async_trait::async_trait;
use rimworld_gm_core::{GmError, Result};
use serde_json::Value;
use tracing::debug;

/// Remote client backed by a pooled reqwest client
#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    http: reqwest::Client,
    config: RemoteConfig,
}

impl HttpRemoteClient {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .no_proxy()
            .build()
            .map_err(|e| GmError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> GmError {
        // A connect timeout reports both flags; it belongs with timeouts.
        if err.is_timeout() {
            GmError::Timeout {
                after: self.config.timeout,
            }
        } else if err.is_connect() {
            GmError::Unreachable {
                endpoint: url.to_string(),
                reason: err.to_string(),
            }
        } else {
            GmError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn perform(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<RemoteResponse> {
        let url = self.config.url(path);

        let mut request = match method {
            HttpMethod::Get => self.http.get(&url),
            HttpMethod::Post => self.http.post(&url),
        };
        if let Some(body) = &body {
            request = request.json(body);
        }

        debug!("[Rust→Game] {} {} body={:?}", method.as_str(), url, body);

        let response = request.send().await.map_err(|e| self.classify(&url, e))?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| self.classify(&url, e))?;

        let preview: String = String::from_utf8_lossy(&bytes).chars().take(200).collect();
        debug!("[Game→Rust] status={} len={} json={}", status, bytes.len(), preview);

        Ok(RemoteResponse {
            status,
            body: decode_body(&bytes)?,
        })
    }
}

/// Decode a JSON reply; an empty body reads as `{}`
pub fn decode_body(bytes: &[u8]) -> Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rimworld_gm_core::ErrorCategory;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Accept one connection, read the request head, reply with `raw`
    async fn respond_once(raw: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(raw.as_bytes()).await;
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    fn client(base_url: String, timeout: Duration) -> HttpRemoteClient {
        HttpRemoteClient::new(RemoteConfig { base_url, timeout }).unwrap()
    }

    #[test]
    fn test_decode_empty_body() {
        assert_eq!(decode_body(b"").unwrap(), serde_json::json!({}));
        assert_eq!(decode_body(b"  \n").unwrap(), serde_json::json!({}));
        assert!(matches!(
            decode_body(b"<html>"),
            Err(GmError::SerializationError(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_is_distinct() {
        // Grab a free port, then release it so nothing is listening there
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let client = client(format!("http://127.0.0.1:{}", port), Duration::from_secs(2));
        let err = client.get("/state").await.unwrap_err();

        assert!(matches!(err, GmError::Unreachable { .. }), "got {:?}", err);
        assert_eq!(err.category(), ErrorCategory::ConnectionUnavailable);
    }

    #[tokio::test]
    async fn test_non_success_status_is_returned() {
        let base = respond_once(
            "HTTP/1.1 409 Conflict\r\nContent-Type: application/json\r\nContent-Length: 71\r\nConnection: close\r\n\r\n{\"success\":false,\"error\":\"NO_COLONY_LOADED\",\"message\":\"colony missing\"}",
        )
        .await;

        let response = client(base, Duration::from_secs(2))
            .get("/state")
            .await
            .unwrap();

        assert_eq!(response.status, 409);
        assert!(!response.is_success());
        assert_eq!(response.body["error"], "NO_COLONY_LOADED");
    }

    #[tokio::test]
    async fn test_malformed_json_is_unexpected() {
        let base = respond_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 6\r\nConnection: close\r\n\r\n<html>",
        )
        .await;

        let err = client(base, Duration::from_secs(2))
            .get("/health")
            .await
            .unwrap_err();

        assert!(matches!(err, GmError::SerializationError(_)));
        assert_eq!(err.category(), ErrorCategory::Unexpected);
    }

    #[tokio::test]
    async fn test_silent_remote_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Hold the connection open without answering
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let err = client(format!("http://{}", addr), Duration::from_millis(200))
            .get("/health")
            .await
            .unwrap_err();

        assert!(matches!(err, GmError::Timeout { .. }), "got {:?}", err);
        assert_eq!(err.to_string(), "request timed out after 200ms");
    }
}
