//! Transport abstraction for reaching the game-side HTTP API
//!
//! Anything implementing [`RemoteClient`] must keep three outcomes apart:
//! - a response was received (any status code) -> `Ok(RemoteResponse)`
//! - nothing is listening -> `Err(GmError::Unreachable)`
//! - the call did not finish in time -> `Err(GmError::Timeout)`

use async_trait::async_trait;
use rimworld_gm_core::Result;
use serde_json::Value;

/// HTTP verbs used by the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Status code and decoded JSON body of a remote reply
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResponse {
    pub status: u16,
    pub body: Value,
}

impl RemoteResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for issuing a single request against the remote API
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Perform one request. Non-2xx replies are returned, not raised.
    async fn perform(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<RemoteResponse>;

    async fn get(&self, path: &str) -> Result<RemoteResponse> {
        self.perform(HttpMethod::Get, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<RemoteResponse> {
        self.perform(HttpMethod::Post, path, Some(body)).await
    }
}
