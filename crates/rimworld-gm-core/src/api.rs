//! Error envelope shared by every remote route

use serde::{Deserialize, Serialize};

use crate::error::ApiErrorCode;

/// `{success:false, error, message}` returned with every non-2xx status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ApiErrorCode,
    pub message: String,
}

impl ApiErrorResponse {
    pub fn new(error: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error,
            message: message.into(),
        }
    }

    /// Try to read an error envelope out of an arbitrary response body
    pub fn from_body(body: &serde_json::Value) -> Option<Self> {
        if body.get("success").and_then(|s| s.as_bool()) != Some(false) {
            return None;
        }
        serde_json::from_value(body.clone()).ok()
    }

    /// HTTP status paired with this error
    pub fn status(&self) -> u16 {
        self.error.status()
    }
}
