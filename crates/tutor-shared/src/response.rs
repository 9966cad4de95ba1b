//! Error body shared by every failing response.

use serde::{Deserialize, Serialize};

/// Error body returned by every failing request.
///
/// `{"error": "<message>", "code": <status>}`, with an optional `detail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A short, human-readable message.
    pub error: String,

    /// Mirrors the HTTP status code.
    pub code: u16,

    /// Additional context for this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: u16, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    // Common error constructors
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad request").with_detail(detail)
    }

    pub fn unauthorized() -> Self {
        Self::new(401, "Unauthorized")
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not found").with_detail(detail)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal server error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_shape() {
        let body = serde_json::to_value(ErrorResponse::new(403, "blocked")).unwrap();
        assert_eq!(body, serde_json::json!({"error": "blocked", "code": 403}));

        let body = serde_json::to_value(ErrorResponse::bad_request("empty entry")).unwrap();
        assert_eq!(body["detail"], "empty entry");
        assert_eq!(body["code"], 400);
    }
}
