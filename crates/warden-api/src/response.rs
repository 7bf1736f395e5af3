// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Response bodies for the token endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Token Issuance
// =============================================================================

/// Body returned by `GET /get-token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Signed compact token.
    pub token: String,
    /// Human-readable lifetime, e.g. `"5 minutes"`.
    pub expires_in: String,
    /// Subject the token was issued for.
    pub username: String,
}

impl TokenResponse {
    /// Creates a response for a token valid for `minutes`.
    pub fn new(token: String, minutes: i64, username: String) -> Self {
        Self {
            token,
            expires_in: format!("{} minutes", minutes),
            username,
        }
    }
}

// =============================================================================
// Token Validation
// =============================================================================

/// Body returned by `GET /validate-token`.
///
/// Serves with 200 when valid and 400 otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenValidationResponse {
    /// Whether the token verified.
    pub valid: bool,
    /// Subject of a valid token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Outcome message.
    pub message: String,
}

impl TokenValidationResponse {
    /// A successful validation.
    pub fn valid(username: String) -> Self {
        Self {
            valid: true,
            username: Some(username),
            message: "Token is valid".to_string(),
        }
    }

    /// A failed validation.
    pub fn invalid() -> Self {
        Self {
            valid: false,
            username: None,
            message: "Token is invalid or expired".to_string(),
        }
    }
}

impl IntoResponse for TokenValidationResponse {
    fn into_response(self) -> Response {
        let status = if self.valid {
            StatusCode::OK
        } else {
            StatusCode::BAD_REQUEST
        };
        (status, Json(self)).into_response()
    }
}

// =============================================================================
// Username Extraction
// =============================================================================

/// Body returned by `GET /extract-username`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsernameResponse {
    /// Subject read from the token.
    pub username: String,
    /// The token that was inspected.
    pub token: String,
}

// =============================================================================
// Token Endpoint Errors
// =============================================================================

/// Flat `{"error", "message"}` body the token endpoints answer with on bad
/// input. Always served with 400.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenErrorBody {
    /// Short error title.
    pub error: String,
    /// Detail message.
    pub message: String,
}

impl TokenErrorBody {
    /// Creates an error body.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for TokenErrorBody {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_shape() {
        let body = serde_json::to_value(TokenResponse::new("t".into(), 5, "yash".into())).unwrap();
        assert_eq!(body["expiresIn"], "5 minutes");
        assert_eq!(body["username"], "yash");
    }

    #[test]
    fn test_validation_status() {
        assert_eq!(TokenValidationResponse::valid("yash".into()).into_response().status(), StatusCode::OK);
        assert_eq!(TokenValidationResponse::invalid().into_response().status(), StatusCode::BAD_REQUEST);

        let body = serde_json::to_value(TokenValidationResponse::invalid()).unwrap();
        assert!(body.get("username").is_none());
    }
}
