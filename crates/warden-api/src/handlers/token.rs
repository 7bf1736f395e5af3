// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token endpoints: issuance, validation, and subject extraction.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    Json,
};
use serde::Deserialize;
use tracing::{debug, info};
use warden_core::extract_bearer;

use crate::error::ApiResult;
use crate::response::{TokenErrorBody, TokenResponse, TokenValidationResponse, UsernameResponse};
use crate::state::AppState;

// =============================================================================
// Issuance
// =============================================================================

/// Query parameters for `GET /get-token`.
#[derive(Debug, Default, Deserialize)]
pub struct GetTokenParams {
    /// Token lifetime in minutes.
    #[serde(rename = "expirationMinutes")]
    pub expiration_minutes: Option<i64>,
    /// Subject to issue the token for.
    pub username: Option<String>,
}

/// GET /get-token
///
/// Issues a token. A non-positive lifetime or blank username yields 400.
pub async fn get_token(
    State(state): State<AppState>,
    Query(params): Query<GetTokenParams>,
) -> ApiResult<Json<TokenResponse>> {
    let minutes = params
        .expiration_minutes
        .unwrap_or(state.config.default_expiration_minutes);
    let username = params
        .username
        .unwrap_or_else(|| state.config.default_subject.clone());

    let token = state.tokens.issue(&username, minutes)?;

    info!(username = %username, expiration_minutes = minutes, "Issued token");

    Ok(Json(TokenResponse::new(token, minutes, username)))
}

// =============================================================================
// Validation
// =============================================================================

/// GET /validate-token
///
/// Validates the bearer token against its own subject.
pub async fn validate_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<TokenValidationResponse, TokenErrorBody> {
    let token = bearer_token(&headers)?;

    let valid = match state.tokens.parse_subject(token) {
        Ok(Some(username)) => match state.tokens.validate(token, &username) {
            Ok(true) => Some(username),
            _ => None,
        },
        _ => None,
    };

    Ok(match valid {
        Some(username) => TokenValidationResponse::valid(username),
        None => {
            debug!("Token failed validation");
            TokenValidationResponse::invalid()
        }
    })
}

// =============================================================================
// Extraction
// =============================================================================

/// GET /extract-username
///
/// Returns the subject of a token with a valid signature. Expiry is not
/// checked.
pub async fn extract_username(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UsernameResponse>, TokenErrorBody> {
    let token = bearer_token(&headers)?;

    match state.tokens.parse_subject(token) {
        Ok(Some(username)) => Ok(Json(UsernameResponse {
            username,
            token: token.to_string(),
        })),
        _ => Err(TokenErrorBody::new(
            "Invalid token",
            "Could not extract username from token",
        )),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Reads the bearer token from the `Authorization` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, TokenErrorBody> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| TokenErrorBody::new("Missing token", "Authorization header is required"))?;
    let value = value
        .to_str()
        .map_err(|_| TokenErrorBody::new("Invalid token format", "Authorization header is not valid text"))?;

    extract_bearer(value).map_err(|e| TokenErrorBody::new("Invalid token format", e.to_string()))
}

// =============================================================================
// Tests
// =============================================================================
