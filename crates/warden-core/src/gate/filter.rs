// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token validation filter.

use std::sync::Arc;

use thiserror::Error;
use tracing::trace;

use crate::gate::context::RequestContext;
use crate::token::TokenService;

/// Scheme prefix of the `Authorization` header, including the space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Why an `Authorization` header could not yield a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BearerError {
    /// The value does not start with `Bearer `.
    #[error("Token must start with 'Bearer '")]
    MissingPrefix,
    /// Nothing follows the prefix.
    #[error("Bearer token is empty")]
    Empty,
}

/// Strips the 7-character `Bearer ` prefix from a header value.
pub fn extract_bearer(header_value: &str) -> Result<&str, BearerError> {
    let token = header_value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(BearerError::MissingPrefix)?;
    if token.is_empty() {
        return Err(BearerError::Empty);
    }
    Ok(token)
}

// =============================================================================
// CredentialFilter
// =============================================================================

/// Result of running a credential filter over a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// The credential verified.
    Authenticated {
        /// Subject named by the credential.
        subject: String,
    },
    /// No credential was presented.
    Missing,
    /// A credential was presented in the wrong shape.
    Malformed(BearerError),
    /// The credential failed verification.
    Invalid,
}

/// The token-validation stage of the gate.
pub trait CredentialFilter: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Inspects the request credential.
    fn authenticate(&self, ctx: &RequestContext) -> FilterOutcome;
}

/// Default filter: validates `Authorization: Bearer <token>` with a
/// [`TokenService`].
#[derive(Debug, Clone)]
pub struct BearerTokenFilter {
    tokens: Arc<TokenService>,
}

impl BearerTokenFilter {
    /// Creates a filter over the shared token service.
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl CredentialFilter for BearerTokenFilter {
    fn name(&self) -> &str {
        "bearer-token"
    }

    fn authenticate(&self, ctx: &RequestContext) -> FilterOutcome {
        let Some(header) = ctx.authorization() else {
            return FilterOutcome::Missing;
        };

        let token = match extract_bearer(header) {
            Ok(token) => token,
            Err(e) => return FilterOutcome::Malformed(e),
        };

        let subject = match self.tokens.parse_subject(token) {
            Ok(Some(subject)) => subject,
            _ => return FilterOutcome::Invalid,
        };

        match self.tokens.validate(token, &subject) {
            Ok(true) => FilterOutcome::Authenticated { subject },
            _ => {
                trace!(request_id = %ctx.request_id(), "Bearer token failed validation");
                FilterOutcome::Invalid
            }
        }
    }
}
