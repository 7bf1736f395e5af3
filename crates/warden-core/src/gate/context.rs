// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-request state carried through the gate.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::gate::collaborators::role_matches;
use crate::policy::Decision;

// =============================================================================
// Principal
// =============================================================================

/// How a principal proved its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// A validated bearer token.
    BearerToken,
    /// An external OAuth login flow.
    OAuth,
}

/// An authenticated identity attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    /// Subject from the token or the OAuth flow.
    pub subject: String,
    /// Roles granted by the role resolver.
    pub roles: Vec<String>,
    /// How the identity was established.
    pub method: AuthMethod,
}

impl Principal {
    /// Creates a principal with no roles.
    pub fn new(subject: impl Into<String>, method: AuthMethod) -> Self {
        Self {
            subject: subject.into(),
            roles: Vec::new(),
            method,
        }
    }

    /// Sets the granted roles.
    pub fn with_roles(mut self, roles: Vec<String>) -> Self {
        self.roles = roles;
        self
    }

    /// Returns `true` if any granted role satisfies `required`.
    pub fn has_role(&self, required: &str) -> bool {
        self.roles.iter().any(|granted| role_matches(granted, required))
    }
}

// =============================================================================
// Verdict
// =============================================================================

/// Why a request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DenyReason {
    /// No `Authorization` header was presented.
    #[error("No authorization token provided")]
    MissingCredential,
    /// The header is present but is not `Bearer <token>`.
    #[error("Token must start with 'Bearer '")]
    MalformedCredential,
    /// The token did not verify, has expired, or names another subject.
    #[error("Token is invalid or expired")]
    InvalidCredential,
    /// The principal lacks the role the path requires.
    #[error("Role '{required}' is required")]
    InsufficientRole {
        /// The missing role.
        required: String,
    },
    /// Token validation is enabled but no validation filter is installed.
    #[error("Token validation is unavailable")]
    ValidationUnavailable,
    /// The CSRF guard refused a state-changing request.
    #[error("CSRF token is missing or invalid")]
    CsrfRejected,
    /// The request must go through a login flow first.
    #[error("Login required")]
    LoginRequired {
        /// Where the client should go to log in.
        location: String,
    },
}

impl DenyReason {
    /// Stable short name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::MalformedCredential => "malformed_credential",
            Self::InvalidCredential => "invalid_credential",
            Self::InsufficientRole { .. } => "insufficient_role",
            Self::ValidationUnavailable => "validation_unavailable",
            Self::CsrfRejected => "csrf_rejected",
            Self::LoginRequired { .. } => "login_required",
        }
    }

    /// Returns `true` when the caller is known but not allowed.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::InsufficientRole { .. } | Self::CsrfRejected)
    }
}

/// Final outcome of evaluating a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Request may proceed, with the principal when one was resolved.
    Allowed(Option<Principal>),
    /// Request is refused.
    Denied(DenyReason),
}

impl Verdict {
    /// Returns `true` if the request may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }

    /// The deny reason, if refused.
    pub fn deny_reason(&self) -> Option<&DenyReason> {
        match self {
            Self::Denied(reason) => Some(reason),
            Self::Allowed(_) => None,
        }
    }
}

/// Lifecycle of a request inside the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    /// Not yet looked at.
    Received,
    /// Path classified, credential not yet checked.
    Classified,
    /// Terminal: allowed.
    Allowed,
    /// Terminal: denied.
    Denied(DenyReason),
}

impl RequestState {
    /// Returns `true` for `Allowed` and `Denied`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Allowed | Self::Denied(_))
    }
}

// =============================================================================
// RequestContext
// =============================================================================

/// What the gate knows about one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    method: String,
    path: String,
    authorization: Option<String>,
    csrf_token: Option<String>,
    state: RequestState,
    decision: Option<Decision>,
    principal: Option<Principal>,
}

impl RequestContext {
    /// Creates a context for `method path` in the `Received` state.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            method: method.into(),
            path: path.into(),
            authorization: None,
            csrf_token: None,
            state: RequestState::Received,
            decision: None,
            principal: None,
        }
    }

    /// Sets the raw `Authorization` header value.
    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }

    /// Sets the CSRF token presented with the request.
    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Overrides the generated request id.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Request id.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// HTTP method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw `Authorization` header value.
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    /// CSRF token, if presented.
    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Classification, once made.
    pub fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    /// Principal, once allowed with an identity.
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Consumes the context, returning the principal.
    pub fn into_principal(self) -> Option<Principal> {
        self.principal
    }

    /// Returns `true` for methods that change server state.
    pub fn is_state_changing(&self) -> bool {
        !matches!(
            self.method.to_ascii_uppercase().as_str(),
            "GET" | "HEAD" | "OPTIONS" | "TRACE"
        )
    }

    pub(crate) fn mark_classified(&mut self, decision: Decision) {
        self.decision = Some(decision);
        self.state = RequestState::Classified;
    }

    pub(crate) fn allow(&mut self, principal: Option<Principal>) -> Verdict {
        self.principal = principal.clone();
        self.state = RequestState::Allowed;
        Verdict::Allowed(principal)
    }

    pub(crate) fn deny(&mut self, reason: DenyReason) -> Verdict {
        self.principal = None;
        self.state = RequestState::Denied(reason.clone());
        Verdict::Denied(reason)
    }
}

// =============================================================================
// Tests
// =============================================================================
