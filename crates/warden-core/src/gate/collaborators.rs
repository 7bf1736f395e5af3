// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Extension points the gate calls into.
//!
//! Role lookup, CSRF checking and OAuth login live outside this crate. The
//! host wires implementations into the gate builder.

use std::collections::HashMap;

use crate::error::CoreResult;
use crate::gate::context::RequestContext;

const ROLE_PREFIX: &str = "ROLE_";

/// Compares role names, ignoring a `ROLE_` prefix on either side.
pub fn role_matches(granted: &str, required: &str) -> bool {
    let granted = granted.strip_prefix(ROLE_PREFIX).unwrap_or(granted);
    let required = required.strip_prefix(ROLE_PREFIX).unwrap_or(required);
    granted == required
}

// =============================================================================
// RoleResolver
// =============================================================================

/// Looks up the roles of an authenticated subject.
pub trait RoleResolver: Send + Sync {
    /// Roles granted to `subject`. Unknown subjects have none.
    fn roles_for(&self, subject: &str) -> Vec<String>;
}

/// Resolver that grants no roles.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRoles;

impl RoleResolver for NoRoles {
    fn roles_for(&self, _subject: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Resolver backed by a fixed subject → roles table.
#[derive(Debug, Clone, Default)]
pub struct StaticRoleResolver {
    roles: HashMap<String, Vec<String>>,
}

impl StaticRoleResolver {
    /// Creates a resolver from a table.
    pub fn new(roles: HashMap<String, Vec<String>>) -> Self {
        Self { roles }
    }

    /// Grants roles to a subject.
    pub fn with_roles<I, R>(mut self, subject: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        self.roles
            .insert(subject.into(), roles.into_iter().map(Into::into).collect());
        self
    }

    /// Number of subjects with roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Returns `true` if no subject has roles.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl RoleResolver for StaticRoleResolver {
    fn roles_for(&self, subject: &str) -> Vec<String> {
        self.roles.get(subject).cloned().unwrap_or_default()
    }
}

// =============================================================================
// CsrfGuard
// =============================================================================

/// Checks the CSRF token of a state-changing request.
pub trait CsrfGuard: Send + Sync {
    /// Returns `true` if the request carries an acceptable CSRF token.
    fn verify(&self, ctx: &RequestContext) -> bool;
}

// =============================================================================
// OAuthLoginFlow
// =============================================================================

/// Result of handing a request to the OAuth login flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OAuthHandoff {
    /// The flow recognized an authenticated subject.
    Authenticated {
        /// Subject established by the flow.
        subject: String,
    },
    /// The client must be sent to the provider.
    Redirect {
        /// Authorization endpoint to redirect to.
        location: String,
    },
    /// The flow has nothing to say about this request.
    Declined,
}

/// External OAuth login flow.
pub trait OAuthLoginFlow: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str {
        "oauth"
    }

    /// Called once when the gate is built. An error disables OAuth.
    fn initialize(&self) -> CoreResult<()>;

    /// Called for protected requests that carry no bearer credential.
    fn handoff(&self, ctx: &RequestContext) -> CoreResult<OAuthHandoff>;
}
