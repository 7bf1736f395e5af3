// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Path-based access policy.
//!
//! Three tiers are consulted in a fixed order: permit-all, authenticated-only,
//! then role-gated. Within a tier the first pattern in declaration order wins.
//! Paths that match nothing require authentication.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::config::GateConfig;
use crate::error::{CoreResult, WardenError};

// =============================================================================
// PathPattern
// =============================================================================

/// A compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches one path exactly.
    Exact(String),
    /// Matches every path starting with the prefix (`/api/*`, `/api/**`).
    Prefix(String),
}

impl PathPattern {
    /// Compiles a pattern, normalizing a missing leading `/`.
    ///
    /// Wildcards are only allowed as the final segment.
    pub fn parse(raw: &str) -> CoreResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WardenError::configuration("path pattern must not be empty"));
        }

        let normalized = if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            warn!(pattern = %trimmed, "Path pattern has no leading '/', normalizing");
            format!("/{}", trimmed)
        };

        let (body, wildcard) = match normalized.strip_suffix("**") {
            Some(body) => (body, true),
            None => match normalized.strip_suffix('*') {
                Some(body) => (body, true),
                None => (normalized.as_str(), false),
            },
        };

        if body.contains('*') {
            return Err(WardenError::configuration(format!(
                "wildcard must be the last part of pattern '{}'",
                raw
            )));
        }

        if wildcard {
            Ok(Self::Prefix(body.to_string()))
        } else {
            Ok(Self::Exact(normalized))
        }
    }

    /// Returns `true` if `path` is covered by this pattern.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => path == exact,
            Self::Prefix(prefix) => path.starts_with(prefix.as_str()),
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(exact) => f.write_str(exact),
            Self::Prefix(prefix) => write!(f, "{}*", prefix),
        }
    }
}

// =============================================================================
// Decision
// =============================================================================

/// Outcome of classifying a request path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "role", rename_all = "snake_case")]
pub enum Decision {
    /// Anyone may access the path.
    Permit,
    /// Any authenticated principal may access the path.
    RequireAuthenticated,
    /// Only principals holding the role may access the path.
    RequireRole(String),
}

impl Decision {
    /// Returns `true` unless the path is permitted to everyone.
    pub fn requires_credential(&self) -> bool {
        !matches!(self, Self::Permit)
    }

    /// The role demanded by this decision, if any.
    pub fn required_role(&self) -> Option<&str> {
        match self {
            Self::RequireRole(role) => Some(role),
            _ => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permit => f.write_str("permit"),
            Self::RequireAuthenticated => f.write_str("authenticated"),
            Self::RequireRole(role) => write!(f, "role:{}", role),
        }
    }
}

/// Which tier produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTier {
    /// Permit-all patterns.
    Permit,
    /// Authenticated-only patterns.
    Authenticated,
    /// Role-gated patterns.
    Role,
    /// No pattern matched.
    Fallback,
}

/// A decision together with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// The decision.
    #[serde(flatten)]
    pub decision: Decision,
    /// Tier that matched.
    pub tier: RuleTier,
    /// Matching pattern, absent for the fallback.
    pub pattern: Option<String>,
}

// =============================================================================
// AccessPolicy
// =============================================================================

/// Immutable, ordered access rules.
///
/// Built once at startup and shared read-only across requests.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    permitted: Vec<PathPattern>,
    authenticated: Vec<PathPattern>,
    role_rules: Vec<(PathPattern, String)>,
}

impl AccessPolicy {
    /// Creates a policy builder.
    pub fn builder() -> AccessPolicyBuilder {
        AccessPolicyBuilder::default()
    }

    /// Compiles the rule sections of a gate configuration.
    pub fn from_config(config: &GateConfig) -> CoreResult<Self> {
        let mut builder = Self::builder()
            .permit_all(config.permitted_paths.iter().cloned())
            .authenticate_all(config.authenticated_paths.iter().cloned());
        for rule in config.role_paths.iter() {
            builder = builder.require_role(rule.path.clone(), rule.role.clone());
        }
        builder.build()
    }

    /// Classifies a request path.
    pub fn classify(&self, path: &str) -> Decision {
        self.explain(path).decision
    }

    /// Classifies a request path and reports the matching rule.
    pub fn explain(&self, path: &str) -> Classification {
        if let Some(pattern) = self.permitted.iter().find(|p| p.matches(path)) {
            return Classification {
                decision: Decision::Permit,
                tier: RuleTier::Permit,
                pattern: Some(pattern.to_string()),
            };
        }

        if let Some(pattern) = self.authenticated.iter().find(|p| p.matches(path)) {
            return Classification {
                decision: Decision::RequireAuthenticated,
                tier: RuleTier::Authenticated,
                pattern: Some(pattern.to_string()),
            };
        }

        if let Some((pattern, role)) = self.role_rules.iter().find(|(p, _)| p.matches(path)) {
            return Classification {
                decision: Decision::RequireRole(role.clone()),
                tier: RuleTier::Role,
                pattern: Some(pattern.to_string()),
            };
        }

        Classification {
            decision: Decision::RequireAuthenticated,
            tier: RuleTier::Fallback,
            pattern: None,
        }
    }

    /// Total number of rules across all tiers.
    pub fn rule_count(&self) -> usize {
        self.permitted.len() + self.authenticated.len() + self.role_rules.len()
    }

    /// Permit-all patterns in declaration order.
    pub fn permitted(&self) -> &[PathPattern] {
        &self.permitted
    }
}

// =============================================================================
// AccessPolicyBuilder
// =============================================================================

/// Builder for [`AccessPolicy`].
///
/// Patterns are compiled in [`build`](Self::build) so every error surfaces at
/// startup.
#[derive(Debug, Default)]
pub struct AccessPolicyBuilder {
    permitted: Vec<String>,
    authenticated: Vec<String>,
    role_rules: Vec<(String, String)>,
}

impl AccessPolicyBuilder {
    /// Adds a permit-all pattern.
    pub fn permit(mut self, pattern: impl Into<String>) -> Self {
        self.permitted.push(pattern.into());
        self
    }

    /// Adds several permit-all patterns.
    pub fn permit_all<I, P>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.permitted.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds an authenticated-only pattern.
    pub fn authenticate(mut self, pattern: impl Into<String>) -> Self {
        self.authenticated.push(pattern.into());
        self
    }

    /// Adds several authenticated-only patterns.
    pub fn authenticate_all<I, P>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.authenticated.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds a role-gated pattern. Declaration order is preserved.
    pub fn require_role(mut self, pattern: impl Into<String>, role: impl Into<String>) -> Self {
        self.role_rules.push((pattern.into(), role.into()));
        self
    }

    /// Compiles every pattern.
    pub fn build(self) -> CoreResult<AccessPolicy> {
        let permitted = compile_all(&self.permitted)?;
        let authenticated = compile_all(&self.authenticated)?;

        let mut role_rules = Vec::with_capacity(self.role_rules.len());
        for (pattern, role) in &self.role_rules {
            let role = role.trim();
            if role.is_empty() {
                return Err(WardenError::configuration(format!(
                    "role for pattern '{}' must not be empty",
                    pattern
                )));
            }
            role_rules.push((PathPattern::parse(pattern)?, role.to_string()));
        }

        Ok(AccessPolicy {
            permitted,
            authenticated,
            role_rules,
        })
    }
}

fn compile_all(patterns: &[String]) -> CoreResult<Vec<PathPattern>> {
    patterns.iter().map(|p| PathPattern::parse(p)).collect()
}

// =============================================================================
// Tests
// =============================================================================
