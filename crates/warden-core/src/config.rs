// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Gate configuration.
//!
//! [`GateConfig`] is the single immutable description of a host's security
//! setup: the three rule tiers plus the pipeline toggles. It is read once
//! when the gate is built.
//!
//! ```
//! use warden_core::GateConfig;
//!
//! let config = GateConfig::default()
//!     .permit("/welcome")
//!     .authenticate("/home")
//!     .require_role("/admin", "ADMIN")
//!     .with_token_validation(true);
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreResult;
use crate::policy::AccessPolicy;

/// Login page used when no custom page is configured.
pub const DEFAULT_LOGIN_PAGE: &str = "/login";

// =============================================================================
// GateConfig
// =============================================================================

/// Host security configuration.
///
/// Missing or `null` lists are treated as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Patterns anyone may access.
    #[serde(deserialize_with = "null_as_empty")]
    pub permitted_paths: Vec<String>,
    /// Patterns any authenticated principal may access.
    #[serde(deserialize_with = "null_as_empty")]
    pub authenticated_paths: Vec<String>,
    /// Ordered pattern → role mapping.
    pub role_paths: RoleRules,
    /// Skip the CSRF stage entirely.
    pub disable_csrf: bool,
    /// Hand off to an OAuth login flow for requests without a bearer token.
    pub enable_oauth: bool,
    /// Require bearer token validation for protected paths.
    pub enable_token_validation: bool,
    /// Form login settings.
    pub login: LoginConfig,
}

impl GateConfig {
    /// Adds a permit-all pattern.
    pub fn permit(mut self, pattern: impl Into<String>) -> Self {
        self.permitted_paths.push(pattern.into());
        self
    }

    /// Adds an authenticated-only pattern.
    pub fn authenticate(mut self, pattern: impl Into<String>) -> Self {
        self.authenticated_paths.push(pattern.into());
        self
    }

    /// Appends a role-gated pattern.
    pub fn require_role(mut self, pattern: impl Into<String>, role: impl Into<String>) -> Self {
        self.role_paths.push(pattern, role);
        self
    }

    /// Sets the CSRF toggle.
    pub fn with_csrf_disabled(mut self, disabled: bool) -> Self {
        self.disable_csrf = disabled;
        self
    }

    /// Sets the OAuth toggle.
    pub fn with_oauth(mut self, enabled: bool) -> Self {
        self.enable_oauth = enabled;
        self
    }

    /// Sets the token validation toggle.
    pub fn with_token_validation(mut self, enabled: bool) -> Self {
        self.enable_token_validation = enabled;
        self
    }

    /// Sets the form login settings.
    pub fn with_login(mut self, login: LoginConfig) -> Self {
        self.login = login;
        self
    }

    /// Checks that every pattern and role compiles.
    pub fn validate(&self) -> CoreResult<()> {
        AccessPolicy::from_config(self).map(|_| ())
    }
}

// =============================================================================
// LoginConfig
// =============================================================================

/// Form login settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    /// Use the URLs below instead of the default login page.
    pub custom_page: bool,
    /// Login page URL.
    pub page_url: String,
    /// URL the login form posts to.
    pub processing_url: String,
    /// Where to forward after a successful login.
    pub success_url: String,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            custom_page: false,
            page_url: DEFAULT_LOGIN_PAGE.to_string(),
            processing_url: DEFAULT_LOGIN_PAGE.to_string(),
            success_url: "/".to_string(),
        }
    }
}

impl LoginConfig {
    /// Custom login page settings.
    pub fn custom(
        page_url: impl Into<String>,
        processing_url: impl Into<String>,
        success_url: impl Into<String>,
    ) -> Self {
        Self {
            custom_page: true,
            page_url: page_url.into(),
            processing_url: processing_url.into(),
            success_url: success_url.into(),
        }
    }

    /// Returns `true` if every URL is set. `custom_page` is not consulted.
    pub fn is_complete(&self) -> bool {
        !self.page_url.trim().is_empty()
            && !self.processing_url.trim().is_empty()
            && !self.success_url.trim().is_empty()
    }
}

// =============================================================================
// RoleRules
// =============================================================================

/// One role-gated pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRule {
    /// Path pattern.
    pub path: String,
    /// Role required to access it.
    pub role: String,
}

/// Ordered pattern → role mapping.
///
/// Deserializes from a map (document order is kept) or from a list of
/// `{path, role}` entries. Serializes as a map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleRules(Vec<RoleRule>);

impl RoleRules {
    /// Appends a rule.
    pub fn push(&mut self, path: impl Into<String>, role: impl Into<String>) {
        self.0.push(RoleRule {
            path: path.into(),
            role: role.into(),
        });
    }

    /// Rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &RoleRule> {
        self.0.iter()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<P: Into<String>, R: Into<String>> FromIterator<(P, R)> for RoleRules {
    fn from_iter<I: IntoIterator<Item = (P, R)>>(iter: I) -> Self {
        let mut rules = Self::default();
        for (path, role) in iter {
            rules.push(path, role);
        }
        rules
    }
}

impl Serialize for RoleRules {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for rule in &self.0 {
            map.serialize_entry(&rule.path, &rule.role)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RoleRules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RoleRulesVisitor;

        impl<'de> Visitor<'de> for RoleRulesVisitor {
            type Value = RoleRules;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of path pattern to role, or a list of {path, role} entries")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(RoleRules::default())
            }

            fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(RoleRules::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut rules = Vec::new();
                while let Some((path, role)) = map.next_entry::<String, String>()? {
                    rules.push(RoleRule { path, role });
                }
                Ok(RoleRules(rules))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut rules = Vec::new();
                while let Some(rule) = seq.next_element::<RoleRule>()? {
                    rules.push(rule);
                }
                Ok(RoleRules(rules))
            }
        }

        deserializer.deserialize_any(RoleRulesVisitor)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Tests
// =============================================================================
