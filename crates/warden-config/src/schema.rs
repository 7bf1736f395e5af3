// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema.
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 8080
//!   request_timeout_secs: 30
//!
//! security:
//!   permitted_paths: ["/welcome", "/get-token"]
//!   authenticated_paths: ["/home"]
//!   role_paths:
//!     /admin: ADMIN
//!   disable_csrf: true
//!   enable_token_validation: true
//!
//! tokens:
//!   default_expiration_minutes: 30
//!   default_subject: yash
//!
//! roles:
//!   yash: [ADMIN]
//! ```

use std::collections::BTreeMap;
use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};
use warden_core::{GateConfig, DEFAULT_LOGIN_PAGE, DEFAULT_TTL_MINUTES};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// WardenConfig
// =============================================================================

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    /// HTTP listener settings for the reference host.
    pub server: ServerConfig,
    /// Access rules and pipeline toggles.
    pub security: GateConfig,
    /// Token issuance defaults.
    pub tokens: TokenConfig,
    /// Subject → roles directory used for role-gated paths.
    pub roles: BTreeMap<String, Vec<String>>,
}

impl WardenConfig {
    /// Validates every section.
    pub fn validate(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.tokens.validate()?;

        self.security
            .validate()
            .map_err(|e| ConfigError::validation("security", e.to_string()))?;

        for (subject, roles) in &self.roles {
            if subject.trim().is_empty() {
                return Err(ConfigError::validation("roles", "subject must not be empty"));
            }
            if roles.iter().any(|r| r.trim().is_empty()) {
                return Err(ConfigError::validation(
                    format!("roles.{}", subject),
                    "role names must not be empty",
                ));
            }
        }

        Ok(())
    }

    /// Non-fatal observations about the configuration.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.security.enable_token_validation {
            warnings.push(
                "Token validation is disabled; protected paths redirect to the login page".to_string(),
            );
        }
        if self.security.permitted_paths.is_empty() {
            warnings.push("No permitted paths; every path requires authentication".to_string());
        }
        if !self.security.role_paths.is_empty() && self.roles.is_empty() {
            warnings.push("Role-gated paths are configured but the roles directory is empty".to_string());
        }
        let login = &self.security.login;
        if login.custom_page && !login.is_complete() {
            warnings.push(format!(
                "Custom login page is incomplete; falling back to {}",
                DEFAULT_LOGIN_PAGE
            ));
        }
        if self.security.enable_oauth {
            warnings.push("OAuth is enabled but the reference host ships no OAuth flow".to_string());
        }

        warnings
    }
}

// =============================================================================
// ServerConfig
// =============================================================================

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: IpAddr,
    /// Port number.
    pub port: u16,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Socket address to bind.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.port == 0 {
            return Err(ConfigError::validation("server.port", "must not be 0"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout_secs",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// TokenConfig
// =============================================================================

/// Token issuance defaults for the reference endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// TTL used when `/get-token` omits `expirationMinutes`.
    pub default_expiration_minutes: i64,
    /// Subject used when `/get-token` omits `username`.
    pub default_subject: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            default_expiration_minutes: DEFAULT_TTL_MINUTES,
            default_subject: "yash".to_string(),
        }
    }
}

impl TokenConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.default_expiration_minutes <= 0 {
            return Err(ConfigError::validation(
                "tokens.default_expiration_minutes",
                "must be greater than 0",
            ));
        }
        if self.default_subject.trim().is_empty() {
            return Err(ConfigError::validation(
                "tokens.default_subject",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
