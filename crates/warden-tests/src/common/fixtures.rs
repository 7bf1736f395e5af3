// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures

use std::sync::Arc;

use warden_core::{AuthorizationGate, GateConfig, StaticRoleResolver, TokenService};

/// Subject used across the scenarios.
pub const DEMO_SUBJECT: &str = "yash";

/// Subject holding the `ADMIN` role in [`GateFixtures::roles`].
pub const ADMIN_SUBJECT: &str = "root";

// =============================================================================
// Gate Fixtures
// =============================================================================

/// Gate configurations and assembled gates.
pub struct GateFixtures;

impl GateFixtures {
    /// The reference host's rules: `/welcome` and `get-token` permitted,
    /// `/home` authenticated, `/admin` gated on `ADMIN`.
    ///
    /// `get-token` lacks its leading slash on purpose; it is normalized.
    pub fn host_config() -> GateConfig {
        GateConfig::default()
            .permit("/welcome")
            .permit("get-token")
            .authenticate("/home")
            .require_role("/admin", "ADMIN")
            .with_token_validation(true)
    }

    /// [`host_config`](Self::host_config) plus the token inspection
    /// endpoints, which answer bad tokens with their own 400 bodies.
    pub fn api_config() -> GateConfig {
        Self::host_config()
            .permit("/validate-token")
            .permit("/extract-username")
    }

    /// Role directory granting `ROLE_ADMIN` to [`ADMIN_SUBJECT`].
    pub fn roles() -> StaticRoleResolver {
        StaticRoleResolver::default().with_roles(ADMIN_SUBJECT, ["ROLE_ADMIN"])
    }

    /// A fresh token service.
    pub fn tokens() -> Arc<TokenService> {
        Arc::new(TokenService::initialize().expect("Failed to initialize token service"))
    }

    /// Host gate over `tokens` with the fixture roles.
    pub fn host_gate(tokens: Arc<TokenService>) -> AuthorizationGate {
        AuthorizationGate::builder(Self::host_config())
            .token_service(tokens)
            .role_resolver(Arc::new(Self::roles()))
            .build()
            .expect("Failed to build host gate")
    }
}

// =============================================================================
// Config Fixtures
// =============================================================================

/// Configuration file contents.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// The reference host as a YAML file.
    pub fn host_yaml() -> &'static str {
        r#"
server:
  host: 127.0.0.1
  port: 8080

security:
  permitted_paths:
    - /welcome
    - get-token
  authenticated_paths:
    - /home
  role_paths:
    /admin: ADMIN
  enable_token_validation: true

tokens:
  default_expiration_minutes: 5
  default_subject: yash

roles:
  root: [ADMIN]
"#
    }

    /// The reference host as a TOML file.
    pub fn host_toml() -> &'static str {
        r#"
[server]
host = "127.0.0.1"
port = 8080

[security]
permitted_paths = ["/welcome", "get-token"]
authenticated_paths = ["/home"]
enable_token_validation = true

[security.role_paths]
"/admin" = "ADMIN"

[roles]
root = ["ADMIN"]
"#
    }
}
