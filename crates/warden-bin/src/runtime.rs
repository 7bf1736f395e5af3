// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Runtime wiring: configuration to token service, gate, and HTTP host.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use warden_api::{ApiConfig, ApiServer, AppState};
use warden_config::WardenConfig;
use warden_core::{AuthorizationGate, StaticRoleResolver, TokenService};

use crate::error::{BinError, BinResult};
use crate::shutdown::shutdown_signal;

// =============================================================================
// WardenRuntime
// =============================================================================

/// Assembles and runs the reference host from a loaded configuration.
pub struct WardenRuntime {
    config: WardenConfig,
}

impl WardenRuntime {
    /// Creates a runtime for a validated configuration.
    pub fn new(config: WardenConfig) -> Self {
        Self { config }
    }

    /// Overrides the configured port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// The configuration in effect.
    pub fn config(&self) -> &WardenConfig {
        &self.config
    }

    /// Builds the shared handler state.
    ///
    /// Generates a fresh signing key, so tokens from a previous process are
    /// rejected.
    pub fn build_state(&self) -> BinResult<AppState> {
        for warning in self.config.warnings() {
            warn!("{}", warning);
        }

        let tokens = Arc::new(TokenService::initialize()?);
        let gate = build_gate(&self.config, tokens.clone())?;

        Ok(AppState::new(api_config(&self.config), tokens, Arc::new(gate)))
    }

    /// Runs the host until SIGINT or SIGTERM.
    pub async fn run(self) -> BinResult<()> {
        info!("Starting Warden v{}", warden_core::VERSION);

        let state = self.build_state()?;
        ApiServer::new(state)
            .run_with_shutdown(shutdown_signal())
            .await
            .map_err(|e| BinError::from(e).with_context("API server failed"))?;

        info!("Warden shutdown complete");
        Ok(())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Builds the authorization gate described by `config`.
///
/// The bearer filter is always installed, so token validation is never
/// degraded here.
pub fn build_gate(config: &WardenConfig, tokens: Arc<TokenService>) -> BinResult<AuthorizationGate> {
    let roles = StaticRoleResolver::new(config.roles.clone().into_iter().collect());

    AuthorizationGate::builder(config.security.clone())
        .token_service(tokens)
        .role_resolver(Arc::new(roles))
        .build()
        .map_err(|e| BinError::from(e).with_context("Failed to build authorization gate"))
}

/// Maps the file configuration onto the HTTP host's settings.
pub fn api_config(config: &WardenConfig) -> ApiConfig {
    ApiConfig::default()
        .with_addr(config.server.host, config.server.port)
        .with_request_timeout(Duration::from_secs(config.server.request_timeout_secs))
        .with_token_defaults(
            config.tokens.default_expiration_minutes,
            config.tokens.default_subject.clone(),
        )
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::RequestContext;

    fn host_config() -> WardenConfig {
        let mut config = WardenConfig::default();
        config.security = config
            .security
            .permit("/welcome")
            .authenticate("/home")
            .require_role("/admin", "ADMIN")
            .with_token_validation(true);
        config.roles.insert("root".to_string(), vec!["ADMIN".to_string()]);
        config
    }

    #[test]
    fn test_build_state_wires_roles() {
        let state = WardenRuntime::new(host_config()).build_state().unwrap();

        let token = state.tokens.issue("root", 5).unwrap();
        let mut ctx = RequestContext::new("GET", "/admin")
            .with_authorization(format!("Bearer {}", token));
        assert!(state.gate.evaluate(&mut ctx).is_allowed());
    }

    #[test]
    fn test_build_gate_installs_bearer_filter() {
        let tokens = Arc::new(TokenService::initialize().unwrap());
        let gate = build_gate(&host_config(), tokens).unwrap();
        assert!(gate.token_validation_active());

        let mut ctx = RequestContext::new("GET", "/home");
        assert_eq!(
            gate.evaluate(&mut ctx),
            warden_core::Verdict::Denied(warden_core::DenyReason::MissingCredential)
        );
    }

    #[test]
    fn test_port_override() {
        let runtime = WardenRuntime::new(host_config()).with_port(9091);
        assert_eq!(api_config(runtime.config()).port, 9091);
    }

    #[test]
    fn test_api_config_mapping() {
        let mut config = host_config();
        config.tokens.default_subject = "alice".to_string();
        config.server.request_timeout_secs = 5;

        let api = api_config(&config);
        assert_eq!(api.default_subject, "alice");
        assert_eq!(api.request_timeout, Duration::from_secs(5));
    }
}
