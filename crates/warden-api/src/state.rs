// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use warden_core::{AuthorizationGate, TokenService};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

/// Shared application state.
///
/// Cheap to clone: every field is an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ApiConfig>,
    /// Token issuer and validator.
    pub tokens: Arc<TokenService>,
    /// Per-request authorization gate.
    pub gate: Arc<AuthorizationGate>,
}

impl AppState {
    /// Creates a new state.
    pub fn new(config: ApiConfig, tokens: Arc<TokenService>, gate: Arc<AuthorizationGate>) -> Self {
        Self {
            config: Arc::new(config),
            tokens,
            gate,
        }
    }

    /// Creates a state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::default()
    }
}

/// Builder for [`AppState`].
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    tokens: Option<Arc<TokenService>>,
    gate: Option<Arc<AuthorizationGate>>,
}

impl AppStateBuilder {
    /// Sets the configuration. Defaults to [`ApiConfig::default`].
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the token service.
    pub fn tokens(mut self, tokens: Arc<TokenService>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Sets the authorization gate.
    pub fn gate(mut self, gate: Arc<AuthorizationGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Builds the state.
    pub fn build(self) -> ApiResult<AppState> {
        let tokens = self
            .tokens
            .ok_or_else(|| ApiError::internal("token service is required"))?;
        let gate = self
            .gate
            .ok_or_else(|| ApiError::internal("authorization gate is required"))?;

        Ok(AppState::new(self.config.unwrap_or_default(), tokens, gate))
    }
}
