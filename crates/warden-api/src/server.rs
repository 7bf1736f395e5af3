// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::middleware::{GateLayer, CSRF_HEADER};
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The reference HTTP host.
///
/// Every route sits behind the authorization gate; the handlers only run for
/// requests it allows.
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.state.config.request_timeout,
            ))
            .layer(create_cors_layer())
            .layer(GateLayer::new(self.state.gate.clone()));

        Router::new()
            .route("/welcome", get(handlers::welcome))
            .route("/home", get(handlers::home))
            .route("/admin", get(handlers::admin))
            .route("/me", get(handlers::current_principal))
            .route("/get-token", get(handlers::get_token))
            .route("/validate-token", get(handlers::validate_token))
            .route("/extract-username", get(handlers::extract_username))
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server until the process is killed.
    pub async fn run(self) -> ApiResult<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Runs the server with graceful shutdown.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.addr();
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        info!(
            addr = %addr,
            pipeline = ?self.state.gate.pipeline(),
            rules = self.state.gate.policy().rule_count(),
            "Starting API server"
        );

        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ApiError::internal(format!("Server error: {}", e)))?;

        info!("API server shutdown complete");

        Ok(())
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.state.config.socket_addr()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, CSRF_HEADER])
        .max_age(Duration::from_secs(3600))
}

// =============================================================================
// Tests
// =============================================================================
