// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden-api
//!
//! HTTP integration for Warden.
//!
//! [`GateLayer`] puts an [`AuthorizationGate`](warden_core::AuthorizationGate)
//! in front of any axum router. [`ApiServer`] is the reference host built on
//! it: fixed pages behind each access tier plus token issuance and
//! inspection endpoints.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use config::ApiConfig;
pub use error::{denial_response, ApiError, ApiResult};
pub use extractors::Auth;
pub use middleware::{GateLayer, GateMiddleware, CSRF_HEADER, REQUEST_ID_HEADER};
pub use server::ApiServer;
pub use state::{AppState, AppStateBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
