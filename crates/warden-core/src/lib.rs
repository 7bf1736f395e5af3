// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden-core
//!
//! Authentication and authorization building blocks for Warden.
//!
//! - [`TokenService`]: issues and validates HS256 bearer tokens signed with a
//!   key generated at process start.
//! - [`AccessPolicy`]: classifies request paths as permitted, authenticated,
//!   or role-gated.
//! - [`AuthorizationGate`]: composes both into a per-request decision.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use warden_core::{AuthorizationGate, GateConfig, RequestContext, TokenService};
//!
//! let tokens = Arc::new(TokenService::initialize().unwrap());
//! let gate = AuthorizationGate::builder(
//!     GateConfig::default()
//!         .permit("/welcome")
//!         .authenticate("/home")
//!         .with_token_validation(true),
//! )
//! .token_service(tokens.clone())
//! .build()
//! .unwrap();
//!
//! let token = tokens.issue("yash", 5).unwrap();
//! let mut ctx = RequestContext::new("GET", "/home")
//!     .with_authorization(format!("Bearer {}", token));
//! assert!(gate.evaluate(&mut ctx).is_allowed());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod gate;
pub mod key;
pub mod policy;
pub mod token;

pub use config::{GateConfig, LoginConfig, RoleRule, RoleRules, DEFAULT_LOGIN_PAGE};
pub use error::{CoreResult, WardenError};
pub use gate::collaborators::{
    role_matches, CsrfGuard, NoRoles, OAuthHandoff, OAuthLoginFlow, RoleResolver,
    StaticRoleResolver,
};
pub use gate::context::{AuthMethod, DenyReason, Principal, RequestContext, RequestState, Verdict};
pub use gate::filter::{extract_bearer, BearerError, BearerTokenFilter, CredentialFilter, FilterOutcome, BEARER_PREFIX};
pub use gate::{AuthorizationGate, AuthorizationGateBuilder, PipelineStage};
pub use key::SigningKey;
pub use policy::{AccessPolicy, AccessPolicyBuilder, Classification, Decision, PathPattern, RuleTier};
pub use token::{TokenClaims, TokenService, VerificationFailure, DEFAULT_TTL_MINUTES};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
