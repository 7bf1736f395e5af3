// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Warden Integration Tests
//!
//! Cross-crate tests for Warden plus the fixtures and mocks they share.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p warden-tests
//!
//! cargo test -p warden-tests --test integration_token
//! cargo test -p warden-tests --test integration_policy
//! cargo test -p warden-tests --test integration_gate
//! cargo test -p warden-tests --test integration_api
//! cargo test -p warden-tests --test integration_config
//! ```
//!
//! ## Test Categories
//!
//! ### Token Tests (`integration_token.rs`)
//! - Issuance, validation, subject extraction
//! - Expiry boundaries with an injected clock
//! - Tokens from foreign keys and tampered payloads
//!
//! ### Policy Tests (`integration_policy.rs`)
//! - Tier precedence and declaration order
//! - Wildcard patterns
//!
//! ### Gate Tests (`integration_gate.rs`)
//! - Request lifecycle through the pipeline
//! - CSRF, OAuth handoff, login fallback, degraded mode
//!
//! ### API Tests (`integration_api.rs`)
//! - Reference host endpoints end to end
//!
//! ### Config Tests (`integration_config.rs`)
//! - Configuration files driving the gate

pub mod common;
