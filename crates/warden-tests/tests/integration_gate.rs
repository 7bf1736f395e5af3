// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Gate Integration Tests
//!
//! ## Test Categories
//!
//! - `test_lifecycle_*`: Request state transitions
//! - `test_token_*`: Bearer token outcomes
//! - `test_csrf_*`: CSRF guard placement
//! - `test_oauth_*`: OAuth hand-off and fallback
//! - `test_login_*`: Form login fallback
//! - `test_startup_*`: Gate assembly

use std::sync::Arc;

use chrono::{Duration, Utc};
use warden_core::{
    AuthMethod, AuthorizationGate, DenyReason, GateConfig, LoginConfig, PipelineStage,
    RequestContext, RequestState, Verdict,
};
use warden_tests::common::{
    bearer, init_test_logging, GateFixtures, ScriptedOAuthFlow, StaticCsrfGuard, ADMIN_SUBJECT,
    DEMO_SUBJECT,
};

fn get(path: &str) -> RequestContext {
    RequestContext::new("GET", path)
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_lifecycle_allowed_request() {
    init_test_logging();
    let tokens = GateFixtures::tokens();
    let gate = GateFixtures::host_gate(tokens.clone());

    let token = tokens.issue(DEMO_SUBJECT, 5).unwrap();
    let mut ctx = get("/home").with_authorization(bearer(&token));
    assert_eq!(ctx.state(), &RequestState::Received);

    let verdict = gate.evaluate(&mut ctx);
    assert!(verdict.is_allowed());
    assert_eq!(ctx.state(), &RequestState::Allowed);

    let principal = ctx.into_principal().unwrap();
    assert_eq!(principal.subject, DEMO_SUBJECT);
    assert_eq!(principal.method, AuthMethod::BearerToken);
}

#[test]
fn test_lifecycle_denied_request() {
    init_test_logging();
    let gate = GateFixtures::host_gate(GateFixtures::tokens());

    let mut ctx = get("/home");
    let verdict = gate.evaluate(&mut ctx);
    assert_eq!(verdict, Verdict::Denied(DenyReason::MissingCredential));
    assert_eq!(ctx.state(), &RequestState::Denied(DenyReason::MissingCredential));
    assert!(ctx.state().is_terminal());
}

#[test]
fn test_lifecycle_permitted_path_has_no_principal() {
    let gate = GateFixtures::host_gate(GateFixtures::tokens());

    let mut ctx = get("/get-token");
    assert_eq!(gate.evaluate(&mut ctx), Verdict::Allowed(None));
}

// =============================================================================
// Tokens
// =============================================================================

#[test]
fn test_token_outcomes() {
    init_test_logging();
    let tokens = GateFixtures::tokens();
    let gate = GateFixtures::host_gate(tokens.clone());

    let mut ctx = get("/home").with_authorization("Token abc");
    assert_eq!(
        gate.evaluate(&mut ctx).deny_reason(),
        Some(&DenyReason::MalformedCredential)
    );

    let mut ctx = get("/home").with_authorization(bearer("not.a.token"));
    assert_eq!(
        gate.evaluate(&mut ctx).deny_reason(),
        Some(&DenyReason::InvalidCredential)
    );

    let expired = tokens
        .issue_at(DEMO_SUBJECT, 5, Utc::now() - Duration::minutes(6))
        .unwrap();
    let mut ctx = get("/home").with_authorization(bearer(&expired));
    assert_eq!(
        gate.evaluate(&mut ctx).deny_reason(),
        Some(&DenyReason::InvalidCredential)
    );
}

#[test]
fn test_token_role_gate() {
    let tokens = GateFixtures::tokens();
    let gate = GateFixtures::host_gate(tokens.clone());

    let token = tokens.issue(DEMO_SUBJECT, 5).unwrap();
    let mut ctx = get("/admin").with_authorization(bearer(&token));
    assert_eq!(
        gate.evaluate(&mut ctx).deny_reason(),
        Some(&DenyReason::InsufficientRole {
            required: "ADMIN".to_string()
        })
    );

    let token = tokens.issue(ADMIN_SUBJECT, 5).unwrap();
    let mut ctx = get("/admin").with_authorization(bearer(&token));
    assert!(gate.evaluate(&mut ctx).is_allowed());
}

#[test]
fn test_token_from_previous_process_rejected() {
    let gate = GateFixtures::host_gate(GateFixtures::tokens());
    let stale = GateFixtures::tokens().issue(DEMO_SUBJECT, 5).unwrap();

    let mut ctx = get("/home").with_authorization(bearer(&stale));
    assert_eq!(
        gate.evaluate(&mut ctx).deny_reason(),
        Some(&DenyReason::InvalidCredential)
    );
}

// =============================================================================
// CSRF
// =============================================================================

#[test]
fn test_csrf_guards_state_changing_requests() {
    init_test_logging();
    let tokens = GateFixtures::tokens();
    let guard = Arc::new(StaticCsrfGuard::new("s3cret"));
    let gate = AuthorizationGate::builder(GateFixtures::host_config())
        .token_service(tokens.clone())
        .csrf_guard(guard.clone())
        .build()
        .unwrap();

    assert_eq!(gate.pipeline()[0], PipelineStage::Csrf);

    let mut ctx = get("/welcome");
    assert!(gate.evaluate(&mut ctx).is_allowed());
    assert_eq!(guard.calls(), 0);

    let mut ctx = RequestContext::new("POST", "/welcome");
    assert_eq!(
        gate.evaluate(&mut ctx).deny_reason(),
        Some(&DenyReason::CsrfRejected)
    );

    let token = tokens.issue(DEMO_SUBJECT, 5).unwrap();
    let mut ctx = RequestContext::new("POST", "/home")
        .with_authorization(bearer(&token))
        .with_csrf_token("s3cret");
    assert!(gate.evaluate(&mut ctx).is_allowed());
    assert_eq!(guard.calls(), 2);
}

#[test]
fn test_csrf_disabled_skips_guard() {
    let guard = Arc::new(StaticCsrfGuard::new("s3cret"));
    let gate = AuthorizationGate::builder(GateFixtures::host_config().with_csrf_disabled(true))
        .token_service(GateFixtures::tokens())
        .csrf_guard(guard.clone())
        .build()
        .unwrap();

    let mut ctx = RequestContext::new("POST", "/welcome");
    assert!(gate.evaluate(&mut ctx).is_allowed());
    assert_eq!(guard.calls(), 0);
    assert!(!gate.pipeline().contains(&PipelineStage::Csrf));
}

// =============================================================================
// OAuth
// =============================================================================

#[test]
fn test_oauth_authenticates_requests_without_token() {
    init_test_logging();
    let flow = Arc::new(ScriptedOAuthFlow::authenticating("carol"));
    let gate = AuthorizationGate::builder(GateFixtures::host_config().with_oauth(true))
        .token_service(GateFixtures::tokens())
        .oauth_flow(flow.clone())
        .build()
        .unwrap();

    assert_eq!(
        gate.pipeline(),
        &[
            PipelineStage::TokenValidation,
            PipelineStage::OAuthLogin,
            PipelineStage::FormLogin
        ]
    );

    let mut ctx = get("/home");
    assert!(gate.evaluate(&mut ctx).is_allowed());
    let principal = ctx.into_principal().unwrap();
    assert_eq!(principal.subject, "carol");
    assert_eq!(principal.method, AuthMethod::OAuth);

    let mut ctx = get("/home").with_authorization(bearer("not.a.token"));
    assert_eq!(
        gate.evaluate(&mut ctx).deny_reason(),
        Some(&DenyReason::InvalidCredential)
    );
    assert_eq!(flow.calls(), 1);
}

#[test]
fn test_oauth_redirect() {
    let gate = AuthorizationGate::builder(GateFixtures::host_config().with_oauth(true))
        .token_service(GateFixtures::tokens())
        .oauth_flow(Arc::new(ScriptedOAuthFlow::redirecting("https://idp.example/authorize")))
        .build()
        .unwrap();

    let mut ctx = get("/home");
    assert_eq!(
        gate.evaluate(&mut ctx).deny_reason(),
        Some(&DenyReason::LoginRequired {
            location: "https://idp.example/authorize".to_string()
        })
    );
}

#[test]
fn test_oauth_init_failure_disables_oauth() {
    init_test_logging();
    let gate = AuthorizationGate::builder(GateFixtures::host_config().with_oauth(true))
        .token_service(GateFixtures::tokens())
        .oauth_flow(Arc::new(ScriptedOAuthFlow::authenticating("carol").failing_init()))
        .build()
        .unwrap();

    assert!(!gate.oauth_active());
    let mut ctx = get("/home");
    assert_eq!(
        gate.evaluate(&mut ctx).deny_reason(),
        Some(&DenyReason::MissingCredential)
    );
}

#[test]
fn test_oauth_handoff_failure_falls_back() {
    let flow = Arc::new(ScriptedOAuthFlow::authenticating("carol").failing_handoff());
    let gate = AuthorizationGate::builder(GateFixtures::host_config().with_oauth(true))
        .token_service(GateFixtures::tokens())
        .oauth_flow(flow.clone())
        .build()
        .unwrap();

    let mut ctx = get("/home");
    assert_eq!(
        gate.evaluate(&mut ctx).deny_reason(),
        Some(&DenyReason::MissingCredential)
    );
    assert_eq!(flow.calls(), 1);
}

// =============================================================================
// Login
// =============================================================================

#[test]
fn test_login_required_without_token_validation() {
    let gate = AuthorizationGate::builder(GateFixtures::host_config().with_token_validation(false))
        .build()
        .unwrap();

    let mut ctx = get("/home");
    assert_eq!(
        gate.evaluate(&mut ctx).deny_reason(),
        Some(&DenyReason::LoginRequired {
            location: "/login".to_string()
        })
    );

    let mut ctx = get("/login");
    assert!(gate.evaluate(&mut ctx).is_allowed());
}

#[test]
fn test_login_custom_page() {
    let config = GateFixtures::host_config()
        .with_token_validation(false)
        .with_login(LoginConfig::custom("/signin", "/signin/process", "/home"));
    let gate = AuthorizationGate::builder(config).build().unwrap();

    assert_eq!(gate.login().page_url, "/signin");
    assert!(gate.evaluate(&mut get("/signin")).is_allowed());
    assert!(gate.evaluate(&mut get("/signin/process")).is_allowed());
    assert!(!gate.evaluate(&mut get("/login")).is_allowed());
}

#[test]
fn test_login_incomplete_custom_page_falls_back() {
    init_test_logging();
    let config = GateFixtures::host_config()
        .with_token_validation(false)
        .with_login(LoginConfig::custom("/signin", "", "/home"));
    let gate = AuthorizationGate::builder(config).build().unwrap();

    assert_eq!(gate.login().page_url, "/login");
    assert!(gate.evaluate(&mut get("/login")).is_allowed());
}

// =============================================================================
// Startup
// =============================================================================

#[test]
fn test_startup_requires_filter_when_validating() {
    let result = AuthorizationGate::builder(GateFixtures::host_config()).build();
    assert!(result.is_err());
}

#[test]
fn test_startup_degraded_mode() {
    init_test_logging();
    let gate = AuthorizationGate::builder(GateFixtures::host_config())
        .allow_degraded(true)
        .build()
        .unwrap();

    assert!(!gate.token_validation_active());
    assert!(gate.evaluate(&mut get("/welcome")).is_allowed());
    assert_eq!(
        gate.evaluate(&mut get("/home")).deny_reason(),
        Some(&DenyReason::ValidationUnavailable)
    );
}

#[test]
fn test_startup_bad_pattern_fails() {
    let config = GateConfig::default().permit("/a/*/b");
    assert!(AuthorizationGate::builder(config).build().is_err());
}
