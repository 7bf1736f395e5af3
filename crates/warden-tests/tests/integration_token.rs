// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Token Integration Tests
//!
//! ## Test Categories
//!
//! - `test_issue_*`: Issuance and argument checks
//! - `test_validate_*`: Validation, including expiry at an injected clock
//! - `test_extract_*`: Subject extraction

use chrono::{Duration, Utc};
use warden_core::{TokenService, VerificationFailure, WardenError};
use warden_tests::common::{init_test_logging, DEMO_SUBJECT};

fn service() -> TokenService {
    init_test_logging();
    TokenService::initialize().expect("Failed to initialize token service")
}

// =============================================================================
// Issuance
// =============================================================================

#[test]
fn test_issue_produces_compact_token() {
    let tokens = service();
    let token = tokens.issue(DEMO_SUBJECT, 5).unwrap();

    assert_eq!(token.split('.').count(), 3);
    let claims = tokens.inspect(&token).unwrap();
    assert_eq!(claims.sub, DEMO_SUBJECT);
    assert_eq!(claims.exp - claims.iat, 5 * 60);
}

#[test]
fn test_issue_rejects_bad_arguments() {
    let tokens = service();

    for ttl in [0, -1] {
        assert!(matches!(
            tokens.issue(DEMO_SUBJECT, ttl),
            Err(WardenError::InvalidArgument { .. })
        ));
    }
    assert!(tokens.issue("", 5).is_err());
    assert!(tokens.issue("   ", 5).is_err());
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_validate_demo_scenario() {
    let tokens = service();
    let now = Utc::now();
    let token = tokens.issue_at(DEMO_SUBJECT, 5, now).unwrap();

    assert!(tokens.validate_at(&token, DEMO_SUBJECT, now).unwrap());
    assert!(!tokens.validate_at(&token, "other", now).unwrap());
    assert!(!tokens
        .validate_at(&token, DEMO_SUBJECT, now + Duration::minutes(6))
        .unwrap());
}

#[test]
fn test_validate_expiry_boundary() {
    let tokens = service();
    let now = Utc::now();
    let token = tokens.issue_at(DEMO_SUBJECT, 1, now).unwrap();

    assert!(tokens
        .validate_at(&token, DEMO_SUBJECT, now + Duration::seconds(59))
        .unwrap());
    assert!(!tokens
        .validate_at(&token, DEMO_SUBJECT, now + Duration::seconds(60))
        .unwrap());
    assert_eq!(
        tokens.inspect_at(&token, now + Duration::seconds(60)),
        Err(VerificationFailure::Expired)
    );
}

#[test]
fn test_validate_rejects_other_service_tokens() {
    let tokens = service();
    let other = service();
    let token = other.issue(DEMO_SUBJECT, 5).unwrap();

    assert!(!tokens.validate(&token, DEMO_SUBJECT).unwrap());
    assert_eq!(tokens.inspect(&token), Err(VerificationFailure::BadSignature));
}

#[test]
fn test_validate_rejects_garbage() {
    let tokens = service();

    assert!(!tokens.validate("not-a-token", DEMO_SUBJECT).unwrap());
    assert_eq!(tokens.inspect("a.b.c"), Err(VerificationFailure::Malformed));
    assert!(tokens.validate("", DEMO_SUBJECT).is_err());
}

// =============================================================================
// Extraction
// =============================================================================

#[test]
fn test_extract_ignores_expiry() {
    let tokens = service();
    let token = tokens
        .issue_at(DEMO_SUBJECT, 1, Utc::now() - Duration::hours(1))
        .unwrap();

    assert_eq!(
        tokens.parse_subject(&token).unwrap(),
        Some(DEMO_SUBJECT.to_string())
    );
    assert!(!tokens.validate(&token, DEMO_SUBJECT).unwrap());
}

#[test]
fn test_extract_rejects_foreign_token() {
    let tokens = service();
    let token = service().issue(DEMO_SUBJECT, 5).unwrap();

    assert_eq!(tokens.parse_subject(&token).unwrap(), None);
    assert!(tokens.parse_subject("").is_err());
}
