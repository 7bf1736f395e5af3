// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Policy Integration Tests
//!
//! Path classification across tiers, wildcards, and configuration input.

use warden_core::{AccessPolicy, Decision, GateConfig, RuleTier};
use warden_tests::common::GateFixtures;

#[test]
fn test_host_rules() {
    let policy = AccessPolicy::from_config(&GateFixtures::host_config()).unwrap();

    assert_eq!(policy.classify("/welcome"), Decision::Permit);
    assert_eq!(policy.classify("/get-token"), Decision::Permit);
    assert_eq!(policy.classify("/home"), Decision::RequireAuthenticated);
    assert_eq!(
        policy.classify("/admin"),
        Decision::RequireRole("ADMIN".to_string())
    );
    assert_eq!(policy.classify("/unlisted"), Decision::RequireAuthenticated);
}

#[test]
fn test_permit_tier_wins_over_role_tier() {
    let config = GateConfig::default()
        .permit("/shared/*")
        .require_role("/shared/*", "ADMIN");
    let policy = AccessPolicy::from_config(&config).unwrap();

    let classification = policy.explain("/shared/doc");
    assert_eq!(classification.decision, Decision::Permit);
    assert_eq!(classification.tier, RuleTier::Permit);
}

#[test]
fn test_first_role_rule_wins() {
    let config = GateConfig::default()
        .require_role("/ops/*", "OPS")
        .require_role("/ops/admin", "ADMIN");
    let policy = AccessPolicy::from_config(&config).unwrap();

    assert_eq!(
        policy.classify("/ops/admin"),
        Decision::RequireRole("OPS".to_string())
    );
}

#[test]
fn test_wildcards() {
    let config = GateConfig::default().permit("/api/*").authenticate("/files/**");
    let policy = AccessPolicy::from_config(&config).unwrap();

    assert_eq!(policy.classify("/api/"), Decision::Permit);
    assert_eq!(policy.classify("/api/v1/users"), Decision::Permit);
    assert_eq!(policy.classify("/api"), Decision::RequireAuthenticated);
    assert_eq!(
        policy.explain("/api").tier,
        RuleTier::Fallback
    );
    assert_eq!(policy.explain("/files/a/b").tier, RuleTier::Authenticated);
}

#[test]
fn test_invalid_patterns_rejected() {
    assert!(AccessPolicy::from_config(&GateConfig::default().permit("")).is_err());
    assert!(AccessPolicy::from_config(&GateConfig::default().permit("/a/*/b")).is_err());
    assert!(AccessPolicy::from_config(&GateConfig::default().require_role("/x", "")).is_err());
}
