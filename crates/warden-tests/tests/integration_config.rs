// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Config Integration Tests
//!
//! Configuration files loaded from disk and used to assemble a gate.

use std::io::Write;
use std::sync::Arc;

use warden_config::{ConfigError, ConfigFormat, ConfigLoader, WardenConfig};
use warden_core::{
    AuthorizationGate, Decision, RequestContext, StaticRoleResolver, TokenService,
};
use warden_tests::common::{bearer, init_test_logging, ConfigFixtures, ADMIN_SUBJECT, DEMO_SUBJECT};

// =============================================================================
// Test Helpers
// =============================================================================

fn write_config(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn load(file: &tempfile::NamedTempFile) -> WardenConfig {
    ConfigLoader::new()
        .with_env_vars(false)
        .load(file.path())
        .unwrap()
}

fn gate_for(config: &WardenConfig, tokens: Arc<TokenService>) -> AuthorizationGate {
    let roles = StaticRoleResolver::new(config.roles.clone().into_iter().collect());
    AuthorizationGate::builder(config.security.clone())
        .token_service(tokens)
        .role_resolver(Arc::new(roles))
        .build()
        .unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn test_yaml_config_drives_gate() {
    init_test_logging();
    let file = write_config(ConfigFixtures::host_yaml(), ".yaml");
    let config = load(&file);

    assert_eq!(config.tokens.default_expiration_minutes, 5);

    let tokens = Arc::new(TokenService::initialize().unwrap());
    let gate = gate_for(&config, tokens.clone());

    assert_eq!(gate.policy().classify("/get-token"), Decision::Permit);

    let admin = bearer(&tokens.issue(ADMIN_SUBJECT, 5).unwrap());
    let user = bearer(&tokens.issue(DEMO_SUBJECT, 5).unwrap());

    let mut ctx = RequestContext::new("GET", "/admin").with_authorization(admin);
    assert!(gate.evaluate(&mut ctx).is_allowed());

    let mut ctx = RequestContext::new("GET", "/admin").with_authorization(user);
    assert!(!gate.evaluate(&mut ctx).is_allowed());
}

#[test]
fn test_toml_matches_yaml() {
    let yaml = load(&write_config(ConfigFixtures::host_yaml(), ".yaml"));
    let toml = load(&write_config(ConfigFixtures::host_toml(), ".toml"));

    assert_eq!(yaml.security, toml.security);
    assert_eq!(yaml.roles, toml.roles);
}

#[test]
fn test_role_paths_keep_document_order() {
    let content = r#"
security:
  role_paths:
    /ops/admin: ADMIN
    /ops/*: OPS
"#;
    let config = ConfigLoader::new()
        .with_env_vars(false)
        .load_from_str(content, ConfigFormat::Yaml)
        .unwrap();

    let tokens = Arc::new(TokenService::initialize().unwrap());
    let gate = AuthorizationGate::builder(config.security)
        .token_service(tokens)
        .build()
        .unwrap();
    assert_eq!(
        gate.policy().classify("/ops/admin"),
        Decision::RequireRole("ADMIN".to_string())
    );
}

#[test]
fn test_invalid_pattern_is_validation_error() {
    let file = write_config("security:\n  permitted_paths: [\"/a/*/b\"]\n", ".yaml");
    let result = ConfigLoader::new().with_env_vars(false).load(file.path());
    assert!(matches!(result, Err(ConfigError::Validation { .. })));
}

#[test]
fn test_missing_file() {
    let result = warden_config::load_config("/nonexistent/warden.yaml");
    assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
}
