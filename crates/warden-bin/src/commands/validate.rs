// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use std::sync::Arc;

use warden_core::TokenService;

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};
use crate::runtime::build_gate;

/// Executes the `validate` command.
///
/// Loads the configuration and builds the gate exactly as `run` would, so a
/// configuration that passes here starts cleanly.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;

    let config = warden_config::load_config(config_path)
        .map_err(|e| BinError::from(e).with_context("Configuration validation failed"))?;

    let tokens = Arc::new(TokenService::initialize()?);
    let gate = build_gate(&config, tokens)?;
    let warnings = config.warnings();

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!("  Listen:           {}", config.server.socket_addr());
            println!("  Permitted paths:  {}", config.security.permitted_paths.len());
            println!("  Authenticated:    {}", config.security.authenticated_paths.len());
            println!("  Role rules:       {}", config.security.role_paths.len());
            println!("  Pipeline:         {:?}", gate.pipeline());
            println!("  Login page:       {}", gate.login().page_url);

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                println!(
                    "{}",
                    serde_json::to_string_pretty(&config)
                        .unwrap_or_else(|_| "(serialization error)".to_string())
                );
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "summary": {
                    "listen": config.server.socket_addr().to_string(),
                    "permitted_paths": config.security.permitted_paths.len(),
                    "authenticated_paths": config.security.authenticated_paths.len(),
                    "role_rules": config.security.role_paths.len(),
                    "pipeline": format!("{:?}", gate.pipeline()),
                    "login_page": gate.login().page_url,
                },
                "warnings": warnings,
                "config": if args.show_config { Some(&config) } else { None },
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output).map_err(|e| BinError::runtime(e.to_string()))?
            );
        }
    }

    if args.strict && !warnings.is_empty() {
        return Err(BinError::config(format!(
            "Strict mode: {} warning(s) found",
            warnings.len()
        )));
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn cli_for(file: &tempfile::NamedTempFile) -> Cli {
        Cli::parse_from(["warden", "-c", file.path().to_str().unwrap(), "validate"])
    }

    #[test]
    fn test_valid_config() {
        let file = config_file(
            "security:\n  permitted_paths: [\"/welcome\"]\n  enable_token_validation: true\n",
        );
        assert!(validate(&cli_for(&file), ValidateArgs::default()).is_ok());
    }

    #[test]
    fn test_strict_mode_fails_on_warnings() {
        let file = config_file("security:\n  permitted_paths: [\"/welcome\"]\n");
        let args = ValidateArgs {
            strict: true,
            ..ValidateArgs::default()
        };
        let err = validate(&cli_for(&file), args).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_invalid_pattern_fails() {
        let file = config_file("security:\n  permitted_paths: [\"/a/*/b\"]\n");
        assert!(validate(&cli_for(&file), ValidateArgs::default()).is_err());
    }
}
