// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `classify` command.

use std::sync::Arc;

use warden_core::TokenService;

use crate::cli::{ClassifyArgs, Cli, OutputFormat};
use crate::error::{BinError, BinResult};
use crate::runtime::build_gate;

/// Prints the access decision for each path, including the login page rules
/// the gate adds on top of the configured ones.
pub fn classify(cli: &Cli, args: ClassifyArgs) -> BinResult<()> {
    let config = warden_config::load_config(&cli.config)?;
    let gate = build_gate(&config, Arc::new(TokenService::initialize()?))?;
    let policy = gate.policy();

    match args.format {
        OutputFormat::Text => {
            for path in &args.paths {
                let classification = policy.explain(path);
                let matched = classification.pattern.as_deref().unwrap_or("(no rule)");
                println!("{:<32} {:<20} {}", path, classification.decision.to_string(), matched);
            }
        }
        OutputFormat::Json => {
            let results: Vec<_> = args
                .paths
                .iter()
                .map(|path| serde_json::json!({ "path": path, "classification": policy.explain(path) }))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&results).map_err(|e| BinError::runtime(e.to_string()))?
            );
        }
    }

    Ok(())
}
