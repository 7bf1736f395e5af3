// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! - `run`: Start the reference host
//! - `validate`: Validate configuration file
//! - `classify`: Classify paths against the access policy
//! - `version`: Show version information

mod classify;
mod run;
mod validate;
mod version;

pub use classify::classify;
pub use run::run;
pub use validate::validate;
pub use version::version;

use crate::cli::{Cli, Commands};
use crate::error::BinResult;

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Run(args) => run::run(&cli, args).await,
        Commands::Validate(args) => validate::validate(&cli, args),
        Commands::Classify(args) => classify::classify(&cli, args),
        Commands::Version => version::version(&cli),
    }
}
