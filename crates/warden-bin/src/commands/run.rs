// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `run` command.

use tracing::info;

use crate::cli::{Cli, RunArgs};
use crate::error::BinResult;
use crate::runtime::WardenRuntime;

/// Executes the `run` command to start the reference host.
pub async fn run(cli: &Cli, args: RunArgs) -> BinResult<()> {
    info!(config = %cli.config.display(), "Starting Warden...");

    let config = warden_config::load_config(&cli.config)?;

    let mut runtime = WardenRuntime::new(config);
    if let Some(port) = args.port {
        runtime = runtime.with_port(port);
    }

    runtime.run().await
}
