// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden-bin
//!
//! CLI binary for Warden.
//!
//! ## Architecture
//!
//! ```text
//!                  main.rs
//!                     │
//!                  cli.rs
//!                     │
//!       ┌─────────────┼─────────────┐
//!       ▼             ▼             ▼
//!   commands       runtime       logging
//!                     │
//!                 shutdown
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the reference host (default command)
//! warden -c warden.yaml
//!
//! # Validate configuration
//! warden validate --strict
//!
//! # See which rule governs a path
//! warden classify /home /admin/users
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod shutdown;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use runtime::WardenRuntime;
pub use shutdown::shutdown_signal;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
