// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # warden-config
//!
//! Configuration management for Warden.
//!
//! ## Features
//!
//! - **Schema Definition**: server, security rules, token defaults, role directory
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: `${VAR:default}` placeholders and `WARDEN_*` variables
//!
//! ## Quick Start
//!
//! ```no_run
//! use warden_config::load_config;
//!
//! let config = load_config("warden.yaml").unwrap();
//! println!("Permitted paths: {:?}", config.security.permitted_paths);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, ConfigFormat, ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{ServerConfig, TokenConfig, WardenConfig};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
